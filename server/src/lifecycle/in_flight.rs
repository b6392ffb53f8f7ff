//! Registro delle mutazioni in corso, una per appuntamento.
//!
//! Each appointment id maps to an async mutex. A transition holds the mutex
//! for its whole backend round trip, so a second request on the same
//! appointment waits and then sees the status the first one established.
//! Entries are dropped once nobody holds or awaits them.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

#[derive(Default)]
pub struct InFlight {
    locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other mutation on `id` is running and claims it.
    pub async fn acquire(self: &Arc<Self>, id: i32) -> InFlightGuard {
        let lock = self
            .locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        debug!("Claimed appointment {} for mutation", id);
        InFlightGuard {
            registry: Arc::clone(self),
            id,
            guard: Some(guard),
        }
    }

    /// True while a mutation on `id` holds the guard.
    pub fn is_busy(&self, id: i32) -> bool {
        self.locks
            .get(&id)
            .map(|lock| lock.try_lock().is_err())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

pub struct InFlightGuard {
    registry: Arc<InFlight>,
    id: i32,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        // release the mutex first so the strong count only reflects waiters
        drop(self.guard.take());
        self.registry
            .locks
            .remove_if(&self.id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn guard_marks_appointment_busy_until_dropped() {
        let registry = Arc::new(InFlight::new());
        assert!(!registry.is_busy(1));

        let guard = registry.acquire(1).await;
        assert!(registry.is_busy(1));
        assert!(!registry.is_busy(2));

        drop(guard);
        assert!(!registry.is_busy(1));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn second_claim_waits_for_the_first() {
        let registry = Arc::new(InFlight::new());
        let first = registry.acquire(5).await;

        let contender = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                let _guard = registry.acquire(5).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(first);
        contender.await.unwrap();
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn different_appointments_do_not_block_each_other() {
        let registry = Arc::new(InFlight::new());
        let _a = registry.acquire(1).await;
        let _b = tokio::time::timeout(Duration::from_millis(50), registry.acquire(2))
            .await
            .expect("appointment 2 must not wait for appointment 1");
        assert_eq!(registry.len(), 2);
    }
}

//! Appointment Status Lifecycle
//!
//! Governs the status of a tutor's appointments:
//!
//! ```text
//! PENDING ──confirm──> ACCEPTED ──remove──> (deleted)
//!    └─────reject────> REJECTED ──remove──> (deleted)
//! ```
//!
//! Every operation re-reads the appointment under a per-appointment guard,
//! checks the transition against the status it finds, performs the backend
//! call (bounded by a timeout), refreshes the tutor's list and emits one
//! notification describing the outcome. Nothing is retried: a failure leaves
//! the stored appointment untouched and is reported once.

pub mod in_flight;
pub mod notify;
pub mod transition;

pub use in_flight::{InFlight, InFlightGuard};
pub use notify::{Notification, NotificationHub, NotificationLevel};
pub use transition::{Action, Effect, Transition};

use crate::core::SessionContext;
use crate::entities::{Appointment, AppointmentStatus};
use crate::repositories::{AppointmentStore, BackendError, Delete, Read, Update};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

// Hand-off between a spawned mutation and the request waiting on it
const WAITING: u8 = 0;
const SETTLED: u8 = 1;
const ABANDONED: u8 = 2;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("appointment {0} not found")]
    NotFound(i32),

    #[error("cannot {action} appointment {id}: status is {status}")]
    InvalidTransition {
        id: i32,
        action: Action,
        status: AppointmentStatus,
    },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("backend did not answer within {0:?}")]
    Timeout(Duration),
}

/// Result of a successful transition
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The appointment after the transition, `None` once removed
    pub appointment: Option<Appointment>,
    /// The tutor's list re-read after the mutation, `None` if that read failed
    pub appointments: Option<Vec<Appointment>>,
    pub message: String,
}

/// Lifecycle operations on behalf of one tutor session
pub struct AppointmentLifecycle {
    session: SessionContext,
    store: Arc<dyn AppointmentStore>,
    in_flight: Arc<InFlight>,
    hub: NotificationHub,
    timeout: Duration,
}

impl AppointmentLifecycle {
    pub fn new(
        session: SessionContext,
        store: Arc<dyn AppointmentStore>,
        in_flight: Arc<InFlight>,
        hub: NotificationHub,
        timeout: Duration,
    ) -> Self {
        Self {
            session,
            store,
            in_flight,
            hub,
            timeout,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// True while a transition on `id` is in flight; the UI disables its controls.
    pub fn is_busy(&self, id: i32) -> bool {
        self.in_flight.is_busy(id)
    }

    /// Current visible set of the tutor's appointments
    #[instrument(skip(self), fields(tutor_id = %self.session.user_id))]
    pub async fn appointments(&self) -> Result<Vec<Appointment>, LifecycleError> {
        let appointments = self
            .call(self.store.list_by_tutor(&self.session.user_id))
            .await?;
        debug!("Tutor has {} visible appointments", appointments.len());
        Ok(appointments)
    }

    /// PENDING -> ACCEPTED
    #[instrument(skip(self), fields(tutor_id = %self.session.user_id))]
    pub async fn confirm(&self, id: i32) -> Result<TransitionOutcome, LifecycleError> {
        self.run(id, Action::Confirm, Ok(Transition::Confirm)).await
    }

    /// PENDING -> REJECTED, storing the (non-empty) reason
    #[instrument(skip(self, reason), fields(tutor_id = %self.session.user_id))]
    pub async fn reject(&self, id: i32, reason: &str) -> Result<TransitionOutcome, LifecycleError> {
        self.run(id, Action::Reject, Transition::reject(reason)).await
    }

    /// ACCEPTED | REJECTED -> removed
    #[instrument(skip(self), fields(tutor_id = %self.session.user_id))]
    pub async fn remove(&self, id: i32) -> Result<TransitionOutcome, LifecycleError> {
        self.run(id, Action::Remove, Ok(Transition::Remove)).await
    }

    async fn run(
        &self,
        id: i32,
        action: Action,
        transition: Result<Transition, LifecycleError>,
    ) -> Result<TransitionOutcome, LifecycleError> {
        let result = match transition {
            Ok(transition) => self.execute(id, transition).await,
            Err(err) => Err(err),
        };

        match &result {
            Ok(outcome) => self
                .hub
                .success(self.session.user_id, id, outcome.message.clone()),
            Err(err) => self
                .hub
                .error(self.session.user_id, id, failure_message(action, err)),
        }
        result
    }

    async fn execute(
        &self,
        id: i32,
        transition: Transition,
    ) -> Result<TransitionOutcome, LifecycleError> {
        let guard = self.in_flight.acquire(id).await;

        // Status is read after the guard is held, never remembered from the UI
        let current = self
            .call(self.store.read(&id))
            .await?
            .filter(|a| a.tutor_id == self.session.user_id)
            .ok_or_else(|| {
                warn!("Appointment {} is not visible to tutor", id);
                LifecycleError::NotFound(id)
            })?;

        let effect = transition.apply(id, current.status)?;
        debug!("Transition {:?} allowed from {}", transition.action(), current.status);

        let appointment = self.mutate(guard, &current, &transition, effect).await?;
        if let Some(updated) = &appointment {
            notify_student(&self.hub, &current, updated);
        }

        let appointments = match self.appointments().await {
            Ok(list) => Some(list),
            Err(err) => {
                warn!("Transition applied but list refresh failed: {}", err);
                None
            }
        };

        let message = success_message(transition.action(), id);
        info!("{}", message);

        Ok(TransitionOutcome {
            appointment,
            appointments,
            message,
        })
    }

    /// Issues the backend mutation on its own task.
    ///
    /// The task owns the in-flight guard and always runs to completion, so a
    /// write is never cut in half by the timeout. When the wait expires the
    /// appointment is re-read: a stored target status counts as success. If
    /// the caller gives up, the task reports the late outcome itself.
    async fn mutate(
        &self,
        guard: InFlightGuard,
        current: &Appointment,
        transition: &Transition,
        effect: Effect,
    ) -> Result<Option<Appointment>, LifecycleError> {
        let id = current.id;
        let state = Arc::new(AtomicU8::new(WAITING));

        let mut task = tokio::spawn({
            let store = self.store.clone();
            let hub = self.hub.clone();
            let state = state.clone();
            let tutor_id = self.session.user_id;
            let action = transition.action();
            let before = current.clone();
            async move {
                let result = match effect {
                    Effect::Update(patch) => store.update(&id, &patch).await.map(Some),
                    Effect::Delete => store.delete(&id).await.map(|()| None),
                };
                drop(guard);

                let abandoned = state
                    .compare_exchange(WAITING, SETTLED, Ordering::SeqCst, Ordering::SeqCst)
                    == Err(ABANDONED);
                if abandoned {
                    warn!("Appointment {} mutation finished after the request timed out", id);
                    match &result {
                        Ok(after) => {
                            if let Some(after) = after {
                                notify_student(&hub, &before, after);
                            }
                            hub.success(tutor_id, id, success_message(action, id));
                        }
                        Err(err) => hub.error(
                            tutor_id,
                            id,
                            failure_message(action, &LifecycleError::Backend(err.clone())),
                        ),
                    }
                }
                result
            }
        });

        let joined = match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!("Mutation of appointment {} still running after {:?}", id, self.timeout);
                if let Some(stored) = self.landed(id, transition).await {
                    state.store(SETTLED, Ordering::SeqCst);
                    return Ok(stored);
                }
                if state
                    .compare_exchange(WAITING, ABANDONED, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    error!("Backend call timed out after {:?}", self.timeout);
                    return Err(LifecycleError::Timeout(self.timeout));
                }
                // finished between the re-read and now
                task.await
            }
        };

        let result = joined.map_err(|err| {
            error!("Mutation task failed: {}", err);
            LifecycleError::Backend(BackendError::Internal(err.to_string()))
        })?;
        result.map_err(|err| {
            error!("Backend call failed: {}", err);
            missing_as_not_found(id, LifecycleError::Backend(err))
        })
    }

    /// Re-reads `id` and returns the stored result if `transition` already took effect
    async fn landed(&self, id: i32, transition: &Transition) -> Option<Option<Appointment>> {
        let stored = self.call(self.store.read(&id)).await.ok()?;
        match (transition.target(), stored) {
            (None, None) => Some(None),
            (Some(target), Some(appointment)) if appointment.status == target => {
                Some(Some(appointment))
            }
            _ => None,
        }
    }

    /// Runs a backend call under the configured timeout
    async fn call<T>(
        &self,
        request: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, LifecycleError> {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                error!("Backend call failed: {}", err);
                Err(LifecycleError::Backend(err))
            }
            Err(_) => {
                error!("Backend call timed out after {:?}", self.timeout);
                Err(LifecycleError::Timeout(self.timeout))
            }
        }
    }
}

fn success_message(action: Action, id: i32) -> String {
    match action {
        Action::Confirm => format!("Appointment ID: {} has been accepted.", id),
        Action::Reject => format!("Appointment ID: {} has been rejected.", id),
        Action::Remove => "Appointment deleted successfully".to_string(),
    }
}

fn notify_student(hub: &NotificationHub, before: &Appointment, after: &Appointment) {
    let message = match &after.reason {
        Some(reason) if after.status == AppointmentStatus::Rejected => format!(
            "Your {} appointment on {} was declined: {}",
            before.subject, before.date, reason
        ),
        _ => format!(
            "Your {} appointment on {} was accepted",
            before.subject, before.date
        ),
    };
    hub.success(before.student_id, before.id, message);
}

fn missing_as_not_found(id: i32, err: LifecycleError) -> LifecycleError {
    match err {
        LifecycleError::Backend(BackendError::NotFound) => LifecycleError::NotFound(id),
        other => other,
    }
}

/// One-line text shown to the user when a transition fails
pub fn failure_message(action: Action, err: &LifecycleError) -> String {
    if let LifecycleError::NotFound(_) = err {
        return "Appointment not found!".to_string();
    }
    let verb = match action {
        Action::Confirm => "accepting",
        Action::Reject => "rejecting",
        Action::Remove => "deleting",
    };
    format!("Error {} appointment: {}", verb, err)
}

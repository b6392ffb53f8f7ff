//! Application State - Stato condiviso tra tutte le route e i middleware

use crate::core::{Config, SessionContext};
use crate::lifecycle::{AppointmentLifecycle, InFlight, NotificationHub};
use crate::repositories::Backend;
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    /// Backend client (users, tutors, appointments, reviews)
    pub backend: Backend,

    /// Secret key per verificare i token JWT
    pub jwt_secret: String,

    /// Mutazioni di stato in corso, una per appuntamento
    pub in_flight: Arc<InFlight>,

    /// Canale delle notifiche verso i client
    pub notifications: NotificationHub,

    /// Upper bound of each backend call made by the lifecycle
    pub backend_timeout: Duration,
}

impl AppState {
    /// Crea una nuova istanza di AppState
    ///
    /// # Arguments
    /// * `backend` - Backend client (MySQL in produzione, in-memory nei test)
    /// * `jwt_secret` - Chiave segreta per la verifica dei token JWT
    /// * `backend_timeout` - Timeout delle chiamate al backend
    /// * `notification_buffer` - Capacità del canale broadcast delle notifiche
    pub fn new(
        backend: Backend,
        jwt_secret: String,
        backend_timeout: Duration,
        notification_buffer: usize,
    ) -> Self {
        Self {
            backend,
            jwt_secret,
            in_flight: Arc::new(InFlight::new()),
            notifications: NotificationHub::new(notification_buffer),
            backend_timeout,
        }
    }

    pub fn from_config(backend: Backend, config: &Config) -> Self {
        Self::new(
            backend,
            config.jwt_secret.clone(),
            config.backend_timeout(),
            config.notification_buffer,
        )
    }

    /// Lifecycle bound to the given session
    pub fn lifecycle(&self, session: SessionContext) -> AppointmentLifecycle {
        AppointmentLifecycle::new(
            session,
            self.backend.appointments.clone(),
            self.in_flight.clone(),
            self.notifications.clone(),
            self.backend_timeout,
        )
    }
}

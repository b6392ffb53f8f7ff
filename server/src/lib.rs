//! Tutoring marketplace server - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod lifecycle;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/tutors", configure_tutor_routes(state.clone()))
        .nest("/appointments", configure_appointment_routes(state.clone()))
        .nest("/notifications", configure_notification_routes(state.clone()))
        .with_state(state)
}

/// Configura le routes del catalogo tutor
fn configure_tutor_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(list_tutors))
        .route("/{tutor_id}", get(get_tutor))
        .route("/{tutor_id}/reviews", get(list_tutor_reviews))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura le routes per prenotazione e ciclo di vita degli appuntamenti
fn configure_appointment_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(list_appointments).post(book_appointment))
        .route("/{appointment_id}", delete(remove_appointment))
        .route("/{appointment_id}/confirm", post(confirm_appointment))
        .route("/{appointment_id}/reject", post(reject_appointment))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura lo stream delle notifiche (server-sent events)
fn configure_notification_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", get(stream_notifications))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

//! Services module - Handler HTTP
//!
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.

pub mod appointment;
pub mod notification;
pub mod tutor;

// Re-exports per facilitare l'import
pub use appointment::{
    book_appointment, confirm_appointment, list_appointments, reject_appointment,
    remove_appointment,
};
pub use notification::stream_notifications;
pub use tutor::{get_tutor, list_tutor_reviews, list_tutors};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}

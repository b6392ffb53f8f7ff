use crate::lifecycle::LifecycleError;
use crate::repositories::BackendError;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    // Common error constructors
    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_gateway(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn service_unavailable(message: &'static str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn gateway_timeout(message: &'static str) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound => Self::not_found("Resource not found"),

            BackendError::Rejected(details) => {
                Self::bad_request("Backend rejected the request").with_details(details)
            }

            BackendError::Unavailable(details) => {
                error!("Backend unavailable: {}", details);
                Self::service_unavailable("Backend unavailable")
            }

            BackendError::Internal(details) => {
                error!("Backend failure: {}", details);
                Self::bad_gateway("Backend error")
            }
        }
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        let details = err.to_string();
        match err {
            LifecycleError::NotFound(_) => Self::not_found("Appointment not found"),
            LifecycleError::InvalidTransition { .. } => Self::conflict("Invalid status transition"),
            LifecycleError::Validation(_) => Self::bad_request("Validation error"),
            LifecycleError::Backend(BackendError::Unavailable(_)) => {
                Self::service_unavailable("Backend unavailable")
            }
            LifecycleError::Backend(_) => Self::bad_gateway("Backend error"),
            LifecycleError::Timeout(_) => Self::gateway_timeout("Backend did not answer in time"),
        }
        .with_details(details)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::bad_request("Validation error").with_details(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorResponse {
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AppointmentStatus;
    use crate::lifecycle::Action;

    #[test]
    fn lifecycle_errors_map_to_http_statuses() {
        let not_found: AppError = LifecycleError::NotFound(3).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid: AppError = LifecycleError::InvalidTransition {
            id: 3,
            action: Action::Confirm,
            status: AppointmentStatus::Accepted,
        }
        .into();
        assert_eq!(invalid.status(), StatusCode::CONFLICT);

        let validation: AppError = LifecycleError::Validation("empty".into()).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let timeout: AppError =
            LifecycleError::Timeout(std::time::Duration::from_secs(1)).into();
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);

        let down: AppError =
            LifecycleError::Backend(BackendError::Unavailable("down".into())).into();
        assert_eq!(down.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn missing_row_is_not_found() {
        let err: AppError = BackendError::NotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}

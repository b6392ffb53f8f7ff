//! Notification stream - Server-sent events con le notifiche dell'utente corrente

use crate::core::{AppState, SessionContext};
use crate::lifecycle::Notification;
use axum::{
    Extension,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{instrument, warn};

#[instrument(skip(state, session), fields(user_id = %session.user_id))]
pub async fn stream_notifications(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let user_id = session.user_id;
    let stream = BroadcastStream::new(state.notifications.subscribe())
        .filter_map(move |received| notification_event(user_id, received).map(Ok));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn notification_event(
    user_id: i32,
    received: Result<Notification, BroadcastStreamRecvError>,
) -> Option<Event> {
    match received {
        Ok(notification) if notification.recipient_id == user_id => Event::default()
            .event("notification")
            .json_data(&notification)
            .ok(),
        Ok(_) => None,
        Err(err) => {
            warn!("Notification stream lagged: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserRole;
    use crate::lifecycle::NotificationLevel;
    use crate::repositories::{Backend, InMemoryAppointments, InMemoryReviews, InMemoryUsers};
    use axum::http::header::CONTENT_TYPE;
    use axum::response::IntoResponse;
    use chrono::Utc;
    use std::time::Duration;

    fn notification(recipient_id: i32, message: &str) -> Notification {
        Notification {
            recipient_id,
            appointment_id: 42,
            level: NotificationLevel::Success,
            message: message.to_string(),
            emitted_at: Utc::now(),
        }
    }

    fn state() -> Arc<AppState> {
        let backend = Backend::new(
            Arc::new(InMemoryUsers::new()),
            Arc::new(InMemoryAppointments::new()),
            Arc::new(InMemoryReviews::new()),
        );
        Arc::new(AppState::new(
            backend,
            "secret".to_string(),
            Duration::from_secs(1),
            8,
        ))
    }

    #[test]
    fn keeps_notifications_for_the_caller() {
        assert!(notification_event(1, Ok(notification(1, "accepted"))).is_some());
    }

    #[test]
    fn drops_notifications_for_other_users() {
        assert!(notification_event(1, Ok(notification(2, "accepted"))).is_none());
    }

    #[test]
    fn lagged_receiver_skips_missed_notifications() {
        assert!(notification_event(1, Err(BroadcastStreamRecvError::Lagged(3))).is_none());
    }

    #[tokio::test]
    async fn streams_only_the_callers_notifications() {
        let state = state();
        let session = SessionContext {
            user_id: 1,
            role: UserRole::Tutor,
            display_name: "Grace Hopper".to_string(),
        };

        let response = stream_notifications(State(state.clone()), Extension(session))
            .await
            .into_response();
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );

        state.notifications.success(2, 7, "for someone else");
        state.notifications.success(1, 42, "Appointment ID: 42 has been accepted.");

        let mut body = Box::pin(response.into_body().into_data_stream());
        let frame = tokio::time::timeout(Duration::from_secs(1), body.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();
        assert!(text.contains("event: notification"));
        assert!(text.contains("Appointment ID: 42 has been accepted."));
        assert!(!text.contains("for someone else"));
    }
}

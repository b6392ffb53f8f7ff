#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use sqlx::types::Json;
use std::sync::Arc;
use std::time::Duration;
use tutoring_server::core::AppState;
use tutoring_server::entities::{
    Appointment, AppointmentStatus, Review, TutorProfile, User, UserRole,
};
use tutoring_server::repositories::{Backend, InMemoryAppointments, InMemoryReviews, InMemoryUsers};

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

pub const TUTOR_GRACE: i32 = 1;
pub const TUTOR_ALAN: i32 = 2;
pub const STUDENT_ADA: i32 = 10;
pub const STUDENT_LINUS: i32 = 11;

/// Handles sui backend in-memory, per seed e verifiche dirette
pub struct TestBackend {
    pub users: Arc<InMemoryUsers>,
    pub appointments: Arc<InMemoryAppointments>,
    pub reviews: Arc<InMemoryReviews>,
}

fn user(user_id: i32, first: &str, last: &str, role: UserRole, year: i32) -> User {
    User {
        user_id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        role,
        profile_photo_url: None,
        created_at: Utc.with_ymd_and_hms(year, 1, 15, 9, 0, 0).unwrap(),
    }
}

pub fn appointment(id: i32, tutor_id: i32, student_id: i32, status: AppointmentStatus) -> Appointment {
    Appointment {
        id,
        tutor_id,
        student_id,
        date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
        start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        subject: "Mathematics".to_string(),
        grade: "Year 12".to_string(),
        status,
        reason: match status {
            AppointmentStatus::Rejected => Some("Unavailable".to_string()),
            _ => None,
        },
        comment: Some("Calculus revision".to_string()),
        created_at: Utc::now(),
    }
}

/// Backend in-memory con due tutor, due studenti, recensioni e appuntamenti.
/// Grace insegna Mathematics e Physics, dal lunedì al venerdì, 09:00-18:00;
/// Alan non ha profilo e non accetta prenotazioni.
///
/// Grace ha 42 (PENDING), 7 (PENDING), 8 (REJECTED), 9 (PENDING), 12 (ACCEPTED);
/// Alan ha 50 (PENDING).
pub async fn seeded_backend(latency: Option<Duration>) -> TestBackend {
    let users = Arc::new(InMemoryUsers::new());
    users.insert(user(TUTOR_GRACE, "Grace", "Hopper", UserRole::Tutor, 2021)).await;
    users.insert(user(TUTOR_ALAN, "Alan", "Turing", UserRole::Tutor, 2023)).await;
    users.insert(user(STUDENT_ADA, "Ada", "Lovelace", UserRole::Student, 2024)).await;
    users.insert(user(STUDENT_LINUS, "Linus", "Pauling", UserRole::Student, 2024)).await;
    users
        .insert_profile(TutorProfile {
            tutor_id: TUTOR_GRACE,
            hourly_rate: 45.0,
            currency: "NZD".to_string(),
            bio: Some("Maths and computing".to_string()),
            subjects: Json(vec!["Mathematics".to_string(), "Physics".to_string()]),
            available_days: Json(
                ["monday", "tuesday", "wednesday", "thursday", "friday"]
                    .iter()
                    .map(|d| d.to_string())
                    .collect(),
            ),
            available_from: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            available_until: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        })
        .await;

    let mut appointments = InMemoryAppointments::new();
    if let Some(latency) = latency {
        appointments = appointments.with_latency(latency);
    }
    let appointments = Arc::new(appointments);
    for (id, tutor, student, status) in [
        (42, TUTOR_GRACE, STUDENT_ADA, AppointmentStatus::Pending),
        (7, TUTOR_GRACE, STUDENT_LINUS, AppointmentStatus::Pending),
        (8, TUTOR_GRACE, STUDENT_ADA, AppointmentStatus::Rejected),
        (9, TUTOR_GRACE, STUDENT_LINUS, AppointmentStatus::Pending),
        (12, TUTOR_GRACE, STUDENT_ADA, AppointmentStatus::Accepted),
        (50, TUTOR_ALAN, STUDENT_ADA, AppointmentStatus::Pending),
    ] {
        appointments.insert(appointment(id, tutor, student, status)).await;
    }

    let reviews = Arc::new(InMemoryReviews::new());
    for (review_id, rating) in [(1, 5), (2, 4), (3, 4)] {
        reviews
            .insert(Review {
                review_id,
                tutor_id: TUTOR_GRACE,
                student_id: STUDENT_ADA,
                rating,
                comment: Some("Great session".to_string()),
                created_at: Utc::now(),
            })
            .await;
    }

    TestBackend {
        users,
        appointments,
        reviews,
    }
}

/// Crea un AppState per i test sopra il backend in-memory
pub fn create_test_state(backend: &TestBackend) -> Arc<AppState> {
    create_test_state_with_timeout(backend, Duration::from_secs(5))
}

pub fn create_test_state_with_timeout(backend: &TestBackend, timeout: Duration) -> Arc<AppState> {
    let backend = Backend::new(
        backend.users.clone(),
        backend.appointments.clone(),
        backend.reviews.clone(),
    );
    Arc::new(AppState::new(backend, JWT_SECRET.to_string(), timeout, 64))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = tutoring_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un JWT token per testing, valido per 24 ore
pub fn create_test_jwt(user_id: i32, jwt_secret: &str) -> String {
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        id: i32,
        exp: usize,
        iat: usize,
    }

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        id: user_id,
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

pub fn bearer(user_id: i32) -> String {
    format!("Bearer {}", create_test_jwt(user_id, JWT_SECRET))
}

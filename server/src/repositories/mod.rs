//! Repositories module - Backend client per utenti, tutor, appuntamenti e recensioni
//!
//! Ogni store espone operazioni CRUD indicizzate per id (vedi `traits`) più le
//! liste necessarie ai servizi. Le implementazioni sono due: MySQL (`sqlx`) per
//! la produzione e in-memory per i test e lo sviluppo locale.

pub mod appointment;
pub mod memory;
pub mod review;
pub mod traits;
pub mod user;

pub use traits::{Create, Delete, Read, Update};

pub use appointment::AppointmentRepository;
pub use memory::{InMemoryAppointments, InMemoryReviews, InMemoryUsers};
pub use review::ReviewRepository;
pub use user::UserRepository;

use crate::dtos::{CreateAppointmentDTO, UpdateAppointmentDTO};
use crate::entities::{Appointment, Review, TutorProfile, User};
use async_trait::async_trait;
use sqlx::MySqlPool;
use std::sync::Arc;

/// Failure of a backend call (network, auth, server fault or missing row)
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("resource not found")]
    NotFound,

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend rejected the request: {0}")]
    Rejected(String),

    #[error("backend failure: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,

            sqlx::Error::Database(db) => Self::Rejected(db.message().to_string()),

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Unavailable(err.to_string())
            }

            _ => Self::Internal(err.to_string()),
        }
    }
}

/// Appointment resource: CRUD plus the per-user listings
#[async_trait]
pub trait AppointmentStore:
    Create<Appointment, CreateAppointmentDTO>
    + Read<Appointment, i32>
    + Update<Appointment, UpdateAppointmentDTO, i32>
    + Delete<i32>
{
    /// Current visible set of appointments addressed to a tutor, ordered by id
    async fn list_by_tutor(&self, tutor_id: &i32) -> Result<Vec<Appointment>, BackendError>;

    /// Appointments booked by a student, ordered by id
    async fn list_by_student(&self, student_id: &i32) -> Result<Vec<Appointment>, BackendError>;
}

/// User and tutor profile resources
#[async_trait]
pub trait UserStore: Read<User, i32> {
    async fn list_tutors(&self) -> Result<Vec<User>, BackendError>;

    async fn read_tutor_profile(&self, tutor_id: &i32)
    -> Result<Option<TutorProfile>, BackendError>;
}

/// Review resource
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn list_by_tutor(&self, tutor_id: &i32) -> Result<Vec<Review>, BackendError>;
}

/// Backend client: one handle per resource
#[derive(Clone)]
pub struct Backend {
    pub users: Arc<dyn UserStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub reviews: Arc<dyn ReviewStore>,
}

impl Backend {
    pub fn new(
        users: Arc<dyn UserStore>,
        appointments: Arc<dyn AppointmentStore>,
        reviews: Arc<dyn ReviewStore>,
    ) -> Self {
        Self {
            users,
            appointments,
            reviews,
        }
    }

    /// Backend over a shared MySQL connection pool
    pub fn mysql(pool: MySqlPool) -> Self {
        Self::new(
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(AppointmentRepository::new(pool.clone())),
            Arc::new(ReviewRepository::new(pool)),
        )
    }
}

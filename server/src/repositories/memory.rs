//! In-memory implementation of the backend stores.
//!
//! All data lives in `HashMap`s behind a `tokio::sync::RwLock` and is lost on
//! restart. Used by the test-suite and for local development without MySQL.
//! An optional artificial latency makes in-flight windows observable.

use super::{AppointmentStore, BackendError, Create, Delete, Read, ReviewStore, Update, UserStore};
use crate::dtos::{CreateAppointmentDTO, UpdateAppointmentDTO};
use crate::entities::{Appointment, AppointmentStatus, Review, TutorProfile, User, UserRole};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// In-memory appointment store.
pub struct InMemoryAppointments {
    appointments: RwLock<HashMap<i32, Appointment>>,
    next_id: AtomicI32,
    latency: Option<Duration>,
    /// When set, every call fails as if the backend were down
    offline: AtomicBool,
}

impl InMemoryAppointments {
    pub fn new() -> Self {
        Self {
            appointments: RwLock::new(HashMap::new()),
            next_id: AtomicI32::new(1),
            latency: None,
            offline: AtomicBool::new(false),
        }
    }

    /// Delay every call by `latency` before touching the data.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Insert an appointment as-is, keeping its id.
    pub async fn insert(&self, appointment: Appointment) {
        self.next_id.fetch_max(appointment.id + 1, Ordering::SeqCst);
        self.appointments
            .write()
            .await
            .insert(appointment.id, appointment);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    async fn round_trip(&self) -> Result<(), BackendError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("backend offline".to_string()));
        }
        Ok(())
    }

    async fn list_where(&self, keep: impl Fn(&Appointment) -> bool) -> Vec<Appointment> {
        let appointments = self.appointments.read().await;
        let mut found: Vec<Appointment> = appointments.values().filter(|a| keep(a)).cloned().collect();
        found.sort_by_key(|a| a.id);
        found
    }
}

impl Default for InMemoryAppointments {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointments {
    async fn list_by_tutor(&self, tutor_id: &i32) -> Result<Vec<Appointment>, BackendError> {
        self.round_trip().await?;
        Ok(self.list_where(|a| a.tutor_id == *tutor_id).await)
    }

    async fn list_by_student(&self, student_id: &i32) -> Result<Vec<Appointment>, BackendError> {
        self.round_trip().await?;
        Ok(self.list_where(|a| a.student_id == *student_id).await)
    }
}

#[async_trait]
impl Create<Appointment, CreateAppointmentDTO> for InMemoryAppointments {
    async fn create(&self, data: &CreateAppointmentDTO) -> Result<Appointment, BackendError> {
        self.round_trip().await?;
        let appointment = Appointment {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            tutor_id: data.tutor_id,
            student_id: data.student_id,
            date: data.date,
            start_time: data.start_time,
            end_time: data.end_time,
            subject: data.subject.clone(),
            grade: data.grade.clone(),
            status: AppointmentStatus::Pending,
            reason: None,
            comment: data.comment.clone(),
            created_at: chrono::Utc::now(),
        };
        self.appointments
            .write()
            .await
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }
}

#[async_trait]
impl Read<Appointment, i32> for InMemoryAppointments {
    async fn read(&self, id: &i32) -> Result<Option<Appointment>, BackendError> {
        self.round_trip().await?;
        Ok(self.appointments.read().await.get(id).cloned())
    }
}

#[async_trait]
impl Update<Appointment, UpdateAppointmentDTO, i32> for InMemoryAppointments {
    async fn update(
        &self,
        id: &i32,
        data: &UpdateAppointmentDTO,
    ) -> Result<Appointment, BackendError> {
        self.round_trip().await?;
        let mut appointments = self.appointments.write().await;
        let appointment = appointments.get_mut(id).ok_or(BackendError::NotFound)?;
        if let Some(status) = data.status {
            appointment.status = status;
        }
        if let Some(ref reason) = data.reason {
            appointment.reason = Some(reason.clone());
        }
        Ok(appointment.clone())
    }
}

#[async_trait]
impl Delete<i32> for InMemoryAppointments {
    async fn delete(&self, id: &i32) -> Result<(), BackendError> {
        self.round_trip().await?;
        self.appointments
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(BackendError::NotFound)
    }
}

/// In-memory user and tutor profile store.
#[derive(Default)]
pub struct InMemoryUsers {
    users: RwLock<HashMap<i32, User>>,
    profiles: RwLock<HashMap<i32, TutorProfile>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.user_id, user);
    }

    pub async fn insert_profile(&self, profile: TutorProfile) {
        self.profiles.write().await.insert(profile.tutor_id, profile);
    }
}

#[async_trait]
impl Read<User, i32> for InMemoryUsers {
    async fn read(&self, id: &i32) -> Result<Option<User>, BackendError> {
        Ok(self.users.read().await.get(id).cloned())
    }
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn list_tutors(&self) -> Result<Vec<User>, BackendError> {
        let users = self.users.read().await;
        let mut tutors: Vec<User> = users
            .values()
            .filter(|u| u.role == UserRole::Tutor)
            .cloned()
            .collect();
        tutors.sort_by_key(|u| u.user_id);
        Ok(tutors)
    }

    async fn read_tutor_profile(
        &self,
        tutor_id: &i32,
    ) -> Result<Option<TutorProfile>, BackendError> {
        Ok(self.profiles.read().await.get(tutor_id).cloned())
    }
}

/// In-memory review store.
#[derive(Default)]
pub struct InMemoryReviews {
    reviews: RwLock<Vec<Review>>,
}

impl InMemoryReviews {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, review: Review) {
        self.reviews.write().await.push(review);
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviews {
    async fn list_by_tutor(&self, tutor_id: &i32) -> Result<Vec<Review>, BackendError> {
        let reviews = self.reviews.read().await;
        let mut found: Vec<Review> = reviews
            .iter()
            .filter(|r| r.tutor_id == *tutor_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

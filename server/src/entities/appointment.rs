//! Appointment entity - Richiesta di prenotazione da studente a tutor

use super::enums::AppointmentStatus;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Appointment {
    pub id: i32,
    pub tutor_id: i32,
    pub student_id: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub subject: String,
    pub grade: String,
    pub status: AppointmentStatus,
    // only meaningful when status is REJECTED
    pub reason: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

//! Appointment DTOs - Data Transfer Objects per appuntamenti

use crate::dtos::UserSummaryDTO;
use crate::entities::{Appointment, AppointmentStatus};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Struct per gestire io col client. Rows are keyed by `id`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppointmentDTO {
    pub id: i32,
    pub tutor_id: i32,
    pub student_id: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub subject: String,
    pub grade: String,
    pub status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Student summary, filled in for the tutor's listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<UserSummaryDTO>,
    /// True while a status change on this appointment is in flight
    pub busy: bool,
}

impl From<Appointment> for AppointmentDTO {
    fn from(value: Appointment) -> Self {
        Self {
            id: value.id,
            tutor_id: value.tutor_id,
            student_id: value.student_id,
            date: value.date,
            start_time: value.start_time,
            end_time: value.end_time,
            subject: value.subject,
            grade: value.grade,
            status: value.status,
            reason: value.reason,
            comment: value.comment,
            created_at: value.created_at,
            student: None,
            busy: false,
        }
    }
}

/// DTO per creare un nuovo appuntamento (senza id, status e created_at)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_time_window"))]
pub struct CreateAppointmentDTO {
    pub tutor_id: i32,
    #[serde(default)]
    pub student_id: i32, // sovrascritto con l'utente corrente
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(length(min = 1, max = 100, message = "Subject must be between 1 and 100 characters"))]
    pub subject: String,
    #[validate(length(min = 1, max = 50, message = "Grade must be between 1 and 50 characters"))]
    pub grade: String,
    #[validate(length(max = 1000, message = "Comment cannot exceed 1000 characters"))]
    pub comment: Option<String>,
}

fn validate_time_window(dto: &CreateAppointmentDTO) -> Result<(), ValidationError> {
    if dto.start_time >= dto.end_time {
        let mut err = ValidationError::new("time_window");
        err.message = Some("start_time must be before end_time".into());
        return Err(err);
    }
    Ok(())
}

/// DTO per aggiornare un appuntamento (solo status e reason sono modificabili)
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UpdateAppointmentDTO {
    pub status: Option<AppointmentStatus>,
    pub reason: Option<String>,
}

/// Body di POST /appointments/{id}/reject. Il motivo viene validato dal lifecycle
/// (non vuoto, massimo 500 caratteri) così che anche il rifiuto generi una notifica.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RejectAppointmentDTO {
    #[serde(default)]
    pub reason: String,
}

/// Risposta delle transizioni di stato: esito, messaggio e lista aggiornata
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TransitionOutcomeDTO {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<AppointmentDTO>,
    /// Lista aggiornata dopo la transizione, assente se la rilettura è fallita
    pub appointments: Option<Vec<AppointmentDTO>>,
}

//! Enumerazioni - Tipi enumerati utilizzati nelle entità

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Student,
    Tutor,
}

/// Status of an appointment. `Accepted` and `Rejected` are terminal: only
/// removal is possible from there.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Pending,
    Accepted,
    Rejected,
}

impl AppointmentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Pending)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Accepted => "ACCEPTED",
            AppointmentStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

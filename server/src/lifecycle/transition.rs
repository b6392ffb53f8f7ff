//! Transition table of the appointment status machine.
//!
//! Pure functions only: no backend, no clock. The lifecycle runs these checks
//! against the status it re-reads under the in-flight guard.

use super::LifecycleError;
use crate::dtos::UpdateAppointmentDTO;
use crate::entities::AppointmentStatus;
use serde::Serialize;
use std::fmt;

pub const MAX_REASON_LEN: usize = 500;

/// A user intent on a single appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Confirm,
    Reject,
    Remove,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Confirm => "confirm",
            Action::Reject => "reject",
            Action::Remove => "remove",
        };
        f.write_str(s)
    }
}

/// What the backend has to do once a transition is allowed
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Update(UpdateAppointmentDTO),
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Confirm,
    Reject { reason: String },
    Remove,
}

impl Transition {
    /// Builds a rejection, trimming the reason and refusing empty or oversized ones.
    pub fn reject(reason: &str) -> Result<Self, LifecycleError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(LifecycleError::Validation(
                "a rejection reason is required".to_string(),
            ));
        }
        if reason.chars().count() > MAX_REASON_LEN {
            return Err(LifecycleError::Validation(format!(
                "rejection reason cannot exceed {MAX_REASON_LEN} characters"
            )));
        }
        Ok(Transition::Reject {
            reason: reason.to_string(),
        })
    }

    pub fn action(&self) -> Action {
        match self {
            Transition::Confirm => Action::Confirm,
            Transition::Reject { .. } => Action::Reject,
            Transition::Remove => Action::Remove,
        }
    }

    /// Status stored once the transition took effect, `None` when the row is gone
    pub fn target(&self) -> Option<AppointmentStatus> {
        match self {
            Transition::Confirm => Some(AppointmentStatus::Accepted),
            Transition::Reject { .. } => Some(AppointmentStatus::Rejected),
            Transition::Remove => None,
        }
    }

    /// Checks the transition against the current status.
    ///
    /// PENDING accepts confirm/reject, ACCEPTED and REJECTED accept remove only.
    pub fn apply(&self, id: i32, current: AppointmentStatus) -> Result<Effect, LifecycleError> {
        let invalid = || LifecycleError::InvalidTransition {
            id,
            action: self.action(),
            status: current,
        };

        match (self, current) {
            (Transition::Confirm, AppointmentStatus::Pending) => {
                Ok(Effect::Update(UpdateAppointmentDTO {
                    status: Some(AppointmentStatus::Accepted),
                    reason: None,
                }))
            }
            (Transition::Reject { reason }, AppointmentStatus::Pending) => {
                Ok(Effect::Update(UpdateAppointmentDTO {
                    status: Some(AppointmentStatus::Rejected),
                    reason: Some(reason.clone()),
                }))
            }
            (Transition::Remove, status) if status.is_terminal() => Ok(Effect::Delete),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus::*;

    #[test]
    fn pending_can_be_confirmed() {
        let effect = Transition::Confirm.apply(1, Pending).unwrap();
        assert_eq!(
            effect,
            Effect::Update(UpdateAppointmentDTO {
                status: Some(Accepted),
                reason: None,
            })
        );
    }

    #[test]
    fn pending_can_be_rejected_with_reason() {
        let effect = Transition::reject("Schedule conflict")
            .unwrap()
            .apply(7, Pending)
            .unwrap();
        assert_eq!(
            effect,
            Effect::Update(UpdateAppointmentDTO {
                status: Some(Rejected),
                reason: Some("Schedule conflict".to_string()),
            })
        );
    }

    #[test]
    fn terminal_statuses_refuse_confirm_and_reject() {
        for status in [Accepted, Rejected] {
            let err = Transition::Confirm.apply(1, status).unwrap_err();
            assert!(matches!(
                err,
                LifecycleError::InvalidTransition { action: Action::Confirm, .. }
            ));

            let err = Transition::reject("late").unwrap().apply(1, status).unwrap_err();
            assert!(matches!(
                err,
                LifecycleError::InvalidTransition { action: Action::Reject, .. }
            ));
        }
    }

    #[test]
    fn pending_cannot_be_removed() {
        let err = Transition::Remove.apply(9, Pending).unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::InvalidTransition { id: 9, status: Pending, .. }
        ));
    }

    #[test]
    fn terminal_statuses_can_be_removed() {
        assert_eq!(Transition::Remove.apply(1, Accepted).unwrap(), Effect::Delete);
        assert_eq!(Transition::Remove.apply(1, Rejected).unwrap(), Effect::Delete);
    }

    #[test]
    fn targets_follow_the_state_machine() {
        assert_eq!(Transition::Confirm.target(), Some(Accepted));
        assert_eq!(Transition::reject("busy").unwrap().target(), Some(Rejected));
        assert_eq!(Transition::Remove.target(), None);
    }

    #[test]
    fn blank_reason_is_refused() {
        assert!(matches!(
            Transition::reject("   "),
            Err(LifecycleError::Validation(_))
        ));
        assert!(matches!(Transition::reject(""), Err(LifecycleError::Validation(_))));
    }

    #[test]
    fn oversized_reason_is_refused() {
        let reason = "x".repeat(MAX_REASON_LEN + 1);
        assert!(matches!(
            Transition::reject(&reason),
            Err(LifecycleError::Validation(_))
        ));
    }

    #[test]
    fn reason_is_trimmed() {
        assert_eq!(
            Transition::reject("  busy  ").unwrap(),
            Transition::Reject {
                reason: "busy".to_string()
            }
        );
    }
}

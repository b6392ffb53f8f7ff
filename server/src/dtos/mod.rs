//! DTOs module - Data Transfer Objects
//!
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod appointment;
pub mod review;
pub mod tutor;
pub mod user;

// Re-exports
pub use appointment::{
    AppointmentDTO, CreateAppointmentDTO, RejectAppointmentDTO, TransitionOutcomeDTO,
    UpdateAppointmentDTO,
};
pub use review::ReviewDTO;
pub use tutor::{AvailabilityDTO, TutorDTO, TutorDetailDTO};
pub use user::UserSummaryDTO;

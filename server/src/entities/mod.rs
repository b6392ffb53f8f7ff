//! Entities module - Entità del dominio applicativo
//!
//! Ogni entity corrisponde a una tabella nel database (vedi `migrations/`).

pub mod appointment;
pub mod enums;
pub mod review;
pub mod tutor;
pub mod user;

// Re-exports per facilitare l'import
pub use appointment::Appointment;
pub use enums::{AppointmentStatus, UserRole};
pub use review::Review;
pub use tutor::TutorProfile;
pub use user::User;

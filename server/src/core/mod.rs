//! Core Module - Componenti infrastrutturali dell'applicazione
//!
//! - Verifica dei token JWT e sessione corrente
//! - Configurazione
//! - Gestione errori
//! - Stato applicazione

pub mod auth;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::{Claims, authentication_middleware, decode_jwt};
pub use config::Config;
pub use error::AppError;
pub use session::{SessionContext, require_role};
pub use state::AppState;

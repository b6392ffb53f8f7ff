//! Session context - L'utente autenticato della richiesta corrente
//!
//! Costruito dall'`authentication_middleware` e passato esplicitamente a chi ne
//! ha bisogno (handler, lifecycle), mai letto da uno stato globale.

use crate::core::AppError;
use crate::entities::{User, UserRole};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub user_id: i32,
    pub role: UserRole,
    pub display_name: String,
}

impl From<&User> for SessionContext {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            role: user.role,
            display_name: user.full_name(),
        }
    }
}

/// Helper function per verificare che l'utente abbia uno dei ruoli richiesti
///
/// # Returns
/// * `Ok(())` se il ruolo è permesso
/// * `Err(AppError)` (403) se il ruolo non è tra quelli permessi
#[instrument(skip(session), fields(user_id = %session.user_id))]
pub fn require_role(session: &SessionContext, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&session.role) {
        warn!(
            "User {} has insufficient role {:?}, required one of: {:?}",
            session.user_id, session.role, allowed_roles
        );
        return Err(AppError::forbidden("Insufficient role").with_details(format!(
            "This action requires one of the following roles: {:?}",
            allowed_roles
        )));
    }

    debug!("Role check passed with role {:?}", session.role);
    Ok(())
}

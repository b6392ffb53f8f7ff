//! User DTOs - Data Transfer Objects per utenti

use crate::entities::{User, UserRole};
use serde::{Deserialize, Serialize};

// struct per gestire io col client, l'email non viene mai esposta
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserSummaryDTO {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub profile_photo_url: Option<String>,
}

impl From<User> for UserSummaryDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.user_id,
            first_name: value.first_name,
            last_name: value.last_name,
            role: value.role,
            profile_photo_url: value.profile_photo_url,
        }
    }
}

//! Review entity - Recensione lasciata da uno studente a un tutor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Review {
    pub review_id: i32,
    pub tutor_id: i32,
    pub student_id: i32,
    pub rating: i32, // 1..=5
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

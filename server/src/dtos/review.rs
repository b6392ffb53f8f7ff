//! Review DTOs

use crate::entities::Review;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReviewDTO {
    pub review_id: i32,
    pub student_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewDTO {
    fn from(value: Review) -> Self {
        Self {
            review_id: value.review_id,
            student_id: value.student_id,
            rating: value.rating,
            comment: value.comment,
            created_at: value.created_at,
        }
    }
}

//! ReviewRepository - Repository MySQL per le recensioni dei tutor

use super::{BackendError, ReviewStore};
use crate::entities::Review;
use async_trait::async_trait;
use sqlx::MySqlPool;

pub struct ReviewRepository {
    connection_pool: MySqlPool,
}

impl ReviewRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl ReviewStore for ReviewRepository {
    async fn list_by_tutor(&self, tutor_id: &i32) -> Result<Vec<Review>, BackendError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT review_id, tutor_id, student_id, rating, comment, created_at
            FROM reviews
            WHERE tutor_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(tutor_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(reviews)
    }
}

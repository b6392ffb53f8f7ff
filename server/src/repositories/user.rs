//! UserRepository - Repository MySQL per utenti e profili tutor

use super::{BackendError, Read, UserStore};
use crate::entities::{TutorProfile, User};
use async_trait::async_trait;
use sqlx::MySqlPool;

pub struct UserRepository {
    connection_pool: MySqlPool,
}

impl UserRepository {
    pub fn new(connection_pool: MySqlPool) -> UserRepository {
        Self { connection_pool }
    }
}

#[async_trait]
impl Read<User, i32> for UserRepository {
    async fn read(&self, id: &i32) -> Result<Option<User>, BackendError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, first_name, last_name, email, role, profile_photo_url, created_at
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn list_tutors(&self) -> Result<Vec<User>, BackendError> {
        let tutors = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, first_name, last_name, email, role, profile_photo_url, created_at
            FROM users
            WHERE role = 'TUTOR'
            ORDER BY user_id
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(tutors)
    }

    async fn read_tutor_profile(
        &self,
        tutor_id: &i32,
    ) -> Result<Option<TutorProfile>, BackendError> {
        let profile = sqlx::query_as::<_, TutorProfile>(
            r#"
            SELECT tutor_id, hourly_rate, currency, bio,
                   subjects, available_days, available_from, available_until
            FROM tutors
            WHERE tutor_id = ?
            "#,
        )
        .bind(tutor_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(profile)
    }
}

//! AppointmentRepository - Repository MySQL per la gestione degli appuntamenti

use super::{AppointmentStore, BackendError, Create, Delete, Read, Update};
use crate::dtos::{CreateAppointmentDTO, UpdateAppointmentDTO};
use crate::entities::{Appointment, AppointmentStatus};
use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::{debug, instrument};

const SELECT_APPOINTMENT: &str = r#"
    SELECT
        id,
        tutor_id,
        student_id,
        date,
        start_time,
        end_time,
        subject,
        grade,
        status,
        reason,
        comment,
        created_at
    FROM appointments
"#;

pub struct AppointmentRepository {
    connection_pool: MySqlPool,
}

impl AppointmentRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

/// MySQL reports AUTO_INCREMENT ids as u64, the column is INT
fn inserted_id(raw: u64) -> Result<i32, BackendError> {
    i32::try_from(raw).map_err(|_| {
        BackendError::Internal(format!("appointment id {} does not fit the id column", raw))
    })
}

#[async_trait]
impl AppointmentStore for AppointmentRepository {
    #[instrument(skip(self))]
    async fn list_by_tutor(&self, tutor_id: &i32) -> Result<Vec<Appointment>, BackendError> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "{SELECT_APPOINTMENT} WHERE tutor_id = ? ORDER BY id"
        ))
        .bind(tutor_id)
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("Loaded {} appointments for tutor", appointments.len());
        Ok(appointments)
    }

    #[instrument(skip(self))]
    async fn list_by_student(&self, student_id: &i32) -> Result<Vec<Appointment>, BackendError> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            "{SELECT_APPOINTMENT} WHERE student_id = ? ORDER BY id"
        ))
        .bind(student_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(appointments)
    }
}

#[async_trait]
impl Create<Appointment, CreateAppointmentDTO> for AppointmentRepository {
    async fn create(&self, data: &CreateAppointmentDTO) -> Result<Appointment, BackendError> {
        // status e created_at sono decisi qui, non dal client
        let now = chrono::Utc::now();
        let status = AppointmentStatus::Pending;

        let result = sqlx::query(
            r#"
            INSERT INTO appointments
                (tutor_id, student_id, date, start_time, end_time, subject, grade, status, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.tutor_id)
        .bind(data.student_id)
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(&data.subject)
        .bind(&data.grade)
        .bind(status)
        .bind(&data.comment)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        let new_id = inserted_id(result.last_insert_id())?;

        Ok(Appointment {
            id: new_id,
            tutor_id: data.tutor_id,
            student_id: data.student_id,
            date: data.date,
            start_time: data.start_time,
            end_time: data.end_time,
            subject: data.subject.clone(),
            grade: data.grade.clone(),
            status,
            reason: None,
            comment: data.comment.clone(),
            created_at: now,
        })
    }
}

#[async_trait]
impl Read<Appointment, i32> for AppointmentRepository {
    async fn read(&self, id: &i32) -> Result<Option<Appointment>, BackendError> {
        let appointment =
            sqlx::query_as::<_, Appointment>(&format!("{SELECT_APPOINTMENT} WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.connection_pool)
                .await?;

        Ok(appointment)
    }
}

#[async_trait]
impl Update<Appointment, UpdateAppointmentDTO, i32> for AppointmentRepository {
    async fn update(
        &self,
        id: &i32,
        data: &UpdateAppointmentDTO,
    ) -> Result<Appointment, BackendError> {
        // First, get the current appointment to ensure it exists
        let current = self.read(id).await?.ok_or(BackendError::NotFound)?;

        if data.status.is_none() && data.reason.is_none() {
            return Ok(current);
        }

        // Build dynamic UPDATE query using QueryBuilder
        let mut query_builder = sqlx::QueryBuilder::<sqlx::MySql>::new("UPDATE appointments SET ");

        let mut separated = query_builder.separated(", ");
        if let Some(status) = data.status {
            separated.push("status = ");
            separated.push_bind_unseparated(status);
        }
        if let Some(ref reason) = data.reason {
            separated.push("reason = ");
            separated.push_bind_unseparated(reason.clone());
        }

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(*id);

        query_builder.build().execute(&self.connection_pool).await?;

        self.read(id).await?.ok_or(BackendError::NotFound)
    }
}

#[async_trait]
impl Delete<i32> for AppointmentRepository {
    async fn delete(&self, id: &i32) -> Result<(), BackendError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BackendError::NotFound);
        }
        Ok(())
    }
}

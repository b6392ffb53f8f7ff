//! Appointment services - Prenotazione e ciclo di vita degli appuntamenti

use crate::core::{AppError, AppState, SessionContext, require_role};
use crate::dtos::{
    AppointmentDTO, CreateAppointmentDTO, RejectAppointmentDTO, TransitionOutcomeDTO,
    UserSummaryDTO,
};
use crate::entities::{Appointment, TutorProfile, UserRole};
use crate::lifecycle::TransitionOutcome;
use crate::repositories::{AppointmentStore, UserStore};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use chrono::Datelike;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, session), fields(user_id = %session.user_id))]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>, // ottenuto dall'authentication_middleware
) -> Result<Json<Vec<AppointmentDTO>>, AppError> {
    debug!("Listing appointments for {:?}", session.role);
    // Tutor: lista degli appuntamenti ricevuti, con nome dello studente e flag busy
    // Studente: lista delle proprie prenotazioni
    match session.role {
        UserRole::Tutor => {
            let appointments = state.lifecycle(session).appointments().await?;
            info!("Found {} appointments", appointments.len());
            Ok(Json(tutor_view(&state, appointments).await?))
        }
        UserRole::Student => {
            let appointments = state
                .backend
                .appointments
                .list_by_student(&session.user_id)
                .await?;
            info!("Found {} bookings", appointments.len());
            Ok(Json(
                appointments.into_iter().map(AppointmentDTO::from).collect(),
            ))
        }
    }
}

#[instrument(skip(state, session, body), fields(student_id = %session.user_id))]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(mut body): Json<CreateAppointmentDTO>,
) -> Result<(StatusCode, Json<AppointmentDTO>), AppError> {
    debug!("Booking appointment");
    // 1. Solo gli studenti possono prenotare
    // 2. Validare il body (finestra oraria, subject, grade)
    // 3. Verificare che il tutor esista e abbia ruolo TUTOR
    // 4. Verificare materia, giorno e orario rispetto al profilo del tutor
    // 5. Creare l'appuntamento in stato PENDING per conto dell'utente corrente
    // 6. Notificare il tutor
    require_role(&session, &[UserRole::Student])?;
    body.validate()?;

    let tutor = state
        .backend
        .users
        .read(&body.tutor_id)
        .await?
        .filter(|u| u.role == UserRole::Tutor)
        .ok_or_else(|| {
            warn!("Tutor not found: {}", body.tutor_id);
            AppError::not_found("Tutor not found")
        })?;

    let profile = state
        .backend
        .users
        .read_tutor_profile(&tutor.user_id)
        .await?
        .ok_or_else(|| {
            warn!("Tutor {} has no profile, bookings are closed", tutor.user_id);
            AppError::bad_request("Tutor is not accepting bookings")
        })?;
    check_availability(&profile, &body)?;

    body.student_id = session.user_id;
    let appointment = state.backend.appointments.create(&body).await?;

    state.notifications.success(
        tutor.user_id,
        appointment.id,
        format!(
            "New {} appointment request from {} on {}",
            appointment.subject, session.display_name, appointment.date
        ),
    );

    info!("Appointment {} created", appointment.id);
    Ok((StatusCode::CREATED, Json(AppointmentDTO::from(appointment))))
}

#[instrument(skip(state, session), fields(tutor_id = %session.user_id, appointment_id = %appointment_id))]
pub async fn confirm_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<i32>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<TransitionOutcomeDTO>, AppError> {
    require_role(&session, &[UserRole::Tutor])?;
    let outcome = state.lifecycle(session).confirm(appointment_id).await?;
    Ok(Json(outcome_view(&state, outcome).await?))
}

#[instrument(skip(state, session, body), fields(tutor_id = %session.user_id, appointment_id = %appointment_id))]
pub async fn reject_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<i32>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<RejectAppointmentDTO>,
) -> Result<Json<TransitionOutcomeDTO>, AppError> {
    require_role(&session, &[UserRole::Tutor])?;
    let outcome = state
        .lifecycle(session)
        .reject(appointment_id, &body.reason)
        .await?;
    Ok(Json(outcome_view(&state, outcome).await?))
}

#[instrument(skip(state, session), fields(tutor_id = %session.user_id, appointment_id = %appointment_id))]
pub async fn remove_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<i32>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<TransitionOutcomeDTO>, AppError> {
    require_role(&session, &[UserRole::Tutor])?;
    let outcome = state.lifecycle(session).remove(appointment_id).await?;
    Ok(Json(outcome_view(&state, outcome).await?))
}

/// Richiesta compatibile con materie e disponibilità del tutor
fn check_availability(profile: &TutorProfile, body: &CreateAppointmentDTO) -> Result<(), AppError> {
    if !profile.offers(&body.subject) {
        warn!("Subject {} not offered", body.subject);
        return Err(AppError::bad_request("Subject not offered by this tutor")
            .with_details(format!("offered subjects: {}", profile.subjects.join(", "))));
    }
    let day = body.date.weekday();
    if !profile.works_on(day) {
        warn!("Tutor not available on {}", day);
        return Err(AppError::bad_request("Tutor is not available on that day")
            .with_details(format!("available days: {}", profile.available_days.join(", "))));
    }
    if !profile.covers(body.start_time, body.end_time) {
        warn!("Requested window outside availability");
        return Err(
            AppError::bad_request("Requested time is outside the tutor's availability")
                .with_details(format!(
                    "available from {} to {}",
                    profile.available_from, profile.available_until
                )),
        );
    }
    Ok(())
}

async fn outcome_view(
    state: &AppState,
    outcome: TransitionOutcome,
) -> Result<TransitionOutcomeDTO, AppError> {
    let appointments = match outcome.appointments {
        Some(list) => Some(tutor_view(state, list).await?),
        None => None,
    };
    Ok(TransitionOutcomeDTO {
        success: true,
        message: outcome.message,
        appointment: outcome.appointment.map(AppointmentDTO::from),
        appointments,
    })
}

/// Arricchisce la lista del tutor con i dati degli studenti e il flag busy
async fn tutor_view(
    state: &AppState,
    appointments: Vec<Appointment>,
) -> Result<Vec<AppointmentDTO>, AppError> {
    let mut student_ids: Vec<i32> = appointments.iter().map(|a| a.student_id).collect();
    student_ids.sort_unstable();
    student_ids.dedup();

    let reads = student_ids.iter().map(|id| state.backend.users.read(id));
    let students: HashMap<i32, UserSummaryDTO> = futures::future::try_join_all(reads)
        .await?
        .into_iter()
        .flatten()
        .map(|user| (user.user_id, UserSummaryDTO::from(user)))
        .collect();

    Ok(appointments
        .into_iter()
        .map(|appointment| {
            let busy = state.in_flight.is_busy(appointment.id);
            let student = students.get(&appointment.student_id).cloned();
            AppointmentDTO {
                student,
                busy,
                ..AppointmentDTO::from(appointment)
            }
        })
        .collect())
}

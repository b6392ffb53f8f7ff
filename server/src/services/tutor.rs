//! Tutor services - Catalogo dei tutor e recensioni

use crate::core::{AppError, AppState};
use crate::dtos::{ReviewDTO, TutorDTO, TutorDetailDTO};
use crate::entities::{User, UserRole};
use crate::repositories::{Read, ReviewStore, UserStore};
use axum::extract::{Json, Path, State};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(state))]
pub async fn list_tutors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TutorDTO>>, AppError> {
    debug!("Listing tutors");
    let tutors = state.backend.users.list_tutors().await?;

    let cards = tutors.into_iter().map(|tutor| tutor_card(&state, tutor));
    let result = futures::future::try_join_all(cards).await?;

    info!("Found {} tutors", result.len());
    Ok(Json(result))
}

#[instrument(skip(state), fields(tutor_id = %tutor_id))]
pub async fn get_tutor(
    State(state): State<Arc<AppState>>,
    Path(tutor_id): Path<i32>,
) -> Result<Json<TutorDetailDTO>, AppError> {
    debug!("Fetching tutor by ID");
    let tutor = find_tutor(&state, tutor_id).await?;

    let profile = state.backend.users.read_tutor_profile(&tutor_id).await?;
    let reviews = state.backend.reviews.list_by_tutor(&tutor_id).await?;

    let detail = TutorDetailDTO {
        tutor: TutorDTO::new(tutor, profile, &reviews),
        reviews: reviews.into_iter().map(ReviewDTO::from).collect(),
    };
    Ok(Json(detail))
}

#[instrument(skip(state), fields(tutor_id = %tutor_id))]
pub async fn list_tutor_reviews(
    State(state): State<Arc<AppState>>,
    Path(tutor_id): Path<i32>,
) -> Result<Json<Vec<ReviewDTO>>, AppError> {
    find_tutor(&state, tutor_id).await?;
    let reviews = state.backend.reviews.list_by_tutor(&tutor_id).await?;
    Ok(Json(reviews.into_iter().map(ReviewDTO::from).collect()))
}

async fn find_tutor(state: &AppState, tutor_id: i32) -> Result<User, AppError> {
    state
        .backend
        .users
        .read(&tutor_id)
        .await?
        .filter(|u| u.role == UserRole::Tutor)
        .ok_or_else(|| {
            warn!("Tutor not found: {}", tutor_id);
            AppError::not_found("Tutor not found")
        })
}

async fn tutor_card(state: &AppState, tutor: User) -> Result<TutorDTO, AppError> {
    let profile = state
        .backend
        .users
        .read_tutor_profile(&tutor.user_id)
        .await?;
    let reviews = state.backend.reviews.list_by_tutor(&tutor.user_id).await?;
    Ok(TutorDTO::new(tutor, profile, &reviews))
}

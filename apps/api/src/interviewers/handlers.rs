use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::interviewer::{Interviewer, NewInterviewer, SLIDER_RANGE};
use crate::state::AppState;

/// GET /api/interviewers
pub async fn handle_list_interviewers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Interviewer>>, AppError> {
    Ok(Json(state.store.list_interviewers().await?))
}

/// GET /api/interviewers/:id
pub async fn handle_get_interviewer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Interviewer>, AppError> {
    state
        .store
        .get_interviewer(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Interviewer {id} not found")))
}

/// POST /api/interviewers
pub async fn handle_create_interviewer(
    State(state): State<AppState>,
    Json(req): Json<NewInterviewer>,
) -> Result<(StatusCode, Json<Interviewer>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let bad = req.out_of_range_sliders();
    if !bad.is_empty() {
        return Err(AppError::Validation(format!(
            "{} must be between {} and {}",
            bad.join(", "),
            SLIDER_RANGE.start(),
            SLIDER_RANGE.end()
        )));
    }
    let interviewer = state.store.create_interviewer(req).await?;
    info!("Created interviewer {} ({})", interviewer.id, interviewer.name);
    Ok((StatusCode::CREATED, Json(interviewer)))
}

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::errors::AppError;
use crate::models::feedback::{Feedback, NewFeedback};
use crate::state::AppState;

/// POST /api/feedback
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Json(req): Json<NewFeedback>,
) -> Result<(StatusCode, Json<Feedback>), AppError> {
    if req.is_empty() {
        return Err(AppError::Validation(
            "Provide a satisfaction rating or feedback text".to_string(),
        ));
    }
    if state.store.get_interview(req.interview_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Interview {} not found",
            req.interview_id
        )));
    }
    let feedback = state.store.create_feedback(req).await?;
    info!("Stored feedback for interview {}", feedback.interview_id);
    Ok((StatusCode::CREATED, Json(feedback)))
}

//! Axum route handlers for the Responses API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interviews::handlers::load_interview;
use crate::models::response::{CandidateStatus, Response, ResponsePatch};
use crate::responses::summary::{summarize, InterviewSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListResponsesQuery {
    /// A candidate status, or `ALL`.
    pub status: Option<String>,
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<CandidateStatus>, AppError> {
    match raw {
        None | Some("") | Some("ALL") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(AppError::Validation),
    }
}

pub(crate) async fn load_response(state: &AppState, call_id: &str) -> Result<Response, AppError> {
    state
        .store
        .get_response_by_call_id(call_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Response for call {call_id} not found")))
}

/// GET /api/interviews/:id/responses
pub async fn handle_list_responses(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Query(params): Query<ListResponsesQuery>,
) -> Result<Json<Vec<Response>>, AppError> {
    let filter = parse_status_filter(params.status.as_deref())?;
    load_interview(&state, interview_id).await?;
    let responses = state
        .store
        .list_responses(interview_id)
        .await?
        .into_iter()
        .filter(|r| filter.map_or(true, |status| r.candidate_status == status))
        .collect();
    Ok(Json(responses))
}

/// GET /api/interviews/:id/summary
pub async fn handle_interview_summary(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<InterviewSummary>, AppError> {
    load_interview(&state, interview_id).await?;
    let responses = state.store.list_responses(interview_id).await?;
    Ok(Json(summarize(&responses)))
}

/// GET /api/responses/:call_id
pub async fn handle_get_response(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<Json<Response>, AppError> {
    Ok(Json(load_response(&state, &call_id).await?))
}

/// PATCH /api/responses/:call_id
pub async fn handle_patch_response(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
    Json(patch): Json<ResponsePatch>,
) -> Result<Json<Response>, AppError> {
    let updated = state
        .store
        .update_response(&call_id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Response for call {call_id} not found")))?;
    Ok(Json(updated))
}

/// POST /api/responses/:call_id/viewed
pub async fn handle_mark_viewed(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<Json<Response>, AppError> {
    let patch = ResponsePatch {
        is_viewed: Some(true),
        ..ResponsePatch::default()
    };
    let updated = state
        .store
        .update_response(&call_id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Response for call {call_id} not found")))?;
    Ok(Json(updated))
}

/// DELETE /api/responses/:call_id
pub async fn handle_delete_response(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_response(&call_id).await? {
        return Err(AppError::NotFound(format!(
            "Response for call {call_id} not found"
        )));
    }
    info!("Deleted response for call {call_id}");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::response::{CallAnalysis, CallDetails, NewResponse};
    use crate::store::Store;
    use crate::test_support::{app, default_state, seed_interview, send};

    async fn ended_response(store: &dyn Store, interview_id: Uuid, call_id: &str, sentiment: &str) {
        store
            .create_response(NewResponse {
                interview_id,
                call_id: call_id.to_string(),
                email: Some(format!("{call_id}@example.com")),
                name: None,
            })
            .await
            .unwrap();
        store
            .update_response(
                call_id,
                ResponsePatch {
                    is_ended: Some(true),
                    details: Some(CallDetails {
                        call_analysis: Some(CallAnalysis {
                            user_sentiment: Some(sentiment.to_string()),
                            agent_task_completion_rating: Some("Complete".to_string()),
                            ..CallAnalysis::default()
                        }),
                        ..CallDetails::default()
                    }),
                    ..ResponsePatch::default()
                },
            )
            .await
            .unwrap();
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("ALL")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("SELECTED")).unwrap(),
            Some(CandidateStatus::Selected)
        );
        assert!(parse_status_filter(Some("MAYBE")).is_err());
    }

    #[tokio::test]
    async fn test_filter_by_candidate_status() {
        let state = default_state();
        let interview = seed_interview(state.store.as_ref(), "org_1").await;
        ended_response(state.store.as_ref(), interview.id, "c1", "Positive").await;
        ended_response(state.store.as_ref(), interview.id, "c2", "Negative").await;

        let (status, _) = send(
            app(&state),
            "PATCH",
            "/api/responses/c1",
            Some(json!({"candidate_status": "SELECTED"})),
        )
        .await;
        assert_eq!(status, 200);

        let base = format!("/api/interviews/{}/responses", interview.id);
        let (_, all) = send(app(&state), "GET", &format!("{base}?status=ALL"), None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
        let (_, selected) =
            send(app(&state), "GET", &format!("{base}?status=SELECTED"), None).await;
        let selected = selected.as_array().unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0]["call_id"], "c1");
    }

    #[tokio::test]
    async fn test_summary_endpoint_counts_sentiment() {
        let state = default_state();
        let interview = seed_interview(state.store.as_ref(), "org_1").await;
        for (i, s) in ["Positive", "Positive", "Positive", "Negative", "Neutral", "Neutral"]
            .iter()
            .enumerate()
        {
            ended_response(state.store.as_ref(), interview.id, &format!("c{i}"), s).await;
        }
        let (status, body) = send(
            app(&state),
            "GET",
            &format!("/api/interviews/{}/summary", interview.id),
            None,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["sentiment"], json!({"positive": 3, "negative": 1, "neutral": 2}));
        assert_eq!(body["completion_rate"], 100.0);
    }

    #[tokio::test]
    async fn test_viewed_and_delete() {
        let state = default_state();
        let interview = seed_interview(state.store.as_ref(), "org_1").await;
        ended_response(state.store.as_ref(), interview.id, "c1", "Neutral").await;

        let (_, body) = send(app(&state), "POST", "/api/responses/c1/viewed", None).await;
        assert_eq!(body["is_viewed"], true);

        let (status, _) = send(app(&state), "DELETE", "/api/responses/c1", None).await;
        assert_eq!(status, 204);
        let (status, _) = send(app(&state), "GET", "/api/responses/c1", None).await;
        assert_eq!(status, 404);
    }
}

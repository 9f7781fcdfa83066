//! Axum route handlers for the AI analysis endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::analytics::analyze_response;
use crate::analysis::communication::{analyze_communication, CommunicationAnalysis};
use crate::analysis::insights::{generate_insights, Insights};
use crate::analysis::questions::{
    generate_questions, GenerateQuestionsRequest, GenerateQuestionsResponse,
};
use crate::errors::AppError;
use crate::models::response::Analytics;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    pub interview_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub response: Insights,
}

#[derive(Debug, Deserialize)]
pub struct CommunicationRequest {
    #[serde(default)]
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct CommunicationResponse {
    pub analysis: CommunicationAnalysis,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsRequest {
    pub transcript: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub analytics: Analytics,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-interview-questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(req): Json<GenerateQuestionsRequest>,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    Ok(Json(generate_questions(state.llm.as_ref(), &req).await?))
}

/// POST /api/generate-insights
pub async fn handle_generate_insights(
    State(state): State<AppState>,
    Json(req): Json<InsightsRequest>,
) -> Result<Json<InsightsResponse>, AppError> {
    let insights =
        generate_insights(state.store.as_ref(), state.llm.as_ref(), req.interview_id).await?;
    Ok(Json(InsightsResponse { response: insights }))
}

/// POST /api/analyze-communication
pub async fn handle_analyze_communication(
    State(state): State<AppState>,
    Json(req): Json<CommunicationRequest>,
) -> Result<Json<CommunicationResponse>, AppError> {
    let analysis = analyze_communication(state.llm.as_ref(), &req.transcript).await?;
    Ok(Json(CommunicationResponse { analysis }))
}

/// POST /api/responses/:call_id/analytics
pub async fn handle_response_analytics(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
    body: Option<Json<AnalyticsRequest>>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let analytics = analyze_response(
        state.store.as_ref(),
        state.llm.as_ref(),
        &call_id,
        req.transcript.as_deref(),
    )
    .await?;
    Ok(Json(AnalyticsResponse { analytics }))
}

//! Axum route handlers for the call lifecycle: start, event relay, live view,
//! end and post-call analysis.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::analytics::analyze_response;
use crate::calls::session::{CallEvent, CallSession, LiveView};
use crate::errors::AppError;
use crate::interviews::handlers::load_interview;
use crate::models::interview::Interview;
use crate::models::response::{Analytics, CallAnalysis, CallDetails, NewResponse, Response, ResponsePatch};
use crate::responses::dedup::{has_already_responded, is_valid_email, normalize_email};
use crate::state::AppState;
use crate::voice_client::{CallRecord, DynamicCallData, VoiceError};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartCallRequest {
    pub interview_id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StartCallResponse {
    Unavailable,
    AlreadyResponded,
    Started {
        call_id: String,
        access_token: String,
        response_id: Uuid,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct EndCallRequest {
    #[serde(default)]
    pub tab_switch_count: i32,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeCallResponse {
    pub call_id: String,
    pub duration: i64,
    pub analytics: Analytics,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Variables the interviewer agent reads for this call.
pub fn dynamic_call_data(interview: &Interview, name: Option<&str>) -> DynamicCallData {
    DynamicCallData {
        mins: interview.time_duration.to_string(),
        objective: interview.objective.clone(),
        questions: interview
            .questions
            .iter()
            .map(|q| q.question.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        name: name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("not provided")
            .to_string(),
    }
}

/// Provider record → stored call details. Unknown provider keys are kept.
pub fn details_from_record(record: &CallRecord) -> CallDetails {
    let call_analysis = record
        .call_analysis
        .clone()
        .and_then(|v| match serde_json::from_value::<CallAnalysis>(v) {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                warn!("Ignoring malformed call_analysis for {}: {e}", record.call_id);
                None
            }
        });
    CallDetails {
        transcript: record.transcript.clone(),
        call_analysis,
        extra: record.extra.clone(),
    }
}

fn not_found(call_id: &str) -> AppError {
    AppError::NotFound(format!("Call {call_id} not found"))
}

/// Persists `is_ended` and drops the in-memory session.
async fn persist_end(state: &AppState, call_id: &str) -> Result<(), AppError> {
    let patch = ResponsePatch {
        is_ended: Some(true),
        ..ResponsePatch::default()
    };
    state.store.update_response(call_id, patch).await?;
    state.sessions.evict(call_id).await;
    Ok(())
}

/// View for a call with no live session: only ended responses have one.
async fn stored_view(state: &AppState, call_id: &str) -> Result<LiveView, AppError> {
    match state.store.get_response_by_call_id(call_id).await? {
        Some(response) if response.is_ended => Ok(LiveView::finished(
            call_id,
            response.interview_id,
            u64::try_from(response.duration).unwrap_or(0),
        )),
        _ => Err(not_found(call_id)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/calls
pub async fn handle_start_call(
    State(state): State<AppState>,
    Json(req): Json<StartCallRequest>,
) -> Result<Json<StartCallResponse>, AppError> {
    let interview = load_interview(&state, req.interview_id).await?;
    if !interview.is_active {
        info!("Interview {} is inactive; refusing call", interview.id);
        return Ok(Json(StartCallResponse::Unavailable));
    }

    let (email, name) = if interview.is_anonymous {
        (None, None)
    } else {
        let email = req.email.as_deref().map(normalize_email).unwrap_or_default();
        if !is_valid_email(&email) {
            return Err(AppError::Validation(
                "A valid email address is required".to_string(),
            ));
        }
        let stored = state.store.list_response_emails(interview.id).await?;
        if has_already_responded(&email, &stored, interview.respondents.as_deref()) {
            info!("Returning candidate for interview {}", interview.id);
            return Ok(Json(StartCallResponse::AlreadyResponded));
        }
        let name = req
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        (Some(email), name)
    };

    let interviewer = state
        .store
        .get_interviewer(interview.interviewer_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Interviewer {} not found", interview.interviewer_id))
        })?;
    let agent_id = interviewer.agent_id.ok_or(VoiceError::MissingAgent)?;

    let data = dynamic_call_data(&interview, name.as_deref());
    let registered = state.voice.register_call(&agent_id, &data).await?;

    let response = state
        .store
        .create_response(NewResponse {
            interview_id: interview.id,
            call_id: registered.call_id.clone(),
            email,
            name,
        })
        .await?;
    state
        .sessions
        .open(CallSession::new(
            &registered.call_id,
            interview.id,
            interview.time_duration,
        ))
        .await;

    info!(
        "Started call {} for interview {} ({} live)",
        registered.call_id,
        interview.id,
        state.sessions.live_count().await
    );
    Ok(Json(StartCallResponse::Started {
        call_id: registered.call_id,
        access_token: registered.access_token,
        response_id: response.id,
    }))
}

/// POST /api/calls/:call_id/events
pub async fn handle_call_event(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
    Json(event): Json<CallEvent>,
) -> Result<Json<LiveView>, AppError> {
    let transition = match state.sessions.apply(&call_id, event).await {
        Some(t) => t,
        None => return stored_view(&state, &call_id).await.map(Json),
    };
    if transition.view.ended {
        if transition.ended_now {
            info!("Call {call_id} ended by client event");
        }
        persist_end(&state, &call_id).await?;
    }
    Ok(Json(transition.view))
}

/// GET /api/calls/:call_id/live
pub async fn handle_live_view(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<Json<LiveView>, AppError> {
    let transition = match state.sessions.live_view(&call_id).await {
        Some(t) => t,
        None => return stored_view(&state, &call_id).await.map(Json),
    };
    if transition.ended_now {
        info!("Call {call_id} reached its time limit");
    }
    if transition.view.ended {
        persist_end(&state, &call_id).await?;
    }
    Ok(Json(transition.view))
}

/// POST /api/calls/:call_id/end
pub async fn handle_end_call(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
    body: Option<Json<EndCallRequest>>,
) -> Result<Json<Response>, AppError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    if let Some(transition) = state.sessions.end(&call_id).await {
        if transition.ended_now {
            info!("Call {call_id} ended");
        }
    }
    let patch = ResponsePatch {
        is_ended: Some(true),
        tab_switch_count: Some(req.tab_switch_count.max(0)),
        ..ResponsePatch::default()
    };
    let updated = state
        .store
        .update_response(&call_id, patch)
        .await?
        .ok_or_else(|| not_found(&call_id))?;
    state.sessions.evict(&call_id).await;
    Ok(Json(updated))
}

/// POST /api/calls/:call_id/analyze
pub async fn handle_analyze_call(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> Result<Json<AnalyzeCallResponse>, AppError> {
    if state.store.get_response_by_call_id(&call_id).await?.is_none() {
        return Err(not_found(&call_id));
    }

    let record = state.voice.get_call(&call_id).await?;
    let duration = record.duration_secs();
    let patch = ResponsePatch {
        details: Some(details_from_record(&record)),
        duration: Some(duration),
        ..ResponsePatch::default()
    };
    state.store.update_response(&call_id, patch).await?;

    let analytics = analyze_response(
        state.store.as_ref(),
        state.llm.as_ref(),
        &call_id,
        record.transcript.as_deref(),
    )
    .await?;

    Ok(Json(AnalyzeCallResponse {
        call_id,
        duration,
        analytics,
    }))
}

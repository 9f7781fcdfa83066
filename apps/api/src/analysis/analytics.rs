//! Per-response analytics: scores, feedback and per-question summaries.
//!
//! Analytics are computed once. A response that already carries analytics is
//! returned unchanged without calling the model.

use tracing::info;

use crate::analysis::prompts::{ANALYTICS_PROMPT_TEMPLATE, ANALYTICS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, with_json_only};
use crate::llm_client::{call_json, TextModel};
use crate::models::interview::Question;
use crate::models::response::{Analytics, Response, ResponsePatch};
use crate::store::Store;

/// `"1. q"` per line, in interview order.
pub fn number_questions(questions: &[Question]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q.question))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_analytics_prompt(transcript: &str, questions: &[Question]) -> String {
    fill_template(
        ANALYTICS_PROMPT_TEMPLATE,
        &[
            ("transcript", transcript),
            ("questions", &number_questions(questions)),
        ],
    )
}

/// Returns cached analytics, or generates and persists them.
///
/// `transcript` overrides the stored transcript when given.
pub async fn analyze_response(
    store: &dyn Store,
    model: &dyn TextModel,
    call_id: &str,
    transcript: Option<&str>,
) -> Result<Analytics, AppError> {
    let response = store
        .get_response_by_call_id(call_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Response for call {call_id} not found")))?;
    if let Some(cached) = &response.analytics {
        return Ok(cached.clone());
    }

    let interview = store
        .get_interview(response.interview_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Interview {} not found", response.interview_id))
        })?;

    let analytics = generate_analytics(model, &response, transcript, &interview.questions).await?;

    let patch = ResponsePatch {
        analytics: Some(analytics.clone()),
        is_analysed: Some(true),
        ..ResponsePatch::default()
    };
    store.update_response(call_id, patch).await?;
    info!("Stored analytics for call {call_id}");
    Ok(analytics)
}

async fn generate_analytics(
    model: &dyn TextModel,
    response: &Response,
    transcript: Option<&str>,
    questions: &[Question],
) -> Result<Analytics, AppError> {
    let transcript = transcript
        .filter(|t| !t.trim().is_empty())
        .or_else(|| response.stored_transcript())
        .unwrap_or_default();
    let prompt = build_analytics_prompt(transcript, questions);
    let mut analytics: Analytics =
        call_json(model, &prompt, &with_json_only(ANALYTICS_SYSTEM)).await?;
    analytics.main_interview_questions = questions.iter().map(|q| q.question.clone()).collect();
    Ok(analytics)
}

//! Cross-response insights for one interview, stored on the interview record.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::prompts::{INSIGHTS_PROMPT_TEMPLATE, INSIGHTS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, with_json_only};
use crate::llm_client::{call_json, TextModel};
use crate::models::interview::{Interview, InterviewPatch};
use crate::models::response::Response;
use crate::store::Store;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insights {
    pub insights: Vec<String>,
}

/// Every response's call summary, one per line; responses without one are skipped.
pub fn concat_call_summaries(responses: &[Response]) -> String {
    responses
        .iter()
        .filter_map(|r| r.call_analysis()?.call_summary.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_insights_prompt(interview: &Interview, call_summaries: &str) -> String {
    fill_template(
        INSIGHTS_PROMPT_TEMPLATE,
        &[
            ("name", &interview.name),
            ("objective", &interview.objective),
            ("description", &interview.description),
            ("call_summaries", call_summaries),
        ],
    )
}

pub async fn generate_insights(
    store: &dyn Store,
    model: &dyn TextModel,
    interview_id: Uuid,
) -> Result<Insights, AppError> {
    let interview = store
        .get_interview(interview_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))?;
    let responses = store.list_responses(interview_id).await?;

    let prompt = build_insights_prompt(&interview, &concat_call_summaries(&responses));
    let insights: Insights = call_json(model, &prompt, &with_json_only(INSIGHTS_SYSTEM)).await?;

    let patch = InterviewPatch {
        insights: Some(insights.insights.clone()),
        ..InterviewPatch::default()
    };
    store.update_interview(interview_id, patch).await?;
    info!(
        "Stored {} insight(s) for interview {interview_id} from {} response(s)",
        insights.insights.len(),
        responses.len()
    );
    Ok(insights)
}

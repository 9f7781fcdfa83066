//! Communication-skill analysis of a single transcript.

use serde::{Deserialize, Serialize};

use crate::analysis::prompts::{COMMUNICATION_PROMPT_TEMPLATE, COMMUNICATION_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, with_json_only};
use crate::llm_client::{call_json, TextModel};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupportingQuote {
    pub quote: String,
    #[serde(default)]
    pub analysis: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationAnalysis {
    pub communication_score: f64,
    pub overall_feedback: String,
    #[serde(default)]
    pub supporting_quotes: Vec<SupportingQuote>,
}

pub async fn analyze_communication(
    model: &dyn TextModel,
    transcript: &str,
) -> Result<CommunicationAnalysis, AppError> {
    if transcript.trim().is_empty() {
        return Err(AppError::Validation("Transcript is required".to_string()));
    }
    let prompt = fill_template(COMMUNICATION_PROMPT_TEMPLATE, &[("transcript", transcript)]);
    let analysis = call_json(model, &prompt, &with_json_only(COMMUNICATION_SYSTEM)).await?;
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedModel;

    #[tokio::test]
    async fn test_parses_camel_case_reply() {
        let model = ScriptedModel::new(&[r#"{
            "communicationScore": 7.5,
            "overallFeedback": "Clear and structured.",
            "supportingQuotes": [{"quote": "First, I profile.", "analysis": "Ordered thinking", "type": "strength"}]
        }"#]);
        let analysis = analyze_communication(&model, "User: First, I profile.").await.unwrap();
        assert_eq!(analysis.communication_score, 7.5);
        assert_eq!(analysis.supporting_quotes[0].kind, "strength");
        assert!(model.prompts.lock().unwrap()[0].contains("First, I profile."));
    }

    #[tokio::test]
    async fn test_blank_transcript_is_rejected() {
        let model = ScriptedModel::new(&[]);
        let err = analyze_communication(&model, "  ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_model_failure_is_llm_error() {
        let model = ScriptedModel::failing();
        let err = analyze_communication(&model, "User: hi").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}

//! Question generation for the creation wizard's AI mode.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::prompts::{QUESTIONS_PROMPT_TEMPLATE, QUESTIONS_SYSTEM};
use crate::errors::AppError;
use crate::interviews::wizard::QuestionList;
use crate::llm_client::prompts::{fill_template, with_json_only};
use crate::llm_client::{call_json, TextModel};
use crate::models::interview::Question;

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub number: u32,
    /// Extracted document text, if the user uploaded one.
    pub context: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    question: String,
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestions {
    questions: Vec<GeneratedQuestion>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<Question>,
    pub description: String,
}

pub fn build_questions_prompt(req: &GenerateQuestionsRequest) -> String {
    let context = req
        .context
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("No additional context provided.");
    fill_template(
        QUESTIONS_PROMPT_TEMPLATE,
        &[
            ("name", req.name.trim()),
            ("objective", req.objective.trim()),
            ("number", &req.number.to_string()),
            ("context", context),
        ],
    )
}

pub async fn generate_questions(
    model: &dyn TextModel,
    req: &GenerateQuestionsRequest,
) -> Result<GenerateQuestionsResponse, AppError> {
    if req.name.trim().is_empty() || req.objective.trim().is_empty() {
        return Err(AppError::Validation(
            "name and objective are required".to_string(),
        ));
    }
    if req.number == 0 {
        return Err(AppError::Validation(
            "number must be at least 1".to_string(),
        ));
    }

    let prompt = build_questions_prompt(req);
    let generated: GeneratedQuestions =
        call_json(model, &prompt, &with_json_only(QUESTIONS_SYSTEM)).await?;

    let list = QuestionList::from_generated(
        req.number,
        generated
            .questions
            .iter()
            .map(|q| q.question.as_str())
            .filter(|q| !q.trim().is_empty()),
    );
    let questions = list.into_questions();
    info!(
        "Generated {} question(s) for '{}' (requested {})",
        questions.len(),
        req.name,
        req.number
    );
    Ok(GenerateQuestionsResponse {
        questions,
        description: generated.description.trim().to_string(),
    })
}

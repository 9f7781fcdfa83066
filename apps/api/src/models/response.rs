use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use uuid::Uuid;

/// Reviewer-assigned classification of a response.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    #[default]
    NoStatus,
    NotSelected,
    Potential,
    Selected,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 4] = [
        CandidateStatus::NoStatus,
        CandidateStatus::NotSelected,
        CandidateStatus::Potential,
        CandidateStatus::Selected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::NoStatus => "NO_STATUS",
            CandidateStatus::NotSelected => "NOT_SELECTED",
            CandidateStatus::Potential => "POTENTIAL",
            CandidateStatus::Selected => "SELECTED",
        }
    }
}

impl FromStr for CandidateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CandidateStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown candidate status '{s}'"))
    }
}

/// Post-call analysis produced by the voice provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CallAnalysis {
    pub call_summary: Option<String>,
    /// "Positive" | "Negative" | "Neutral"
    pub user_sentiment: Option<String>,
    /// "Complete" | "Incomplete" | "Partial"
    pub call_completion_rating: Option<String>,
    pub agent_task_completion_rating: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Call metadata stored with a response. Unknown provider keys are preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CallDetails {
    pub transcript: Option<String>,
    pub call_analysis: Option<CallAnalysis>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreWithFeedback {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionSummary {
    pub question: String,
    pub summary: String,
}

/// AI-derived scoring for one transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Analytics {
    pub overall_score: Option<f64>,
    pub overall_feedback: Option<String>,
    pub communication: Option<ScoreWithFeedback>,
    pub general_intelligence: Option<String>,
    pub soft_skill_summary: Option<String>,
    pub question_summaries: Vec<QuestionSummary>,
    pub main_interview_questions: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub call_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub details: Option<CallDetails>,
    pub analytics: Option<Analytics>,
    /// Seconds.
    pub duration: i64,
    pub is_analysed: bool,
    pub is_ended: bool,
    pub is_viewed: bool,
    pub candidate_status: CandidateStatus,
    pub tab_switch_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Response {
    pub fn call_analysis(&self) -> Option<&CallAnalysis> {
        self.details.as_ref()?.call_analysis.as_ref()
    }

    pub fn stored_transcript(&self) -> Option<&str> {
        self.details.as_ref()?.transcript.as_deref()
    }

    pub fn apply(&mut self, patch: ResponsePatch) {
        let ResponsePatch {
            details,
            analytics,
            duration,
            is_analysed,
            is_ended,
            is_viewed,
            candidate_status,
            tab_switch_count,
        } = patch;
        if let Some(v) = details {
            self.details = Some(v);
        }
        if let Some(v) = analytics {
            self.analytics = Some(v);
        }
        if let Some(v) = duration {
            self.duration = v;
        }
        if let Some(v) = is_analysed {
            self.is_analysed = v;
        }
        if let Some(v) = is_ended {
            self.is_ended = v;
        }
        if let Some(v) = is_viewed {
            self.is_viewed = v;
        }
        if let Some(v) = candidate_status {
            self.candidate_status = v;
        }
        if let Some(v) = tab_switch_count {
            self.tab_switch_count = v;
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewResponse {
    pub interview_id: Uuid,
    pub call_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl NewResponse {
    pub fn into_response(self, created_at: DateTime<Utc>) -> Response {
        Response {
            id: Uuid::new_v4(),
            interview_id: self.interview_id,
            call_id: self.call_id,
            email: self.email,
            name: self.name,
            details: None,
            analytics: None,
            duration: 0,
            is_analysed: false,
            is_ended: false,
            is_viewed: false,
            candidate_status: CandidateStatus::NoStatus,
            tab_switch_count: 0,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponsePatch {
    pub details: Option<CallDetails>,
    pub analytics: Option<Analytics>,
    pub duration: Option<i64>,
    pub is_analysed: Option<bool>,
    pub is_ended: Option<bool>,
    pub is_viewed: Option<bool>,
    pub candidate_status: Option<CandidateStatus>,
    pub tab_switch_count: Option<i32>,
}

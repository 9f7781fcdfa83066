use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Theme colour applied when an interview has none stored.
pub const DEFAULT_THEME_COLOR: &str = "#4F46E5";

fn default_follow_up_count() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: String,
    pub question: String,
    #[serde(default = "default_follow_up_count")]
    pub follow_up_count: u32,
}

impl Question {
    pub fn new(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question: text.trim().to_string(),
            follow_up_count: default_follow_up_count(),
        }
    }

    pub fn blank() -> Self {
        Self::new("")
    }

    pub fn is_blank(&self) -> bool {
        self.question.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    pub id: Uuid,
    pub name: String,
    pub objective: String,
    pub description: String,
    pub organization_id: Option<String>,
    pub user_id: Option<String>,
    pub interviewer_id: i64,
    pub questions: Vec<Question>,
    pub question_count: u32,
    /// Minutes.
    pub time_duration: u32,
    pub is_anonymous: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub theme_color: Option<String>,
    pub logo_url: Option<String>,
    pub response_count: i64,
    #[serde(default)]
    pub insights: Vec<String>,
    pub readable_slug: Option<String>,
    pub url: Option<String>,
    /// Optional allow-list of candidate emails.
    pub respondents: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl Interview {
    pub fn theme_color_or_default(&self) -> &str {
        self.theme_color.as_deref().unwrap_or(DEFAULT_THEME_COLOR)
    }

    /// Applies every field present in `patch`; absent fields are left untouched.
    pub fn apply(&mut self, patch: InterviewPatch) {
        let InterviewPatch {
            name,
            objective,
            description,
            interviewer_id,
            questions,
            question_count,
            time_duration,
            is_anonymous,
            is_active,
            theme_color,
            insights,
            respondents,
        } = patch;
        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = objective {
            self.objective = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = interviewer_id {
            self.interviewer_id = v;
        }
        if let Some(v) = questions {
            self.questions = v;
        }
        if let Some(v) = question_count {
            self.question_count = v;
        }
        if let Some(v) = time_duration {
            self.time_duration = v;
        }
        if let Some(v) = is_anonymous {
            self.is_anonymous = v;
        }
        if let Some(v) = is_active {
            self.is_active = v;
        }
        if let Some(v) = theme_color {
            self.theme_color = Some(v);
        }
        if let Some(v) = insights {
            self.insights = v;
        }
        if let Some(v) = respondents {
            self.respondents = Some(v);
        }
    }
}

/// Everything needed to persist a new interview; ids and counters are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewInterview {
    pub id: Uuid,
    pub name: String,
    pub objective: String,
    pub description: String,
    pub organization_id: Option<String>,
    pub user_id: Option<String>,
    pub interviewer_id: i64,
    pub questions: Vec<Question>,
    pub question_count: u32,
    pub time_duration: u32,
    pub is_anonymous: bool,
    pub theme_color: Option<String>,
    pub logo_url: Option<String>,
    pub readable_slug: Option<String>,
    pub url: Option<String>,
    pub respondents: Option<Vec<String>>,
}

impl NewInterview {
    pub fn into_interview(self, created_at: DateTime<Utc>) -> Interview {
        Interview {
            id: self.id,
            name: self.name,
            objective: self.objective,
            description: self.description,
            organization_id: self.organization_id,
            user_id: self.user_id,
            interviewer_id: self.interviewer_id,
            questions: self.questions,
            question_count: self.question_count,
            time_duration: self.time_duration,
            is_anonymous: self.is_anonymous,
            is_active: true,
            theme_color: self.theme_color,
            logo_url: self.logo_url,
            response_count: 0,
            insights: Vec::new(),
            readable_slug: self.readable_slug,
            url: self.url,
            respondents: self.respondents,
            created_at,
        }
    }
}

/// Partial-field update. Last write wins; there is no version check.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterviewPatch {
    pub name: Option<String>,
    pub objective: Option<String>,
    pub description: Option<String>,
    pub interviewer_id: Option<i64>,
    pub questions: Option<Vec<Question>>,
    pub question_count: Option<u32>,
    pub time_duration: Option<u32>,
    pub is_anonymous: Option<bool>,
    pub is_active: Option<bool>,
    pub theme_color: Option<String>,
    pub insights: Option<Vec<String>>,
    pub respondents: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Interview {
        NewInterview {
            id: Uuid::new_v4(),
            name: "Backend Engineer".to_string(),
            objective: "Assess API design".to_string(),
            description: "A short screening call".to_string(),
            organization_id: Some("org_1".to_string()),
            user_id: None,
            interviewer_id: 1,
            questions: vec![Question::new("Tell me about a system you built")],
            question_count: 1,
            time_duration: 10,
            is_anonymous: false,
            theme_color: None,
            logo_url: None,
            readable_slug: None,
            url: None,
            respondents: None,
        }
        .into_interview(Utc::now())
    }

    #[test]
    fn test_new_interview_starts_active_with_no_responses() {
        let interview = sample();
        assert!(interview.is_active);
        assert_eq!(interview.response_count, 0);
        assert_eq!(interview.theme_color_or_default(), DEFAULT_THEME_COLOR);
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut interview = sample();
        interview.apply(InterviewPatch {
            theme_color: Some("#ff0000".to_string()),
            ..Default::default()
        });
        assert_eq!(interview.theme_color.as_deref(), Some("#ff0000"));
        assert_eq!(interview.name, "Backend Engineer");
        assert!(interview.is_active);
    }

    #[test]
    fn test_question_defaults_follow_up_count() {
        let q: Question = serde_json::from_str(r#"{"id":"a","question":"Why?"}"#).unwrap();
        assert_eq!(q.follow_up_count, 1);
        assert!(Question::blank().is_blank());
    }
}

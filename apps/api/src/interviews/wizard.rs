//! Interview creation wizard rules: the details-step gate, question list editing,
//! and the save gate that must pass before an interview is persisted.

use serde::{Deserialize, Serialize};

use crate::models::interview::{InterviewPatch, Question};

pub const MAX_DURATION_MINUTES: u32 = 10;

/// An interview as edited in the two-step creation flow (details → questions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewDraft {
    pub name: String,
    pub objective: String,
    #[serde(default)]
    pub description: String,
    pub interviewer_id: i64,
    pub question_count: u32,
    pub time_duration: u32,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub respondents: Option<Vec<String>>,
}

/// Gate for leaving the details step. Returns every failing reason.
pub fn validate_details(draft: &InterviewDraft) -> Result<(), Vec<String>> {
    let mut reasons = Vec::new();
    if draft.name.trim().is_empty() {
        reasons.push("name is required".to_string());
    }
    if draft.objective.trim().is_empty() {
        reasons.push("objective is required".to_string());
    }
    if draft.question_count == 0 {
        reasons.push("question_count must be at least 1".to_string());
    }
    if !(1..=MAX_DURATION_MINUTES).contains(&draft.time_duration) {
        reasons.push(format!(
            "time_duration must be between 1 and {MAX_DURATION_MINUTES} minutes"
        ));
    }
    if draft.interviewer_id <= 0 {
        reasons.push("an interviewer must be selected".to_string());
    }
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(reasons)
    }
}

/// Checks the fields a partial update carries. Absent fields are not checked.
pub fn validate_patch(patch: &InterviewPatch) -> Result<(), Vec<String>> {
    let mut reasons = Vec::new();
    if let Some(duration) = patch.time_duration {
        if !(1..=MAX_DURATION_MINUTES).contains(&duration) {
            reasons.push(format!(
                "time_duration must be between 1 and {MAX_DURATION_MINUTES} minutes"
            ));
        }
    }
    if patch.question_count == Some(0) {
        reasons.push("question_count must be at least 1".to_string());
    }
    if let Some(questions) = &patch.questions {
        if questions.is_empty() || questions.iter().any(Question::is_blank) {
            reasons.push("questions must not be empty".to_string());
        }
    }
    for (field, value) in [("name", &patch.name), ("objective", &patch.objective)] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            reasons.push(format!("{field} must not be blank"));
        }
    }
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(reasons)
    }
}

/// Gate for the final save: N non-empty questions and a description.
pub fn save_gate(draft: &InterviewDraft) -> Result<(), Vec<String>> {
    let mut reasons = Vec::new();
    if (draft.questions.len() as u32) < draft.question_count {
        reasons.push(format!(
            "{} of {} questions added",
            draft.questions.len(),
            draft.question_count
        ));
    }
    let blank = draft.questions.iter().filter(|q| q.is_blank()).count();
    if blank > 0 {
        reasons.push(format!("{blank} question(s) are empty"));
    }
    if draft.description.trim().is_empty() {
        reasons.push("description is required".to_string());
    }
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(reasons)
    }
}

/// The question list of a draft, capped at its target count.
#[derive(Debug, Clone)]
pub struct QuestionList {
    target: u32,
    questions: Vec<Question>,
}

impl QuestionList {
    pub fn new(target: u32, questions: Vec<Question>) -> Self {
        Self { target, questions }
    }

    /// Manual mode starts with a single blank question.
    pub fn manual(target: u32) -> Self {
        Self::new(target, vec![Question::blank()])
    }

    /// AI mode seeds trimmed generated questions with fresh ids.
    pub fn from_generated<'a>(target: u32, texts: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(target, texts.into_iter().map(Question::new).collect())
    }

    pub fn can_add(&self) -> bool {
        (self.questions.len() as u32) < self.target
    }

    /// Appends a blank question; refused once the target is reached.
    pub fn add(&mut self) -> bool {
        if !self.can_add() {
            return false;
        }
        self.questions.push(Question::blank());
        true
    }

    /// Removes a question. The last remaining question is blanked instead.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.questions.iter().any(|q| q.id == id) {
            return false;
        }
        if self.questions.len() == 1 {
            let only = &mut self.questions[0];
            only.question.clear();
            only.follow_up_count = 1;
            return true;
        }
        self.questions.retain(|q| q.id != id);
        true
    }

    pub fn update(&mut self, id: &str, text: &str, follow_up_count: u32) -> bool {
        match self.questions.iter_mut().find(|q| q.id == id) {
            Some(q) => {
                q.question = text.to_string();
                q.follow_up_count = follow_up_count;
                true
            }
            None => false,
        }
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

/// Stored question count when an existing interview is edited.
pub fn edited_question_count(questions: &[Question], requested: u32) -> u32 {
    (questions.len() as u32).min(requested)
}

/// Lowercase, alphanumeric runs joined by single dashes.
pub fn slugify(input: &str) -> String {
    input
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// `org-name-interview-name`, or just the interview name without an org.
pub fn readable_slug(organization_name: Option<&str>, interview_name: &str) -> String {
    let name = slugify(interview_name);
    match organization_name.map(slugify).filter(|s| !s.is_empty()) {
        Some(org) if !name.is_empty() => format!("{org}-{name}"),
        Some(org) => org,
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(question_count: u32, questions: &[&str]) -> InterviewDraft {
        InterviewDraft {
            name: "Frontend Engineer".to_string(),
            objective: "React depth".to_string(),
            description: "Talk about components".to_string(),
            interviewer_id: 1,
            question_count,
            time_duration: 10,
            is_anonymous: false,
            questions: questions.iter().map(|q| Question::new(q)).collect(),
            respondents: None,
        }
    }

    #[test]
    fn test_save_gate_rejects_until_all_questions_present() {
        let mut d = draft(3, &["What is a hook?", "Explain reconciliation"]);
        assert!(save_gate(&d).is_err());

        d.questions.push(Question::blank());
        let reasons = save_gate(&d).unwrap_err();
        assert_eq!(reasons, vec!["1 question(s) are empty".to_string()]);

        d.questions[2].question = "How do you test components?".to_string();
        assert!(save_gate(&d).is_ok());
    }

    #[test]
    fn test_save_gate_requires_description() {
        let mut d = draft(1, &["Why React?"]);
        d.description = "   ".to_string();
        assert_eq!(
            save_gate(&d).unwrap_err(),
            vec!["description is required".to_string()]
        );
    }

    #[test]
    fn test_details_gate_collects_every_reason() {
        let mut d = draft(0, &[]);
        d.name = " ".to_string();
        d.time_duration = 11;
        d.interviewer_id = 0;
        let reasons = validate_details(&d).unwrap_err();
        assert_eq!(reasons.len(), 4);
    }

    #[test]
    fn test_add_is_capped_at_target() {
        let mut list = QuestionList::manual(2);
        assert!(list.add());
        assert!(!list.add());
        assert_eq!(list.into_questions().len(), 2);
    }

    #[test]
    fn test_removing_last_question_blanks_it() {
        let mut list = QuestionList::from_generated(1, ["  Describe your last project  "]);
        let id = list.clone().into_questions()[0].id.clone();
        list.update(&id, "Describe your last project", 3);
        assert!(list.remove(&id));
        let questions = list.into_questions();
        assert_eq!(questions.len(), 1);
        assert!(questions[0].is_blank());
        assert_eq!(questions[0].follow_up_count, 1);
    }

    #[test]
    fn test_generated_questions_are_trimmed() {
        let list = QuestionList::from_generated(2, ["  A?  ", "B?"]);
        let questions = list.into_questions();
        assert_eq!(questions[0].question, "A?");
        assert_ne!(questions[0].id, questions[1].id);
    }

    #[test]
    fn test_edited_question_count_never_exceeds_questions() {
        let qs = vec![Question::new("a"), Question::new("b")];
        assert_eq!(edited_question_count(&qs, 5), 2);
        assert_eq!(edited_question_count(&qs, 1), 1);
    }

    #[test]
    fn test_patch_checks_only_present_fields() {
        assert!(validate_patch(&InterviewPatch::default()).is_ok());
        let patch = InterviewPatch {
            time_duration: Some(0),
            question_count: Some(0),
            name: Some("  ".to_string()),
            ..InterviewPatch::default()
        };
        assert_eq!(validate_patch(&patch).unwrap_err().len(), 3);
        let patch = InterviewPatch {
            time_duration: Some(MAX_DURATION_MINUTES),
            ..InterviewPatch::default()
        };
        assert!(validate_patch(&patch).is_ok());
    }

    #[test]
    fn test_readable_slug() {
        assert_eq!(
            readable_slug(Some("Acme Corp."), "Senior  Rust Engineer!"),
            "acme-corp-senior-rust-engineer"
        );
        assert_eq!(readable_slug(None, "Data Analyst"), "data-analyst");
        assert_eq!(readable_slug(Some(""), "QA"), "qa");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Candidate satisfaction, carried on the wire as its index (0, 1, 2).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum Satisfaction {
    Positive,
    Moderate,
    Negative,
}

impl TryFrom<u8> for Satisfaction {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Satisfaction::Positive),
            1 => Ok(Satisfaction::Moderate),
            2 => Ok(Satisfaction::Negative),
            other => Err(format!("satisfaction must be 0, 1 or 2, got {other}")),
        }
    }
}

impl From<Satisfaction> for u8 {
    fn from(s: Satisfaction) -> Self {
        match s {
            Satisfaction::Positive => 0,
            Satisfaction::Moderate => 1,
            Satisfaction::Negative => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub email: Option<String>,
    pub satisfaction: Option<Satisfaction>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFeedback {
    pub interview_id: Uuid,
    pub email: Option<String>,
    pub satisfaction: Option<Satisfaction>,
    pub feedback: Option<String>,
}

impl NewFeedback {
    pub fn is_empty(&self) -> bool {
        self.satisfaction.is_none()
            && self
                .feedback
                .as_deref()
                .map(|f| f.trim().is_empty())
                .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satisfaction_is_an_index_on_the_wire() {
        assert_eq!(serde_json::to_string(&Satisfaction::Negative).unwrap(), "2");
        let s: Satisfaction = serde_json::from_str("1").unwrap();
        assert_eq!(s, Satisfaction::Moderate);
        assert!(serde_json::from_str::<Satisfaction>("3").is_err());
    }

    #[test]
    fn test_feedback_without_rating_or_text_is_empty() {
        let fb = NewFeedback {
            interview_id: Uuid::new_v4(),
            email: None,
            satisfaction: None,
            feedback: Some("   ".to_string()),
        };
        assert!(fb.is_empty());
    }
}

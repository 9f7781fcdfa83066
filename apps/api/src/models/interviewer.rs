use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive bounds of every personality slider.
pub const SLIDER_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interviewer {
    pub id: i64,
    /// Voice-provider agent that conducts calls as this persona.
    pub agent_id: Option<String>,
    pub name: String,
    pub image: String,
    pub audio: Option<String>,
    pub description: String,
    pub empathy: u8,
    pub rapport: u8,
    pub exploration: u8,
    pub speed: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewInterviewer {
    pub agent_id: Option<String>,
    pub name: String,
    pub image: String,
    pub audio: Option<String>,
    pub description: String,
    pub empathy: u8,
    pub rapport: u8,
    pub exploration: u8,
    pub speed: u8,
}

impl NewInterviewer {
    /// Returns the names of sliders outside `SLIDER_RANGE`.
    pub fn out_of_range_sliders(&self) -> Vec<&'static str> {
        [
            ("empathy", self.empathy),
            ("rapport", self.rapport),
            ("exploration", self.exploration),
            ("speed", self.speed),
        ]
        .into_iter()
        .filter(|(_, v)| !SLIDER_RANGE.contains(v))
        .map(|(name, _)| name)
        .collect()
    }
}

/// The subset of an interviewer shown on the public call page.
#[derive(Debug, Clone, Serialize)]
pub struct PublicInterviewer {
    pub name: String,
    pub image: String,
}

impl From<&Interviewer> for PublicInterviewer {
    fn from(i: &Interviewer) -> Self {
        Self {
            name: i.name.clone(),
            image: i.image.clone(),
        }
    }
}

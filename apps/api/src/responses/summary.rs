//! Interview summary: sentiment, completion and status tallies over the
//! fetched responses, plus the table rows shown on the interview page.

use serde::Serialize;

use crate::models::response::{CandidateStatus, Response};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SentimentCount {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CompletionCount {
    pub complete: u32,
    pub incomplete: u32,
    pub partial: u32,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct StatusCount {
    pub no_status: u32,
    pub not_selected: u32,
    pub potential: u32,
    pub selected: u32,
}

impl StatusCount {
    fn bump(&mut self, status: CandidateStatus) {
        match status {
            CandidateStatus::NoStatus => self.no_status += 1,
            CandidateStatus::NotSelected => self.not_selected += 1,
            CandidateStatus::Potential => self.potential += 1,
            CandidateStatus::Selected => self.selected += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub call_id: String,
    pub name: String,
    pub overall_score: Option<f64>,
    pub communication_score: Option<f64>,
    pub call_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewSummary {
    pub total_responses: u32,
    pub sentiment: SentimentCount,
    pub call_completion: CompletionCount,
    pub completed_interviews: u32,
    pub completion_rate: f64,
    pub average_duration_secs: f64,
    pub average_duration: String,
    pub candidate_status: StatusCount,
    pub rows: Vec<SummaryRow>,
}

/// `"{m}m {ss}s"`, seconds zero-padded.
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    format!("{}m {:02}s", total / 60, total % 60)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn summarize(responses: &[Response]) -> InterviewSummary {
    let mut sentiment = SentimentCount::default();
    let mut call_completion = CompletionCount::default();
    let mut candidate_status = StatusCount::default();
    let mut completed = 0u32;
    let mut total_duration = 0i64;
    let mut rows = Vec::with_capacity(responses.len());

    for response in responses {
        total_duration += response.duration;
        candidate_status.bump(response.candidate_status);

        let analysis = response.call_analysis();
        match analysis.and_then(|a| a.user_sentiment.as_deref()) {
            Some("Positive") => sentiment.positive += 1,
            Some("Negative") => sentiment.negative += 1,
            Some("Neutral") => sentiment.neutral += 1,
            _ => {}
        }
        match analysis.and_then(|a| a.call_completion_rating.as_deref()) {
            Some("Complete") => call_completion.complete += 1,
            Some("Incomplete") => call_completion.incomplete += 1,
            Some("Partial") => call_completion.partial += 1,
            _ => {}
        }
        if matches!(
            analysis.and_then(|a| a.agent_task_completion_rating.as_deref()),
            Some("Complete" | "Partial")
        ) {
            completed += 1;
        }

        let analytics = response.analytics.as_ref();
        let summary = analytics
            .and_then(|a| a.soft_skill_summary.clone())
            .or_else(|| analysis.and_then(|a| a.call_summary.clone()))
            .unwrap_or_else(|| "No summary available".to_string());
        rows.push(SummaryRow {
            call_id: response.call_id.clone(),
            name: response
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Anonymous".to_string()),
            overall_score: analytics.and_then(|a| a.overall_score),
            communication_score: analytics
                .and_then(|a| a.communication.as_ref())
                .map(|c| c.score),
            call_summary: summary,
        });
    }

    let total = responses.len() as u32;
    let (completion_rate, average_duration_secs) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            round2(f64::from(completed) / f64::from(total) * 100.0),
            total_duration as f64 / f64::from(total),
        )
    };

    InterviewSummary {
        total_responses: total,
        sentiment,
        call_completion,
        completed_interviews: completed,
        completion_rate,
        average_duration_secs,
        average_duration: format_duration(average_duration_secs),
        candidate_status,
        rows,
    }
}

//! Live state of one in-progress voice call, driven by events relayed from the
//! candidate's browser SDK.
//!
//! Elapsed time uses `tokio::time::Instant` so tests can run on paused time.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Agent,
    User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Utterance {
    pub role: Speaker,
    pub content: String,
}

/// Events emitted by the voice SDK during a call.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CallEvent {
    CallStarted,
    CallEnded,
    AgentStartTalking,
    AgentStopTalking,
    Update { transcript: Vec<Utterance> },
    Error { message: String },
}

/// Snapshot returned to the call page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LiveView {
    pub call_id: String,
    pub interview_id: Uuid,
    pub calling: bool,
    pub ended: bool,
    pub active_turn: Option<Speaker>,
    pub last_interviewer_response: String,
    pub last_user_response: String,
    pub elapsed_secs: u64,
    pub progress_pct: u8,
    pub stop_requested: bool,
    pub error: Option<String>,
}

impl LiveView {
    /// View of a call whose session is gone but whose response is ended.
    pub fn finished(call_id: &str, interview_id: Uuid, elapsed_secs: u64) -> Self {
        Self {
            call_id: call_id.to_string(),
            interview_id,
            calling: false,
            ended: true,
            active_turn: None,
            last_interviewer_response: String::new(),
            last_user_response: String::new(),
            elapsed_secs,
            progress_pct: 100,
            stop_requested: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CallSession {
    pub call_id: String,
    pub interview_id: Uuid,
    limit_secs: u64,
    started_at: Option<Instant>,
    ended: bool,
    stop_requested: bool,
    active_turn: Option<Speaker>,
    last_agent: String,
    last_user: String,
    error: Option<String>,
}

impl CallSession {
    pub fn new(call_id: &str, interview_id: Uuid, time_duration_mins: u32) -> Self {
        Self {
            call_id: call_id.to_string(),
            interview_id,
            limit_secs: u64::from(time_duration_mins) * 60,
            started_at: None,
            ended: false,
            stop_requested: false,
            active_turn: None,
            last_agent: String::new(),
            last_user: String::new(),
            error: None,
        }
    }

    pub fn apply(&mut self, event: CallEvent, now: Instant) {
        if self.ended {
            return;
        }
        match event {
            CallEvent::CallStarted => {
                self.started_at.get_or_insert(now);
            }
            CallEvent::CallEnded => {
                self.end();
            }
            CallEvent::AgentStartTalking => self.active_turn = Some(Speaker::Agent),
            CallEvent::AgentStopTalking => self.active_turn = Some(Speaker::User),
            CallEvent::Update { transcript } => {
                for utterance in transcript {
                    match utterance.role {
                        Speaker::Agent => self.last_agent = utterance.content,
                        Speaker::User => self.last_user = utterance.content,
                    }
                }
            }
            CallEvent::Error { message } => {
                tracing::warn!(call_id = %self.call_id, "Call error: {message}");
                self.error = Some(message);
                self.end();
            }
        }
        self.tick(now);
    }

    /// Requests a stop once the interview's time budget is spent.
    pub fn tick(&mut self, now: Instant) {
        if !self.ended && self.limit_secs > 0 && self.elapsed_secs(now) >= self.limit_secs {
            self.stop_requested = true;
            self.end();
        }
    }

    /// Returns true only for the call that actually ended the session.
    pub fn end(&mut self) -> bool {
        if self.ended {
            return false;
        }
        self.ended = true;
        self.active_turn = None;
        true
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        self.started_at
            .map(|start| now.saturating_duration_since(start).as_secs())
            .unwrap_or(0)
    }

    pub fn live_view(&self, now: Instant) -> LiveView {
        let elapsed_secs = self.elapsed_secs(now).min(self.limit_secs);
        let progress_pct = if self.ended {
            100
        } else if self.limit_secs == 0 {
            0
        } else {
            ((elapsed_secs * 100) / self.limit_secs).min(100) as u8
        };
        LiveView {
            call_id: self.call_id.clone(),
            interview_id: self.interview_id,
            calling: self.started_at.is_none() && !self.ended,
            ended: self.ended,
            active_turn: self.active_turn,
            last_interviewer_response: self.last_agent.clone(),
            last_user_response: self.last_user.clone(),
            elapsed_secs,
            progress_pct,
            stop_requested: self.stop_requested,
            error: self.error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn session() -> CallSession {
        CallSession::new("call_1", Uuid::new_v4(), 1)
    }

    #[test]
    fn test_events_parse_from_sdk_shape() {
        let event: CallEvent = serde_json::from_str(
            r#"{"type":"update","transcript":[{"role":"agent","content":"Hi"},{"role":"user","content":"Hello"}]}"#,
        )
        .unwrap();
        assert!(matches!(event, CallEvent::Update { ref transcript } if transcript.len() == 2));
        let event: CallEvent = serde_json::from_str(r#"{"type":"agent_start_talking"}"#).unwrap();
        assert!(matches!(event, CallEvent::AgentStartTalking));
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_keeps_last_utterance_per_role() {
        let mut s = session();
        let now = Instant::now();
        s.apply(CallEvent::CallStarted, now);
        s.apply(
            CallEvent::Update {
                transcript: vec![
                    Utterance { role: Speaker::Agent, content: "Tell me about yourself".into() },
                    Utterance { role: Speaker::User, content: "I build APIs".into() },
                    Utterance { role: Speaker::Agent, content: "Which languages?".into() },
                ],
            },
            now,
        );
        let view = s.live_view(now);
        assert_eq!(view.last_interviewer_response, "Which languages?");
        assert_eq!(view.last_user_response, "I build APIs");
        assert!(!view.calling);
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_follows_agent_talking_events() {
        let mut s = session();
        s.apply(CallEvent::AgentStartTalking, Instant::now());
        assert_eq!(s.live_view(Instant::now()).active_turn, Some(Speaker::Agent));
        s.apply(CallEvent::AgentStopTalking, Instant::now());
        assert_eq!(s.live_view(Instant::now()).active_turn, Some(Speaker::User));
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_limit_requests_stop() {
        let mut s = session();
        s.apply(CallEvent::CallStarted, Instant::now());

        tokio::time::advance(Duration::from_secs(30)).await;
        s.tick(Instant::now());
        let view = s.live_view(Instant::now());
        assert_eq!(view.progress_pct, 50);
        assert!(!view.stop_requested);

        tokio::time::advance(Duration::from_secs(30)).await;
        s.tick(Instant::now());
        let view = s.live_view(Instant::now());
        assert!(view.stop_requested);
        assert!(view.ended);
        assert_eq!(view.progress_pct, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_is_idempotent() {
        let mut s = session();
        assert!(s.end());
        assert!(!s.end());
        s.apply(CallEvent::AgentStartTalking, Instant::now());
        assert_eq!(s.live_view(Instant::now()).active_turn, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_ends_call() {
        let mut s = session();
        s.apply(CallEvent::Error { message: "mic denied".into() }, Instant::now());
        let view = s.live_view(Instant::now());
        assert!(view.ended);
        assert_eq!(view.error.as_deref(), Some("mic denied"));
    }
}

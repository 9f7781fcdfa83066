use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::Instant;

use super::session::{CallEvent, CallSession, LiveView};

/// In-process map of live call sessions keyed by call id.
///
/// Sessions are removed with [`SessionRegistry::evict`] once their end has
/// been persisted.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<String, CallSession>>>,
}

/// A view plus whether the operation that produced it ended the session.
#[derive(Debug, Clone)]
pub struct Transition {
    pub view: LiveView,
    pub ended_now: bool,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self, session: CallSession) {
        let mut sessions = self.inner.write().await;
        sessions.insert(session.call_id.clone(), session);
    }

    /// Applies an event; `None` when the call is unknown.
    pub async fn apply(&self, call_id: &str, event: CallEvent) -> Option<Transition> {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(call_id)?;
        let was_ended = session.is_ended();
        session.apply(event, now);
        Some(Transition {
            view: session.live_view(now),
            ended_now: !was_ended && session.is_ended(),
        })
    }

    /// Checks the time limit and returns the current view.
    pub async fn live_view(&self, call_id: &str) -> Option<Transition> {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(call_id)?;
        let was_ended = session.is_ended();
        session.tick(now);
        Some(Transition {
            view: session.live_view(now),
            ended_now: !was_ended && session.is_ended(),
        })
    }

    /// Ends the session.
    pub async fn end(&self, call_id: &str) -> Option<Transition> {
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(call_id)?;
        let ended_now = session.end();
        Some(Transition {
            view: session.live_view(now),
            ended_now,
        })
    }

    /// Drops an ended session. Live sessions are kept.
    pub async fn evict(&self, call_id: &str) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get(call_id) {
            Some(session) if session.is_ended() => sessions.remove(call_id).is_some(),
            _ => false,
        }
    }

    pub async fn live_count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uuid::Uuid;

    #[tokio::test(start_paused = true)]
    async fn test_unknown_call_is_none() {
        let registry = SessionRegistry::new();
        assert!(registry.live_view("missing").await.is_none());
        assert!(registry.apply("missing", CallEvent::CallEnded).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_reports_first_caller_only() {
        let registry = SessionRegistry::new();
        registry.open(CallSession::new("c1", Uuid::new_v4(), 5)).await;
        let first = registry.end("c1").await.unwrap();
        assert!(first.view.ended && first.ended_now);
        let second = registry.end("c1").await.unwrap();
        assert!(!second.ended_now);
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_limit_reported_once_by_live_view() {
        let registry = SessionRegistry::new();
        registry.open(CallSession::new("c1", Uuid::new_v4(), 1)).await;
        registry.apply("c1", CallEvent::CallStarted).await.unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;
        let first = registry.live_view("c1").await.unwrap();
        assert!(first.ended_now && first.view.stop_requested);
        let again = registry.live_view("c1").await.unwrap();
        assert!(!again.ended_now);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_only_drops_ended_sessions() {
        let registry = SessionRegistry::new();
        registry.open(CallSession::new("c1", Uuid::new_v4(), 5)).await;
        assert!(!registry.evict("c1").await);
        assert_eq!(registry.live_count().await, 1);

        let t = registry.apply("c1", CallEvent::CallEnded).await.unwrap();
        assert!(t.ended_now);
        assert!(registry.evict("c1").await);
        assert_eq!(registry.live_count().await, 0);
        assert!(registry.live_view("c1").await.is_none());
    }
}

//! Shared fakes and router helpers for handler tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::calls::registry::SessionRegistry;
use crate::config::Config;
use crate::llm_client::{LlmError, TextModel};
use crate::models::interview::{Interview, NewInterview, Question};
use crate::models::interviewer::{Interviewer, NewInterviewer};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, Store};
use crate::voice_client::{CallRecord, DynamicCallData, RegisteredCall, VoiceError, VoiceProvider};

/// Replays canned model replies in order and records every prompt it saw.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, ()>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(())])),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    async fn generate(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(())) => Err(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            }),
            None => Err(LlmError::EmptyContent),
        }
    }
}

/// Hands out sequential call ids and serves one canned call record.
#[derive(Default)]
pub struct FakeVoice {
    counter: AtomicUsize,
    pub registered: Mutex<Vec<DynamicCallData>>,
    pub record: Mutex<Option<CallRecord>>,
}

impl FakeVoice {
    pub fn with_record(record: CallRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
            ..Self::default()
        }
    }
}

#[async_trait]
impl VoiceProvider for FakeVoice {
    async fn register_call(
        &self,
        _agent_id: &str,
        data: &DynamicCallData,
    ) -> Result<RegisteredCall, VoiceError> {
        self.registered.lock().unwrap().push(data.clone());
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(RegisteredCall {
            call_id: format!("call_{n}"),
            access_token: format!("token_{n}"),
        })
    }

    async fn get_call(&self, call_id: &str) -> Result<CallRecord, VoiceError> {
        self.record
            .lock()
            .unwrap()
            .clone()
            .filter(|r| r.call_id == call_id)
            .ok_or(VoiceError::Api {
                status: 404,
                message: format!("call {call_id} not found"),
            })
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        gemini_api_key: "test-gemini".to_string(),
        retell_api_key: "test-retell".to_string(),
        live_url: "localhost:3000".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
        max_upload_mb: 10,
    }
}

pub fn test_state(llm: Arc<dyn TextModel>, voice: Arc<dyn VoiceProvider>) -> AppState {
    AppState {
        store: Arc::new(MemoryStore::new()),
        llm,
        voice,
        sessions: SessionRegistry::new(),
        config: test_config(),
    }
}

pub fn default_state() -> AppState {
    test_state(Arc::new(ScriptedModel::default()), Arc::new(FakeVoice::default()))
}

pub fn app(state: &AppState) -> Router {
    build_router(state.clone())
}

/// Sends one request through the router and returns status plus parsed JSON body.
pub async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

pub async fn seed_interviewer(store: &dyn Store) -> Interviewer {
    store
        .create_interviewer(NewInterviewer {
            agent_id: Some("agent_lisa".to_string()),
            name: "Lisa".to_string(),
            image: "/interviewers/lisa.png".to_string(),
            audio: None,
            description: "Friendly and thorough".to_string(),
            empathy: 7,
            rapport: 7,
            exploration: 5,
            speed: 5,
        })
        .await
        .unwrap()
}

pub async fn seed_interview(store: &dyn Store, organization_id: &str) -> Interview {
    let interviewer = seed_interviewer(store).await;
    let id = Uuid::new_v4();
    store
        .create_interview(NewInterview {
            id,
            name: "Backend Engineer".to_string(),
            objective: "Assess API design".to_string(),
            description: "A short technical chat".to_string(),
            organization_id: Some(organization_id.to_string()),
            user_id: Some("user_1".to_string()),
            interviewer_id: interviewer.id,
            questions: vec![
                Question::new("Describe a service you designed"),
                Question::new("How do you handle failures?"),
            ],
            question_count: 2,
            time_duration: 10,
            is_anonymous: false,
            theme_color: None,
            logo_url: None,
            readable_slug: Some(format!("acme-backend-engineer-{}", &id.simple().to_string()[..8])),
            url: Some(format!("localhost:3000/call/{id}")),
            respondents: None,
        })
        .await
        .unwrap()
}

//! Voice Client: registers browser voice calls and fetches finished call records
//! from the Retell REST API.
//!
//! Real-time audio, turn-taking and transcript streaming happen between the
//! candidate's browser and the provider; this service only registers calls and
//! reads back their results. Handlers depend on the `VoiceProvider` trait.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

const RETELL_API_BASE: &str = "https://api.retellai.com/v2";

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Interviewer has no voice agent configured")]
    MissingAgent,
}

/// Variables injected into the interviewer agent's prompt for one call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DynamicCallData {
    pub mins: String,
    pub objective: String,
    pub questions: String,
    pub name: String,
}

/// Credentials the browser SDK needs to join a registered call.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisteredCall {
    pub call_id: String,
    pub access_token: String,
}

/// A finished call as reported by the provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallRecord {
    pub call_id: String,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub start_timestamp: Option<i64>,
    #[serde(default)]
    pub end_timestamp: Option<i64>,
    #[serde(default)]
    pub call_analysis: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl CallRecord {
    /// Call length in whole seconds, from the provider's millisecond timestamps.
    pub fn duration_secs(&self) -> i64 {
        match (self.start_timestamp, self.end_timestamp) {
            (Some(start), Some(end)) if end > start => (end - start) / 1000,
            _ => 0,
        }
    }
}

#[async_trait]
pub trait VoiceProvider: Send + Sync {
    async fn register_call(
        &self,
        agent_id: &str,
        data: &DynamicCallData,
    ) -> Result<RegisteredCall, VoiceError>;

    async fn get_call(&self, call_id: &str) -> Result<CallRecord, VoiceError>;
}

#[derive(Debug, Serialize)]
struct CreateWebCallRequest<'a> {
    agent_id: &'a str,
    retell_llm_dynamic_variables: &'a DynamicCallData,
}

#[derive(Clone)]
pub struct RetellClient {
    client: Client,
    api_key: String,
}

impl RetellClient {
    pub fn new(api_key: String) -> Result<Self, VoiceError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            api_key,
        })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, VoiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        warn!("Retell API returned {}: {}", status, message);
        Err(VoiceError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl VoiceProvider for RetellClient {
    async fn register_call(
        &self,
        agent_id: &str,
        data: &DynamicCallData,
    ) -> Result<RegisteredCall, VoiceError> {
        let response = self
            .client
            .post(format!("{RETELL_API_BASE}/create-web-call"))
            .bearer_auth(&self.api_key)
            .json(&CreateWebCallRequest {
                agent_id,
                retell_llm_dynamic_variables: data,
            })
            .send()
            .await?;

        let registered: RegisteredCall = Self::check(response).await?.json().await?;
        info!("Registered web call {}", registered.call_id);
        Ok(registered)
    }

    async fn get_call(&self, call_id: &str) -> Result<CallRecord, VoiceError> {
        let response = self
            .client
            .get(format!("{RETELL_API_BASE}/get-call/{call_id}"))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }
}

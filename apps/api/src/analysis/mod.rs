// AI orchestration: question generation, interview insights, communication
// analysis and per-response analytics.
// All model calls go through llm_client; each makes exactly one request.

pub mod analytics;
pub mod communication;
pub mod handlers;
pub mod insights;
pub mod prompts;
pub mod questions;

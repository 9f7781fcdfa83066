//! Persistence seam. Every service operation reads and writes through `Store`.
//!
//! `PgStore` is the production backend; `MemoryStore` keeps records in process
//! (local development without `DATABASE_URL`, and tests).
//! `AppState` holds an `Arc<dyn Store>`, chosen at startup from config.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::feedback::{Feedback, NewFeedback};
use crate::models::interview::{Interview, InterviewPatch, NewInterview};
use crate::models::interviewer::{Interviewer, NewInterviewer};
use crate::models::organization::{Organization, OrganizationPatch};
use crate::models::response::{NewResponse, Response, ResponsePatch};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored value is invalid: {0}")]
    Corrupt(String),

    #[error("Duplicate call id: {0}")]
    DuplicateCall(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    // Interviews
    async fn create_interview(&self, new: NewInterview) -> StoreResult<Interview>;
    async fn get_interview(&self, id: Uuid) -> StoreResult<Option<Interview>>;
    async fn get_interview_by_slug(&self, slug: &str) -> StoreResult<Option<Interview>>;
    /// Newest first. `organization_id` takes precedence over `user_id`.
    async fn list_interviews(
        &self,
        organization_id: Option<&str>,
        user_id: Option<&str>,
    ) -> StoreResult<Vec<Interview>>;
    async fn update_interview(
        &self,
        id: Uuid,
        patch: InterviewPatch,
    ) -> StoreResult<Option<Interview>>;
    async fn delete_interview(&self, id: Uuid) -> StoreResult<bool>;
    /// Returns the number of interviews switched off.
    async fn deactivate_interviews_by_org(&self, organization_id: &str) -> StoreResult<u64>;

    // Interviewers
    async fn list_interviewers(&self) -> StoreResult<Vec<Interviewer>>;
    async fn get_interviewer(&self, id: i64) -> StoreResult<Option<Interviewer>>;
    async fn create_interviewer(&self, new: NewInterviewer) -> StoreResult<Interviewer>;

    // Responses
    /// Also increments the parent interview's `response_count`.
    async fn create_response(&self, new: NewResponse) -> StoreResult<Response>;
    async fn get_response_by_call_id(&self, call_id: &str) -> StoreResult<Option<Response>>;
    /// Ended responses for an interview, newest first.
    async fn list_responses(&self, interview_id: Uuid) -> StoreResult<Vec<Response>>;
    /// Emails of every response (ended or not) for an interview.
    async fn list_response_emails(&self, interview_id: Uuid) -> StoreResult<Vec<String>>;
    async fn update_response(
        &self,
        call_id: &str,
        patch: ResponsePatch,
    ) -> StoreResult<Option<Response>>;
    async fn delete_response(&self, call_id: &str) -> StoreResult<bool>;
    async fn count_responses_by_org(&self, organization_id: &str) -> StoreResult<i64>;

    // Organizations
    async fn get_organization(&self, id: &str) -> StoreResult<Option<Organization>>;
    async fn insert_organization(&self, org: Organization) -> StoreResult<Organization>;
    async fn update_organization(
        &self,
        id: &str,
        patch: OrganizationPatch,
    ) -> StoreResult<Option<Organization>>;

    // Feedback
    async fn create_feedback(&self, new: NewFeedback) -> StoreResult<Feedback>;
}

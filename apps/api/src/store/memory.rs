use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::feedback::{Feedback, NewFeedback};
use crate::models::interview::{Interview, InterviewPatch, NewInterview};
use crate::models::interviewer::{Interviewer, NewInterviewer};
use crate::models::organization::{Organization, OrganizationPatch};
use crate::models::response::{NewResponse, Response, ResponsePatch};

#[derive(Default)]
struct Tables {
    interviews: HashMap<Uuid, Interview>,
    interviewers: Vec<Interviewer>,
    responses: Vec<Response>,
    organizations: HashMap<String, Organization>,
    feedback: Vec<Feedback>,
}

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> chrono::DateTime<Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_interview(&self, new: NewInterview) -> StoreResult<Interview> {
        let interview = new.into_interview(Utc::now());
        let mut tables = self.tables.write().await;
        tables.interviews.insert(interview.id, interview.clone());
        Ok(interview)
    }

    async fn get_interview(&self, id: Uuid) -> StoreResult<Option<Interview>> {
        Ok(self.tables.read().await.interviews.get(&id).cloned())
    }

    async fn get_interview_by_slug(&self, slug: &str) -> StoreResult<Option<Interview>> {
        Ok(self
            .tables
            .read()
            .await
            .interviews
            .values()
            .find(|i| i.readable_slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn list_interviews(
        &self,
        organization_id: Option<&str>,
        user_id: Option<&str>,
    ) -> StoreResult<Vec<Interview>> {
        let tables = self.tables.read().await;
        let mut found: Vec<Interview> = tables
            .interviews
            .values()
            .filter(|i| match (organization_id, user_id) {
                (Some(org), _) => i.organization_id.as_deref() == Some(org),
                (None, Some(user)) => i.user_id.as_deref() == Some(user),
                (None, None) => true,
            })
            .cloned()
            .collect();
        newest_first(&mut found, |i| i.created_at);
        Ok(found)
    }

    async fn update_interview(
        &self,
        id: Uuid,
        patch: InterviewPatch,
    ) -> StoreResult<Option<Interview>> {
        let mut tables = self.tables.write().await;
        Ok(tables.interviews.get_mut(&id).map(|interview| {
            interview.apply(patch);
            interview.clone()
        }))
    }

    async fn delete_interview(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tables.write().await.interviews.remove(&id).is_some())
    }

    async fn deactivate_interviews_by_org(&self, organization_id: &str) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let mut count = 0;
        for interview in tables.interviews.values_mut() {
            if interview.organization_id.as_deref() == Some(organization_id) && interview.is_active
            {
                interview.is_active = false;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn list_interviewers(&self) -> StoreResult<Vec<Interviewer>> {
        Ok(self.tables.read().await.interviewers.clone())
    }

    async fn get_interviewer(&self, id: i64) -> StoreResult<Option<Interviewer>> {
        Ok(self
            .tables
            .read()
            .await
            .interviewers
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn create_interviewer(&self, new: NewInterviewer) -> StoreResult<Interviewer> {
        let mut tables = self.tables.write().await;
        let id = tables.interviewers.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let interviewer = Interviewer {
            id,
            agent_id: new.agent_id,
            name: new.name,
            image: new.image,
            audio: new.audio,
            description: new.description,
            empathy: new.empathy,
            rapport: new.rapport,
            exploration: new.exploration,
            speed: new.speed,
            created_at: Utc::now(),
        };
        tables.interviewers.push(interviewer.clone());
        Ok(interviewer)
    }

    async fn create_response(&self, new: NewResponse) -> StoreResult<Response> {
        let mut tables = self.tables.write().await;
        if tables.responses.iter().any(|r| r.call_id == new.call_id) {
            return Err(StoreError::DuplicateCall(new.call_id));
        }
        let response = new.into_response(Utc::now());
        if let Some(interview) = tables.interviews.get_mut(&response.interview_id) {
            interview.response_count += 1;
        }
        tables.responses.push(response.clone());
        Ok(response)
    }

    async fn get_response_by_call_id(&self, call_id: &str) -> StoreResult<Option<Response>> {
        Ok(self
            .tables
            .read()
            .await
            .responses
            .iter()
            .find(|r| r.call_id == call_id)
            .cloned())
    }

    async fn list_responses(&self, interview_id: Uuid) -> StoreResult<Vec<Response>> {
        let tables = self.tables.read().await;
        let mut found: Vec<Response> = tables
            .responses
            .iter()
            .filter(|r| r.interview_id == interview_id && r.is_ended)
            .cloned()
            .collect();
        newest_first(&mut found, |r| r.created_at);
        Ok(found)
    }

    async fn list_response_emails(&self, interview_id: Uuid) -> StoreResult<Vec<String>> {
        Ok(self
            .tables
            .read()
            .await
            .responses
            .iter()
            .filter(|r| r.interview_id == interview_id)
            .filter_map(|r| r.email.clone())
            .collect())
    }

    async fn update_response(
        &self,
        call_id: &str,
        patch: ResponsePatch,
    ) -> StoreResult<Option<Response>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .responses
            .iter_mut()
            .find(|r| r.call_id == call_id)
            .map(|response| {
                response.apply(patch);
                response.clone()
            }))
    }

    async fn delete_response(&self, call_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.responses.len();
        tables.responses.retain(|r| r.call_id != call_id);
        Ok(tables.responses.len() != before)
    }

    async fn count_responses_by_org(&self, organization_id: &str) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .responses
            .iter()
            .filter(|r| {
                tables
                    .interviews
                    .get(&r.interview_id)
                    .map(|i| i.organization_id.as_deref() == Some(organization_id))
                    .unwrap_or(false)
            })
            .count();
        Ok(count as i64)
    }

    async fn get_organization(&self, id: &str) -> StoreResult<Option<Organization>> {
        Ok(self.tables.read().await.organizations.get(id).cloned())
    }

    async fn insert_organization(&self, org: Organization) -> StoreResult<Organization> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .organizations
            .entry(org.id.clone())
            .or_insert(org)
            .clone();
        Ok(stored)
    }

    async fn update_organization(
        &self,
        id: &str,
        patch: OrganizationPatch,
    ) -> StoreResult<Option<Organization>> {
        let mut tables = self.tables.write().await;
        Ok(tables.organizations.get_mut(id).map(|org| {
            org.apply(patch);
            org.clone()
        }))
    }

    async fn create_feedback(&self, new: NewFeedback) -> StoreResult<Feedback> {
        let feedback = Feedback {
            id: Uuid::new_v4(),
            interview_id: new.interview_id,
            email: new.email,
            satisfaction: new.satisfaction,
            feedback: new.feedback,
            created_at: Utc::now(),
        };
        self.tables.write().await.feedback.push(feedback.clone());
        Ok(feedback)
    }
}

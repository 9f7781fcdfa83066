//! Free-plan response quota.
//!
//! Once a free organization has collected `allowed_responses_count` responses,
//! every one of its interviews is switched off and the plan moves to
//! `free_trial_over`.

use serde::Serialize;
use tracing::{info, warn};

use crate::models::organization::{Organization, OrganizationPatch, Plan};
use crate::store::{Store, StoreResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaStatus {
    pub plan: Plan,
    pub total_responses: i64,
    pub allowed_responses_count: i64,
    pub exceeded: bool,
}

pub fn quota_exceeded(org: &Organization, total_responses: i64) -> bool {
    org.plan == Plan::Free && total_responses >= org.allowed_responses_count
}

/// Fetches the organization, creating a free one with the default quota on first sight.
pub async fn get_or_create_organization(store: &dyn Store, id: &str) -> StoreResult<Organization> {
    match store.get_organization(id).await? {
        Some(org) => Ok(org),
        None => {
            info!("Creating free organization {id}");
            store.insert_organization(Organization::new_free(id)).await
        }
    }
}

pub async fn enforce_quota(store: &dyn Store, organization_id: &str) -> StoreResult<QuotaStatus> {
    let mut org = get_or_create_organization(store, organization_id).await?;
    let total = store.count_responses_by_org(organization_id).await?;

    if quota_exceeded(&org, total) {
        let deactivated = store.deactivate_interviews_by_org(organization_id).await?;
        warn!(
            "Organization {organization_id} reached its free quota ({total}/{}); deactivated {deactivated} interview(s)",
            org.allowed_responses_count
        );
        let patch = OrganizationPatch {
            plan: Some(Plan::FreeTrialOver),
            ..OrganizationPatch::default()
        };
        if let Some(updated) = store.update_organization(organization_id, patch).await? {
            org = updated;
        }
    }

    Ok(QuotaStatus {
        plan: org.plan,
        total_responses: total,
        allowed_responses_count: org.allowed_responses_count,
        exceeded: total >= org.allowed_responses_count,
    })
}

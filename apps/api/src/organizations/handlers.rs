use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::organization::{Organization, OrganizationPatch};
use crate::organizations::quota::{enforce_quota, get_or_create_organization, QuotaStatus};
use crate::state::AppState;

/// GET /api/organizations/:id
pub async fn handle_get_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Organization>, AppError> {
    Ok(Json(get_or_create_organization(state.store.as_ref(), &id).await?))
}

/// PATCH /api/organizations/:id
pub async fn handle_patch_organization(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<OrganizationPatch>,
) -> Result<Json<Organization>, AppError> {
    if patch.allowed_responses_count.is_some_and(|n| n < 0) {
        return Err(AppError::Validation(
            "allowed_responses_count must not be negative".to_string(),
        ));
    }
    get_or_create_organization(state.store.as_ref(), &id).await?;
    let updated = state
        .store
        .update_organization(&id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Organization {id} not found")))?;
    Ok(Json(updated))
}

/// POST /api/organizations/:id/quota
pub async fn handle_enforce_quota(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QuotaStatus>, AppError> {
    Ok(Json(enforce_quota(state.store.as_ref(), &id).await?))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::test_support::{app, default_state, send};

    #[tokio::test]
    async fn test_first_fetch_creates_free_org() {
        let state = default_state();
        let (status, body) = send(app(&state), "GET", "/api/organizations/org_9", None).await;
        assert_eq!(status, 200);
        assert_eq!(body["plan"], "free");
        assert_eq!(body["allowed_responses_count"], 10);
    }

    #[tokio::test]
    async fn test_patch_upgrades_plan() {
        let state = default_state();
        let (status, body) = send(
            app(&state),
            "PATCH",
            "/api/organizations/org_9",
            Some(json!({"plan": "pro", "name": "Acme"})),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["plan"], "pro");
        assert_eq!(body["name"], "Acme");

        let (_, quota) =
            send(app(&state), "POST", "/api/organizations/org_9/quota", None).await;
        assert_eq!(quota["plan"], "pro");
        assert_eq!(quota["exceeded"], false);
    }

    #[tokio::test]
    async fn test_unknown_patch_field_is_rejected() {
        let state = default_state();
        let (status, _) = send(
            app(&state),
            "PATCH",
            "/api/organizations/org_9",
            Some(json!({"owner": "someone"})),
        )
        .await;
        assert_eq!(status, 422);
    }
}

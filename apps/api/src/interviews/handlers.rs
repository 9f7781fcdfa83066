//! Axum route handlers for the Interviews API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interviews::share::{
    embed_code, resolve_interview_url, stored_interview_url, DEFAULT_EMBED_HEIGHT,
    DEFAULT_EMBED_WIDTH,
};
use crate::interviews::wizard::{
    edited_question_count, readable_slug, save_gate, validate_details, validate_patch,
    InterviewDraft, QuestionList, MAX_DURATION_MINUTES,
};
use crate::models::interview::{Interview, InterviewPatch, NewInterview, Question};
use crate::models::interviewer::PublicInterviewer;
use crate::state::AppState;
use crate::store::Store;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateInterviewRequest {
    pub organization_id: Option<String>,
    pub organization_name: Option<String>,
    pub user_id: Option<String>,
    pub logo_url: Option<String>,
    pub theme_color: Option<String>,
    #[serde(flatten)]
    pub draft: InterviewDraft,
}

#[derive(Debug, Deserialize)]
pub struct ListInterviewsQuery {
    pub organization_id: Option<String>,
    pub user_id: Option<String>,
}

/// Body of the edit-interview save.
#[derive(Debug, Deserialize)]
pub struct EditInterviewRequest {
    pub objective: String,
    pub description: String,
    pub interviewer_id: i64,
    pub questions: Vec<Question>,
    pub question_count: u32,
    pub time_duration: u32,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// One edit to the wizard's question list.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum QuestionEdit {
    /// Restart in manual mode with a single blank question.
    Manual,
    Add,
    Remove {
        id: String,
    },
    Update {
        id: String,
        question: String,
        follow_up_count: u32,
    },
}

#[derive(Debug, Deserialize)]
pub struct EditQuestionsRequest {
    pub question_count: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(flatten)]
    pub edit: QuestionEdit,
}

#[derive(Debug, Serialize)]
pub struct QuestionListResponse {
    pub questions: Vec<Question>,
    pub can_add: bool,
}

#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub url: String,
    pub embed_code: String,
}

/// What an unauthenticated candidate sees before joining a call.
#[derive(Debug, Serialize)]
pub struct PublicInterview {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub time_duration: u32,
    pub question_count: u32,
    pub is_anonymous: bool,
    pub is_active: bool,
    pub theme_color: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Interview> for PublicInterview {
    fn from(i: &Interview) -> Self {
        Self {
            id: i.id,
            name: i.name.clone(),
            description: i.description.clone(),
            time_duration: i.time_duration,
            question_count: i.question_count,
            is_anonymous: i.is_anonymous,
            is_active: i.is_active,
            theme_color: i.theme_color_or_default().to_string(),
            logo_url: i.logo_url.clone(),
            created_at: i.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicInterviewResponse {
    pub interview: PublicInterview,
    pub interviewer: Option<PublicInterviewer>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/interviews
pub async fn handle_create_interview(
    State(state): State<AppState>,
    Json(req): Json<CreateInterviewRequest>,
) -> Result<(StatusCode, Json<Interview>), AppError> {
    let draft = req.draft;
    validate_details(&draft).map_err(|r| AppError::Validation(r.join("; ")))?;
    save_gate(&draft).map_err(|r| AppError::Validation(r.join("; ")))?;

    if state.store.get_interviewer(draft.interviewer_id).await?.is_none() {
        return Err(AppError::Validation(format!(
            "Interviewer {} does not exist",
            draft.interviewer_id
        )));
    }

    let id = Uuid::new_v4();
    let slug = unique_slug(
        state.store.as_ref(),
        readable_slug(req.organization_name.as_deref(), &draft.name),
        id,
    )
    .await?;

    let interview = state
        .store
        .create_interview(NewInterview {
            id,
            name: draft.name.trim().to_string(),
            objective: draft.objective.trim().to_string(),
            description: draft.description.trim().to_string(),
            organization_id: req.organization_id,
            user_id: req.user_id,
            interviewer_id: draft.interviewer_id,
            questions: draft.questions,
            question_count: draft.question_count,
            time_duration: draft.time_duration,
            is_anonymous: draft.is_anonymous,
            theme_color: req.theme_color,
            logo_url: req.logo_url,
            readable_slug: slug,
            url: Some(stored_interview_url(&state.config.live_url, &id.to_string())),
            respondents: draft.respondents,
        })
        .await?;

    info!("Created interview {} ({})", interview.id, interview.name);
    Ok((StatusCode::CREATED, Json(interview)))
}

/// Suffixes the first 8 hex chars of the id when the slug is taken.
async fn unique_slug(store: &dyn Store, base: String, id: Uuid) -> Result<Option<String>, AppError> {
    if base.is_empty() {
        return Ok(None);
    }
    if store.get_interview_by_slug(&base).await?.is_none() {
        return Ok(Some(base));
    }
    let suffix = id.simple().to_string();
    Ok(Some(format!("{base}-{}", &suffix[..8])))
}

/// GET /api/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    Query(params): Query<ListInterviewsQuery>,
) -> Result<Json<Vec<Interview>>, AppError> {
    if params.organization_id.is_none() && params.user_id.is_none() {
        return Err(AppError::Validation(
            "organization_id or user_id is required".to_string(),
        ));
    }
    let interviews = state
        .store
        .list_interviews(params.organization_id.as_deref(), params.user_id.as_deref())
        .await?;
    Ok(Json(interviews))
}

pub(crate) async fn load_interview(state: &AppState, id: Uuid) -> Result<Interview, AppError> {
    state
        .store
        .get_interview(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
}

/// GET /api/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Interview>, AppError> {
    Ok(Json(load_interview(&state, id).await?))
}

/// PATCH /api/interviews/:id
pub async fn handle_patch_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<InterviewPatch>,
) -> Result<Json<Interview>, AppError> {
    validate_patch(&patch).map_err(|r| AppError::Validation(r.join("; ")))?;
    let updated = state
        .store
        .update_interview(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))?;
    Ok(Json(updated))
}

/// PUT /api/interviews/:id
pub async fn handle_edit_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EditInterviewRequest>,
) -> Result<Json<Interview>, AppError> {
    if req.questions.is_empty() || req.questions.iter().any(|q| q.is_blank()) {
        return Err(AppError::Validation(
            "Questions must not be empty".to_string(),
        ));
    }
    if req.description.trim().is_empty() {
        return Err(AppError::Validation("Description is required".to_string()));
    }
    if !(1..=MAX_DURATION_MINUTES).contains(&req.time_duration) {
        return Err(AppError::Validation(format!(
            "time_duration must be between 1 and {MAX_DURATION_MINUTES} minutes"
        )));
    }
    if req.objective.trim().is_empty() {
        return Err(AppError::Validation("Objective is required".to_string()));
    }

    let question_count = edited_question_count(&req.questions, req.question_count);
    let patch = InterviewPatch {
        objective: Some(req.objective),
        description: Some(req.description),
        interviewer_id: Some(req.interviewer_id),
        questions: Some(req.questions),
        question_count: Some(question_count),
        time_duration: Some(req.time_duration),
        is_anonymous: Some(req.is_anonymous),
        ..InterviewPatch::default()
    };
    let updated = state
        .store
        .update_interview(id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))?;
    info!("Edited interview {id}");
    Ok(Json(updated))
}

/// POST /api/wizard/questions
///
/// Applies one edit to a draft's question list. Nothing is stored.
pub async fn handle_edit_questions(
    Json(req): Json<EditQuestionsRequest>,
) -> Result<Json<QuestionListResponse>, AppError> {
    if req.question_count == 0 {
        return Err(AppError::Validation(
            "question_count must be at least 1".to_string(),
        ));
    }
    let mut list = QuestionList::new(req.question_count, req.questions);
    let applied = match req.edit {
        QuestionEdit::Manual => {
            list = QuestionList::manual(req.question_count);
            true
        }
        QuestionEdit::Add => {
            if !list.add() {
                return Err(AppError::Validation(format!(
                    "At most {} questions can be added",
                    req.question_count
                )));
            }
            true
        }
        QuestionEdit::Remove { id } => list.remove(&id),
        QuestionEdit::Update {
            id,
            question,
            follow_up_count,
        } => list.update(&id, &question, follow_up_count),
    };
    if !applied {
        return Err(AppError::NotFound("Question not found".to_string()));
    }
    Ok(Json(QuestionListResponse {
        can_add: list.can_add(),
        questions: list.into_questions(),
    }))
}

/// DELETE /api/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_interview(id).await? {
        return Err(AppError::NotFound(format!("Interview {id} not found")));
    }
    info!("Deleted interview {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/interviews/:id/share
pub async fn handle_share_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ShareQuery>,
) -> Result<Json<ShareResponse>, AppError> {
    let interview = load_interview(&state, id).await?;
    let url = resolve_interview_url(
        &state.config.live_url,
        interview.readable_slug.as_deref(),
        interview.url.as_deref(),
    )
    .ok_or_else(|| AppError::NotFound(format!("Interview {id} has no shareable URL")))?;

    let width = params.width.unwrap_or(DEFAULT_EMBED_WIDTH);
    let height = params.height.unwrap_or(DEFAULT_EMBED_HEIGHT);
    Ok(Json(ShareResponse {
        embed_code: embed_code(&url, width, height),
        url,
    }))
}

/// GET /api/public/interviews/:key
///
/// `key` is a readable slug or an interview id.
pub async fn handle_public_interview(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<PublicInterviewResponse>, AppError> {
    let mut interview = state.store.get_interview_by_slug(&key).await?;
    if interview.is_none() {
        if let Ok(id) = key.parse::<Uuid>() {
            interview = state.store.get_interview(id).await?;
        }
    }
    let interview =
        interview.ok_or_else(|| AppError::NotFound(format!("Interview {key} not found")))?;

    let interviewer = state
        .store
        .get_interviewer(interview.interviewer_id)
        .await?
        .map(|i| PublicInterviewer::from(&i));

    Ok(Json(PublicInterviewResponse {
        interview: PublicInterview::from(&interview),
        interviewer,
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::test_support::{app, default_state, seed_interview, seed_interviewer, send};

    fn create_body(interviewer_id: i64, questions: &[&str]) -> serde_json::Value {
        json!({
            "organization_id": "org_1",
            "organization_name": "Acme",
            "user_id": "user_1",
            "name": "Data Analyst",
            "objective": "SQL fluency",
            "description": "We talk about queries",
            "interviewer_id": interviewer_id,
            "question_count": 2,
            "time_duration": 5,
            "questions": questions
                .iter()
                .map(|q| json!({"id": q, "question": q, "follow_up_count": 1}))
                .collect::<Vec<_>>(),
        })
    }

    #[tokio::test]
    async fn test_create_assigns_slug_and_url() {
        let state = default_state();
        let interviewer = seed_interviewer(state.store.as_ref()).await;

        let (status, body) = send(
            app(&state),
            "POST",
            "/api/interviews",
            Some(create_body(interviewer.id, &["What is a join?", "Explain indexes"])),
        )
        .await;
        assert_eq!(status, 201);
        assert_eq!(body["readable_slug"], "acme-data-analyst");
        let id = body["id"].as_str().unwrap();
        assert_eq!(body["url"], format!("localhost:3000/call/{id}"));

        let (status, second) = send(
            app(&state),
            "POST",
            "/api/interviews",
            Some(create_body(interviewer.id, &["What is a join?", "Explain indexes"])),
        )
        .await;
        assert_eq!(status, 201);
        let second_id = second["id"].as_str().unwrap().replace('-', "");
        assert_eq!(
            second["readable_slug"],
            format!("acme-data-analyst-{}", &second_id[..8])
        );
    }

    #[tokio::test]
    async fn test_create_rejects_missing_questions() {
        let state = default_state();
        let interviewer = seed_interviewer(state.store.as_ref()).await;
        let (status, body) = send(
            app(&state),
            "POST",
            "/api/interviews",
            Some(create_body(interviewer.id, &["Only one"])),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_toggle_active_twice_restores_state() {
        let state = default_state();
        let interview = seed_interview(state.store.as_ref(), "org_1").await;
        let uri = format!("/api/interviews/{}", interview.id);

        let (_, body) = send(app(&state), "PATCH", &uri, Some(json!({"is_active": false}))).await;
        assert_eq!(body["is_active"], false);
        let (_, body) = send(app(&state), "PATCH", &uri, Some(json!({"is_active": true}))).await;
        assert_eq!(body["is_active"], true);

        let (_, body) = send(app(&state), "GET", &uri, None).await;
        assert_eq!(body["is_active"], true);
        assert_eq!(body["name"], "Backend Engineer");
    }

    #[tokio::test]
    async fn test_edit_caps_question_count() {
        let state = default_state();
        let interview = seed_interview(state.store.as_ref(), "org_1").await;
        let (status, body) = send(
            app(&state),
            "PUT",
            &format!("/api/interviews/{}", interview.id),
            Some(json!({
                "objective": "Assess API design",
                "description": "Updated",
                "interviewer_id": interview.interviewer_id,
                "questions": [{"id": "q1", "question": "Only question", "follow_up_count": 2}],
                "question_count": 5,
                "time_duration": 8,
            })),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["question_count"], 1);
        assert_eq!(body["time_duration"], 8);
    }

    #[tokio::test]
    async fn test_edit_rejects_blank_question() {
        let state = default_state();
        let interview = seed_interview(state.store.as_ref(), "org_1").await;
        let (status, _) = send(
            app(&state),
            "PUT",
            &format!("/api/interviews/{}", interview.id),
            Some(json!({
                "objective": "x",
                "description": "y",
                "interviewer_id": interview.interviewer_id,
                "questions": [{"id": "q1", "question": "  "}],
                "question_count": 1,
                "time_duration": 5,
            })),
        )
        .await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_share_embed_matches_url() {
        let state = default_state();
        let interview = seed_interview(state.store.as_ref(), "org_1").await;
        let (status, body) = send(
            app(&state),
            "GET",
            &format!("/api/interviews/{}/share?width=800", interview.id),
            None,
        )
        .await;
        assert_eq!(status, 200);
        let url = body["url"].as_str().unwrap();
        let slug = interview.readable_slug.unwrap();
        assert_eq!(url, format!("http://localhost:3000/call/{slug}"));
        assert_eq!(
            body["embed_code"],
            format!(r#"<iframe src="{url}" width="800" height="735"></iframe>"#)
        );
    }

    #[tokio::test]
    async fn test_public_lookup_by_slug_and_id() {
        let state = default_state();
        let interview = seed_interview(state.store.as_ref(), "org_1").await;
        let slug = interview.readable_slug.clone().unwrap();

        let (status, body) =
            send(app(&state), "GET", &format!("/api/public/interviews/{slug}"), None).await;
        assert_eq!(status, 200);
        assert_eq!(body["interviewer"]["name"], "Lisa");
        assert_eq!(body["interview"]["theme_color"], "#4F46E5");
        assert!(body["interview"].get("questions").is_none());

        let (status, _) = send(
            app(&state),
            "GET",
            &format!("/api/public/interviews/{}", interview.id),
            None,
        )
        .await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_patch_rejects_zero_duration() {
        let state = default_state();
        let interview = seed_interview(state.store.as_ref(), "org_1").await;
        let uri = format!("/api/interviews/{}", interview.id);
        let (status, body) =
            send(app(&state), "PATCH", &uri, Some(json!({"time_duration": 0}))).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (_, body) = send(app(&state), "GET", &uri, None).await;
        assert_eq!(body["time_duration"], 10);
    }

    #[tokio::test]
    async fn test_question_edits_respect_target() {
        let state = default_state();
        let uri = "/api/wizard/questions";

        let (status, body) = send(
            app(&state),
            "POST",
            uri,
            Some(json!({"question_count": 2, "action": "manual"})),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["questions"].as_array().unwrap().len(), 1);
        assert_eq!(body["can_add"], true);

        let (_, body) = send(
            app(&state),
            "POST",
            uri,
            Some(json!({"question_count": 2, "questions": body["questions"], "action": "add"})),
        )
        .await;
        assert_eq!(body["can_add"], false);
        let questions = body["questions"].clone();
        assert_eq!(questions.as_array().unwrap().len(), 2);

        let (status, _) = send(
            app(&state),
            "POST",
            uri,
            Some(json!({"question_count": 2, "questions": questions, "action": "add"})),
        )
        .await;
        assert_eq!(status, 400);

        let first = questions[0]["id"].as_str().unwrap();
        let (_, body) = send(
            app(&state),
            "POST",
            uri,
            Some(json!({
                "question_count": 2,
                "questions": questions,
                "action": "update",
                "id": first,
                "question": "Walk me through a migration",
                "follow_up_count": 2,
            })),
        )
        .await;
        assert_eq!(body["questions"][0]["question"], "Walk me through a migration");
        assert_eq!(body["questions"][0]["follow_up_count"], 2);

        let (_, body) = send(
            app(&state),
            "POST",
            uri,
            Some(json!({"question_count": 2, "questions": body["questions"], "action": "remove", "id": first})),
        )
        .await;
        assert_eq!(body["questions"].as_array().unwrap().len(), 1);
        assert_eq!(body["can_add"], true);

        let (status, _) = send(
            app(&state),
            "POST",
            uri,
            Some(json!({"question_count": 2, "action": "remove", "id": "missing"})),
        )
        .await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let state = default_state();
        let interview = seed_interview(state.store.as_ref(), "org_1").await;
        let uri = format!("/api/interviews/{}", interview.id);
        let (status, _) = send(app(&state), "DELETE", &uri, None).await;
        assert_eq!(status, 204);
        let (status, _) = send(app(&state), "DELETE", &uri, None).await;
        assert_eq!(status, 404);
    }
}

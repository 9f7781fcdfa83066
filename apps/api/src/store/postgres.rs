use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::feedback::{Feedback, NewFeedback, Satisfaction};
use crate::models::interview::{Interview, InterviewPatch, NewInterview, Question};
use crate::models::interviewer::{Interviewer, NewInterviewer};
use crate::models::organization::{Organization, OrganizationPatch, Plan};
use crate::models::response::{
    Analytics, CallDetails, CandidateStatus, NewResponse, Response, ResponsePatch,
};

// ────────────────────────────────────────────────────────────────────────────
// Row types (column-exact; converted into domain models)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, FromRow)]
struct InterviewRow {
    id: Uuid,
    name: String,
    objective: String,
    description: String,
    organization_id: Option<String>,
    user_id: Option<String>,
    interviewer_id: i64,
    questions: Json<Vec<Question>>,
    question_count: i32,
    time_duration: i32,
    is_anonymous: bool,
    is_active: bool,
    theme_color: Option<String>,
    logo_url: Option<String>,
    response_count: i64,
    insights: Vec<String>,
    readable_slug: Option<String>,
    url: Option<String>,
    respondents: Option<Vec<String>>,
    created_at: DateTime<Utc>,
}

impl From<InterviewRow> for Interview {
    fn from(row: InterviewRow) -> Self {
        Interview {
            id: row.id,
            name: row.name,
            objective: row.objective,
            description: row.description,
            organization_id: row.organization_id,
            user_id: row.user_id,
            interviewer_id: row.interviewer_id,
            questions: row.questions.0,
            question_count: row.question_count.max(0) as u32,
            time_duration: row.time_duration.max(0) as u32,
            is_anonymous: row.is_anonymous,
            is_active: row.is_active,
            theme_color: row.theme_color,
            logo_url: row.logo_url,
            response_count: row.response_count,
            insights: row.insights,
            readable_slug: row.readable_slug,
            url: row.url,
            respondents: row.respondents,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct InterviewerRow {
    id: i64,
    agent_id: Option<String>,
    name: String,
    image: String,
    audio: Option<String>,
    description: String,
    empathy: i16,
    rapport: i16,
    exploration: i16,
    speed: i16,
    created_at: DateTime<Utc>,
}

impl From<InterviewerRow> for Interviewer {
    fn from(row: InterviewerRow) -> Self {
        let slider = |v: i16| v.clamp(0, u8::MAX as i16) as u8;
        Interviewer {
            id: row.id,
            agent_id: row.agent_id,
            name: row.name,
            image: row.image,
            audio: row.audio,
            description: row.description,
            empathy: slider(row.empathy),
            rapport: slider(row.rapport),
            exploration: slider(row.exploration),
            speed: slider(row.speed),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ResponseRow {
    id: Uuid,
    interview_id: Uuid,
    call_id: String,
    email: Option<String>,
    name: Option<String>,
    details: Option<Json<CallDetails>>,
    analytics: Option<Json<Analytics>>,
    duration: i64,
    is_analysed: bool,
    is_ended: bool,
    is_viewed: bool,
    candidate_status: String,
    tab_switch_count: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<ResponseRow> for Response {
    type Error = StoreError;

    fn try_from(row: ResponseRow) -> Result<Self, Self::Error> {
        Ok(Response {
            id: row.id,
            interview_id: row.interview_id,
            call_id: row.call_id,
            email: row.email,
            name: row.name,
            details: row.details.map(|d| d.0),
            analytics: row.analytics.map(|a| a.0),
            duration: row.duration,
            is_analysed: row.is_analysed,
            is_ended: row.is_ended,
            is_viewed: row.is_viewed,
            candidate_status: row
                .candidate_status
                .parse::<CandidateStatus>()
                .map_err(StoreError::Corrupt)?,
            tab_switch_count: row.tab_switch_count,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OrganizationRow {
    id: String,
    name: Option<String>,
    image_url: Option<String>,
    plan: String,
    allowed_responses_count: i64,
}

impl TryFrom<OrganizationRow> for Organization {
    type Error = StoreError;

    fn try_from(row: OrganizationRow) -> Result<Self, Self::Error> {
        Ok(Organization {
            id: row.id,
            name: row.name,
            image_url: row.image_url,
            plan: row.plan.parse::<Plan>().map_err(StoreError::Corrupt)?,
            allowed_responses_count: row.allowed_responses_count,
        })
    }
}

#[derive(Debug, FromRow)]
struct FeedbackRow {
    id: Uuid,
    interview_id: Uuid,
    email: Option<String>,
    satisfaction: Option<i16>,
    feedback: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<FeedbackRow> for Feedback {
    type Error = StoreError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        let satisfaction = row
            .satisfaction
            .map(|s| Satisfaction::try_from(s.clamp(0, u8::MAX as i16) as u8))
            .transpose()
            .map_err(StoreError::Corrupt)?;
        Ok(Feedback {
            id: row.id,
            interview_id: row.interview_id,
            email: row.email,
            satisfaction,
            feedback: row.feedback,
            created_at: row.created_at,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PgStore
// ────────────────────────────────────────────────────────────────────────────

/// INT columns hold counts and minutes; larger values saturate.
fn to_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_interview(&self, new: NewInterview) -> StoreResult<Interview> {
        let row = sqlx::query_as::<_, InterviewRow>(
            r#"
            INSERT INTO interview
                (id, name, objective, description, organization_id, user_id, interviewer_id,
                 questions, question_count, time_duration, is_anonymous, theme_color,
                 logo_url, readable_slug, url, respondents)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(new.id)
        .bind(&new.name)
        .bind(&new.objective)
        .bind(&new.description)
        .bind(&new.organization_id)
        .bind(&new.user_id)
        .bind(new.interviewer_id)
        .bind(Json(&new.questions))
        .bind(to_int(new.question_count))
        .bind(to_int(new.time_duration))
        .bind(new.is_anonymous)
        .bind(&new.theme_color)
        .bind(&new.logo_url)
        .bind(&new.readable_slug)
        .bind(&new.url)
        .bind(&new.respondents)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted interview {}", row.id);
        Ok(row.into())
    }

    async fn get_interview(&self, id: Uuid) -> StoreResult<Option<Interview>> {
        let row = sqlx::query_as::<_, InterviewRow>("SELECT * FROM interview WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn get_interview_by_slug(&self, slug: &str) -> StoreResult<Option<Interview>> {
        let row =
            sqlx::query_as::<_, InterviewRow>("SELECT * FROM interview WHERE readable_slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn list_interviews(
        &self,
        organization_id: Option<&str>,
        user_id: Option<&str>,
    ) -> StoreResult<Vec<Interview>> {
        let rows = match (organization_id, user_id) {
            (Some(org), _) => {
                sqlx::query_as::<_, InterviewRow>(
                    "SELECT * FROM interview WHERE organization_id = $1 ORDER BY created_at DESC",
                )
                .bind(org)
                .fetch_all(&self.pool)
                .await?
            }
            (None, Some(user)) => {
                sqlx::query_as::<_, InterviewRow>(
                    "SELECT * FROM interview WHERE user_id = $1 ORDER BY created_at DESC",
                )
                .bind(user)
                .fetch_all(&self.pool)
                .await?
            }
            (None, None) => {
                sqlx::query_as::<_, InterviewRow>(
                    "SELECT * FROM interview ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_interview(
        &self,
        id: Uuid,
        patch: InterviewPatch,
    ) -> StoreResult<Option<Interview>> {
        let row = sqlx::query_as::<_, InterviewRow>(
            r#"
            UPDATE interview SET
                name           = COALESCE($2, name),
                objective      = COALESCE($3, objective),
                description    = COALESCE($4, description),
                interviewer_id = COALESCE($5, interviewer_id),
                questions      = COALESCE($6, questions),
                question_count = COALESCE($7, question_count),
                time_duration  = COALESCE($8, time_duration),
                is_anonymous   = COALESCE($9, is_anonymous),
                is_active      = COALESCE($10, is_active),
                theme_color    = COALESCE($11, theme_color),
                insights       = COALESCE($12, insights),
                respondents    = COALESCE($13, respondents)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.objective)
        .bind(patch.description)
        .bind(patch.interviewer_id)
        .bind(patch.questions.map(Json))
        .bind(patch.question_count.map(to_int))
        .bind(patch.time_duration.map(to_int))
        .bind(patch.is_anonymous)
        .bind(patch.is_active)
        .bind(patch.theme_color)
        .bind(patch.insights)
        .bind(patch.respondents)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn delete_interview(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM interview WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn deactivate_interviews_by_org(&self, organization_id: &str) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE interview SET is_active = false WHERE organization_id = $1 AND is_active",
        )
        .bind(organization_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn list_interviewers(&self) -> StoreResult<Vec<Interviewer>> {
        let rows = sqlx::query_as::<_, InterviewerRow>("SELECT * FROM interviewer ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_interviewer(&self, id: i64) -> StoreResult<Option<Interviewer>> {
        let row = sqlx::query_as::<_, InterviewerRow>("SELECT * FROM interviewer WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn create_interviewer(&self, new: NewInterviewer) -> StoreResult<Interviewer> {
        let row = sqlx::query_as::<_, InterviewerRow>(
            r#"
            INSERT INTO interviewer
                (agent_id, name, image, audio, description, empathy, rapport, exploration, speed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&new.agent_id)
        .bind(&new.name)
        .bind(&new.image)
        .bind(&new.audio)
        .bind(&new.description)
        .bind(new.empathy as i16)
        .bind(new.rapport as i16)
        .bind(new.exploration as i16)
        .bind(new.speed as i16)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn create_response(&self, new: NewResponse) -> StoreResult<Response> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ResponseRow>(
            r#"
            INSERT INTO response (id, interview_id, call_id, email, name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.interview_id)
        .bind(&new.call_id)
        .bind(&new.email)
        .bind(&new.name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::DuplicateCall(new.call_id.clone())
            }
            other => StoreError::Database(other),
        })?;

        sqlx::query("UPDATE interview SET response_count = response_count + 1 WHERE id = $1")
            .bind(new.interview_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn get_response_by_call_id(&self, call_id: &str) -> StoreResult<Option<Response>> {
        sqlx::query_as::<_, ResponseRow>("SELECT * FROM response WHERE call_id = $1")
            .bind(call_id)
            .fetch_optional(&self.pool)
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn list_responses(&self, interview_id: Uuid) -> StoreResult<Vec<Response>> {
        sqlx::query_as::<_, ResponseRow>(
            r#"
            SELECT * FROM response
            WHERE interview_id = $1 AND is_ended
            ORDER BY created_at DESC
            "#,
        )
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect()
    }

    async fn list_response_emails(&self, interview_id: Uuid) -> StoreResult<Vec<String>> {
        Ok(sqlx::query_scalar::<_, String>(
            "SELECT email FROM response WHERE interview_id = $1 AND email IS NOT NULL",
        )
        .bind(interview_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_response(
        &self,
        call_id: &str,
        patch: ResponsePatch,
    ) -> StoreResult<Option<Response>> {
        sqlx::query_as::<_, ResponseRow>(
            r#"
            UPDATE response SET
                details          = COALESCE($2, details),
                analytics        = COALESCE($3, analytics),
                duration         = COALESCE($4, duration),
                is_analysed      = COALESCE($5, is_analysed),
                is_ended         = COALESCE($6, is_ended),
                is_viewed        = COALESCE($7, is_viewed),
                candidate_status = COALESCE($8, candidate_status),
                tab_switch_count = COALESCE($9, tab_switch_count)
            WHERE call_id = $1
            RETURNING *
            "#,
        )
        .bind(call_id)
        .bind(patch.details.map(Json))
        .bind(patch.analytics.map(Json))
        .bind(patch.duration)
        .bind(patch.is_analysed)
        .bind(patch.is_ended)
        .bind(patch.is_viewed)
        .bind(patch.candidate_status.map(|s| s.as_str()))
        .bind(patch.tab_switch_count)
        .fetch_optional(&self.pool)
        .await?
        .map(TryInto::try_into)
        .transpose()
    }

    async fn delete_response(&self, call_id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM response WHERE call_id = $1")
            .bind(call_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_responses_by_org(&self, organization_id: &str) -> StoreResult<i64> {
        Ok(sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM response r
            JOIN interview i ON i.id = r.interview_id
            WHERE i.organization_id = $1
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_organization(&self, id: &str) -> StoreResult<Option<Organization>> {
        sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, name, image_url, plan, allowed_responses_count FROM organization WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(TryInto::try_into)
        .transpose()
    }

    async fn insert_organization(&self, org: Organization) -> StoreResult<Organization> {
        sqlx::query(
            r#"
            INSERT INTO organization (id, name, image_url, plan, allowed_responses_count)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&org.id)
        .bind(&org.name)
        .bind(&org.image_url)
        .bind(org.plan.as_str())
        .bind(org.allowed_responses_count)
        .execute(&self.pool)
        .await?;

        self.get_organization(&org.id)
            .await?
            .ok_or_else(|| StoreError::Corrupt(format!("organization {} vanished", org.id)))
    }

    async fn update_organization(
        &self,
        id: &str,
        patch: OrganizationPatch,
    ) -> StoreResult<Option<Organization>> {
        sqlx::query_as::<_, OrganizationRow>(
            r#"
            UPDATE organization SET
                name                    = COALESCE($2, name),
                image_url               = COALESCE($3, image_url),
                plan                    = COALESCE($4, plan),
                allowed_responses_count = COALESCE($5, allowed_responses_count)
            WHERE id = $1
            RETURNING id, name, image_url, plan, allowed_responses_count
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.image_url)
        .bind(patch.plan.map(|p| p.as_str()))
        .bind(patch.allowed_responses_count)
        .fetch_optional(&self.pool)
        .await?
        .map(TryInto::try_into)
        .transpose()
    }

    async fn create_feedback(&self, new: NewFeedback) -> StoreResult<Feedback> {
        sqlx::query_as::<_, FeedbackRow>(
            r#"
            INSERT INTO feedback (id, interview_id, email, satisfaction, feedback)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.interview_id)
        .bind(&new.email)
        .bind(new.satisfaction.map(|s| u8::from(s) as i16))
        .bind(&new.feedback)
        .fetch_one(&self.pool)
        .await?
        .try_into()
    }
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::calls::handlers as calls;
use crate::documents::handlers as documents;
use crate::feedback::handlers as feedback;
use crate::interviewers::handlers as interviewers;
use crate::interviews::handlers as interviews;
use crate::organizations::handlers as organizations;
use crate::responses::handlers as responses;
use crate::state::AppState;

/// Multipart framing headroom on top of the upload limit.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_mb * 1024 * 1024 + BODY_LIMIT_SLACK;

    Router::new()
        .route("/health", get(health::health_handler))
        // Interviews
        .route(
            "/api/interviews",
            get(interviews::handle_list_interviews).post(interviews::handle_create_interview),
        )
        .route(
            "/api/interviews/:id",
            get(interviews::handle_get_interview)
                .patch(interviews::handle_patch_interview)
                .put(interviews::handle_edit_interview)
                .delete(interviews::handle_delete_interview),
        )
        .route(
            "/api/interviews/:id/share",
            get(interviews::handle_share_interview),
        )
        .route(
            "/api/interviews/:id/responses",
            get(responses::handle_list_responses),
        )
        .route(
            "/api/interviews/:id/summary",
            get(responses::handle_interview_summary),
        )
        .route(
            "/api/wizard/questions",
            post(interviews::handle_edit_questions),
        )
        .route(
            "/api/public/interviews/:key",
            get(interviews::handle_public_interview),
        )
        // Interviewers
        .route(
            "/api/interviewers",
            get(interviewers::handle_list_interviewers)
                .post(interviewers::handle_create_interviewer),
        )
        .route(
            "/api/interviewers/:id",
            get(interviewers::handle_get_interviewer),
        )
        // Responses
        .route(
            "/api/responses/:call_id",
            get(responses::handle_get_response)
                .patch(responses::handle_patch_response)
                .delete(responses::handle_delete_response),
        )
        .route(
            "/api/responses/:call_id/viewed",
            post(responses::handle_mark_viewed),
        )
        .route(
            "/api/responses/:call_id/analytics",
            post(analysis::handle_response_analytics),
        )
        // Organizations
        .route(
            "/api/organizations/:id",
            get(organizations::handle_get_organization)
                .patch(organizations::handle_patch_organization),
        )
        .route(
            "/api/organizations/:id/quota",
            post(organizations::handle_enforce_quota),
        )
        // Feedback
        .route("/api/feedback", post(feedback::handle_submit_feedback))
        // Calls
        .route("/api/calls", post(calls::handle_start_call))
        .route("/api/calls/:call_id/events", post(calls::handle_call_event))
        .route("/api/calls/:call_id/live", get(calls::handle_live_view))
        .route("/api/calls/:call_id/end", post(calls::handle_end_call))
        .route("/api/calls/:call_id/analyze", post(calls::handle_analyze_call))
        // AI analysis
        .route(
            "/api/generate-interview-questions",
            post(analysis::handle_generate_questions),
        )
        .route(
            "/api/generate-insights",
            post(analysis::handle_generate_insights),
        )
        .route(
            "/api/analyze-communication",
            post(analysis::handle_analyze_communication),
        )
        // Documents
        .route(
            "/api/documents/parse",
            post(documents::handle_parse_document),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

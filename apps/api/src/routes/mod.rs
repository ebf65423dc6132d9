pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::admin::handlers as admin;
use crate::analysis::handlers as analysis;
use crate::auth::handlers as auth;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/auth/register", post(auth::handle_register))
        .route("/auth/login", post(auth::handle_login))
        .route("/auth/me", get(auth::handle_me))
        // Analysis
        .route(
            "/analyze",
            post(analysis::handle_analyze).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/history", get(analysis::handle_list_history))
        .route(
            "/history/:id",
            get(analysis::handle_get_history).delete(analysis::handle_delete_history),
        )
        .route(
            "/generate-hr-questions",
            post(analysis::handle_generate_questions),
        )
        // Admin
        .route("/admin/stats", get(admin::handle_stats))
        .route("/admin/users", get(admin::handle_list_users))
        .route(
            "/admin/users/:user_id/resumes",
            get(admin::handle_user_resumes),
        )
        .route("/admin/top-resumes", get(admin::handle_top_resumes))
        .route("/admin/activity", get(admin::handle_activity))
        .route("/admin/analytics", get(admin::handle_analytics))
        .route(
            "/admin/score-distribution",
            get(admin::handle_score_distribution),
        )
        .with_state(state)
}

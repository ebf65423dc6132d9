use sqlx::PgPool;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Owns the AI backend; cheap to clone.
    pub analyzer: ResumeAnalyzer,
}

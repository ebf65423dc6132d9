use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::admin::aggregate::{analytics_report, round1, score_distribution, AnalyticsReport, ScoreBucket};
use crate::admin::queries::{
    fetch_all_results, fetch_daily_activity, fetch_score_buckets, fetch_stats, fetch_top_resumes,
    fetch_user_activity, TopResumeRow,
};
use crate::analysis::history::list_with_results;
use crate::auth::extractor::AdminUser;
use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::models::parse_id;
use crate::state::AppState;

const DEFAULT_TOP_LIMIT: i64 = 5;
const MAX_TOP_LIMIT: i64 = 20;
const DEFAULT_ACTIVITY_DAYS: i64 = 30;
const MAX_ACTIVITY_DAYS: i64 = 365;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_users: i64,
    pub total_resumes: i64,
    pub avg_score: f64,
    pub max_score: i32,
    pub min_score: i32,
}

#[derive(Debug, Serialize)]
pub struct UserOverview {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub resume_count: i64,
    pub last_active: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DailyActivity {
    pub date: String,
    pub count: i64,
    pub avg_score: f64,
}

#[derive(Deserialize)]
pub struct TopResumesQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct ActivityQuery {
    pub days: Option<i64>,
}

/// GET /admin/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<StatsResponse>, AppError> {
    let row = fetch_stats(&state.db).await?;
    Ok(Json(StatsResponse {
        total_users: row.total_users,
        total_resumes: row.total_resumes,
        avg_score: round1(row.avg_score.unwrap_or(0.0)),
        max_score: row.max_score.unwrap_or(0),
        min_score: row.min_score.unwrap_or(0),
    }))
}

/// GET /admin/users
pub async fn handle_list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<UserOverview>>, AppError> {
    let users = fetch_user_activity(&state.db)
        .await?
        .into_iter()
        .map(|row| UserOverview {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            resume_count: row.resume_count,
            // accounts without uploads count as active at sign-up
            last_active: row.last_resume_at.unwrap_or(row.created_at),
            created_at: row.created_at,
        })
        .collect();
    Ok(Json(users))
}

/// GET /admin/users/:user_id/resumes
pub async fn handle_user_resumes(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<AnalysisRow>>, AppError> {
    let user_id = parse_id(&user_id, "User")?;
    Ok(Json(list_with_results(&state.db, user_id).await?))
}

/// GET /admin/top-resumes?limit=5
pub async fn handle_top_resumes(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<TopResumesQuery>,
) -> Result<Json<Vec<TopResumeRow>>, AppError> {
    let limit = bounded("limit", params.limit.unwrap_or(DEFAULT_TOP_LIMIT), MAX_TOP_LIMIT)?;
    Ok(Json(fetch_top_resumes(&state.db, limit).await?))
}

/// GET /admin/activity?days=30
pub async fn handle_activity(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<ActivityQuery>,
) -> Result<Json<Vec<DailyActivity>>, AppError> {
    let days = bounded("days", params.days.unwrap_or(DEFAULT_ACTIVITY_DAYS), MAX_ACTIVITY_DAYS)?;
    let since = Utc::now() - Duration::days(days);

    let activity = fetch_daily_activity(&state.db, since)
        .await?
        .into_iter()
        .map(|row| DailyActivity {
            date: row.date,
            count: row.count,
            avg_score: round1(row.avg_score),
        })
        .collect();
    Ok(Json(activity))
}

/// GET /admin/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<AnalyticsReport>, AppError> {
    let results = fetch_all_results(&state.db).await?;
    Ok(Json(analytics_report(&results)))
}

/// GET /admin/score-distribution
pub async fn handle_score_distribution(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<ScoreBucket>>, AppError> {
    let rows = fetch_score_buckets(&state.db).await?;
    Ok(Json(score_distribution(rows)))
}

/// Accepts `1..=max`.
fn bounded(name: &str, value: i64, max: i64) -> Result<i64, AppError> {
    if (1..=max).contains(&value) {
        Ok(value)
    } else {
        Err(AppError::UnprocessableEntity(format!(
            "'{name}' must be between 1 and {max}, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_accepts_range() {
        assert_eq!(bounded("limit", 1, MAX_TOP_LIMIT).unwrap(), 1);
        assert_eq!(bounded("limit", 20, MAX_TOP_LIMIT).unwrap(), 20);
        assert_eq!(bounded("days", 365, MAX_ACTIVITY_DAYS).unwrap(), 365);
    }

    #[test]
    fn test_bounded_rejects_out_of_range() {
        let err = bounded("limit", 21, MAX_TOP_LIMIT).unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
        assert!(bounded("days", 0, MAX_ACTIVITY_DAYS).is_err());
        assert!(bounded("days", 366, MAX_ACTIVITY_DAYS).is_err());
    }
}

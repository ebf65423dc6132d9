//! Read-only aggregation queries over every user's data.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct StatsRow {
    pub total_users: i64,
    pub total_resumes: i64,
    pub avg_score: Option<f64>,
    pub max_score: Option<i32>,
    pub min_score: Option<i32>,
}

#[derive(Debug, FromRow)]
pub struct UserActivityRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub resume_count: i64,
    pub last_resume_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct TopResumeRow {
    pub id: Uuid,
    pub filename: String,
    pub score: i32,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct DailyActivityRow {
    pub date: String,
    pub count: i64,
    pub avg_score: f64,
}

pub async fn fetch_stats(pool: &PgPool) -> Result<StatsRow, sqlx::Error> {
    sqlx::query_as::<_, StatsRow>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            COUNT(*) AS total_resumes,
            AVG(score)::float8 AS avg_score,
            MAX(score) AS max_score,
            MIN(score) AS min_score
        FROM resume_analyses
        "#,
    )
    .fetch_one(pool)
    .await
}

/// Every user with their analysis count and latest upload, newest account first.
pub async fn fetch_user_activity(pool: &PgPool) -> Result<Vec<UserActivityRow>, sqlx::Error> {
    sqlx::query_as::<_, UserActivityRow>(
        r#"
        SELECT
            u.id, u.name, u.email, u.role, u.created_at,
            COUNT(r.id) AS resume_count,
            MAX(r.created_at) AS last_resume_at
        FROM users u
        LEFT JOIN resume_analyses r ON r.user_id = u.id
        GROUP BY u.id
        ORDER BY u.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_top_resumes(pool: &PgPool, limit: i64) -> Result<Vec<TopResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, TopResumeRow>(
        r#"
        SELECT
            r.id, r.filename, r.score, r.created_at,
            COALESCE(u.name, 'Unknown') AS user_name
        FROM resume_analyses r
        LEFT JOIN users u ON u.id = r.user_id
        ORDER BY r.score DESC, r.created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Uploads per UTC day since `since`, oldest day first.
pub async fn fetch_daily_activity(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<DailyActivityRow>, sqlx::Error> {
    sqlx::query_as::<_, DailyActivityRow>(
        r#"
        SELECT
            to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
            COUNT(*) AS count,
            AVG(score)::float8 AS avg_score
        FROM resume_analyses
        WHERE created_at >= $1
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await
}

/// `(bucket, count)` with bucket = score / 20, capped at 4.
pub async fn fetch_score_buckets(pool: &PgPool) -> Result<Vec<(i32, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (i32, i64)>(
        r#"
        SELECT LEAST(score / 20, 4) AS bucket, COUNT(*) AS count
        FROM resume_analyses
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_all_results(pool: &PgPool) -> Result<Vec<Value>, sqlx::Error> {
    sqlx::query_scalar::<_, Value>("SELECT result FROM resume_analyses ORDER BY created_at")
        .fetch_all(pool)
        .await
}

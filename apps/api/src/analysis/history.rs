//! Analysis history persistence. Every query is scoped to the owning user.

use std::borrow::Cow;

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::analysis::analyzer::AnalysisResult;
use crate::models::analysis::{AnalysisRow, AnalysisSummaryRow};

/// Stored extracted text is cut to this many characters.
pub const MAX_STORED_TEXT_CHARS: usize = 20_000;

pub struct NewAnalysis<'a> {
    pub user_id: Uuid,
    pub filename: &'a str,
    pub result: &'a AnalysisResult,
    pub resume_text: &'a str,
}

pub async fn insert_analysis(pool: &PgPool, analysis: NewAnalysis<'_>) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let result = storable_result(analysis.result);
    let filename = without_nul(analysis.filename);
    let text = without_nul(analysis.resume_text);
    sqlx::query(
        r#"
        INSERT INTO resume_analyses (id, user_id, filename, score, result, resume_text)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(analysis.user_id)
    .bind(&*filename)
    .bind(result.algorithm_score as i32)
    .bind(Json(&result))
    .bind(truncate_chars(&text, MAX_STORED_TEXT_CHARS))
    .execute(pool)
    .await?;
    Ok(id)
}

/// Newest first.
pub async fn list_summaries(pool: &PgPool, user_id: Uuid) -> Result<Vec<AnalysisSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisSummaryRow>(
        r#"
        SELECT id, filename, score, created_at
        FROM resume_analyses
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Newest first, with result bodies.
pub async fn list_with_results(pool: &PgPool, user_id: Uuid) -> Result<Vec<AnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRow>(
        r#"
        SELECT id, filename, score, result, created_at
        FROM resume_analyses
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_for_user(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<AnalysisRow>, sqlx::Error> {
    sqlx::query_as::<_, AnalysisRow>(
        r#"
        SELECT id, filename, score, result, created_at
        FROM resume_analyses
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was deleted.
pub async fn delete_for_user(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM resume_analyses WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Postgres rejects U+0000 in TEXT and in JSONB strings.
fn without_nul(text: &str) -> Cow<'_, str> {
    if text.contains('\0') {
        Cow::Owned(text.replace('\0', ""))
    } else {
        Cow::Borrowed(text)
    }
}

fn storable_result(result: &AnalysisResult) -> AnalysisResult {
    let clean = |items: &[String]| -> Vec<String> {
        items.iter().map(|s| without_nul(s).into_owned()).collect()
    };
    AnalysisResult {
        ai_analysis: without_nul(&result.ai_analysis).into_owned(),
        strengths: clean(&result.strengths),
        weaknesses: clean(&result.weaknesses),
        missing_keywords: clean(&result.missing_keywords),
        suggestions: clean(&result.suggestions),
        hr_questions: clean(&result.hr_questions),
        tips: clean(&result.tips),
        ..result.clone()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

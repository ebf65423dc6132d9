use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::analysis::analyzer::AnalysisResult;
use crate::analysis::history::{
    delete_for_user, find_for_user, insert_analysis, list_summaries, NewAnalysis,
};
use crate::analysis::interview::InterviewQuestion;
use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::analysis::{AnalysisRow, AnalysisSummaryRow};
use crate::models::parse_id;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct InterviewRequest {
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: &'static str,
}

/// POST /analyze (multipart, field `file`)
///
/// The analysis is returned even if saving it to history fails; in that case
/// `history_id` is absent.
pub async fn handle_analyze(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let (filename, bytes) = read_upload(&mut multipart).await?;

    let analysis = state.analyzer.analyze(&bytes).await?;
    let mut result = analysis.result;

    let saved = insert_analysis(
        &state.db,
        NewAnalysis {
            user_id: user.id,
            filename: &filename,
            result: &result,
            resume_text: &analysis.text,
        },
    )
    .await;

    match saved {
        Ok(id) => {
            info!(
                "Saved analysis {id} for user {} ({filename}, score {})",
                user.id, result.algorithm_score
            );
            result.history_id = Some(id);
        }
        Err(e) => error!("Failed to save analysis for user {}: {e}", user.id),
    }

    Ok(Json(result))
}

/// GET /history
pub async fn handle_list_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<AnalysisSummaryRow>>, AppError> {
    Ok(Json(list_summaries(&state.db, user.id).await?))
}

/// GET /history/:id
pub async fn handle_get_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<AnalysisRow>, AppError> {
    let id = parse_id(&id, "Analysis")?;
    find_for_user(&state.db, id, user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))
}

/// DELETE /history/:id
pub async fn handle_delete_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DetailResponse>, AppError> {
    let id = parse_id(&id, "Analysis")?;
    if !delete_for_user(&state.db, id, user.id).await? {
        return Err(AppError::NotFound(format!("Analysis {id} not found")));
    }
    info!("Deleted analysis {id} for user {}", user.id);
    Ok(Json(DetailResponse { detail: "Deleted" }))
}

/// POST /generate-hr-questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(req): Json<InterviewRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    let questions = state
        .analyzer
        .generate_interview_questions(&req.resume_text)
        .await?;
    Ok(Json(InterviewResponse { questions }))
}

/// Reads the `file` field. Other fields are skipped.
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(AppError::Validation(format!(
        "Missing '{UPLOAD_FIELD}' field in upload"
    )))
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored analysis, minus the extracted text.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub filename: String,
    pub score: i32,
    pub result: Value,
    pub created_at: DateTime<Utc>,
}

/// History listing entry. Omits the result body.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisSummaryRow {
    pub id: Uuid,
    pub filename: String,
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

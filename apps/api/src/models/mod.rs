pub mod analysis;
pub mod user;

use uuid::Uuid;

use crate::errors::AppError;

/// Parses an id taken from the URL path. A malformed id cannot name an
/// existing record, so it is reported as not found.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{what} {raw} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_parse_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Analysis").unwrap(), id);
    }

    #[tokio::test]
    async fn test_malformed_id_is_json_not_found() {
        let err = parse_id("not-a-uuid", "Analysis").unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Analysis not-a-uuid not found");
    }
}

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use crate::auth::token::verify_token;
use crate::auth::users::find_by_id;
use crate::errors::AppError;
use crate::models::user::{UserRow, ROLE_ADMIN};
use crate::state::AppState;

/// The authenticated caller. Extracting it requires a valid
/// `Authorization: Bearer <token>` whose subject still exists.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserRow);

/// An authenticated caller with the admin role or an allow-listed email.
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserRow);

pub fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let claims = verify_token(token, state.config.jwt_secret.as_bytes()).map_err(|e| {
            debug!("Rejected bearer token: {e}");
            AppError::Unauthorized
        })?;
        let user = find_by_id(&state.db, claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(AuthUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && !state.config.is_admin_email(&user.email) {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}

use axum::{extract::State, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::auth::password::{hash_password, verify_login};
use crate::auth::token::issue_token;
use crate::auth::users::{find_by_email, insert_user, NewUser};
use crate::errors::AppError;
use crate::models::user::{UserProfile, UserRow, ROLE_ADMIN, ROLE_USER};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// POST /auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let name = req.name.trim();
    let email = normalize_email(&req.email);
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if !is_valid_email(&email) {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if req.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    if find_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    let role = if state.config.is_admin_email(&email) {
        ROLE_ADMIN
    } else {
        ROLE_USER
    };
    let password = req.password;
    let password_hash = off_runtime(move || hash_password(&password))
        .await?
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let user = insert_user(
        &state.db,
        NewUser {
            name,
            email: &email,
            password_hash: &password_hash,
            role,
        },
    )
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::Validation("Email already registered".to_string());
            }
        }
        AppError::Database(e)
    })?;

    info!("Registered user {} with role {}", user.id, user.role);
    Ok(Json(auth_response(&state, &user)?))
}

/// POST /auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = normalize_email(&req.email);
    let user = find_by_email(&state.db, &email).await?;

    let password = req.password;
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let verified = off_runtime(move || verify_login(&password, stored_hash.as_deref())).await?;

    match user {
        Some(user) if verified => Ok(Json(auth_response(&state, &user)?)),
        _ => Err(AppError::Unauthorized),
    }
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn off_runtime<T, F>(work: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password task failed: {e}")))
}

/// GET /auth/me
pub async fn handle_me(AuthUser(user): AuthUser) -> Json<UserProfile> {
    Json(UserProfile::from(&user))
}

fn auth_response(state: &AppState, user: &UserRow) -> Result<AuthResponse, AppError> {
    let token = issue_token(
        user.id,
        state.config.jwt_secret.as_bytes(),
        Duration::minutes(state.config.jwt_expire_minutes),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    Ok(AuthResponse {
        token,
        user: UserProfile::from(user),
    })
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shape check only: one `@`, non-empty local part, dotted domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

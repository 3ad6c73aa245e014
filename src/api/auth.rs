use axum::{
    Json,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::{Expiry, Session};

use super::validation::{validate_email, validate_password, validate_username};
use super::{AccountDto, ApiError, ApiResponse, AppState, MessageResponse};
use crate::db::User;

/// Session key holding the logged-in user's id.
pub const SESSION_USER_KEY: &str = "user_id";

// ============================================================================
// Request Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Deserialize)]
pub struct ResetRequestRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub confirm_password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Gate for routes that require a logged-in session.
pub async fn auth_middleware(
    session: Session,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    if let Ok(Some(user_id)) = session.get::<i32>(SESSION_USER_KEY).await {
        tracing::Span::current().record("user_id", user_id);
        return Ok(next.run(request).await);
    }

    let response = (StatusCode::UNAUTHORIZED, "Unauthorized");
    Ok(response.into_response())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// Create a new account; usernames and emails must be unique.
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    if session_user_id(&session).await.is_ok() {
        return Err(ApiError::Conflict("You are already logged in".to_string()));
    }

    let username = validate_username(&payload.username)?;
    let email = validate_email(&payload.email)?;
    validate_password(&payload.password, &payload.confirm_password)?;

    if state.store().get_user_by_username(username).await?.is_some() {
        return Err(ApiError::validation(
            "That username is already taken. Please choose a different one.",
        ));
    }

    if state.store().get_user_by_email(email).await?.is_some() {
        return Err(ApiError::validation(
            "That email is already taken. Please choose a different one.",
        ));
    }

    let security = state.config().read().await.security.clone();
    state
        .store()
        .create_user(username, email, &payload.password, Some(&security))
        .await?;

    tracing::info!(username = %username, "New account registered");

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Your account has been created! You are now able to log in.",
    ))))
}

/// POST /auth/login
/// Authenticate by email and password; opens a session on success.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .store()
        .verify_user_password(&payload.email, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "Login Unsuccessful. Please check email and password".to_string(),
            )
        })?;

    if let Err(e) = session.insert(SESSION_USER_KEY, user.id).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    if payload.remember {
        let remember_days = state.config().read().await.server.remember_days;
        let expiry = time::OffsetDateTime::now_utc() + time::Duration::days(remember_days);
        session.set_expiry(Some(Expiry::AtDateTime(expiry)));
    }

    Ok(Json(ApiResponse::success(AccountDto::from(user))))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// POST /auth/reset-request
/// Email a signed, time-limited password-reset link.
pub async fn reset_request(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResetRequestRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let email = validate_email(&payload.email)?;

    let user = state
        .store()
        .get_user_by_email(email)
        .await?
        .ok_or_else(|| {
            ApiError::validation("There is no account with that email. You must register first.")
        })?;

    let token = state
        .reset_tokens()
        .generate(user.id)
        .map_err(|e| ApiError::internal(format!("Failed to generate reset token: {e}")))?;

    state.mailer().send_reset_email(&user.email, &token).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "An email has been sent with instructions to reset your password.",
    ))))
}

/// POST /auth/reset-password/{token}
/// Verify the reset token and set a new password.
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let user_id = state
        .reset_tokens()
        .verify(&token)
        .map_err(|_| ApiError::validation("That is an invalid or expired token"))?;

    let user = state
        .store()
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::validation("That is an invalid or expired token"))?;

    validate_password(&payload.password, &payload.confirm_password)?;

    let security = state.config().read().await.security.clone();
    state
        .store()
        .update_user_password(user.id, &payload.password, Some(&security))
        .await?;

    tracing::info!(username = %user.username, "Password reset via emailed token");

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Your password has been updated! You are now able to log in.",
    ))))
}

// ============================================================================
// Helpers
// ============================================================================

/// Get the logged-in user id from the session, or Unauthorized.
pub async fn session_user_id(session: &Session) -> Result<i32, ApiError> {
    session
        .get::<i32>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
}

/// Load the logged-in user, or Unauthorized if the account is gone.
pub async fn current_user(state: &AppState, session: &Session) -> Result<User, ApiError> {
    let user_id = session_user_id(session).await?;

    state
        .store()
        .get_user(user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get user: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))
}

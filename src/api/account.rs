use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::current_user;
use super::validation::{validate_email, validate_username};
use super::{AccountDto, ApiError, ApiResponse, AppState};

#[derive(Deserialize)]
pub struct UpdateAccountRequest {
    pub username: String,
    pub email: String,
}

/// GET /account
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    let user = current_user(&state, &session).await?;
    Ok(Json(ApiResponse::success(AccountDto::from(user))))
}

/// PUT /account
/// Update username and email; uniqueness is re-checked only for values
/// that actually change.
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    let user = current_user(&state, &session).await?;

    let username = validate_username(&payload.username)?;
    let email = validate_email(&payload.email)?;

    if username != user.username && state.store().get_user_by_username(username).await?.is_some() {
        return Err(ApiError::validation(
            "That username is already taken. Please choose a different one.",
        ));
    }

    if email != user.email && state.store().get_user_by_email(email).await?.is_some() {
        return Err(ApiError::validation(
            "That email is already taken. Please choose a different one.",
        ));
    }

    let updated = state
        .store()
        .update_user_profile(user.id, username, email)
        .await?;

    Ok(Json(ApiResponse::success(AccountDto::from(updated))))
}

/// POST /account/picture
/// Multipart upload (field `picture`): the previous picture is removed
/// best-effort, the new one resized and stored under a random name.
pub async fn upload_picture(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<AccountDto>>, ApiError> {
    let user = current_user(&state, &session).await?;

    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart request: {e}")))?
    {
        if field.name() != Some("picture") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read upload: {e}")))?;

        upload = Some((filename, data.to_vec()));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err(ApiError::validation("Missing 'picture' field"));
    };

    if data.is_empty() {
        return Err(ApiError::validation("Uploaded picture is empty"));
    }

    state.image_service().delete_picture(&user.image_file).await;

    let stored = state.image_service().save_picture(data, &filename).await?;

    state.store().update_user_image(user.id, &stored).await?;

    let updated = state
        .store()
        .get_user(user.id)
        .await?
        .ok_or_else(|| ApiError::internal("User vanished during picture update"))?;

    Ok(Json(ApiResponse::success(AccountDto::from(updated))))
}

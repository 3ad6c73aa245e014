use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::session_user_id;
use super::validation::{validate_content, validate_page, validate_title};
use super::{ApiError, ApiResponse, AppState, PageQuery, PostDto, PostPageDto};

#[derive(Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
}

/// GET /posts?page=N
/// Paginated global feed, newest first.
pub async fn feed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PostPageDto>>, ApiError> {
    let page = validate_page(query.page.unwrap_or(1))?;

    let per_page = state.config().read().await.general.posts_per_page;
    let posts = state.store().post_feed_page(page, per_page).await?;

    if posts.total_items > 0 && page > posts.total_pages {
        return Err(ApiError::not_found("Page", page));
    }

    Ok(Json(ApiResponse::success(PostPageDto::from(posts))))
}

/// GET /posts/{id}
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PostDto>>, ApiError> {
    let post = state
        .store()
        .get_post(id)
        .await?
        .ok_or_else(|| ApiError::post_not_found(id))?;

    Ok(Json(ApiResponse::success(PostDto::from(post))))
}

/// POST /posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<PostRequest>,
) -> Result<Json<ApiResponse<PostDto>>, ApiError> {
    let user_id = session_user_id(&session).await?;

    let title = validate_title(&payload.title)?;
    let content = validate_content(&payload.content)?;

    let post = state.store().create_post(user_id, title, content).await?;

    tracing::info!(post_id = post.id, user_id = user_id, "Post created");

    Ok(Json(ApiResponse::success(PostDto::from(post))))
}

/// PUT /posts/{id}
/// Only the owning user may update a post.
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<PostRequest>,
) -> Result<Json<ApiResponse<PostDto>>, ApiError> {
    let user_id = session_user_id(&session).await?;

    let post = state
        .store()
        .get_post(id)
        .await?
        .ok_or_else(|| ApiError::post_not_found(id))?;

    if post.user_id != user_id {
        return Err(ApiError::Forbidden(
            "You can only edit your own posts".to_string(),
        ));
    }

    let title = validate_title(&payload.title)?;
    let content = validate_content(&payload.content)?;

    let updated = state
        .store()
        .update_post(id, title, content)
        .await?
        .ok_or_else(|| ApiError::post_not_found(id))?;

    Ok(Json(ApiResponse::success(PostDto::from(updated))))
}

/// DELETE /posts/{id}
/// Only the owning user may delete a post.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    let user_id = session_user_id(&session).await?;

    let post = state
        .store()
        .get_post(id)
        .await?
        .ok_or_else(|| ApiError::post_not_found(id))?;

    if post.user_id != user_id {
        return Err(ApiError::Forbidden(
            "You can only delete your own posts".to_string(),
        ));
    }

    let deleted = state.store().delete_post(id).await?;
    if deleted {
        tracing::info!(post_id = id, user_id = user_id, "Post deleted");
        Ok(Json(ApiResponse::success(true)))
    } else {
        Err(ApiError::post_not_found(id))
    }
}

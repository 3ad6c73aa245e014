use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::validation::validate_page;
use super::{ApiError, ApiResponse, AppState, PageQuery, PostPageDto, UserDto, UserPostsDto};

/// GET /users
/// All users ordered by username.
pub async fn user_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.store().list_users().await?;
    let dtos: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /users/{username}/posts?page=N
/// One page of a user's posts, newest first.
pub async fn user_posts(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<UserPostsDto>>, ApiError> {
    let page = validate_page(query.page.unwrap_or(1))?;

    let user = state
        .store()
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::user_not_found(&username))?;

    let per_page = state.config().read().await.general.posts_per_page;
    let posts = state
        .store()
        .user_posts_page(user.id, page, per_page)
        .await?;

    if posts.total_items > 0 && page > posts.total_pages {
        return Err(ApiError::not_found("Page", page));
    }

    Ok(Json(ApiResponse::success(UserPostsDto {
        user: UserDto::from(user),
        page: PostPageDto::from(posts),
    })))
}

use serde::{Deserialize, Serialize};

use crate::db::{Post, PostPage, User};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Full account view, only ever returned to the session owner.
#[derive(Debug, Serialize)]
pub struct AccountDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub image_file: String,
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for AccountDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            image_url: media_url(&user.image_file),
            image_file: user.image_file,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// What other visitors see of a user.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub image_url: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            image_url: media_url(&user.image_file),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostDto {
    pub id: i32,
    pub title: String,
    pub date_posted: String,
    pub content: String,
    pub user_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            date_posted: post.date_posted,
            content: post.content,
            user_id: post.user_id,
            author: post.author,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostPageDto {
    pub posts: Vec<PostDto>,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl From<PostPage> for PostPageDto {
    fn from(page: PostPage) -> Self {
        Self {
            posts: page.posts.into_iter().map(PostDto::from).collect(),
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
            total_items: page.total_items,
        }
    }
}

/// Per-user listing: the user together with one page of their posts.
#[derive(Debug, Serialize)]
pub struct UserPostsDto {
    pub user: UserDto,
    #[serde(flatten)]
    pub page: PostPageDto,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

fn media_url(filename: &str) -> String {
    format!("/media/{filename}")
}

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{posts, users};

#[derive(Debug, Clone)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub date_posted: String,
    pub content: String,
    pub user_id: i32,
    /// Username of the owning user, joined in listing queries.
    pub author: Option<String>,
}

impl Post {
    fn from_model(model: posts::Model, author: Option<String>) -> Self {
        Self {
            id: model.id,
            title: model.title,
            date_posted: model.date_posted,
            content: model.content,
            user_id: model.user_id,
            author,
        }
    }
}

/// One page of posts, newest first.
#[derive(Debug)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

pub struct PostRepository {
    conn: DatabaseConnection,
}

impl PostRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, user_id: i32, title: &str, content: &str) -> Result<Post> {
        let active = posts::ActiveModel {
            title: Set(title.to_string()),
            date_posted: Set(chrono::Utc::now().to_rfc3339()),
            content: Set(content.to_string()),
            user_id: Set(user_id),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert post")?;

        Ok(Post::from_model(model, None))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Post>> {
        let row = posts::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.conn)
            .await
            .context("Failed to query post")?;

        Ok(row.map(|(post, user)| Post::from_model(post, user.map(|u| u.username))))
    }

    /// Paginated global feed, newest first. `page` is 1-based.
    pub async fn feed_page(&self, page: u64, per_page: u64) -> Result<PostPage> {
        let select = posts::Entity::find()
            .find_also_related(users::Entity)
            .order_by_desc(posts::Column::DatePosted);

        Self::fetch_page(select.paginate(&self.conn, per_page), page, per_page).await
    }

    /// Paginated posts of one user, newest first. `page` is 1-based.
    pub async fn user_page(&self, user_id: i32, page: u64, per_page: u64) -> Result<PostPage> {
        let select = posts::Entity::find()
            .find_also_related(users::Entity)
            .filter(posts::Column::UserId.eq(user_id))
            .order_by_desc(posts::Column::DatePosted);

        Self::fetch_page(select.paginate(&self.conn, per_page), page, per_page).await
    }

    async fn fetch_page(
        paginator: sea_orm::Paginator<'_, DatabaseConnection, sea_orm::SelectTwoModel<posts::Model, users::Model>>,
        page: u64,
        per_page: u64,
    ) -> Result<PostPage> {
        let totals = paginator
            .num_items_and_pages()
            .await
            .context("Failed to count posts")?;

        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .context("Failed to fetch post page")?;

        Ok(PostPage {
            posts: rows
                .into_iter()
                .map(|(post, user)| Post::from_model(post, user.map(|u| u.username)))
                .collect(),
            page,
            per_page,
            total_pages: totals.number_of_pages,
            total_items: totals.number_of_items,
        })
    }

    pub async fn update(&self, id: i32, title: &str, content: &str) -> Result<Option<Post>> {
        let Some(post) = posts::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query post for update")?
        else {
            return Ok(None);
        };

        let mut active: posts::ActiveModel = post.into();
        active.title = Set(title.to_string());
        active.content = Set(content.to_string());
        let model = active.update(&self.conn).await?;

        Ok(Some(Post::from_model(model, None)))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = posts::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete post")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        let count = posts::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count posts")?;

        Ok(count)
    }
}

use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;

pub mod migrator;
pub mod repositories;

pub use repositories::post::{Post, PostPage};
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn post_repo(&self) -> repositories::post::PostRepository {
        repositories::post::PostRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        security: Option<&SecurityConfig>,
    ) -> Result<User> {
        self.user_repo()
            .create(username, email, password, security)
            .await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list_by_username().await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn update_user_profile(&self, id: i32, username: &str, email: &str) -> Result<User> {
        self.user_repo().update_profile(id, username, email).await
    }

    pub async fn update_user_image(&self, id: i32, image_file: &str) -> Result<String> {
        self.user_repo().update_image(id, image_file).await
    }

    pub async fn update_user_password(
        &self,
        id: i32,
        new_password: &str,
        security: Option<&SecurityConfig>,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, security)
            .await
    }

    // ========================================================================
    // Posts
    // ========================================================================

    pub async fn create_post(&self, user_id: i32, title: &str, content: &str) -> Result<Post> {
        self.post_repo().create(user_id, title, content).await
    }

    pub async fn get_post(&self, id: i32) -> Result<Option<Post>> {
        self.post_repo().get(id).await
    }

    pub async fn post_feed_page(&self, page: u64, per_page: u64) -> Result<PostPage> {
        self.post_repo().feed_page(page, per_page).await
    }

    pub async fn user_posts_page(
        &self,
        user_id: i32,
        page: u64,
        per_page: u64,
    ) -> Result<PostPage> {
        self.post_repo().user_page(user_id, page, per_page).await
    }

    pub async fn update_post(&self, id: i32, title: &str, content: &str) -> Result<Option<Post>> {
        self.post_repo().update(id, title, content).await
    }

    pub async fn delete_post(&self, id: i32) -> Result<bool> {
        self.post_repo().delete(id).await
    }

    pub async fn count_posts(&self) -> Result<u64> {
        self.post_repo().count().await
    }
}

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{ImageService, MailerService, ResetTokenService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub image_service: Arc<ImageService>,

    pub mailer: Arc<MailerService>,

    pub reset_tokens: Arc<ResetTokenService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let image_service = Arc::new(ImageService::new(&config.general.media_path));

        let mailer = Arc::new(MailerService::new(&config.mail, &config.server.public_url)?);

        let reset_tokens = Arc::new(ResetTokenService::new(
            &config.security.secret_key,
            config.security.reset_token_max_age_seconds,
        ));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            image_service,
            mailer,
            reset_tokens,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}

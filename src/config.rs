use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub mail: MailConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Directory for profile pictures, served under /media.
    pub media_path: String,

    /// Posts per page for all paginated listings.
    pub posts_per_page: u64,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/burogu.db".to_string(),
            log_level: "info".to_string(),
            media_path: "media".to_string(),
            posts_per_page: crate::constants::pagination::DEFAULT_PER_PAGE,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Whether to set the Secure flag on session cookies.
    /// Default: true for production safety. Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Session inactivity expiry in minutes.
    pub session_minutes: i64,

    /// Absolute session lifetime in days when "remember me" is requested at login.
    pub remember_days: i64,

    /// Base URL used when building password-reset links.
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            cors_allowed_origins: vec![
                "http://localhost:5000".to_string(),
                "http://127.0.0.1:5000".to_string(),
            ],
            secure_cookies: true,
            session_minutes: 60,
            remember_days: 14,
            public_url: "http://localhost:5000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// When disabled, reset links are logged instead of emailed.
    pub enabled: bool,

    pub smtp_host: String,

    pub smtp_port: u16,

    /// SMTP username; the MAIL_USERNAME environment variable takes precedence.
    pub username: String,

    /// SMTP password; the MAIL_PASSWORD environment variable takes precedence.
    pub password: String,

    pub from_address: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_address: "no-reply@burogu.local".to_string(),
        }
    }
}

impl MailConfig {
    /// Credentials are usually kept out of the config file.
    fn apply_env(&mut self) {
        if let Ok(username) = std::env::var("MAIL_USERNAME") {
            self.username = username;
        }
        if let Ok(password) = std::env::var("MAIL_PASSWORD") {
            self.password = password;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Secret for signing password-reset tokens. Override in production.
    pub secret_key: String,

    /// Reset tokens expire this many seconds after issue.
    pub reset_token_max_age_seconds: i64,

    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    /// Lower values reduce memory usage but decrease GPU resistance.
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations) - higher = more CPU work
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: "change-me-in-production".to_string(),
            reset_token_max_age_seconds: 1800,
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            mail: MailConfig::default(),
            security: SecurityConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        let mut config = Self::default();
        config.mail.apply_env();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.mail.apply_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_config_path();
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("burogu").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".burogu").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.secret_key.is_empty() {
            anyhow::bail!("Secret key cannot be empty");
        }

        if self.security.secret_key == SecurityConfig::default().secret_key {
            tracing::warn!("Using the default secret key. Set [security] secret_key for production use.");
        }

        if self.general.posts_per_page == 0
            || self.general.posts_per_page > crate::constants::pagination::MAX_PER_PAGE
        {
            anyhow::bail!(
                "posts_per_page must be between 1 and {}",
                crate::constants::pagination::MAX_PER_PAGE
            );
        }

        if self.security.reset_token_max_age_seconds <= 0 {
            anyhow::bail!("Reset token max age must be > 0 seconds");
        }

        if self.mail.enabled && self.mail.smtp_host.is_empty() {
            anyhow::bail!("SMTP host cannot be empty when mail is enabled");
        }

        Ok(())
    }
}

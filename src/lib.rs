pub mod api;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
pub use config::Config;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    config.validate()?;

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("serve" | "-s" | "--serve") => serve(config, prometheus_handle).await,

        Some("init" | "--init") => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }

        Some("help" | "-h" | "--help") => {
            print_help();
            Ok(())
        }

        Some(other) => {
            println!("Unknown command: {}", other);
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Burogu - Personal Blog Server");
    println!("Registration, sessions, posts and password reset over SQLite");
    println!();
    println!("USAGE:");
    println!("  burogu [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("  serve             Run the web server (default)");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the database, mail server, etc.");
    println!("  MAIL_USERNAME / MAIL_PASSWORD environment variables override");
    println!("  the [mail] credentials (a .env file is honored).");
}

async fn serve(
    config: Config,
    prometheus_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> anyhow::Result<()> {
    info!("Burogu v{} starting...", env!("CARGO_PKG_VERSION"));

    let port = config.server.port;

    let shared = Arc::new(SharedState::new(config).await?);
    let state = api::create_app_state(shared, prometheus_handle).await?;
    let app = api::router(state).await?;

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Web Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Error listening for shutdown: {}", e),
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

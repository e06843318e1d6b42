use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use certily_api::cli::{Cli, Commands};
use certily_api::config::{config, AppConfig};
use certily_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SUPABASE_URL, SUPABASE_ANON_KEY, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = cli.apply(config().clone());

    let default_filter = if config.api.enable_request_logging {
        "certily_api=debug,tower_http=debug"
    } else {
        "certily_api=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    tracing::info!("Starting Certily API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        if certily_api::is_production!() {
            anyhow::bail!("SUPABASE_JWT_SECRET must be set in production");
        }
        tracing::warn!("SUPABASE_JWT_SECRET is not set; every request is treated as anonymous");
    }

    match cli.command() {
        Commands::Serve => serve(config).await,
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Check => {
            let state = AppState::from_config(config).context("invalid backend configuration")?;
            state.backend.health().await.context("backend unreachable")?;
            println!("backend ok");
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", config.api.bind_host, config.api.port);
    let state = AppState::from_config(config).context("invalid backend configuration")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Certily API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

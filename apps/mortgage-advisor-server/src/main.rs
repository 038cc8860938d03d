//! Mortgage Advisor API server

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{CheckHealthArgs, Cli, Command, ServeArgs};
use mortgage_advisor::{Config, MortgageAdvisorModule};
use std::net::SocketAddr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or_default() {
        Command::Serve(args) => serve(config, args).await,
        Command::Migrate => migrate(config).await,
        Command::CheckHealth(args) => check_health(&config, &args).await,
    }
}

async fn serve(mut config: Config, args: ServeArgs) -> Result<()> {
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    logging::init_logging(&config)?;
    tracing::info!(
        app = %config.app_name,
        version = %config.app_version,
        debug = config.debug,
        "Starting mortgage advisor API"
    );
    tracing::debug!(?config, "Loaded configuration");

    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; /chat will return an error until it is configured");
    }

    let addr = config.bind_address();
    let module = MortgageAdvisorModule::init(config).await?;
    let router = module.router();

    let cancel = CancellationToken::new();
    let maintenance = module.spawn_maintenance(cancel.clone());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "Listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    cancel.cancel();
    if let Err(e) = maintenance.await {
        tracing::warn!(error = %e, "Maintenance task ended abnormally");
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn migrate(config: Config) -> Result<()> {
    logging::init_logging(&config)?;
    let db = MortgageAdvisorModule::connect(&config).await?;
    MortgageAdvisorModule::migrate(&db).await?;
    Ok(())
}

/// Exit status tells a container health probe whether the API is up
async fn check_health(config: &Config, args: &CheckHealthArgs) -> Result<()> {
    let url = args
        .url
        .clone()
        .unwrap_or_else(|| format!("http://127.0.0.1:{}/health", config.port));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("health check request to {} failed", url))?;

    if !response.status().is_success() {
        bail!("{} returned {}", url, response.status());
    }
    println!("healthy");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

//! Module wiring and lifecycle

use crate::api::native::NativeClient;
use crate::api::rest::{handlers::ApiInfo, rate_limit::RateLimiter, register_routes};
use crate::config::Config;
use crate::contract::MortgageAdvisorApi;
use crate::domain::{CompletionModel, Service};
use crate::infra::llm::OpenAiClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{
    SeaOrmConversationRepository, SeaOrmMessageRepository, SeaOrmUserInputRepository,
};
use anyhow::{Context, Result};
use axum::Router;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(60);
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Mortgage advisor module
pub struct MortgageAdvisorModule {
    config: Config,
    service: Arc<Service>,
    limiter: Option<Arc<RateLimiter>>,
}

impl MortgageAdvisorModule {
    /// Connect to the database, run migrations and build the service
    pub async fn init(config: Config) -> Result<Self> {
        let db = Self::connect(&config).await?;
        Self::migrate(&db).await?;

        let model: Option<Arc<dyn CompletionModel>> = match config.openai_client_config() {
            Some(llm) => Some(Arc::new(OpenAiClient::new(llm)?)),
            None => {
                tracing::warn!("OPENAI_API_KEY not set, chat requests will be rejected");
                None
            }
        };

        Ok(Self::with_model(config, Arc::new(db), model))
    }

    /// Build the module on an existing connection with the given model
    pub fn with_model(
        config: Config,
        db: Arc<DatabaseConnection>,
        model: Option<Arc<dyn CompletionModel>>,
    ) -> Self {
        let service = Arc::new(Service::new(
            Arc::new(SeaOrmConversationRepository::new(db.clone())),
            Arc::new(SeaOrmMessageRepository::new(db.clone())),
            Arc::new(SeaOrmUserInputRepository::new(db)),
            model,
            config.max_message_length,
        ));

        let limiter = config.enable_rate_limiting.then(|| {
            Arc::new(RateLimiter::per_minute(
                config.max_requests_per_minute,
                config.rate_limit_by_ip,
            ))
        });

        tracing::info!(
            app = %config.app_name,
            rate_limit = limiter.as_ref().map(|l| l.max_requests()),
            "Mortgage advisor initialized"
        );

        Self {
            config,
            service,
            limiter,
        }
    }

    pub async fn connect(config: &Config) -> Result<DatabaseConnection> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.database_max_connections)
            .sqlx_logging(false);
        if config.database_url.contains(":memory:") {
            // The in-memory database lives only as long as its connection
            options.max_connections(1).min_connections(1);
        }

        Database::connect(options)
            .await
            .with_context(|| format!("failed to connect to {}", config.database_url))
    }

    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None).await?;
        tracing::info!("Mortgage advisor migrations completed");
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client
    pub fn client(&self) -> Arc<dyn MortgageAdvisorApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    /// REST router with tracing, CORS and body limits applied
    pub fn router(&self) -> Router {
        let info = ApiInfo {
            app_name: self.config.app_name.clone(),
            app_version: self.config.app_version.clone(),
        };

        register_routes(Router::new(), self.service.clone(), info, self.limiter.clone())
            .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http())
    }

    /// Periodic stale-conversation sweep and rate limiter cleanup
    pub fn spawn_maintenance(&self, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
        let service = self.service.clone();
        let limiter = self.limiter.clone();
        let abandon_after = Some(self.config.abandon_after_minutes)
            .filter(|minutes| *minutes > 0)
            .and_then(|minutes| i64::try_from(minutes).ok())
            .and_then(chrono::Duration::try_minutes);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(MAINTENANCE_INTERVAL);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {}
                }

                if let Some(older_than) = abandon_after {
                    // Errors are logged by the service
                    let _ = service.abandon_stale_conversations(older_than).await;
                }
                if let Some(limiter) = &limiter {
                    let removed = limiter.cleanup_expired();
                    if removed > 0 {
                        tracing::debug!(removed, "Expired rate limit windows dropped");
                    }
                }
            }
            tracing::debug!("Maintenance task stopped");
        })
    }
}

//! Tracing subscriber setup

use anyhow::Result;
use mortgage_advisor::config::{Config, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise the configured level for our crates and
/// tower_http, with sqlx kept at warn
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    Ok(EnvFilter::try_new(format!(
        "{level},mortgage_advisor={level},mortgage_advisor_server={level},tower_http={level},sqlx=warn,sea_orm=warn"
    ))?)
}

pub fn init_logging(config: &Config) -> Result<()> {
    let filter = build_filter(config.effective_log_level())?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init()?,
        LogFormat::Console => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_builds_a_filter() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = build_filter("debug").unwrap();
        assert!(filter.to_string().contains("tower_http=debug"));
    }
}

//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{Error, Result};

/// Install the JSON subscriber filtered by `service.log_level`
///
/// An invalid filter directive falls back to `info`. Fails when a global
/// subscriber is already installed.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter =
        EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::Internal(format!("failed to install tracing subscriber: {e}")))?;

    tracing::info!(service = %config.service.name, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        let mut config = Config::default();
        config.service.log_level = "not a [valid filter".into();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}

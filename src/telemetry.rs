use crate::config::DispatchConfig;
use crate::error::{DispatchError, Result};
use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber filtered by `config.log_filter`.
///
/// `RUST_LOG`, when set, takes precedence over the configured filter.
///
/// # Errors
///
/// Returns `DispatchError::TelemetryError` if the filter does not parse or a
/// global subscriber is already installed.
pub fn init_tracing(config: &DispatchConfig) -> Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.trim().is_empty() => EnvFilter::try_new(from_env),
        _ => EnvFilter::try_new(&config.log_filter),
    }
    .map_err(|e| DispatchError::TelemetryError(format!("Invalid log filter: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| DispatchError::TelemetryError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_is_an_error_not_a_panic() {
        let config = DispatchConfig::default();
        let _ = init_tracing(&config);
        let second = init_tracing(&config);

        assert!(matches!(second, Err(DispatchError::TelemetryError(_))));
    }
}

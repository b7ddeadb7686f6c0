//! Command implementations.

pub mod connection;
pub mod migrate;
pub mod settings;
pub mod snippet;
pub mod storefront;
pub mod sync;

use shown_connector::{ConnectorConfig, ConnectorState};

/// Load configuration from the environment and connect to the database.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the database is
/// unreachable.
pub async fn load_state() -> Result<ConnectorState, Box<dyn std::error::Error>> {
    let config = ConnectorConfig::from_env()?;
    tracing::debug!(site = %config.site.url, shown = %config.shown.base_url, "Loaded configuration");
    Ok(ConnectorState::connect(config).await?)
}

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(output: &str) {
    println!("{output}");
}

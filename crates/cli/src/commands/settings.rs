//! Settings commands.

use shown_connector::ConnectorState;
use tracing::info;

/// Store the customer sync settings.
///
/// # Errors
///
/// Returns an error if the option store cannot be written.
pub async fn customers(
    state: &ConnectorState,
    sync_on_create: bool,
    sync_all: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    state
        .orchestrator()
        .save_customer_settings(sync_on_create, sync_all)
        .await?;
    Ok(())
}

/// Store the product sync settings.
///
/// # Errors
///
/// Returns an error if the option store cannot be written.
pub async fn products(
    state: &ConnectorState,
    sync_on_create: bool,
    sync_all: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    state
        .orchestrator()
        .save_product_settings(sync_on_create, sync_all)
        .await?;
    Ok(())
}

/// Turn site-ownership verification on or off.
///
/// # Errors
///
/// Returns an error if the option store cannot be accessed.
pub async fn verification(
    state: &ConnectorState,
    enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let stored = state
        .orchestrator()
        .save_verification_settings(enabled)
        .await?;
    info!(enabled, tags = stored, "Saved verification settings");
    Ok(())
}

//! Tracking snippet commands.

use shown_connector::ConnectorState;
use shown_connector_core::BusinessId;
use tracing::{info, warn};

/// Install the snippet of a business.
///
/// # Errors
///
/// Returns an error if the option store cannot be accessed.
pub async fn install(
    state: &ConnectorState,
    business_id: String,
) -> Result<(), Box<dyn std::error::Error>> {
    match state
        .orchestrator()
        .install_snippet(BusinessId::new(business_id))
        .await?
    {
        Some(url) => info!(%url, "Tracking snippet installed"),
        None => warn!("Shown returned no snippet; nothing changed"),
    }
    Ok(())
}

/// Stop rendering the snippet.
///
/// # Errors
///
/// Returns an error if the option store cannot be written.
pub async fn remove(state: &ConnectorState) -> Result<(), Box<dyn std::error::Error>> {
    state.orchestrator().remove_snippet().await?;
    info!("Tracking snippet removed");
    Ok(())
}

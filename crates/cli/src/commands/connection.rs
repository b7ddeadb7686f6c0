//! Connection commands.

use shown_connector::ConnectorState;
use shown_connector::sync::ConnectionOverview;
use tracing::{info, warn};

use super::emit;

/// Store the credentials the Shown login redirect delivered.
///
/// # Errors
///
/// Returns an error if the option store cannot be written.
pub async fn connect(
    state: &ConnectorState,
    access_token: Option<&str>,
    business_id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if access_token.is_none() && business_id.is_none() {
        emit(&state.orchestrator().connect_url());
        info!("Open the URL above to authorize this site");
        return Ok(());
    }

    let snippet = state
        .orchestrator()
        .handle_connect_callback(access_token, business_id)
        .await?;
    match snippet {
        Some(url) => info!(%url, "Tracking snippet installed"),
        None => warn!("Connected without a tracking snippet"),
    }
    Ok(())
}

/// Forget the connection and every sync setting.
///
/// # Errors
///
/// Returns an error if the option store cannot be written.
pub async fn disconnect(state: &ConnectorState) -> Result<(), Box<dyn std::error::Error>> {
    state.orchestrator().disconnect().await?;
    Ok(())
}

/// Print the admin overview as JSON.
///
/// # Errors
///
/// Returns an error if the option store cannot be read.
pub async fn status(state: &ConnectorState) -> Result<(), Box<dyn std::error::Error>> {
    let overview = state.orchestrator().overview().await?;
    if let ConnectionOverview::Connected {
        businesses: Err(message),
        ..
    } = &overview
    {
        warn!("{message}");
    }
    emit(&serde_json::to_string_pretty(&overview)?);
    Ok(())
}

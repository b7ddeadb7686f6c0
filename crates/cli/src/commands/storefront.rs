//! Storefront markup command.

use shown_connector::ConnectorState;

use super::emit;

/// Print the `<head>` markup the storefront should include.
///
/// # Errors
///
/// Returns an error if options cannot be read or the template fails.
pub async fn render_head(state: &ConnectorState) -> Result<(), Box<dyn std::error::Error>> {
    let html = shown_connector::storefront::render_head(state.options()).await?;
    emit(html.trim());
    Ok(())
}

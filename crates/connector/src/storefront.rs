//! Markup for the storefront `<head>`.

use askama::Template;
use shown_connector_core::{OptionKey, VerificationTag};

use crate::error::ConnectorError;
use crate::options::{OptionStore, load_verification_tags};

/// The Shown pixel and, when enabled, the site-ownership meta tags.
#[derive(Debug, Clone, Default, Template)]
#[template(path = "head.html")]
pub struct HeadMarkup {
    pub snippet_url: Option<String>,
    pub tags: Vec<VerificationTag>,
}

impl HeadMarkup {
    /// Build the markup from stored options.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` if the store cannot be read.
    pub async fn load(options: &impl OptionStore) -> Result<Self, crate::options::OptionsError> {
        let snippet_url = options.get_string(OptionKey::SnippetUrl).await?;
        let tags = if options
            .get_bool(OptionKey::EnableWebsiteOwnershipVerification)
            .await?
        {
            load_verification_tags(options).await?
        } else {
            Vec::new()
        };

        Ok(Self { snippet_url, tags })
    }
}

/// Render the storefront head markup from stored options.
///
/// Empty when not connected and verification is off.
///
/// # Errors
///
/// Returns `ConnectorError` if options cannot be read or the template fails.
pub async fn render_head(options: &impl OptionStore) -> Result<String, ConnectorError> {
    Ok(HeadMarkup::load(options).await?.render()?)
}

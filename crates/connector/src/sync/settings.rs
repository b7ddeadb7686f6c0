//! Settings submitted from the admin page.

use shown_connector_core::{OptionKey, SyncKind};
use tracing::{info, instrument};

use super::SyncOrchestrator;
use crate::options::{OptionStore, OptionsError};
use crate::store::CommerceStore;

impl<O, S> SyncOrchestrator<O, S>
where
    O: OptionStore + 'static,
    S: CommerceStore + 'static,
{
    /// Store the customer sync settings.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` if the store cannot be written.
    pub async fn save_customer_settings(
        &self,
        sync_on_create: bool,
        sync_all: bool,
    ) -> Result<(), OptionsError> {
        self.save_sync_settings(SyncKind::Customers, sync_on_create, sync_all)
            .await
    }

    /// Store the product sync settings.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` if the store cannot be written.
    pub async fn save_product_settings(
        &self,
        sync_on_create: bool,
        sync_all: bool,
    ) -> Result<(), OptionsError> {
        self.save_sync_settings(SyncKind::Products, sync_on_create, sync_all)
            .await
    }

    #[instrument(skip(self))]
    async fn save_sync_settings(
        &self,
        kind: SyncKind,
        sync_on_create: bool,
        sync_all: bool,
    ) -> Result<(), OptionsError> {
        self.options
            .set_bool(OptionKey::sync_on_create(kind), sync_on_create)
            .await?;
        self.options
            .set_bool(OptionKey::sync_all(kind), sync_all)
            .await?;
        info!(%kind, sync_on_create, sync_all, "Saved sync settings");
        Ok(())
    }

    /// Turn site-ownership verification on or off.
    ///
    /// When turned on while connected, the tags for this site are fetched
    /// and stored if Shown returns any. Returns the number stored.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` if the store cannot be accessed.
    #[instrument(skip(self))]
    pub async fn save_verification_settings(&self, enabled: bool) -> Result<usize, OptionsError> {
        self.options
            .set_bool(OptionKey::EnableWebsiteOwnershipVerification, enabled)
            .await?;
        if !enabled {
            return Ok(0);
        }

        let credentials = self.credentials().await?;
        let Some(tags) = self
            .client
            .fetch_verification_tags(credentials.as_ref(), &self.site.url)
            .await
        else {
            return Ok(0);
        };

        self.options
            .set(
                OptionKey::WebsiteOwnershipVerificationTags,
                serde_json::to_value(&tags)?,
            )
            .await?;
        info!(count = tags.len(), "Stored verification tags");
        Ok(tags.len())
    }
}

//! Connecting to and disconnecting from Shown.

use shown_connector_core::{BusinessId, Credentials, OptionKey};
use tracing::{info, instrument, warn};

use super::SyncOrchestrator;
use crate::error::ConnectorError;
use crate::options::{OptionStore, OptionsError};
use crate::store::CommerceStore;

impl<O, S> SyncOrchestrator<O, S>
where
    O: OptionStore + 'static,
    S: CommerceStore + 'static,
{
    /// Where to send the operator to authorize this site.
    ///
    /// Shown redirects back to the admin page with `access_token` and
    /// `business_id` query parameters.
    #[must_use]
    pub fn connect_url(&self) -> String {
        format!(
            "{}?bearer_flow_url={}",
            self.shown.login_url(),
            urlencoding::encode(&self.site.admin_url)
        )
    }

    /// Persist what the connect redirect delivered.
    ///
    /// Each present value is stored on its own. Once both are known the
    /// tracking snippet is fetched and stored too; its URL is returned.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` if the store cannot be written.
    #[instrument(skip(self, access_token))]
    pub async fn handle_connect_callback(
        &self,
        access_token: Option<&str>,
        business_id: Option<&str>,
    ) -> Result<Option<String>, OptionsError> {
        let access_token = access_token.filter(|t| !t.is_empty());
        let business_id = business_id.filter(|b| !b.is_empty());

        if let Some(token) = access_token {
            self.options.set_string(OptionKey::AccessToken, token).await?;
        }
        if let Some(business_id) = business_id {
            self.options
                .set_string(OptionKey::BusinessId, business_id)
                .await?;
        }

        let Some(credentials) = Credentials::from_parts(
            access_token.map(str::to_owned),
            business_id.map(str::to_owned),
        ) else {
            return Ok(None);
        };

        info!(business_id = %credentials.business_id(), "Connected to Shown");
        self.store_snippet(&credentials).await
    }

    /// Forget the connection and every derived setting, including the cached
    /// customer export. Safe to repeat.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` if a key cannot be deleted. Keys deleted
    /// before the failure stay deleted.
    #[instrument(skip(self))]
    pub async fn disconnect(&self) -> Result<(), OptionsError> {
        for key in OptionKey::ALL {
            self.options.delete(key).await?;
        }
        self.reader.invalidate_customers().await;
        info!("Disconnected from Shown");
        Ok(())
    }

    /// Switch the tracking snippet to another business of the account.
    ///
    /// On success the business becomes the active one. Returns `None` when
    /// not connected or when Shown has no snippet for it.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Options` if the store cannot be accessed.
    #[instrument(skip(self))]
    pub async fn install_snippet(
        &self,
        business_id: BusinessId,
    ) -> Result<Option<String>, ConnectorError> {
        let Some(credentials) = self.credentials().await? else {
            warn!("Cannot install snippet while disconnected");
            return Ok(None);
        };
        let credentials = credentials.with_business(business_id);

        let snippet = self.store_snippet(&credentials).await?;
        if snippet.is_some() {
            self.options
                .set_string(OptionKey::BusinessId, credentials.business_id().as_str())
                .await?;
        }
        Ok(snippet)
    }

    /// Stop rendering the tracking snippet.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` if the key cannot be deleted.
    pub async fn remove_snippet(&self) -> Result<(), OptionsError> {
        self.options.delete(OptionKey::SnippetUrl).await
    }

    async fn store_snippet(&self, credentials: &Credentials) -> Result<Option<String>, OptionsError> {
        let snippet = self.client.fetch_snippet(Some(credentials)).await;
        match &snippet {
            Some(url) => {
                self.options
                    .set_string(OptionKey::SnippetUrl, url.as_str())
                    .await?;
            }
            None => warn!(business_id = %credentials.business_id(), "No tracking snippet available"),
        }
        Ok(snippet)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use shown_connector_core::ListId;

    use crate::options::OptionStore;
    use crate::store::InMemoryStore;
    use crate::sync::tests::{connect, orchestrator};
    use crate::test_support::MockServer;

    use super::*;

    fn snippet_server() -> impl Fn(&axum::http::Method, &str) -> (StatusCode, String) + Send + Sync {
        |_, path| {
            if path == "/api/business/snippet" {
                (StatusCode::OK, r#"{"url":"https://px.shown.io/s.js"}"#.to_owned())
            } else {
                (StatusCode::NOT_FOUND, String::new())
            }
        }
    }

    #[tokio::test]
    async fn test_connect_url() {
        let server = MockServer::start(snippet_server()).await;
        let orchestrator = orchestrator(&server, InMemoryStore::new());

        assert_eq!(
            orchestrator.connect_url(),
            format!(
                "{}/login/wordpress/external?bearer_flow_url=https%3A%2F%2Fshop.example%2Fwp-admin%2Fadmin.php%3Fpage%3Dshown-connector",
                server.base_url
            )
        );
    }

    #[tokio::test]
    async fn test_callback_stores_credentials_and_snippet() {
        let server = MockServer::start(snippet_server()).await;
        let orchestrator = orchestrator(&server, InMemoryStore::new());

        let snippet = orchestrator
            .handle_connect_callback(Some("tok"), Some("biz-1"))
            .await
            .unwrap();
        assert_eq!(snippet.as_deref(), Some("https://px.shown.io/s.js"));

        let credentials = orchestrator.credentials().await.unwrap().unwrap();
        assert_eq!(credentials.business_id().as_str(), "biz-1");
        assert_eq!(
            orchestrator
                .options()
                .get_string(OptionKey::SnippetUrl)
                .await
                .unwrap()
                .as_deref(),
            Some("https://px.shown.io/s.js")
        );

        let request = &server.requests_to("/api/business/snippet")[0];
        assert_eq!(request.header("business-id"), Some("biz-1"));
    }

    #[tokio::test]
    async fn test_disconnect_drops_cached_customers() {
        let server = MockServer::start(snippet_server()).await;
        let orchestrator = orchestrator(
            &server,
            InMemoryStore::new().with_order(crate::sync::tests::order(1, "a@x.com")),
        );

        assert_eq!(orchestrator.reader().read_all_customers().await.unwrap().len(), 1);
        orchestrator
            .reader()
            .store()
            .add_order(crate::sync::tests::order(2, "b@x.com"))
            .await;
        assert_eq!(orchestrator.reader().read_all_customers().await.unwrap().len(), 1);

        orchestrator.disconnect().await.unwrap();
        let customers = orchestrator.reader().read_all_customers().await.unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].email, "b@x.com");
    }

    #[tokio::test]
    async fn test_partial_callback_does_not_fetch_snippet() {
        let server = MockServer::start(snippet_server()).await;
        let orchestrator = orchestrator(&server, InMemoryStore::new());

        let snippet = orchestrator
            .handle_connect_callback(Some("tok"), None)
            .await
            .unwrap();
        assert!(snippet.is_none());
        assert!(server.requests().is_empty());
        assert!(orchestrator.credentials().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let server = MockServer::start(snippet_server()).await;
        let orchestrator = orchestrator(&server, InMemoryStore::new());
        connect(&orchestrator).await;
        let options = orchestrator.options();
        options.set_bool(OptionKey::HasImportedAllCustomers, true).await.unwrap();
        options
            .set(OptionKey::ProductListId, json!(ListId::new("lst_p")))
            .await
            .unwrap();
        options
            .set(OptionKey::WebsiteOwnershipVerificationTags, json!([]))
            .await
            .unwrap();

        orchestrator.disconnect().await.unwrap();
        assert!(options.is_empty().await);

        orchestrator.disconnect().await.unwrap();
        assert!(options.is_empty().await);
        assert!(orchestrator.credentials().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_install_snippet_switches_business() {
        let server = MockServer::start(snippet_server()).await;
        let orchestrator = orchestrator(&server, InMemoryStore::new());
        connect(&orchestrator).await;

        let snippet = orchestrator
            .install_snippet(BusinessId::new("other"))
            .await
            .unwrap();
        assert!(snippet.is_some());

        let request = &server.requests_to("/api/business/snippet")[0];
        assert_eq!(request.header("business-id"), Some("other"));
        let credentials = orchestrator.credentials().await.unwrap().unwrap();
        assert_eq!(credentials.business_id().as_str(), "other");

        orchestrator.remove_snippet().await.unwrap();
        assert!(
            orchestrator
                .options()
                .get(OptionKey::SnippetUrl)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_install_snippet_failure_keeps_business() {
        let server = MockServer::start(|_, _| (StatusCode::FORBIDDEN, String::new())).await;
        let orchestrator = orchestrator(&server, InMemoryStore::new());
        connect(&orchestrator).await;

        let snippet = orchestrator
            .install_snippet(BusinessId::new("other"))
            .await
            .unwrap();
        assert!(snippet.is_none());
        let credentials = orchestrator.credentials().await.unwrap().unwrap();
        assert_eq!(credentials.business_id().as_str(), "biz");
    }
}

//! Admin page state.

use serde::Serialize;
use shown_connector_core::{Business, BusinessId, ListId, OptionKey, SyncKind, VerificationTag};

use super::SyncOrchestrator;
use crate::error::ConnectorError;
use crate::options::{OptionStore, OptionsError, load_verification_tags};
use crate::store::CommerceStore;

/// Sync settings and progress of one kind, as the admin page shows them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindOverview {
    pub kind: SyncKind,
    pub list_name: String,
    pub sync_on_create: bool,
    pub sync_all: bool,
    pub has_imported_all: bool,
    pub list_id: Option<ListId>,
}

/// Everything the admin page needs to render.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConnectionOverview {
    Disconnected {
        connect_url: String,
    },
    Connected {
        business_id: BusinessId,
        snippet_url: Option<String>,
        verification_enabled: bool,
        verification_tags: Vec<VerificationTag>,
        customers: KindOverview,
        products: KindOverview,
        /// Businesses of the account, or the message to show instead.
        #[serde(serialize_with = "serialize_businesses")]
        businesses: Result<Vec<Business>, String>,
    },
}

impl ConnectionOverview {
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

fn serialize_businesses<Ser: serde::Serializer>(
    businesses: &Result<Vec<Business>, String>,
    serializer: Ser,
) -> Result<Ser::Ok, Ser::Error> {
    #[derive(Serialize)]
    #[serde(rename_all = "snake_case")]
    enum Listing<'a> {
        Businesses(&'a [Business]),
        Error(&'a str),
    }

    match businesses {
        Ok(list) => Listing::Businesses(list).serialize(serializer),
        Err(message) => Listing::Error(message).serialize(serializer),
    }
}

impl<O, S> SyncOrchestrator<O, S>
where
    O: OptionStore + 'static,
    S: CommerceStore + 'static,
{
    /// Gather the admin page state.
    ///
    /// A failure to list businesses does not fail the page; it is reported
    /// in place of the list as `Error (<code>): <message>`.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` if the store cannot be read.
    pub async fn overview(&self) -> Result<ConnectionOverview, OptionsError> {
        let Some(credentials) = self.credentials().await? else {
            return Ok(ConnectionOverview::Disconnected {
                connect_url: self.connect_url(),
            });
        };

        let businesses = self
            .client
            .list_businesses(&credentials)
            .await
            .map_err(|e| ConnectorError::from(e).display_message());

        Ok(ConnectionOverview::Connected {
            business_id: credentials.business_id().clone(),
            snippet_url: self.options.get_string(OptionKey::SnippetUrl).await?,
            verification_enabled: self
                .options
                .get_bool(OptionKey::EnableWebsiteOwnershipVerification)
                .await?,
            verification_tags: load_verification_tags(self.options.as_ref()).await?,
            customers: self.kind_overview(SyncKind::Customers).await?,
            products: self.kind_overview(SyncKind::Products).await?,
            businesses,
        })
    }

    async fn kind_overview(&self, kind: SyncKind) -> Result<KindOverview, OptionsError> {
        let state = self.sync_state(kind).await?;
        Ok(KindOverview {
            kind,
            list_name: self.list_name(kind),
            sync_on_create: state.sync_on_create,
            sync_all: state.sync_all,
            has_imported_all: state.has_imported_all,
            list_id: state.list_id,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::http::StatusCode;

    use crate::store::InMemoryStore;
    use crate::sync::tests::{connect, orchestrator};
    use crate::test_support::MockServer;

    use super::*;

    #[tokio::test]
    async fn test_disconnected_overview() {
        let server = MockServer::start(|_, _| (StatusCode::OK, "[]".to_owned())).await;
        let orchestrator = orchestrator(&server, InMemoryStore::new());

        let overview = orchestrator.overview().await.unwrap();
        assert!(!overview.is_connected());
        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["status"], "disconnected");
        assert!(json["connect_url"].as_str().unwrap().contains("bearer_flow_url="));
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_connected_overview_lists_businesses() {
        let server = MockServer::start(|_, _| {
            (StatusCode::OK, r#"[{"id":"biz","name":"My Shop"}]"#.to_owned())
        })
        .await;
        let orchestrator = orchestrator(&server, InMemoryStore::new());
        connect(&orchestrator).await;
        orchestrator.save_customer_settings(true, true).await.unwrap();

        let overview = orchestrator.overview().await.unwrap();
        let ConnectionOverview::Connected {
            businesses,
            customers,
            products,
            ..
        } = &overview
        else {
            panic!("expected connected overview");
        };
        assert_eq!(businesses.as_ref().unwrap()[0].name, "My Shop");
        assert!(customers.sync_all);
        assert!(!products.sync_all);
        assert_eq!(products.list_name, "My Shop Products - WooCommerce");

        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["businesses"]["businesses"][0]["id"], "biz");
    }

    #[tokio::test]
    async fn test_business_list_decode_error() {
        let server = MockServer::start(|_, _| (StatusCode::OK, "{oops".to_owned())).await;
        let orchestrator = orchestrator(&server, InMemoryStore::new());
        connect(&orchestrator).await;

        let ConnectionOverview::Connected { businesses, .. } =
            orchestrator.overview().await.unwrap()
        else {
            panic!("expected connected overview");
        };
        assert!(businesses.unwrap_err().starts_with("Error (json_error): Error decoding JSON: "));
    }

    #[tokio::test]
    async fn test_business_list_status_error() {
        let server =
            MockServer::start(|_, _| (StatusCode::SERVICE_UNAVAILABLE, String::new())).await;
        let orchestrator = orchestrator(&server, InMemoryStore::new());
        connect(&orchestrator).await;

        let ConnectionOverview::Connected { businesses, .. } =
            orchestrator.overview().await.unwrap()
        else {
            panic!("expected connected overview");
        };
        assert_eq!(
            businesses.unwrap_err(),
            "Error (api_error): Error fetching businesses. HTTP code: 503"
        );
    }
}

//! Connecting, switching business and disconnecting.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use shown_connector::options::OptionStore;
use shown_connector::store::InMemoryStore;
use shown_connector::sync::ConnectionOverview;
use shown_connector_core::{BusinessId, OptionKey};
use shown_integration_tests::{FakeShown, connector, snippet_url};

#[tokio::test]
async fn test_connect_stores_credentials_and_snippet() {
    let shown = FakeShown::start().await;
    let connector = connector(&shown, InMemoryStore::new());

    let snippet = connector
        .handle_connect_callback(Some("tok_live"), Some("biz_1"))
        .await
        .unwrap();
    assert_eq!(snippet.as_deref(), Some(snippet_url("biz_1").as_str()));

    let credentials = connector.credentials().await.unwrap().unwrap();
    assert_eq!(credentials.business_id(), &BusinessId::new("biz_1"));

    let request = &shown.received_at("/api/business/snippet")[0];
    assert_eq!(request.header("authorization"), Some("Bearer tok_live"));
    assert_eq!(request.header("business-id"), Some("biz_1"));
}

#[tokio::test]
async fn test_partial_callback_does_not_fetch_snippet() {
    let shown = FakeShown::start().await;
    let connector = connector(&shown, InMemoryStore::new());

    let snippet = connector
        .handle_connect_callback(Some("tok_live"), None)
        .await
        .unwrap();
    assert!(snippet.is_none());
    assert!(connector.credentials().await.unwrap().is_none());
    assert!(shown.received().is_empty());

    let snippet = connector
        .handle_connect_callback(None, Some("biz_1"))
        .await
        .unwrap();
    assert!(snippet.is_none());
    assert!(connector.credentials().await.unwrap().is_some());
}

#[tokio::test]
async fn test_overview_lists_businesses() {
    let shown = FakeShown::start().await;
    let connector = connector(&shown, InMemoryStore::new());

    assert!(!connector.overview().await.unwrap().is_connected());

    connector
        .handle_connect_callback(Some("tok_live"), Some("biz_1"))
        .await
        .unwrap();
    let ConnectionOverview::Connected {
        business_id,
        snippet_url: snippet,
        businesses,
        customers,
        ..
    } = connector.overview().await.unwrap()
    else {
        panic!("expected connected overview");
    };

    assert_eq!(business_id.as_str(), "biz_1");
    assert_eq!(snippet, Some(snippet_url("biz_1")));
    assert_eq!(customers.list_name, "My Shop Customers - WooCommerce");

    let businesses = businesses.unwrap();
    assert_eq!(businesses.len(), 2);
    assert_eq!(businesses[1].id.as_str(), "42");
}

#[tokio::test]
async fn test_install_snippet_switches_business() {
    let shown = FakeShown::start().await;
    let connector = connector(&shown, InMemoryStore::new());
    connector
        .handle_connect_callback(Some("tok_live"), Some("biz_1"))
        .await
        .unwrap();

    let snippet = connector
        .install_snippet(BusinessId::new("42"))
        .await
        .unwrap();
    assert_eq!(snippet, Some(snippet_url("42")));

    let options = connector.options();
    assert_eq!(
        options.get_string(OptionKey::BusinessId).await.unwrap().as_deref(),
        Some("42")
    );
    assert_eq!(
        options.get_string(OptionKey::SnippetUrl).await.unwrap(),
        Some(snippet_url("42"))
    );
}

#[tokio::test]
async fn test_disconnect_clears_everything_and_repeats() {
    let shown = FakeShown::start().await;
    let connector = connector(&shown, InMemoryStore::new());
    connector
        .handle_connect_callback(Some("tok_live"), Some("biz_1"))
        .await
        .unwrap();
    connector.save_customer_settings(true, true).await.unwrap();
    connector.save_verification_settings(true).await.unwrap();
    assert!(!connector.options().is_empty().await);

    connector.disconnect().await.unwrap();
    assert!(connector.options().is_empty().await);
    assert!(!connector.overview().await.unwrap().is_connected());

    connector.disconnect().await.unwrap();
    assert!(connector.options().is_empty().await);
}

#[tokio::test]
async fn test_connect_url_returns_to_admin_page() {
    let shown = FakeShown::start().await;
    let connector = connector(&shown, InMemoryStore::new());

    assert_eq!(
        connector.connect_url(),
        format!(
            "{}/login/wordpress/external?bearer_flow_url=https%3A%2F%2Fshop.example%2Fwp-admin%2Fadmin.php%3Fpage%3Dshown-connector",
            shown.base_url
        )
    );
}

//! Storefront markup after the admin has configured the connector.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use shown_connector::events::{CartItem, PageEvents};
use shown_connector::store::InMemoryStore;
use shown_connector::storefront::render_head;
use shown_connector_core::{OrderId, ProductId, VariationId};
use shown_integration_tests::{FakeShown, connector, snippet_url};

#[tokio::test]
async fn test_head_carries_snippet_and_verification_tags() {
    let shown = FakeShown::start().await;
    let connector = connector(&shown, InMemoryStore::new());
    connector
        .handle_connect_callback(Some("tok_live"), Some("biz_1"))
        .await
        .unwrap();

    let html = render_head(connector.options()).await.unwrap();
    assert!(html.contains(&format!(r#"<script async src="{}"></script>"#, snippet_url("biz_1"))));
    assert!(!html.contains("<meta"));

    assert_eq!(connector.save_verification_settings(true).await.unwrap(), 1);
    let request = &shown.received_at("/api/business/website-verification-tags")[0];
    assert_eq!(
        request.query.as_deref(),
        Some("website=https%3A%2F%2Fshop.example")
    );

    let html = render_head(connector.options()).await.unwrap();
    assert!(html.contains(r#"<meta name="shown-site-verification" content="v-123" />"#));

    connector.save_verification_settings(false).await.unwrap();
    assert!(!render_head(connector.options()).await.unwrap().contains("<meta"));
}

#[tokio::test]
async fn test_head_empty_after_disconnect() {
    let shown = FakeShown::start().await;
    let connector = connector(&shown, InMemoryStore::new());
    connector
        .handle_connect_callback(Some("tok_live"), Some("biz_1"))
        .await
        .unwrap();
    connector.disconnect().await.unwrap();

    assert_eq!(render_head(connector.options()).await.unwrap().trim(), "");
}

#[test]
fn test_footer_events_for_one_page() {
    let mut events = PageEvents::new();
    events.add_to_cart(&CartItem {
        cart_item_key: "k1".to_string(),
        product_id: ProductId::new(7),
        quantity: 1,
        variation_id: VariationId::new(0),
        variation: BTreeMap::new(),
        cart_item_data: serde_json::json!({}),
    });
    events.purchase_completed(OrderId::new(1042));

    let html = events.render_footer().unwrap();
    assert!(html.contains("shown_add_to_cart"));
    assert!(html.contains("trigger('shown_purchase_completed', 1042);"));
    assert!(events.is_empty());
}

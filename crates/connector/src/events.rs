//! Storefront tracking events.
//!
//! Cart additions and completed purchases are announced to the Shown pixel
//! as jQuery events on `document.body`. Events are collected while a
//! request is handled and rendered into the footer of that response; they
//! are not queued anywhere else, so an event whose page never renders is
//! lost.

use std::collections::BTreeMap;

use askama::Template;
use serde::Serialize;
use shown_connector_core::{OrderId, ProductId, VariationId};

/// Event the pixel listens for when an item is added to the cart.
pub const ADD_TO_CART_EVENT: &str = "shown_add_to_cart";

/// Event the pixel listens for on the order confirmation page.
pub const PURCHASE_COMPLETED_EVENT: &str = "shown_purchase_completed";

/// A cart line as the store reports it when an item is added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    pub cart_item_key: String,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Zero for simple products.
    pub variation_id: VariationId,
    /// Chosen attribute values, keyed by attribute name.
    pub variation: BTreeMap<String, String>,
    /// Extra data plugins attached to the line.
    pub cart_item_data: serde_json::Value,
}

#[derive(Debug, Clone)]
struct PageEvent {
    name: &'static str,
    /// JSON, already safe to embed in a `<script>` element.
    payload: String,
}

/// Events pending for the page being rendered.
#[derive(Debug, Default)]
pub struct PageEvents {
    events: Vec<PageEvent>,
}

#[derive(Template)]
#[template(path = "footer.html")]
struct FooterTemplate<'a> {
    events: &'a [PageEvent],
}

impl PageEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce a cart addition.
    pub fn add_to_cart(&mut self, item: &CartItem) {
        let payload = serde_json::to_string(item).unwrap_or_else(|_| "{}".to_owned());
        self.events.push(PageEvent {
            name: ADD_TO_CART_EVENT,
            payload: script_safe(&payload),
        });
    }

    /// Announce a completed purchase. Only the order number is exposed.
    pub fn purchase_completed(&mut self, order_id: OrderId) {
        self.events.push(PageEvent {
            name: PURCHASE_COMPLETED_EVENT,
            payload: order_id.to_string(),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Render the pending events as footer scripts and clear them.
    ///
    /// # Errors
    ///
    /// Returns `askama::Error` if the template fails to render.
    pub fn render_footer(&mut self) -> Result<String, askama::Error> {
        let events = std::mem::take(&mut self.events);
        FooterTemplate { events: &events }.render()
    }
}

/// Escape the characters that could end a `<script>` element early.
fn script_safe(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item() -> CartItem {
        CartItem {
            cart_item_key: "abc123".to_owned(),
            product_id: ProductId::new(7),
            quantity: 2,
            variation_id: VariationId::new(0),
            variation: BTreeMap::from([("attribute_pa_size".to_owned(), "large".to_owned())]),
            cart_item_data: serde_json::json!({}),
        }
    }

    #[test]
    fn test_add_to_cart_payload() {
        let mut events = PageEvents::new();
        events.add_to_cart(&item());
        let html = events.render_footer().unwrap();

        assert!(html.contains("trigger('shown_add_to_cart', {"));
        assert!(html.contains(r#""cart_item_key":"abc123""#));
        assert!(html.contains(r#""product_id":7"#));
        assert!(html.contains(r#""variation":{"attribute_pa_size":"large"}"#));
    }

    #[test]
    fn test_purchase_completed_carries_order_id_only() {
        let mut events = PageEvents::new();
        events.purchase_completed(OrderId::new(1042));
        let html = events.render_footer().unwrap();

        assert!(html.contains("trigger('shown_purchase_completed', 1042);"));
    }

    #[test]
    fn test_events_render_once() {
        let mut events = PageEvents::new();
        events.purchase_completed(OrderId::new(1));
        events.add_to_cart(&item());
        assert_eq!(events.len(), 2);

        let first = events.render_footer().unwrap();
        assert_eq!(first.matches("<script").count(), 2);
        assert!(events.is_empty());
        assert!(!events.render_footer().unwrap().contains("<script"));
    }

    #[test]
    fn test_payload_cannot_close_script() {
        let mut line = item();
        line.cart_item_data = serde_json::json!({"note": "</script><script>alert(1)</script>"});

        let mut events = PageEvents::new();
        events.add_to_cart(&line);
        let html = events.render_footer().unwrap();

        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains("\\u003c/script\\u003e"));
    }
}

//! Normalized records exported to Shown.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A customer, as taken from the billing details of their latest order.
///
/// Identity is the email exactly as entered at checkout; no case folding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A catalog product in Shown's product feed shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub description: String,
    /// Sale price when set, regular price otherwise, zero when neither is set.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// ISO 4217 store currency.
    pub currency: String,
    pub in_stock: bool,
    /// Full-size featured image URL.
    pub image: Option<String>,
    pub product_page: String,
    /// JSON-encoded list of brand names, or empty when the store has no brands.
    pub brand: String,
    /// SKU.
    pub retailer_id: String,
    pub category: String,
}

impl ProductRecord {
    /// Whether the product can be part of a bulk feed.
    #[must_use]
    pub fn has_sku(&self) -> bool {
        !self.retailer_id.trim().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(sku: &str) -> ProductRecord {
        ProductRecord {
            title: "Mug".to_owned(),
            description: "A mug".to_owned(),
            price: Decimal::new(1250, 2),
            currency: "EUR".to_owned(),
            in_stock: true,
            image: None,
            product_page: "https://shop.example/mug".to_owned(),
            brand: String::new(),
            retailer_id: sku.to_owned(),
            category: "Kitchen".to_owned(),
        }
    }

    #[test]
    fn test_price_serializes_as_number() {
        let json = serde_json::to_value(product("MUG-1")).unwrap();
        assert_eq!(json["price"], serde_json::json!(12.5));
        assert!(json["image"].is_null());
    }

    #[test]
    fn test_has_sku() {
        assert!(product("MUG-1").has_sku());
        assert!(!product("").has_sku());
        assert!(!product("  ").has_sku());
    }
}

//! Commerce store access.
//!
//! [`CommerceStore`] is the read-only seam between the connector and the
//! store that owns orders and products. [`StoreDataReader`] turns what it
//! returns into the records Shown expects.

mod memory;
mod reader;
mod woocommerce;

pub use memory::InMemoryStore;
pub use reader::{CUSTOMERS_CACHE_KEY, ORDERS_PAGE_SIZE, StoreDataReader};
pub use woocommerce::WooCommerceStore;

use std::future::Future;

use chrono::{DateTime, Utc};
use shown_connector_core::{OrderId, PostStatus, ProductId};
use thiserror::Error;

/// Errors that can occur when reading from the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// The billing side of an order; all the connector needs from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub billing_first_name: String,
    pub billing_last_name: String,
    pub billing_email: String,
}

/// One page of orders, newest first.
#[derive(Debug, Clone, Default)]
pub struct OrderPage {
    pub orders: Vec<OrderSummary>,
    /// Total number of pages at the requested page size.
    pub max_pages: u32,
}

/// A catalog product as the store describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Raw sale price text; may be empty.
    pub sale_price: String,
    /// Raw regular price text; may be empty.
    pub regular_price: String,
    pub in_stock: bool,
    pub image_url: Option<String>,
    pub permalink: String,
    /// Brand names, or `None` when the store has no brand taxonomy.
    pub brands: Option<Vec<String>>,
    pub sku: String,
    pub categories: Vec<String>,
    pub status: PostStatus,
}

/// Read access to a commerce store.
pub trait CommerceStore: Send + Sync {
    /// A page of orders, newest first. Pages are 1-based.
    fn orders_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = Result<OrderPage, StoreError>> + Send;

    /// A single order.
    fn order(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<OrderSummary>, StoreError>> + Send;

    /// Every published product.
    fn published_products(&self) -> impl Future<Output = Result<Vec<StoreProduct>, StoreError>> + Send;

    /// A single product, whatever its status.
    fn product(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<StoreProduct>, StoreError>> + Send;

    /// ISO 4217 code of the store currency.
    fn currency(&self) -> impl Future<Output = Result<String, StoreError>> + Send;
}

//! In-memory store for tests and embedding hosts.

use std::sync::atomic::{AtomicUsize, Ordering};

use shown_connector_core::{OrderId, ProductId};
use tokio::sync::RwLock;

use super::{CommerceStore, OrderPage, OrderSummary, StoreError, StoreProduct};

/// A store backed by vectors.
#[derive(Debug)]
pub struct InMemoryStore {
    orders: RwLock<Vec<OrderSummary>>,
    products: RwLock<Vec<StoreProduct>>,
    currency: String,
    order_page_queries: AtomicUsize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Empty store trading in USD.
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
            products: RwLock::new(Vec::new()),
            currency: "USD".to_owned(),
            order_page_queries: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: OrderSummary) -> Self {
        self.orders.get_mut().push(order);
        self
    }

    #[must_use]
    pub fn with_product(mut self, product: StoreProduct) -> Self {
        self.products.get_mut().push(product);
        self
    }

    /// Record a new order, as checkout would.
    pub async fn add_order(&self, order: OrderSummary) {
        self.orders.write().await.push(order);
    }

    /// Insert or replace a product.
    pub async fn put_product(&self, product: StoreProduct) {
        let mut products = self.products.write().await;
        products.retain(|p| p.id != product.id);
        products.push(product);
    }

    /// How many order pages have been requested so far.
    pub fn order_page_queries(&self) -> usize {
        self.order_page_queries.load(Ordering::SeqCst)
    }
}

impl CommerceStore for InMemoryStore {
    async fn orders_page(&self, page: u32, per_page: u32) -> Result<OrderPage, StoreError> {
        self.order_page_queries.fetch_add(1, Ordering::SeqCst);

        let mut orders = self.orders.read().await.clone();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let per_page = per_page.max(1) as usize;
        let total = orders.len();
        let start = (page.max(1) as usize - 1) * per_page;

        Ok(OrderPage {
            orders: orders.into_iter().skip(start).take(per_page).collect(),
            max_pages: u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX),
        })
    }

    async fn order(&self, id: OrderId) -> Result<Option<OrderSummary>, StoreError> {
        Ok(self.orders.read().await.iter().find(|o| o.id == id).cloned())
    }

    async fn published_products(&self) -> Result<Vec<StoreProduct>, StoreError> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .filter(|p| p.status.is_published())
            .cloned()
            .collect())
    }

    async fn product(&self, id: ProductId) -> Result<Option<StoreProduct>, StoreError> {
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn currency(&self) -> Result<String, StoreError> {
        Ok(self.currency.clone())
    }
}

//! Normalized record extraction.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use shown_connector_core::{CustomerRecord, OrderId, ProductId, ProductRecord, resolve_price};
use tracing::{debug, instrument};

use super::{CommerceStore, OrderSummary, StoreError, StoreProduct};

/// Orders requested per logical page.
pub const ORDERS_PAGE_SIZE: u32 = 1000;

/// Cache entry holding the full customer export.
pub const CUSTOMERS_CACHE_KEY: &str = "shown_connector_customers_cache";

/// Reads customers and products from a [`CommerceStore`].
///
/// The full customer export is cached for the configured TTL; product reads
/// always hit the store.
pub struct StoreDataReader<S> {
    store: Arc<S>,
    customers: Cache<&'static str, Arc<Vec<CustomerRecord>>>,
}

impl<S: CommerceStore> StoreDataReader<S> {
    /// Create a reader whose customer export lives for `cache_ttl`.
    #[must_use]
    pub fn new(store: Arc<S>, cache_ttl: Duration) -> Self {
        let customers = Cache::builder()
            .max_capacity(1)
            .time_to_live(cache_ttl)
            .build();

        Self { store, customers }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every distinct customer, one per billing email.
    ///
    /// Orders are walked newest first so the most recent billing names win.
    /// Orders without an email are skipped. A non-empty result is cached.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if any page cannot be read.
    #[instrument(skip(self))]
    pub async fn read_all_customers(&self) -> Result<Vec<CustomerRecord>, StoreError> {
        if let Some(cached) = self.customers.get(CUSTOMERS_CACHE_KEY).await {
            debug!(count = cached.len(), "Customer export cache hit");
            return Ok(cached.as_ref().clone());
        }
        debug!("Customer export cache miss");

        let mut seen = HashSet::new();
        let mut customers = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.store.orders_page(page, ORDERS_PAGE_SIZE).await?;
            for order in batch.orders {
                if order.billing_email.is_empty() || seen.contains(&order.billing_email) {
                    continue;
                }
                seen.insert(order.billing_email.clone());
                customers.push(customer_record(order));
            }

            page += 1;
            if page > batch.max_pages {
                break;
            }
        }

        if !customers.is_empty() {
            self.customers
                .insert(CUSTOMERS_CACHE_KEY, Arc::new(customers.clone()))
                .await;
        }

        Ok(customers)
    }

    /// Every published product that carries a SKU.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if products or the currency cannot be read.
    #[instrument(skip(self))]
    pub async fn read_all_products(&self) -> Result<Vec<ProductRecord>, StoreError> {
        let currency = self.store.currency().await?;
        let products = self.store.published_products().await?;

        let records: Vec<ProductRecord> = products
            .into_iter()
            .map(|product| product_record(product, &currency))
            .filter(ProductRecord::has_sku)
            .collect();

        debug!(count = records.len(), "Read products");
        Ok(records)
    }

    /// A single product, with or without a SKU.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the product or the currency cannot be read.
    pub async fn read_product(&self, id: ProductId) -> Result<Option<ProductRecord>, StoreError> {
        let Some(product) = self.store.product(id).await? else {
            return Ok(None);
        };
        let currency = self.store.currency().await?;
        Ok(Some(product_record(product, &currency)))
    }

    /// The customer behind a single order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the order cannot be read.
    pub async fn read_customer(&self, id: OrderId) -> Result<Option<CustomerRecord>, StoreError> {
        Ok(self.store.order(id).await?.map(customer_record))
    }

    /// Drop the cached customer export.
    pub async fn invalidate_customers(&self) {
        self.customers.invalidate(CUSTOMERS_CACHE_KEY).await;
    }
}

fn customer_record(order: OrderSummary) -> CustomerRecord {
    CustomerRecord {
        first_name: order.billing_first_name,
        last_name: order.billing_last_name,
        email: order.billing_email,
    }
}

fn product_record(product: StoreProduct, currency: &str) -> ProductRecord {
    ProductRecord {
        price: resolve_price(&product.sale_price, &product.regular_price),
        title: product.name,
        description: product.description,
        currency: currency.to_owned(),
        in_stock: product.in_stock,
        image: product.image_url,
        product_page: product.permalink,
        brand: encode_brands(product.brands),
        retailer_id: product.sku,
        category: product.categories.join(", "),
    }
}

/// JSON list of brand names in a stable order, or empty without a taxonomy.
fn encode_brands(brands: Option<Vec<String>>) -> String {
    let Some(mut brands) = brands else {
        return String::new();
    };
    brands.sort();
    serde_json::to_string(&brands).unwrap_or_default()
}

//! WooCommerce REST API (v3) backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shown_connector_core::{OrderId, PostStatus, ProductId};
use tracing::{debug, instrument};

use super::{CommerceStore, OrderPage, OrderSummary, StoreError, StoreProduct};
use crate::config::WooCommerceConfig;

/// Largest page the REST API serves.
const REST_PAGE_SIZE: u32 = 100;

/// Reads orders and products over the WooCommerce REST API.
#[derive(Clone)]
pub struct WooCommerceStore {
    client: reqwest::Client,
    api_url: String,
    consumer_key: String,
    consumer_secret: SecretString,
}

impl std::fmt::Debug for WooCommerceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCommerceStore")
            .field("api_url", &self.api_url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl WooCommerceStore {
    /// Create a store client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &WooCommerceConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            api_url: format!("{}/wp-json/wc/v3", config.url.trim_end_matches('/')),
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response, StoreError> {
        let response = self
            .client
            .get(format!("{}{path}", self.api_url))
            .basic_auth(&self.consumer_key, Some(self.consumer_secret.expose_secret()))
            .query(query)
            .send()
            .await?;

        Ok(response)
    }

    /// GET a JSON body, treating 404 as absent.
    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, StoreError> {
        let response = self.get(path, &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(|(body, _)| Some(body))
    }

    /// One REST page of products plus the total page count.
    async fn products_rest_page(&self, page: u32) -> Result<(Vec<WcProduct>, u32), StoreError> {
        let response = self
            .get(
                "/products",
                &[
                    ("status", "publish".to_owned()),
                    ("per_page", REST_PAGE_SIZE.to_string()),
                    ("page", page.to_string()),
                ],
            )
            .await?;
        let (products, headers) = decode::<Vec<WcProduct>>(response).await?;
        Ok((products, header_u32(&headers, "X-WP-TotalPages").unwrap_or(1)))
    }
}

impl CommerceStore for WooCommerceStore {
    #[instrument(skip(self))]
    async fn orders_page(&self, page: u32, per_page: u32) -> Result<OrderPage, StoreError> {
        let per_page = per_page.max(1);
        let (rest_per_page, rest_pages) = rest_window(per_page);
        let first_rest_page = (page.max(1) - 1) * rest_pages + 1;

        let mut orders = Vec::new();
        let mut total = 0;

        for rest_page in first_rest_page..first_rest_page + rest_pages {
            let response = self
                .get(
                    "/orders",
                    &[
                        ("orderby", "date".to_owned()),
                        ("order", "desc".to_owned()),
                        ("per_page", rest_per_page.to_string()),
                        ("page", rest_page.to_string()),
                    ],
                )
                .await?;
            let (batch, headers) = decode::<Vec<WcOrder>>(response).await?;
            total = header_u32(&headers, "X-WP-Total").unwrap_or(0);

            let short = batch.len() < rest_per_page as usize;
            orders.extend(batch.into_iter().map(WcOrder::into_summary));
            if short {
                break;
            }
        }

        debug!(count = orders.len(), total, "Read order page");
        Ok(OrderPage {
            orders,
            max_pages: total.div_ceil(per_page),
        })
    }

    async fn order(&self, id: OrderId) -> Result<Option<OrderSummary>, StoreError> {
        Ok(self
            .get_optional::<WcOrder>(&format!("/orders/{id}"))
            .await?
            .map(WcOrder::into_summary))
    }

    #[instrument(skip(self))]
    async fn published_products(&self) -> Result<Vec<StoreProduct>, StoreError> {
        let mut products = Vec::new();
        let mut page = 1;

        loop {
            let (batch, total_pages) = self.products_rest_page(page).await?;
            products.extend(batch.into_iter().map(WcProduct::into_store_product));
            page += 1;
            if page > total_pages {
                break;
            }
        }

        Ok(products)
    }

    async fn product(&self, id: ProductId) -> Result<Option<StoreProduct>, StoreError> {
        Ok(self
            .get_optional::<WcProduct>(&format!("/products/{id}"))
            .await?
            .map(WcProduct::into_store_product))
    }

    async fn currency(&self) -> Result<String, StoreError> {
        let response = self.get("/data/currencies/current", &[]).await?;
        let (currency, _) = decode::<WcCurrency>(response).await?;
        Ok(currency.code)
    }
}

/// REST page size and number of REST pages that make up one logical page.
fn rest_window(per_page: u32) -> (u32, u32) {
    if per_page <= REST_PAGE_SIZE {
        (per_page, 1)
    } else {
        (REST_PAGE_SIZE, per_page.div_ceil(REST_PAGE_SIZE))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<(T, HeaderMap), StoreError> {
    let status = response.status();
    let headers = response.headers().clone();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(StoreError::Api {
            status: status.as_u16(),
            message: text.chars().take(200).collect(),
        });
    }

    let body = serde_json::from_str(&text).map_err(|e| StoreError::Parse(e.to_string()))?;
    Ok((body, headers))
}

fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Remove markup from a term name.
fn strip_tags(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_owned()
}

#[derive(Debug, Deserialize)]
struct WcOrder {
    id: u64,
    #[serde(default)]
    date_created_gmt: Option<String>,
    #[serde(default)]
    billing: WcBilling,
}

#[derive(Debug, Default, Deserialize)]
struct WcBilling {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
}

impl WcOrder {
    fn into_summary(self) -> OrderSummary {
        let created_at = self
            .date_created_gmt
            .as_deref()
            .and_then(|raw| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok())
            .map_or(DateTime::<Utc>::UNIX_EPOCH, |naive| naive.and_utc());

        OrderSummary {
            id: OrderId::new(self.id),
            created_at,
            billing_first_name: self.billing.first_name,
            billing_last_name: self.billing.last_name,
            billing_email: self.billing.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WcProduct {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    sale_price: String,
    #[serde(default)]
    regular_price: String,
    #[serde(default)]
    stock_status: String,
    #[serde(default)]
    images: Vec<WcImage>,
    #[serde(default)]
    permalink: String,
    /// Absent on stores without a brand taxonomy.
    #[serde(default)]
    brands: Option<Vec<WcTerm>>,
    #[serde(default)]
    sku: String,
    #[serde(default)]
    categories: Vec<WcTerm>,
    #[serde(default)]
    status: PostStatus,
}

#[derive(Debug, Deserialize)]
struct WcImage {
    src: String,
}

#[derive(Debug, Deserialize)]
struct WcTerm {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WcCurrency {
    code: String,
}

impl WcProduct {
    fn into_store_product(self) -> StoreProduct {
        StoreProduct {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            sale_price: self.sale_price,
            regular_price: self.regular_price,
            in_stock: self.stock_status == "instock",
            image_url: self.images.into_iter().next().map(|image| image.src),
            permalink: self.permalink,
            brands: self
                .brands
                .map(|terms| terms.into_iter().map(|term| term.name).collect()),
            sku: self.sku,
            categories: self
                .categories
                .iter()
                .map(|term| strip_tags(&term.name))
                .collect(),
            status: self.status,
        }
    }
}

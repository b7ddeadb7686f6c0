//! Integration tests for the Shown connector.
//!
//! The tests drive the public connector API against [`FakeShown`], a local
//! stand-in for the Shown API, with the in-memory option and commerce
//! stores. No database or WooCommerce site is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shown-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::{get, post};
use chrono::Utc;
use serde_json::{Value, json};
use shown_connector::config::{ShownConfig, SiteConfig};
use shown_connector::options::InMemoryOptionStore;
use shown_connector::shown::ShownClient;
use shown_connector::store::{InMemoryStore, OrderSummary, StoreDataReader, StoreProduct};
use shown_connector::SyncOrchestrator;
use shown_connector_core::{OrderId, PostStatus, ProductId};
use tokio::net::TcpListener;

/// Orchestrator over in-memory stores.
pub type TestConnector = SyncOrchestrator<InMemoryOptionStore, InMemoryStore>;

/// List ID the fake hands out for customer imports.
pub const CUSTOMER_LIST_ID: &str = "lst_customers";

/// List ID the fake hands out for product imports.
pub const PRODUCT_LIST_ID: &str = "lst_products";

/// Snippet URL the fake returns for any business.
pub fn snippet_url(business_id: &str) -> String {
    format!("https://px.shown.io/{business_id}.js")
}

/// A request the fake received.
#[derive(Debug, Clone)]
pub struct Received {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Received {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

#[derive(Clone)]
struct FakeState {
    received: Arc<Mutex<Vec<Received>>>,
    bulk_status: Arc<AtomicU16>,
}

impl FakeState {
    fn record(&self, method: Method, uri: &Uri, headers: HeaderMap, body: String) {
        self.received.lock().unwrap().push(Received {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers,
            body,
        });
    }

    fn bulk_status(&self) -> StatusCode {
        StatusCode::from_u16(self.bulk_status.load(Ordering::SeqCst))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// A local Shown API that accepts every request and records it.
pub struct FakeShown {
    pub base_url: String,
    state: FakeState,
}

impl FakeShown {
    pub async fn start() -> Self {
        let state = FakeState {
            received: Arc::new(Mutex::new(Vec::new())),
            bulk_status: Arc::new(AtomicU16::new(StatusCode::OK.as_u16())),
        };

        let router = Router::new()
            .route("/api/business/snippet", get(snippet))
            .route("/api/business/website-verification-tags", get(verification_tags))
            .route("/api/business/list", get(businesses))
            .route("/api/business/customers", post(bulk_customers))
            .route("/api/products/create-multiple", post(bulk_products))
            .route("/api/business/customers/add-or-update/{list_id}", post(single))
            .route("/api/products/{list_id}", post(single))
            .fallback(not_found)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Answer bulk uploads with `status` from now on.
    pub fn set_bulk_status(&self, status: StatusCode) {
        self.state.bulk_status.store(status.as_u16(), Ordering::SeqCst);
    }

    pub fn received(&self) -> Vec<Received> {
        self.state.received.lock().unwrap().clone()
    }

    /// Requests whose path matches exactly.
    pub fn received_at(&self, path: &str) -> Vec<Received> {
        self.received()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn shown_config(&self) -> ShownConfig {
        ShownConfig {
            base_url: self.base_url.clone(),
        }
    }
}

fn business_of(headers: &HeaderMap) -> String {
    headers
        .get("business-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn snippet(State(state): State<FakeState>, uri: Uri, headers: HeaderMap) -> (StatusCode, String) {
    let business = business_of(&headers);
    state.record(Method::GET, &uri, headers, String::new());
    (StatusCode::OK, json!({ "url": snippet_url(&business) }).to_string())
}

async fn verification_tags(
    State(state): State<FakeState>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.record(Method::GET, &uri, headers, String::new());
    let body = json!({
        "tags_definitions": [
            { "name": "shown-site-verification", "content": "v-123" }
        ]
    });
    (StatusCode::OK, body.to_string())
}

async fn businesses(State(state): State<FakeState>, uri: Uri, headers: HeaderMap) -> (StatusCode, String) {
    state.record(Method::GET, &uri, headers, String::new());
    let body = json!([
        { "id": "biz_1", "name": "My Shop" },
        { "id": 42, "name": "Second Shop" }
    ]);
    (StatusCode::OK, body.to_string())
}

async fn bulk_customers(
    State(state): State<FakeState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.record(Method::POST, &uri, headers, body);
    bulk_answer(&state, CUSTOMER_LIST_ID)
}

async fn bulk_products(
    State(state): State<FakeState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.record(Method::POST, &uri, headers, body);
    bulk_answer(&state, PRODUCT_LIST_ID)
}

fn bulk_answer(state: &FakeState, list_id: &str) -> (StatusCode, String) {
    let status = state.bulk_status();
    if status == StatusCode::OK {
        (status, json!({ "data": { "list_id": list_id } }).to_string())
    } else {
        (status, json!({ "message": "unavailable" }).to_string())
    }
}

async fn single(
    State(state): State<FakeState>,
    Path(_list_id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.record(Method::POST, &uri, headers, body);
    (StatusCode::OK, "{}".to_string())
}

async fn not_found(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    state.record(method, &uri, headers, body);
    StatusCode::NOT_FOUND
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn site() -> SiteConfig {
    SiteConfig {
        name: "My Shop".to_string(),
        url: "https://shop.example".to_string(),
        admin_url: "https://shop.example/wp-admin/admin.php?page=shown-connector".to_string(),
    }
}

/// An order placed `id` minutes after the epoch of the test run.
pub fn order(id: u64, email: &str) -> OrderSummary {
    let minutes = i64::try_from(id).unwrap();
    OrderSummary {
        id: OrderId::new(id),
        created_at: Utc::now() - chrono::Duration::days(1) + chrono::Duration::minutes(minutes),
        billing_first_name: format!("Customer{id}"),
        billing_last_name: "Example".to_string(),
        billing_email: email.to_string(),
    }
}

pub fn product(id: u64, sku: &str, status: PostStatus) -> StoreProduct {
    StoreProduct {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: "<p>Hand made</p>".to_string(),
        sale_price: String::new(),
        regular_price: "19.50".to_string(),
        in_stock: true,
        image_url: Some(format!("https://shop.example/img/{id}.jpg")),
        permalink: format!("https://shop.example/product/{id}"),
        brands: None,
        sku: sku.to_string(),
        categories: vec!["Mugs".to_string()],
        status,
    }
}

/// A connector talking to `shown` over `store`.
pub fn connector(shown: &FakeShown, store: InMemoryStore) -> Arc<TestConnector> {
    let config = shown.shown_config();
    Arc::new(SyncOrchestrator::new(
        Arc::new(InMemoryOptionStore::new()),
        StoreDataReader::new(Arc::new(store), Duration::from_secs(60)),
        ShownClient::new(&config).unwrap(),
        site(),
        config,
    ))
}

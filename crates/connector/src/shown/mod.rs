//! Shown API client.
//!
//! All outbound communication with Shown lives here; no business logic.
//! Every request carries `Authorization: Bearer <token>` and `Business-Id`
//! headers. Nothing is retried automatically: callers decide.
//!
//! Failure policy differs per call:
//! - metadata lookups (snippet, verification tags) swallow failures and
//!   return `None`
//! - the business list surfaces transport, status and decode failures as
//!   distinct [`ShownError`] variants
//! - bulk uploads return the raw [`HttpResult`] for the caller to inspect
//! - single pushes skip silently until credentials and a list exist

mod error;
mod types;

pub use error::ShownError;
pub use types::{HttpResult, SOURCE};

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use shown_connector_core::{
    Business, Credentials, CustomerRecord, ListId, ProductRecord, VerificationTag,
};
use tracing::{debug, instrument, warn};

use crate::config::ShownConfig;
use crate::outcome::{SkipReason, SyncOutcome};
use types::{
    BulkCustomersBody, BulkProductsBody, SingleCustomerBody, SingleProductBody, SnippetResponse,
    VerificationTagsResponse,
};

/// Shown API client.
#[derive(Debug, Clone)]
pub struct ShownClient {
    client: reqwest::Client,
    api_url: String,
}

impl ShownClient {
    /// Create a client for the configured Shown host.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ShownConfig) -> Result<Self, ShownError> {
        Self::with_api_url(config.api_url())
    }

    /// Create a client for an explicit API root, e.g. `https://shown.io/api`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_api_url(api_url: impl Into<String>) -> Result<Self, ShownError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ShownError::Transport)?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Authenticated request builder.
    fn request(
        &self,
        method: Method,
        path: &str,
        credentials: &Credentials,
    ) -> Result<RequestBuilder, ShownError> {
        let business_id = HeaderValue::from_str(credentials.business_id().as_str())
            .map_err(|_| ShownError::InvalidHeader("Business-Id"))?;

        Ok(self
            .client
            .request(method, format!("{}{path}", self.api_url))
            .bearer_auth(credentials.access_token().expose_secret())
            .header("Business-Id", business_id))
    }

    /// GET a JSON body, mapping every failure to `None`.
    async fn get_json_quietly<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        path: &str,
        query: &[(&str, &str)],
    ) -> Option<T> {
        let request = match self.request(Method::GET, path, credentials) {
            Ok(request) => request.query(query),
            Err(e) => {
                warn!(path, error = %e, "Could not build Shown request");
                return None;
            }
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(path, error = %e, "Shown request failed");
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            debug!(path, status = %response.status(), "Shown returned non-200");
            return None;
        }

        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(path, error = %e, "Shown returned an unreadable body");
                None
            }
        }
    }

    /// Fetch the tracking snippet URL for the credentials' business.
    ///
    /// Returns `None` when not connected, on any non-200 answer, and on
    /// transport errors.
    #[instrument(skip_all)]
    pub async fn fetch_snippet(&self, credentials: Option<&Credentials>) -> Option<String> {
        let credentials = credentials?;
        self.get_json_quietly::<SnippetResponse>(credentials, "/business/snippet", &[])
            .await
            .and_then(|body| body.url)
            .filter(|url| !url.is_empty())
    }

    /// Fetch the meta tags that prove ownership of `site_url`.
    ///
    /// Same failure policy as [`Self::fetch_snippet`]; an empty tag list is
    /// also reported as `None`.
    #[instrument(skip(self, credentials))]
    pub async fn fetch_verification_tags(
        &self,
        credentials: Option<&Credentials>,
        site_url: &str,
    ) -> Option<Vec<VerificationTag>> {
        let credentials = credentials?;
        self.get_json_quietly::<VerificationTagsResponse>(
            credentials,
            "/business/website-verification-tags",
            &[("website", site_url)],
        )
        .await
        .and_then(|body| body.tags_definitions)
        .filter(|tags| !tags.is_empty())
    }

    /// List the businesses the connected account can act for.
    ///
    /// # Errors
    ///
    /// - `ShownError::Transport` if no response arrived
    /// - `ShownError::Status` with the code for any non-200 answer
    /// - `ShownError::Decode` with the parser message for a malformed body
    #[instrument(skip_all, fields(business_id = %credentials.business_id()))]
    pub async fn list_businesses(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<Business>, ShownError> {
        let response = self
            .request(Method::GET, "/business/list", credentials)?
            .send()
            .await
            .map_err(ShownError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ShownError::Status {
                operation: "fetching businesses",
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(ShownError::Transport)?;
        serde_json::from_str(&body).map_err(|e| ShownError::Decode(e.to_string()))
    }

    /// Upload a full customer batch in one request.
    ///
    /// `list_id` is the list from a previous import, if any; Shown adds to it
    /// instead of creating a new one.
    ///
    /// # Errors
    ///
    /// Returns `ShownError::Transport` if no response arrived. Any HTTP
    /// answer, including errors, is returned as an [`HttpResult`].
    #[instrument(skip(self, credentials, records), fields(count = records.len()))]
    pub async fn bulk_upsert_customers(
        &self,
        credentials: &Credentials,
        list_id: Option<&ListId>,
        list_name: &str,
        records: &[CustomerRecord],
    ) -> Result<HttpResult, ShownError> {
        let body = BulkCustomersBody {
            list_name,
            list_id,
            customers: records,
            source: SOURCE,
        };
        self.post_raw("/business/customers", credentials, &body).await
    }

    /// Upload a full product batch in one request.
    ///
    /// # Errors
    ///
    /// Returns `ShownError::Transport` if no response arrived. Any HTTP
    /// answer, including errors, is returned as an [`HttpResult`].
    #[instrument(skip(self, credentials, records), fields(count = records.len()))]
    pub async fn bulk_upsert_products(
        &self,
        credentials: &Credentials,
        list_name: &str,
        records: &[ProductRecord],
    ) -> Result<HttpResult, ShownError> {
        let body = BulkProductsBody {
            list_name,
            source: SOURCE,
            products: records,
        };
        self.post_raw("/products/create-multiple", credentials, &body)
            .await
    }

    /// Add or update one customer in an existing list.
    ///
    /// Skips when not connected or when no list exists yet. The response
    /// status is reported but not judged.
    #[instrument(skip(self, credentials, record))]
    pub async fn push_single_customer(
        &self,
        credentials: Option<&Credentials>,
        list_id: Option<&ListId>,
        list_name: &str,
        record: &CustomerRecord,
    ) -> SyncOutcome<u16> {
        let (credentials, list_id) = match guard(credentials, list_id) {
            Ok(pair) => pair,
            Err(reason) => return SyncOutcome::Skipped(reason),
        };
        let path = format!(
            "/business/customers/add-or-update/{}",
            urlencoding::encode(list_id.as_str())
        );
        let body = SingleCustomerBody {
            list_name,
            customer: record,
        };
        self.post_raw(&path, credentials, &body)
            .await
            .map(|result| result.status)
            .into()
    }

    /// Add or update one product in an existing list.
    ///
    /// Skips when not connected or when no list exists yet. The response
    /// status is reported but not judged.
    #[instrument(skip(self, credentials, record))]
    pub async fn push_single_product(
        &self,
        credentials: Option<&Credentials>,
        list_id: Option<&ListId>,
        list_name: &str,
        record: &ProductRecord,
    ) -> SyncOutcome<u16> {
        let (credentials, list_id) = match guard(credentials, list_id) {
            Ok(pair) => pair,
            Err(reason) => return SyncOutcome::Skipped(reason),
        };
        let path = format!("/products/{}", urlencoding::encode(list_id.as_str()));
        let body = SingleProductBody {
            list_name,
            source: SOURCE,
            product: record,
        };
        self.post_raw(&path, credentials, &body)
            .await
            .map(|result| result.status)
            .into()
    }

    async fn post_raw(
        &self,
        path: &str,
        credentials: &Credentials,
        body: &impl serde::Serialize,
    ) -> Result<HttpResult, ShownError> {
        let response = self
            .request(Method::POST, path, credentials)?
            .json(body)
            .send()
            .await
            .map_err(ShownError::Transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(ShownError::Transport)?;
        debug!(path, status, "Shown answered");

        Ok(HttpResult { status, body })
    }
}

/// Require both credentials and a list before pushing a single record.
fn guard<'a>(
    credentials: Option<&'a Credentials>,
    list_id: Option<&'a ListId>,
) -> Result<(&'a Credentials, &'a ListId), SkipReason> {
    let credentials = credentials.ok_or(SkipReason::NotConnected)?;
    let list_id = list_id.ok_or(SkipReason::MissingListId)?;
    Ok((credentials, list_id))
}

//! Shown API request and response bodies.

use serde::{Deserialize, Serialize};
use shown_connector_core::{CustomerRecord, ListId, ProductRecord, VerificationTag};

use super::ShownError;

/// Value of the `source` field Shown uses to attribute imported data.
pub const SOURCE: &str = "wordpress";

#[derive(Debug, Serialize)]
pub(super) struct BulkCustomersBody<'a> {
    pub list_name: &'a str,
    pub list_id: Option<&'a ListId>,
    pub customers: &'a [CustomerRecord],
    pub source: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct BulkProductsBody<'a> {
    pub list_name: &'a str,
    pub source: &'static str,
    pub products: &'a [ProductRecord],
}

#[derive(Debug, Serialize)]
pub(super) struct SingleCustomerBody<'a> {
    pub list_name: &'a str,
    #[serde(flatten)]
    pub customer: &'a CustomerRecord,
}

#[derive(Debug, Serialize)]
pub(super) struct SingleProductBody<'a> {
    pub list_name: &'a str,
    pub source: &'static str,
    #[serde(flatten)]
    pub product: &'a ProductRecord,
}

#[derive(Debug, Deserialize)]
pub(super) struct SnippetResponse {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct VerificationTagsResponse {
    #[serde(default)]
    pub tags_definitions: Option<Vec<VerificationTag>>,
}

#[derive(Debug, Deserialize)]
struct BulkCreateResponse {
    data: BulkCreateData,
}

#[derive(Debug, Deserialize)]
struct BulkCreateData {
    list_id: ListId,
}

/// Raw answer to a bulk upload. The caller decides what counts as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResult {
    pub status: u16,
    pub body: String,
}

impl HttpResult {
    /// Whether Shown accepted the upload.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// The list identifier in a `{"data": {"list_id": ...}}` body.
    ///
    /// # Errors
    ///
    /// Returns `ShownError::Decode` if the body is not JSON or has no list ID.
    pub fn list_id(&self) -> Result<ListId, ShownError> {
        serde_json::from_str::<BulkCreateResponse>(&self.body)
            .map(|response| response.data.list_id)
            .map_err(|e| ShownError::Decode(e.to_string()))
    }
}

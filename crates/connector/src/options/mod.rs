//! Persisted connector options.
//!
//! Options are a flat key/value table of JSON values, addressed by
//! [`OptionKey`]. Writes to several keys are independent; there is no
//! transaction around them.

mod memory;
mod postgres;

pub use memory::InMemoryOptionStore;
pub use postgres::{PgOptionStore, create_pool};

use std::future::Future;

use serde_json::Value;
use shown_connector_core::{Credentials, ListId, OptionKey, SyncKind, VerificationTag};
use thiserror::Error;

/// Error type for option operations.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Key/value persistence for connector options.
pub trait OptionStore: Send + Sync {
    /// Read a value; `None` when unset.
    fn get(&self, key: OptionKey)
    -> impl Future<Output = Result<Option<Value>, OptionsError>> + Send;

    /// Write a value, replacing any previous one.
    fn set(&self, key: OptionKey, value: Value)
    -> impl Future<Output = Result<(), OptionsError>> + Send;

    /// Remove a value. Removing an unset key succeeds.
    fn delete(&self, key: OptionKey) -> impl Future<Output = Result<(), OptionsError>> + Send;

    /// Read a flag. Unset and unrecognized values read as `false`.
    fn get_bool(&self, key: OptionKey) -> impl Future<Output = Result<bool, OptionsError>> + Send {
        async move { Ok(self.get(key).await?.as_ref().is_some_and(truthy)) }
    }

    /// Read a text value. Unset and empty values read as `None`.
    fn get_string(
        &self,
        key: OptionKey,
    ) -> impl Future<Output = Result<Option<String>, OptionsError>> + Send {
        async move { Ok(self.get(key).await?.and_then(text)) }
    }

    fn set_bool(
        &self,
        key: OptionKey,
        value: bool,
    ) -> impl Future<Output = Result<(), OptionsError>> + Send {
        self.set(key, Value::Bool(value))
    }

    fn set_string(
        &self,
        key: OptionKey,
        value: impl Into<String>,
    ) -> impl Future<Output = Result<(), OptionsError>> + Send {
        self.set(key, Value::String(value.into()))
    }
}

/// How a stored value reads as a flag.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// How a stored value reads as text.
fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Stored connection credentials, if both parts are present.
///
/// # Errors
///
/// Returns `OptionsError` if the store cannot be read.
pub async fn load_credentials(
    options: &impl OptionStore,
) -> Result<Option<Credentials>, OptionsError> {
    let access_token = options.get_string(OptionKey::AccessToken).await?;
    let business_id = options.get_string(OptionKey::BusinessId).await?;
    Ok(Credentials::from_parts(access_token, business_id))
}

/// Stored verification tags; unset or malformed values read as empty.
///
/// # Errors
///
/// Returns `OptionsError` if the store cannot be read.
pub async fn load_verification_tags(
    options: &impl OptionStore,
) -> Result<Vec<VerificationTag>, OptionsError> {
    Ok(options
        .get(OptionKey::WebsiteOwnershipVerificationTags)
        .await?
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default())
}

/// Per-kind sync settings and progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    pub sync_on_create: bool,
    pub sync_all: bool,
    pub has_imported_all: bool,
    pub list_id: Option<ListId>,
}

impl SyncState {
    /// Read the state of one kind.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` if the store cannot be read.
    pub async fn load(options: &impl OptionStore, kind: SyncKind) -> Result<Self, OptionsError> {
        Ok(Self {
            sync_on_create: options.get_bool(OptionKey::sync_on_create(kind)).await?,
            sync_all: options.get_bool(OptionKey::sync_all(kind)).await?,
            has_imported_all: options.get_bool(OptionKey::has_imported_all(kind)).await?,
            list_id: options
                .get_string(OptionKey::list_id(kind))
                .await?
                .map(ListId::new),
        })
    }

    /// Whether the next admin load should run the bulk import.
    #[must_use]
    pub const fn needs_import(&self) -> bool {
        self.sync_all && !self.has_imported_all
    }
}

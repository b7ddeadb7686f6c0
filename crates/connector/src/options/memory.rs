//! In-memory option store.

use std::collections::HashMap;

use serde_json::Value;
use shown_connector_core::OptionKey;
use tokio::sync::RwLock;

use super::{OptionStore, OptionsError};

/// Options held in a map; lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryOptionStore {
    values: RwLock<HashMap<OptionKey, Value>>,
}

impl InMemoryOptionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently set.
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    /// Whether no key is set.
    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

impl OptionStore for InMemoryOptionStore {
    async fn get(&self, key: OptionKey) -> Result<Option<Value>, OptionsError> {
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn set(&self, key: OptionKey, value: Value) -> Result<(), OptionsError> {
        self.values.write().await.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: OptionKey) -> Result<(), OptionsError> {
        self.values.write().await.remove(&key);
        Ok(())
    }
}

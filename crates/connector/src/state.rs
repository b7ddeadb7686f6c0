//! Production wiring shared by the host adapters.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ConnectorConfig;
use crate::error::ConnectorError;
use crate::hooks::Hooks;
use crate::options::{PgOptionStore, create_pool};
use crate::shown::ShownClient;
use crate::store::{StoreDataReader, WooCommerceStore};
use crate::sync::SyncOrchestrator;

/// Orchestrator over `PostgreSQL` options and the WooCommerce REST API.
pub type WooCommerceConnector = SyncOrchestrator<PgOptionStore, WooCommerceStore>;

/// Connector state shared across host events.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct ConnectorState {
    inner: Arc<ConnectorStateInner>,
}

struct ConnectorStateInner {
    config: ConnectorConfig,
    options: Arc<PgOptionStore>,
    orchestrator: Arc<WooCommerceConnector>,
}

impl ConnectorState {
    /// Connect to the database and build the connector.
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable or an HTTP client
    /// fails to build.
    pub async fn connect(config: ConnectorConfig) -> Result<Self, ConnectorError> {
        let pool = create_pool(&config.database_url)
            .await
            .map_err(crate::options::OptionsError::from)?;
        Self::new(config, pool)
    }

    /// Build the connector over an existing pool.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn new(config: ConnectorConfig, pool: PgPool) -> Result<Self, ConnectorError> {
        let options = Arc::new(PgOptionStore::new(pool));
        let store = Arc::new(WooCommerceStore::new(&config.woocommerce)?);
        let reader = StoreDataReader::new(store, config.customer_cache_ttl);
        let client = ShownClient::new(&config.shown)?;

        let orchestrator = Arc::new(SyncOrchestrator::new(
            Arc::clone(&options),
            reader,
            client,
            config.site.clone(),
            config.shown.clone(),
        ));

        Ok(Self {
            inner: Arc::new(ConnectorStateInner {
                config,
                options,
                orchestrator,
            }),
        })
    }

    /// Get a reference to the connector configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectorConfig {
        &self.inner.config
    }

    /// Get a reference to the option store.
    #[must_use]
    pub fn options(&self) -> &PgOptionStore {
        &self.inner.options
    }

    /// Get a reference to the sync orchestrator.
    #[must_use]
    pub fn orchestrator(&self) -> &Arc<WooCommerceConnector> {
        &self.inner.orchestrator
    }

    /// A hook registry with the orchestrator subscribed.
    #[must_use]
    pub fn hooks(&self) -> Hooks {
        let mut hooks = Hooks::new();
        self.inner.orchestrator.register(&mut hooks);
        hooks
    }
}

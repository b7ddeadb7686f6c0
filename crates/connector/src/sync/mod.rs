//! Sync orchestration.
//!
//! [`SyncOrchestrator`] decides, from persisted settings and progress
//! markers, whether an event leads to a single-record push, a full bulk
//! import or nothing at all, and persists what Shown hands back.
//!
//! # Flow
//!
//! ```text
//! host event -> check options -> StoreDataReader -> ShownClient -> persist list_id / flags
//! ```
//!
//! Host events never fail: every entry point returns a [`SyncOutcome`].

mod connection;
mod overview;
mod settings;

pub use overview::{ConnectionOverview, KindOverview};

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use shown_connector_core::{
    Credentials, ListId, OptionKey, OrderId, ProductId, SyncKind,
};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::config::{ShownConfig, SiteConfig};
use crate::error::ConnectorError;
use crate::hooks::Hooks;
use crate::options::{OptionStore, OptionsError, SyncState, load_credentials};
use crate::outcome::{SkipReason, SyncOutcome};
use crate::shown::{HttpResult, ShownClient, ShownError};
use crate::store::{CommerceStore, StoreDataReader};

/// A completed bulk import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub kind: SyncKind,
    /// Records sent in the batch.
    pub records: usize,
    /// List Shown stored them in.
    pub list_id: ListId,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} into list {}", self.records, self.kind, self.list_id)
    }
}

/// Coordinates store reads, Shown calls and persisted sync state.
pub struct SyncOrchestrator<O, S> {
    options: Arc<O>,
    reader: StoreDataReader<S>,
    client: ShownClient,
    site: SiteConfig,
    shown: ShownConfig,
    customer_import: Mutex<()>,
    product_import: Mutex<()>,
}

impl<O, S> SyncOrchestrator<O, S>
where
    O: OptionStore + 'static,
    S: CommerceStore + 'static,
{
    #[must_use]
    pub fn new(
        options: Arc<O>,
        reader: StoreDataReader<S>,
        client: ShownClient,
        site: SiteConfig,
        shown: ShownConfig,
    ) -> Self {
        Self {
            options,
            reader,
            client,
            site,
            shown,
            customer_import: Mutex::new(()),
            product_import: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn options(&self) -> &O {
        &self.options
    }

    #[must_use]
    pub const fn reader(&self) -> &StoreDataReader<S> {
        &self.reader
    }

    #[must_use]
    pub const fn client(&self) -> &ShownClient {
        &self.client
    }

    /// Stored credentials, if connected.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` if the store cannot be read.
    pub async fn credentials(&self) -> Result<Option<Credentials>, OptionsError> {
        load_credentials(self.options.as_ref()).await
    }

    /// Settings and progress of one kind.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError` if the store cannot be read.
    pub async fn sync_state(&self, kind: SyncKind) -> Result<SyncState, OptionsError> {
        SyncState::load(self.options.as_ref(), kind).await
    }

    /// Name of the Shown list for a kind, e.g. `My Shop Customers - WooCommerce`.
    #[must_use]
    pub fn list_name(&self, kind: SyncKind) -> String {
        format!("{} {} - WooCommerce", self.site.name, kind.list_label())
    }

    /// Subscribe this orchestrator to host events.
    ///
    /// New orders push their customer, newly published products push
    /// themselves, and admin loads run any pending bulk import. Whether each
    /// handler does anything is decided from the options at dispatch time.
    pub fn register(self: &Arc<Self>, hooks: &mut Hooks) {
        let this = Arc::clone(self);
        hooks.on_order_created(move |order_id| {
            let this = Arc::clone(&this);
            async move {
                let outcome = this.push_customer(order_id).await;
                log_outcome("customer push", &outcome);
            }
            .boxed()
        });

        let this = Arc::clone(self);
        hooks.on_product_published(move |product_id| {
            let this = Arc::clone(&this);
            async move {
                let outcome = this.push_product(product_id).await;
                log_outcome("product push", &outcome);
            }
            .boxed()
        });

        let this = Arc::clone(self);
        hooks.on_admin_load(move |()| {
            let this = Arc::clone(&this);
            async move {
                this.run_pending_imports().await;
            }
            .boxed()
        });
    }

    /// Push the customer behind a new order.
    ///
    /// Skipped while sync-on-create is off, while not connected and until
    /// the first bulk import has created the customer list.
    #[instrument(skip(self))]
    pub async fn push_customer(&self, order_id: OrderId) -> SyncOutcome<u16> {
        let kind = SyncKind::Customers;
        let (credentials, state) = match self.push_context(kind).await {
            Ok(context) => context,
            Err(outcome) => return outcome,
        };

        let record = match self.reader.read_customer(order_id).await {
            Ok(Some(record)) => record,
            Ok(None) => return SyncOutcome::Skipped(SkipReason::OrderNotFound),
            Err(e) => return SyncOutcome::Failed(e.into()),
        };

        self.client
            .push_single_customer(
                Some(&credentials),
                state.list_id.as_ref(),
                &self.list_name(kind),
                &record,
            )
            .await
    }

    /// Push a product that has just been published.
    ///
    /// Same gating as [`Self::push_customer`]. Products without a SKU are
    /// still pushed.
    #[instrument(skip(self))]
    pub async fn push_product(&self, product_id: ProductId) -> SyncOutcome<u16> {
        let kind = SyncKind::Products;
        let (credentials, state) = match self.push_context(kind).await {
            Ok(context) => context,
            Err(outcome) => return outcome,
        };

        let record = match self.reader.read_product(product_id).await {
            Ok(Some(record)) => record,
            Ok(None) => return SyncOutcome::Skipped(SkipReason::ProductNotFound),
            Err(e) => return SyncOutcome::Failed(e.into()),
        };

        self.client
            .push_single_product(
                Some(&credentials),
                state.list_id.as_ref(),
                &self.list_name(kind),
                &record,
            )
            .await
    }

    /// Credentials and state for a single push, or the outcome that ends it.
    async fn push_context(
        &self,
        kind: SyncKind,
    ) -> Result<(Credentials, SyncState), SyncOutcome<u16>> {
        let state = self
            .sync_state(kind)
            .await
            .map_err(|e| SyncOutcome::Failed(e.into()))?;
        if !state.sync_on_create {
            return Err(SyncOutcome::Skipped(SkipReason::SyncDisabled));
        }

        let Some(credentials) = self
            .credentials()
            .await
            .map_err(|e| SyncOutcome::Failed(e.into()))?
        else {
            return Err(SyncOutcome::Skipped(SkipReason::NotConnected));
        };
        if state.list_id.is_none() {
            warn!(%kind, "No Shown list yet; dropping single push until the first bulk import");
            return Err(SyncOutcome::Skipped(SkipReason::MissingListId));
        }

        Ok((credentials, state))
    }

    /// Run the one-time bulk import for a kind.
    ///
    /// Imports for the same kind are serialized, and the "already imported"
    /// marker is re-read once the lock is held. On HTTP 200 with a list ID
    /// the marker is set and the list ID stored; any other answer leaves
    /// both untouched so the next admin load tries again.
    #[instrument(skip(self))]
    pub async fn import_all(&self, kind: SyncKind) -> SyncOutcome<ImportReport> {
        let _guard = match kind {
            SyncKind::Customers => self.customer_import.lock().await,
            SyncKind::Products => self.product_import.lock().await,
        };

        let state = match self.sync_state(kind).await {
            Ok(state) => state,
            Err(e) => return SyncOutcome::Failed(e.into()),
        };
        if !state.sync_all {
            return SyncOutcome::Skipped(SkipReason::SyncDisabled);
        }
        if state.has_imported_all {
            return SyncOutcome::Skipped(SkipReason::AlreadyImported);
        }

        let credentials = match self.credentials().await {
            Ok(Some(credentials)) => credentials,
            Ok(None) => return SyncOutcome::Skipped(SkipReason::NotConnected),
            Err(e) => return SyncOutcome::Failed(e.into()),
        };

        match self.send_batch(kind, &credentials, state.list_id.as_ref()).await {
            Ok(Some((records, result))) => self.reconcile(kind, records, &result).await,
            Ok(None) => SyncOutcome::Skipped(SkipReason::NothingToSync),
            Err(e) => SyncOutcome::Failed(e),
        }
    }

    /// Read every record of a kind and upload it in one request.
    async fn send_batch(
        &self,
        kind: SyncKind,
        credentials: &Credentials,
        list_id: Option<&ListId>,
    ) -> Result<Option<(usize, HttpResult)>, ConnectorError> {
        let list_name = self.list_name(kind);
        match kind {
            SyncKind::Customers => {
                let records = self.reader.read_all_customers().await?;
                if records.is_empty() {
                    return Ok(None);
                }
                let result = self
                    .client
                    .bulk_upsert_customers(credentials, list_id, &list_name, &records)
                    .await?;
                Ok(Some((records.len(), result)))
            }
            SyncKind::Products => {
                let records = self.reader.read_all_products().await?;
                if records.is_empty() {
                    return Ok(None);
                }
                let result = self
                    .client
                    .bulk_upsert_products(credentials, &list_name, &records)
                    .await?;
                Ok(Some((records.len(), result)))
            }
        }
    }

    /// Persist the outcome of an accepted bulk upload.
    async fn reconcile(
        &self,
        kind: SyncKind,
        records: usize,
        result: &HttpResult,
    ) -> SyncOutcome<ImportReport> {
        if !result.is_ok() {
            return SyncOutcome::Failed(
                ShownError::Status {
                    operation: import_operation(kind),
                    status: result.status,
                }
                .into(),
            );
        }
        let list_id = match result.list_id() {
            Ok(list_id) => list_id,
            Err(e) => return SyncOutcome::Failed(e.into()),
        };

        let persisted = async {
            self.options
                .set(OptionKey::list_id(kind), Value::String(list_id.to_string()))
                .await?;
            self.options
                .set_bool(OptionKey::has_imported_all(kind), true)
                .await
        };
        if let Err(e) = persisted.await {
            return SyncOutcome::Failed(e.into());
        }

        info!(%kind, records, %list_id, "Bulk import accepted by Shown");
        SyncOutcome::Completed(ImportReport {
            kind,
            records,
            list_id,
        })
    }

    /// Run the bulk import of every kind that is enabled and not yet done.
    pub async fn run_pending_imports(&self) -> Vec<(SyncKind, SyncOutcome<ImportReport>)> {
        let mut outcomes = Vec::with_capacity(SyncKind::ALL.len());
        for kind in SyncKind::ALL {
            let outcome = match self.sync_state(kind).await {
                Ok(state) if state.needs_import() => self.import_all(kind).await,
                Ok(state) if state.has_imported_all => {
                    SyncOutcome::Skipped(SkipReason::AlreadyImported)
                }
                Ok(_) => SyncOutcome::Skipped(SkipReason::SyncDisabled),
                Err(e) => SyncOutcome::Failed(e.into()),
            };
            log_outcome("bulk import", &outcome);
            outcomes.push((kind, outcome));
        }
        outcomes
    }
}

const fn import_operation(kind: SyncKind) -> &'static str {
    match kind {
        SyncKind::Customers => "importing customers",
        SyncKind::Products => "importing products",
    }
}

fn log_outcome<T: fmt::Display>(operation: &str, outcome: &SyncOutcome<T>) {
    match outcome {
        SyncOutcome::Completed(value) => info!(operation, %value, "Sync completed"),
        SyncOutcome::Skipped(reason) => info!(operation, %reason, "Sync skipped"),
        SyncOutcome::Failed(e) => warn!(operation, error = %e.display_message(), "Sync failed"),
    }
}

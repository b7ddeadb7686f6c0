//! Sync commands.

use shown_connector::{ConnectorState, SyncOutcome};
use shown_connector_core::{OrderId, PostStatus, ProductId, StatusTransition};
use tracing::info;

/// Run the bulk imports that are enabled and not yet done.
///
/// # Errors
///
/// Returns an error if any import failed, after all were attempted.
pub async fn run(state: &ConnectorState) -> Result<(), Box<dyn std::error::Error>> {
    let outcomes = state.orchestrator().run_pending_imports().await;

    let mut failed = 0;
    for (kind, outcome) in &outcomes {
        info!(%kind, %outcome, "Import finished");
        if let SyncOutcome::Failed(_) = outcome {
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(format!("{failed} import(s) failed; they will be retried on the next sync").into());
    }
    Ok(())
}

/// Dispatch a new order through the hooks.
pub async fn order_created(state: &ConnectorState, order_id: u64) {
    state.hooks().order_created(OrderId::new(order_id)).await;
}

/// Dispatch a product status change through the hooks.
pub async fn product_status(state: &ConnectorState, product_id: u64, from: &str, to: &str) {
    let transition = StatusTransition {
        post_id: ProductId::new(product_id),
        post_type: StatusTransition::PRODUCT_POST_TYPE.to_owned(),
        old_status: from.parse().unwrap_or_else(|never| match never {}),
        new_status: to.parse().unwrap_or_else(|never| match never {}),
    };
    state.hooks().post_transitioned(&transition).await;
}

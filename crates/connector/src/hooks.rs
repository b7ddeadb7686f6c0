//! Host lifecycle subscriptions.
//!
//! The host adapter owns a [`Hooks`] registry and drives it when its own
//! events fire: a new order, a post changing status, an admin page load.
//! Handlers never fail the host event; whatever they do is logged where it
//! happens.

use futures::future::BoxFuture;
use shown_connector_core::{OrderId, ProductId, StatusTransition};
use tracing::debug;

/// Handler signature for an event carrying `E`.
pub type HandlerFn<E> = Box<dyn Fn(E) -> BoxFuture<'static, ()> + Send + Sync>;

/// Registry of event handlers.
#[derive(Default)]
pub struct Hooks {
    order_created: Vec<HandlerFn<OrderId>>,
    product_published: Vec<HandlerFn<ProductId>>,
    admin_load: Vec<HandlerFn<()>>,
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("order_created", &self.order_created.len())
            .field("product_published", &self.product_published.len())
            .field("admin_load", &self.admin_load.len())
            .finish()
    }
}

impl Hooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `handler` for every new order.
    pub fn on_order_created(
        &mut self,
        handler: impl Fn(OrderId) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    ) {
        self.order_created.push(Box::new(handler));
    }

    /// Run `handler` when a product becomes published.
    pub fn on_product_published(
        &mut self,
        handler: impl Fn(ProductId) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    ) {
        self.product_published.push(Box::new(handler));
    }

    /// Run `handler` when an admin page loads.
    pub fn on_admin_load(
        &mut self,
        handler: impl Fn(()) -> BoxFuture<'static, ()> + Send + Sync + 'static,
    ) {
        self.admin_load.push(Box::new(handler));
    }

    /// Dispatch a new order.
    pub async fn order_created(&self, order_id: OrderId) {
        for handler in &self.order_created {
            handler(order_id).await;
        }
    }

    /// Dispatch a post status change. Only products moving into `publish`
    /// reach the product handlers.
    pub async fn post_transitioned(&self, transition: &StatusTransition) {
        if !transition.is_product_publication() {
            debug!(
                post_id = %transition.post_id,
                post_type = %transition.post_type,
                old = %transition.old_status,
                new = %transition.new_status,
                "Ignoring status transition"
            );
            return;
        }
        for handler in &self.product_published {
            handler(transition.post_id).await;
        }
    }

    /// Dispatch an admin page load.
    pub async fn admin_load(&self) {
        for handler in &self.admin_load {
            handler(()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    use futures::FutureExt;
    use shown_connector_core::PostStatus;

    use super::*;

    fn transition(post_type: &str, old: PostStatus, new: PostStatus) -> StatusTransition {
        StatusTransition {
            post_id: ProductId::new(9),
            post_type: post_type.to_owned(),
            old_status: old,
            new_status: new,
        }
    }

    #[tokio::test]
    async fn test_only_publication_reaches_product_handlers() {
        let seen = Arc::new(AtomicU64::new(0));
        let mut hooks = Hooks::new();
        let counter = Arc::clone(&seen);
        hooks.on_product_published(move |id| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(id.as_u64(), Ordering::SeqCst);
            }
            .boxed()
        });

        hooks
            .post_transitioned(&transition("product", PostStatus::Publish, PostStatus::Publish))
            .await;
        hooks
            .post_transitioned(&transition("page", PostStatus::Draft, PostStatus::Publish))
            .await;
        hooks
            .post_transitioned(&transition("product", PostStatus::Publish, PostStatus::Draft))
            .await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        hooks
            .post_transitioned(&transition("product", PostStatus::Draft, PostStatus::Publish))
            .await;
        assert_eq!(seen.load(Ordering::SeqCst), 9);
    }

    #[tokio::test]
    async fn test_every_handler_runs() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut hooks = Hooks::new();
        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            hooks.on_order_created(move |_| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                }
                .boxed()
            });
        }

        hooks.order_created(OrderId::new(1)).await;
        hooks.admin_load().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

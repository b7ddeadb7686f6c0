//! Shown connector library.
//!
//! Keeps a WooCommerce store's customers and products in sync with Shown
//! and produces the storefront markup that carries Shown's tracking pixel.
//!
//! # Components
//!
//! - [`store::StoreDataReader`] - extracts deduplicated customers and
//!   SKU-bearing products from a [`store::CommerceStore`]
//! - [`shown::ShownClient`] - authenticated calls to the Shown API
//! - [`sync::SyncOrchestrator`] - decides between bulk imports and single
//!   pushes from persisted [`options`], and persists what Shown returns
//! - [`events::PageEvents`] - cart and purchase events for the pixel
//!
//! The host adapter drives everything through [`hooks::Hooks`]; see
//! [`state::ConnectorState`] for the production wiring.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod events;
pub mod hooks;
pub mod options;
pub mod outcome;
pub mod shown;
pub mod state;
pub mod store;
pub mod storefront;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use config::ConnectorConfig;
pub use error::ConnectorError;
pub use outcome::{SkipReason, SyncOutcome};
pub use state::{ConnectorState, WooCommerceConnector};
pub use sync::{ImportReport, SyncOrchestrator};

//! Shown Connector Core - Shared types library.
//!
//! This crate provides the types shared by every Shown connector component:
//! - `shown-connector` - Sync pipeline, Shown API client, storefront markup
//! - `shown-cli` - Operator command-line tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Records, type-safe IDs, option keys, statuses and price resolution

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

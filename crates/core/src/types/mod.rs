//! Core types for the Shown connector.
//!
//! This module provides type-safe wrappers for the connector's domain concepts.

pub mod business;
pub mod credential;
pub mod id;
pub mod option_key;
pub mod price;
pub mod record;
pub mod status;

pub use business::{Business, VerificationTag};
pub use credential::Credentials;
pub use id::*;
pub use option_key::OptionKey;
pub use price::{parse_amount, resolve_price};
pub use record::{CustomerRecord, ProductRecord};
pub use status::*;

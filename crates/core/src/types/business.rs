//! Shown account metadata.

use serde::{Deserialize, Serialize};

use super::id::BusinessId;

/// A Shown business the connected account can act for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
}

/// A site-ownership verification tag, rendered as `<meta name content>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationTag {
    pub name: String,
    pub content: String,
}

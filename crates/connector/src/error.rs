//! Crate-level error type.

use thiserror::Error;

use crate::options::OptionsError;
use crate::shown::ShownError;
use crate::store::StoreError;

/// Any failure the connector surfaces to its host.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Talking to Shown failed.
    #[error(transparent)]
    Shown(#[from] ShownError),

    /// Reading the commerce store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Reading or writing persisted options failed.
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// Rendering storefront markup failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
}

impl ConnectorError {
    /// Short machine code for admin-facing messages.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Shown(e) => e.code(),
            Self::Store(_) => "store_error",
            Self::Options(_) => "options_error",
            Self::Render(_) => "render_error",
        }
    }

    /// Message in the form the admin page shows it: `Error (<code>): <message>`.
    #[must_use]
    pub fn display_message(&self) -> String {
        format!("Error ({}): {self}", self.code())
    }
}

//! Result of a sync operation.
//!
//! Missing configuration is not an error: an unconnected site or a list that
//! has not been created yet simply skips the work. Transport, protocol and
//! decode failures are real errors and are carried as such.

use crate::error::ConnectorError;

/// Why an operation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No access token or business ID is stored.
    NotConnected,
    /// No Shown list exists yet for this kind.
    MissingListId,
    /// The kind's sync setting is off.
    SyncDisabled,
    /// The bulk import already succeeded once.
    AlreadyImported,
    /// The store returned no records to send.
    NothingToSync,
    /// The order the event refers to does not exist.
    OrderNotFound,
    /// The product the event refers to does not exist.
    ProductNotFound,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::NotConnected => "not connected to Shown",
            Self::MissingListId => "no Shown list yet",
            Self::SyncDisabled => "sync disabled",
            Self::AlreadyImported => "already imported",
            Self::NothingToSync => "nothing to sync",
            Self::OrderNotFound => "order not found",
            Self::ProductNotFound => "product not found",
        };
        f.write_str(reason)
    }
}

/// Outcome of a sync operation.
#[derive(Debug)]
#[must_use]
pub enum SyncOutcome<T> {
    /// Nothing was attempted.
    Skipped(SkipReason),
    /// The operation ran to completion.
    Completed(T),
    /// The operation was attempted and failed.
    Failed(ConnectorError),
}

impl<T> SyncOutcome<T> {
    /// Whether the operation completed.
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Whether the operation was skipped.
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Whether the operation failed.
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The skip reason, if skipped.
    pub const fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Skipped(reason) => Some(*reason),
            _ => None,
        }
    }

    /// The completed value, if any.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }

    /// Transform the completed value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SyncOutcome<U> {
        match self {
            Self::Skipped(reason) => SyncOutcome::Skipped(reason),
            Self::Completed(value) => SyncOutcome::Completed(f(value)),
            Self::Failed(err) => SyncOutcome::Failed(err),
        }
    }
}

impl<T, E: Into<ConnectorError>> From<Result<T, E>> for SyncOutcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Completed(value),
            Err(err) => Self::Failed(err.into()),
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for SyncOutcome<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped(reason) => write!(f, "skipped ({reason})"),
            Self::Completed(value) => write!(f, "completed ({value})"),
            Self::Failed(err) => write!(f, "failed: {}", err.display_message()),
        }
    }
}

//! Status enums for store entities and sync kinds.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// WordPress post status, as carried by products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PostStatus {
    Publish,
    Future,
    #[default]
    Draft,
    Pending,
    Private,
    Trash,
    AutoDraft,
    Inherit,
    /// A status registered by a plugin.
    #[serde(untagged)]
    Other(String),
}

impl PostStatus {
    /// Whether the post is publicly visible.
    #[must_use]
    pub const fn is_published(&self) -> bool {
        matches!(self, Self::Publish)
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Publish => write!(f, "publish"),
            Self::Future => write!(f, "future"),
            Self::Draft => write!(f, "draft"),
            Self::Pending => write!(f, "pending"),
            Self::Private => write!(f, "private"),
            Self::Trash => write!(f, "trash"),
            Self::AutoDraft => write!(f, "auto-draft"),
            Self::Inherit => write!(f, "inherit"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "publish" => Self::Publish,
            "future" => Self::Future,
            "draft" => Self::Draft,
            "pending" => Self::Pending,
            "private" => Self::Private,
            "trash" => Self::Trash,
            "auto-draft" => Self::AutoDraft,
            "inherit" => Self::Inherit,
            other => Self::Other(other.to_owned()),
        })
    }
}

/// A post moving from one status to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub post_id: ProductId,
    /// WordPress post type (`product`, `post`, `page`, ...).
    pub post_type: String,
    pub old_status: PostStatus,
    pub new_status: PostStatus,
}

impl StatusTransition {
    /// Post type used by WooCommerce products.
    pub const PRODUCT_POST_TYPE: &'static str = "product";

    /// True when a product becomes published for the first time in this
    /// transition. Edits to an already published product do not count.
    #[must_use]
    pub fn is_product_publication(&self) -> bool {
        self.post_type == Self::PRODUCT_POST_TYPE
            && self.new_status.is_published()
            && !self.old_status.is_published()
    }
}

/// The two kinds of data synced to Shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncKind {
    Customers,
    Products,
}

impl SyncKind {
    /// Both kinds, customers first.
    pub const ALL: [Self; 2] = [Self::Customers, Self::Products];

    /// Suffix of the Shown list name for this kind.
    #[must_use]
    pub const fn list_label(self) -> &'static str {
        match self {
            Self::Customers => "Customers",
            Self::Products => "Products",
        }
    }
}

impl std::fmt::Display for SyncKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customers => write!(f, "customers"),
            Self::Products => write!(f, "products"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn transition(post_type: &str, old: PostStatus, new: PostStatus) -> StatusTransition {
        StatusTransition {
            post_id: ProductId::new(7),
            post_type: post_type.to_owned(),
            old_status: old,
            new_status: new,
        }
    }

    #[test]
    fn test_draft_to_publish_is_publication() {
        assert!(transition("product", PostStatus::Draft, PostStatus::Publish).is_product_publication());
    }

    #[test]
    fn test_publish_to_publish_is_not_publication() {
        assert!(!transition("product", PostStatus::Publish, PostStatus::Publish).is_product_publication());
    }

    #[test]
    fn test_unpublish_is_not_publication() {
        assert!(!transition("product", PostStatus::Publish, PostStatus::Draft).is_product_publication());
    }

    #[test]
    fn test_non_product_is_ignored() {
        assert!(!transition("post", PostStatus::Draft, PostStatus::Publish).is_product_publication());
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for raw in ["publish", "draft", "auto-draft", "wc-custom"] {
            let status: PostStatus = raw.parse().unwrap();
            assert_eq!(status.to_string(), raw);
        }
    }

    #[test]
    fn test_status_serde_unknown_value() {
        let status: PostStatus = serde_json::from_str("\"wc-custom\"").unwrap();
        assert_eq!(status, PostStatus::Other("wc-custom".to_owned()));
        let status: PostStatus = serde_json::from_str("\"auto-draft\"").unwrap();
        assert_eq!(status, PostStatus::AutoDraft);
    }
}

//! Keys of the persisted connector options.

use super::status::SyncKind;

/// Every option the connector persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    AccessToken,
    BusinessId,
    SnippetUrl,
    SyncCustomersOnCreate,
    SyncAllCustomers,
    HasImportedAllCustomers,
    CustomerListId,
    SyncProductsOnCreate,
    SyncAllProducts,
    HasImportedAllProducts,
    ProductListId,
    EnableWebsiteOwnershipVerification,
    WebsiteOwnershipVerificationTags,
}

impl OptionKey {
    /// All keys, in the order they are cleared on disconnect.
    pub const ALL: [Self; 13] = [
        Self::AccessToken,
        Self::BusinessId,
        Self::SnippetUrl,
        Self::HasImportedAllCustomers,
        Self::SyncCustomersOnCreate,
        Self::SyncAllCustomers,
        Self::CustomerListId,
        Self::HasImportedAllProducts,
        Self::SyncProductsOnCreate,
        Self::SyncAllProducts,
        Self::ProductListId,
        Self::EnableWebsiteOwnershipVerification,
        Self::WebsiteOwnershipVerificationTags,
    ];

    /// Storage name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::BusinessId => "business_id",
            Self::SnippetUrl => "snippet_url",
            Self::SyncCustomersOnCreate => "sync_customers_on_create",
            Self::SyncAllCustomers => "sync_all_customers",
            Self::HasImportedAllCustomers => "has_imported_all_customers",
            Self::CustomerListId => "customer_list_id",
            Self::SyncProductsOnCreate => "sync_products_on_create",
            Self::SyncAllProducts => "sync_all_products",
            Self::HasImportedAllProducts => "has_imported_all_products",
            Self::ProductListId => "product_list_id",
            Self::EnableWebsiteOwnershipVerification => "enable_website_ownership_verification",
            Self::WebsiteOwnershipVerificationTags => "website_ownership_verification_tags",
        }
    }

    /// `sync_*_on_create` key for a kind.
    #[must_use]
    pub const fn sync_on_create(kind: SyncKind) -> Self {
        match kind {
            SyncKind::Customers => Self::SyncCustomersOnCreate,
            SyncKind::Products => Self::SyncProductsOnCreate,
        }
    }

    /// `sync_all_*` key for a kind.
    #[must_use]
    pub const fn sync_all(kind: SyncKind) -> Self {
        match kind {
            SyncKind::Customers => Self::SyncAllCustomers,
            SyncKind::Products => Self::SyncAllProducts,
        }
    }

    /// `has_imported_all_*` key for a kind.
    #[must_use]
    pub const fn has_imported_all(kind: SyncKind) -> Self {
        match kind {
            SyncKind::Customers => Self::HasImportedAllCustomers,
            SyncKind::Products => Self::HasImportedAllProducts,
        }
    }

    /// `*_list_id` key for a kind.
    #[must_use]
    pub const fn list_id(kind: SyncKind) -> Self {
        match kind {
            SyncKind::Customers => Self::CustomerListId,
            SyncKind::Products => Self::ProductListId,
        }
    }
}

impl std::fmt::Display for OptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

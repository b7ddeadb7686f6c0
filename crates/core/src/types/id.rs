//! Newtype IDs for type-safe entity references.
//!
//! Store entities (orders, products) are addressed by the numeric post IDs
//! WooCommerce assigns. Shown entities (businesses, lists) are opaque strings
//! handed out by the remote platform.

/// Macro to define a type-safe numeric ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_u64()`
/// - `From<u64>` and `Into<u64>` implementations
///
/// # Example
///
/// ```rust
/// # use shown_connector_core::define_id;
/// define_id!(CouponId);
/// define_id!(RefundId);
///
/// let coupon_id = CouponId::new(1);
/// let refund_id = RefundId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: CouponId = refund_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create a new ID from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying u64 value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Macro to define a type-safe opaque string ID wrapper.
///
/// Identifiers issued by Shown are treated as opaque text; the API is free to
/// return them as JSON strings or numbers, and both deserialize into the same
/// wrapper.
#[macro_export]
macro_rules! define_string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the ID and returns its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                match ::serde_json::Value::deserialize(deserializer)? {
                    ::serde_json::Value::String(s) => Ok(Self(s)),
                    ::serde_json::Value::Number(n) => Ok(Self(n.to_string())),
                    other => Err(<D::Error as ::serde::de::Error>::custom(format!(
                        "expected string or number identifier, got {other}"
                    ))),
                }
            }
        }
    };
}

// Store entity IDs
define_id!(OrderId);
define_id!(ProductId);
define_id!(VariationId);

// Shown entity IDs
define_string_id!(BusinessId);
define_string_id!(ListId);

//! Shown connection credentials.
//!
//! Issued by the Shown login redirect and sent with every API request.

use secrecy::{ExposeSecret, SecretString};

use super::id::BusinessId;

/// Bearer token and business identifier for the Shown API.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct Credentials {
    access_token: SecretString,
    business_id: BusinessId,
}

impl Credentials {
    /// Create credentials from a token and business ID.
    #[must_use]
    pub const fn new(access_token: SecretString, business_id: BusinessId) -> Self {
        Self {
            access_token,
            business_id,
        }
    }

    /// Build credentials from optional stored values.
    ///
    /// Returns `None` when either value is missing or empty, which callers
    /// treat as "not connected".
    #[must_use]
    pub fn from_parts(access_token: Option<String>, business_id: Option<String>) -> Option<Self> {
        let access_token = access_token.filter(|t| !t.is_empty())?;
        let business_id = business_id.filter(|b| !b.is_empty())?;
        Some(Self::new(
            SecretString::from(access_token),
            BusinessId::new(business_id),
        ))
    }

    /// The bearer token.
    #[must_use]
    pub const fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    /// The business the token acts for.
    #[must_use]
    pub const fn business_id(&self) -> &BusinessId {
        &self.business_id
    }

    /// Same token, acting for a different business.
    #[must_use]
    pub fn with_business(&self, business_id: BusinessId) -> Self {
        Self::new(
            SecretString::from(self.access_token.expose_secret().to_owned()),
            business_id,
        )
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"[REDACTED]")
            .field("business_id", &self.business_id)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_requires_both() {
        assert!(Credentials::from_parts(Some("tok".into()), None).is_none());
        assert!(Credentials::from_parts(None, Some("42".into())).is_none());
        assert!(Credentials::from_parts(Some(String::new()), Some("42".into())).is_none());
        assert!(Credentials::from_parts(Some("tok".into()), Some("42".into())).is_some());
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::from_parts(Some("super_secret".into()), Some("42".into())).unwrap();
        let debug_output = format!("{creds:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains("42"));
        assert!(!debug_output.contains("super_secret"));
    }

    #[test]
    fn test_with_business_keeps_token() {
        let creds = Credentials::from_parts(Some("tok".into()), Some("1".into())).unwrap();
        let other = creds.with_business(BusinessId::new("2"));
        assert_eq!(other.business_id().as_str(), "2");
        assert_eq!(other.access_token().expose_secret(), "tok");
    }
}

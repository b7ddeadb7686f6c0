//! Connector configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOWN_DATABASE_URL` - `PostgreSQL` connection string for the option store
//!   (falls back to `DATABASE_URL`)
//! - `SITE_URL` - Public URL of the WordPress site
//! - `WOOCOMMERCE_URL` - Base URL of the WooCommerce installation
//! - `WOOCOMMERCE_CONSUMER_KEY` - REST API consumer key
//! - `WOOCOMMERCE_CONSUMER_SECRET` - REST API consumer secret
//!
//! ## Optional
//! - `SITE_NAME` - Site title used in Shown list names (default: WordPress)
//! - `SHOWN_BASE_URL` - Shown host (default: <https://shown.io>)
//! - `SHOWN_ADMIN_URL` - Connector admin page the login flow redirects back to
//!   (default: `<SITE_URL>/wp-admin/admin.php?page=shown-connector`)
//! - `SHOWN_CUSTOMER_CACHE_TTL_SECS` - Customer export cache lifetime (default: 3600)

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Default Shown host.
pub const DEFAULT_SHOWN_BASE_URL: &str = "https://shown.io";

/// Slug of the connector's admin page.
pub const ADMIN_PAGE_SLUG: &str = "shown-connector";

/// Default customer export cache lifetime.
pub const DEFAULT_CUSTOMER_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Connector configuration.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// `PostgreSQL` connection URL for the option store (contains password)
    pub database_url: SecretString,
    /// The WordPress site the connector runs for
    pub site: SiteConfig,
    /// Shown endpoints
    pub shown: ShownConfig,
    /// WooCommerce REST API access
    pub woocommerce: WooCommerceConfig,
    /// Lifetime of the cached customer export
    pub customer_cache_ttl: Duration,
}

/// Identity of the WordPress site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Site title, used to name Shown lists
    pub name: String,
    /// Public site URL, sent when requesting verification tags
    pub url: String,
    /// Connector admin page URL, the login flow redirects back here
    pub admin_url: String,
}

/// Shown endpoints.
#[derive(Debug, Clone)]
pub struct ShownConfig {
    /// Shown host, without trailing slash
    pub base_url: String,
}

/// WooCommerce REST API configuration.
///
/// Implements `Debug` manually to redact the consumer secret.
#[derive(Clone)]
pub struct WooCommerceConfig {
    /// Base URL of the WooCommerce site (REST root is `<url>/wp-json/wc/v3`)
    pub url: String,
    /// REST API consumer key
    pub consumer_key: String,
    /// REST API consumer secret
    pub consumer_secret: SecretString,
}

impl std::fmt::Debug for WooCommerceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WooCommerceConfig")
            .field("url", &self.url)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}

impl ConnectorConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SHOWN_DATABASE_URL")?;
        let site = SiteConfig::from_env()?;
        let shown = ShownConfig {
            base_url: trim_slash(&get_env_or_default("SHOWN_BASE_URL", DEFAULT_SHOWN_BASE_URL)),
        };
        let woocommerce = WooCommerceConfig::from_env()?;
        let customer_cache_ttl = get_env_or_default(
            "SHOWN_CUSTOMER_CACHE_TTL_SECS",
            &DEFAULT_CUSTOMER_CACHE_TTL.as_secs().to_string(),
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SHOWN_CUSTOMER_CACHE_TTL_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            database_url,
            site,
            shown,
            woocommerce,
            customer_cache_ttl,
        })
    }
}

impl SiteConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = trim_slash(&get_required_env("SITE_URL")?);
        url::Url::parse(&url)
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_URL".to_string(), e.to_string()))?;
        let admin_url = get_optional_env("SHOWN_ADMIN_URL")
            .unwrap_or_else(|| format!("{url}/wp-admin/admin.php?page={ADMIN_PAGE_SLUG}"));

        Ok(Self {
            name: get_env_or_default("SITE_NAME", "WordPress"),
            url,
            admin_url,
        })
    }
}

impl ShownConfig {
    /// REST API root.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("{}/api", self.base_url)
    }

    /// Login page that starts the connect flow.
    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}/login/wordpress/external", self.base_url)
    }
}

impl Default for ShownConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SHOWN_BASE_URL.to_string(),
        }
    }
}

impl WooCommerceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = trim_slash(&get_required_env("WOOCOMMERCE_URL")?);
        url::Url::parse(&url)
            .map_err(|e| ConfigError::InvalidEnvVar("WOOCOMMERCE_URL".to_string(), e.to_string()))?;

        Ok(Self {
            url,
            consumer_key: get_required_env("WOOCOMMERCE_CONSUMER_KEY")?,
            consumer_secret: get_validated_secret("WOOCOMMERCE_CONSUMER_SECRET")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn trim_slash(value: &str) -> String {
    value.trim_end_matches('/').to_string()
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the secret WooCommerce generated."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-consumer-secret", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("cs_aaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_woocommerce_shaped() {
        let result =
            validate_secret_strength("cs_4f1c9e0b7a2d68e35c91b0f4a7d2e86c1b9f3a05", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_shown_urls() {
        let shown = ShownConfig {
            base_url: "https://staging.shown.io".to_string(),
        };
        assert_eq!(shown.api_url(), "https://staging.shown.io/api");
        assert_eq!(
            shown.login_url(),
            "https://staging.shown.io/login/wordpress/external"
        );
        assert_eq!(ShownConfig::default().api_url(), "https://shown.io/api");
    }

    #[test]
    fn test_trim_slash() {
        assert_eq!(trim_slash("https://shop.example/"), "https://shop.example");
        assert_eq!(trim_slash("https://shop.example"), "https://shop.example");
    }

    #[test]
    fn test_woocommerce_config_debug_redacts_secret() {
        let config = WooCommerceConfig {
            url: "https://shop.example".to_string(),
            consumer_key: "ck_visible".to_string(),
            consumer_secret: SecretString::from("cs_super_private"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("ck_visible"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("cs_super_private"));
    }
}

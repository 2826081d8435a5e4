//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the server starts with development defaults.
//!
//! - `CLOUDMART_HOST` - Bind address (default: 127.0.0.1)
//! - `CLOUDMART_PORT` - Listen port (default: 8000)
//! - `CLOUDMART_STORE` - Document store backend: `postgres`, `memory` or `none`
//!   (default: `postgres` when a database URL is set, otherwise `none`)
//! - `CLOUDMART_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `JWT_SECRET_KEY` - Token signing secret (default: development key, logged as a warning)
//! - `CLOUDMART_TOKEN_TTL_MINUTES` - Access token lifetime (default: 60)
//! - `CLOUDMART_DEMO_USERNAME` - Demo account username (default: demo)
//! - `CLOUDMART_DEMO_PASSWORD` - Demo account password (default: demo123)
//! - `CLOUDMART_DEPLOYED_VIA` - Deployment label reported by `/health` (default: container)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Signing secret used when `JWT_SECRET_KEY` is not set.
pub const DEV_JWT_SECRET: &str = "cloudmart-dev-secret-key";

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
const MIN_SIGNING_KEY_LEN: usize = 32;
const MIN_SIGNING_KEY_BITS_PER_BYTE: f64 = 3.3;

/// Fragments that mark a signing key as copied from a template.
const TEMPLATE_MARKERS: &[&str] = &[
    "changeme",
    "secret-key",
    "your-",
    "example",
    "placeholder",
    "xxx",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Why a configured signing key is considered weak.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SigningKeyWeakness {
    #[error("JWT_SECRET_KEY is {0} bytes, use at least 32")]
    TooShort(usize),
    #[error("JWT_SECRET_KEY looks like a template value (contains '{0}')")]
    Template(&'static str),
    #[error("JWT_SECRET_KEY is too repetitive ({0:.2} bits per byte)")]
    LowEntropy(f64),
}

/// Which document store backend to use.
#[derive(Clone)]
pub enum StoreBackend {
    /// No store configured: reads return empty results, writes fail.
    None,
    /// Process-local in-memory store (not durable).
    Memory,
    /// `PostgreSQL` JSONB document store.
    Postgres {
        /// Connection URL (contains password)
        database_url: SecretString,
    },
}

impl std::fmt::Debug for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Memory => f.write_str("Memory"),
            Self::Postgres { .. } => f
                .debug_struct("Postgres")
                .field("database_url", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Credentials of the single demo account.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct DemoAccount {
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for DemoAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DemoAccount")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Default for DemoAccount {
    fn default() -> Self {
        Self {
            username: "demo".to_string(),
            password: SecretString::from("demo123"),
        }
    }
}

/// Bearer token settings.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC signing secret
    pub secret: SecretString,
    /// Lifetime of issued tokens in minutes
    pub ttl_minutes: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: SecretString::from(DEV_JWT_SECRET),
            ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
        }
    }
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Document store backend
    pub store: StoreBackend,
    /// Bearer token settings
    pub token: TokenConfig,
    /// The single account accepted by `/auth/login`
    pub demo_account: DemoAccount,
    /// Deployment label reported by the health endpoint
    pub deployed_via: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
            store: StoreBackend::None,
            token: TokenConfig::default(),
            demo_account: DemoAccount::default(),
            deployed_via: "container".to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("CLOUDMART_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CLOUDMART_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("CLOUDMART_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CLOUDMART_PORT".to_string(), e.to_string())
            })?;

        let store = parse_store_backend(
            get_optional_env("CLOUDMART_STORE").as_deref(),
            get_database_url("CLOUDMART_DATABASE_URL"),
        )?;

        let token = TokenConfig::from_env()?;

        let defaults = DemoAccount::default();
        let demo_account = DemoAccount {
            username: get_optional_env("CLOUDMART_DEMO_USERNAME").unwrap_or(defaults.username),
            password: get_optional_env("CLOUDMART_DEMO_PASSWORD")
                .map_or(defaults.password, SecretString::from),
        };

        Ok(Self {
            host,
            port,
            store,
            token,
            demo_account,
            deployed_via: get_env_or_default("CLOUDMART_DEPLOYED_VIA", "container"),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl TokenConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = get_optional_env("JWT_SECRET_KEY")
            .map_or_else(|| SecretString::from(DEV_JWT_SECRET), SecretString::from);

        let ttl_minutes = get_env_or_default(
            "CLOUDMART_TOKEN_TTL_MINUTES",
            &DEFAULT_TOKEN_TTL_MINUTES.to_string(),
        )
        .parse::<i64>()
        .ok()
        .filter(|minutes| *minutes > 0)
        .ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "CLOUDMART_TOKEN_TTL_MINUTES".to_string(),
                "must be a positive integer".to_string(),
            )
        })?;

        Ok(Self {
            secret,
            ttl_minutes,
        })
    }

    /// Problems with the signing secret worth logging at startup.
    ///
    /// A weak secret is allowed so the development default keeps working.
    #[must_use]
    pub fn secret_warning(&self) -> Option<String> {
        let secret = self.secret.expose_secret();
        if secret == DEV_JWT_SECRET {
            return Some("JWT_SECRET_KEY not set, using the development signing key".to_string());
        }
        signing_key_weakness(secret).map(|weakness| weakness.to_string())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Resolve the store backend from `CLOUDMART_STORE` and the database URL.
fn parse_store_backend(
    selector: Option<&str>,
    database_url: Option<SecretString>,
) -> Result<StoreBackend, ConfigError> {
    match (selector.map(str::to_ascii_lowercase).as_deref(), database_url) {
        (Some("none"), _) | (None, None) => Ok(StoreBackend::None),
        (Some("memory"), _) => Ok(StoreBackend::Memory),
        (Some("postgres") | None, Some(database_url)) => Ok(StoreBackend::Postgres { database_url }),
        (Some("postgres"), None) => Err(ConfigError::MissingEnvVar(
            "CLOUDMART_DATABASE_URL".to_string(),
        )),
        (Some(other), _) => Err(ConfigError::InvalidEnvVar(
            "CLOUDMART_STORE".to_string(),
            format!("unknown backend '{other}' (expected postgres, memory or none)"),
        )),
    }
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Bits of information per byte, from the byte frequency distribution.
fn bits_per_byte(key: &[u8]) -> f64 {
    if key.is_empty() {
        return 0.0;
    }

    let mut counts = [0_u32; 256];
    for &b in key {
        if let Some(n) = counts.get_mut(usize::from(b)) {
            *n += 1;
        }
    }

    let total = f64::from(u32::try_from(key.len()).unwrap_or(u32::MAX));
    counts
        .iter()
        .filter(|&&n| n > 0)
        .map(|&n| {
            let p = f64::from(n) / total;
            -p * p.log2()
        })
        .sum()
}

/// First reason the key should not be used outside development, if any.
fn signing_key_weakness(key: &str) -> Option<SigningKeyWeakness> {
    if key.len() < MIN_SIGNING_KEY_LEN {
        return Some(SigningKeyWeakness::TooShort(key.len()));
    }

    let lower = key.to_ascii_lowercase();
    if let Some(marker) = TEMPLATE_MARKERS.iter().copied().find(|m| lower.contains(m)) {
        return Some(SigningKeyWeakness::Template(marker));
    }

    let bits = bits_per_byte(key.as_bytes());
    (bits < MIN_SIGNING_KEY_BITS_PER_BYTE).then_some(SigningKeyWeakness::LowEntropy(bits))
}

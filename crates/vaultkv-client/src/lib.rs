//! HTTP client for the HashiCorp Vault KV v2 secrets engine.
//!
//! Wraps the handful of REST calls the demo needs over a versioned
//! key/value mount: write a secret, read a version, check the token, check
//! server health. Durability, encryption at rest, versioning, and access
//! control all live in the vault server; this crate only performs
//! authenticated round trips against it.
//!
//! # Example
//!
//! ```rust,no_run
//! use vaultkv_client::VaultClient;
//!
//! # async fn example() -> Result<(), vaultkv_client::VaultError> {
//! let client = VaultClient::from_env()?;
//! let mut data = vaultkv_client::SecretData::new();
//! data.insert("message".to_owned(), "Hello from Vault".into());
//! let written = client.put("my-secret", &data).await?;
//! let secret = client.get("my-secret").await?;
//! assert!(secret.metadata.version >= written.version);
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod types;

pub use error::VaultError;
pub use types::{HealthStatus, KvSecret, SecretData, TokenInfo, VersionMetadata};

use std::time::Duration;

const DEFAULT_ADDR: &str = "http://127.0.0.1:8200";
const DEFAULT_MOUNT: &str = "secret";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`VaultClient`].
///
/// Empty fields fall back to the process environment (`VAULT_ADDR`,
/// `VAULT_TOKEN`, `VAULT_MOUNT`) and then to the defaults, so
/// `VaultConfig::default()` resolves entirely from the environment.
#[derive(Debug, Clone, Default)]
pub struct VaultConfig {
    /// Server base URL. Default: `http://127.0.0.1:8200`.
    pub addr: String,
    /// Authentication token. Required for authenticated operations; the
    /// unauthenticated health endpoint works without one.
    pub token: String,
    /// KV v2 mount path. Default: `secret`.
    pub mount: String,
    /// Request timeout. Default: 10 seconds.
    pub timeout: Duration,
}

/// Client for a vault server's KV v2 secrets engine.
pub struct VaultClient {
    addr: String,
    token: String,
    mount: String,
    http: reqwest::Client,
}

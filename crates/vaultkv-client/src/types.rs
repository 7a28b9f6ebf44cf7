//! Public types for the Vault KV client.

use serde::{Deserialize, Serialize};

/// A secret payload: an arbitrary JSON object stored at a path.
pub type SecretData = serde_json::Map<String, serde_json::Value>;

/// A secret read from the KV engine: payload plus version metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct KvSecret {
    /// The stored key/value payload.
    pub data: SecretData,
    /// Metadata for the version that was read.
    pub metadata: VersionMetadata,
}

/// Version metadata the server attaches to every write and read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// ISO 8601 creation timestamp of this version.
    #[serde(default)]
    pub created_time: String,
    /// ISO 8601 soft-deletion timestamp, empty if live.
    #[serde(default)]
    pub deletion_time: String,
    /// Whether the version data has been permanently destroyed.
    #[serde(default)]
    pub destroyed: bool,
    /// Version number, starting at 1.
    #[serde(default)]
    pub version: u64,
}

/// Metadata for the token in use, from a lookup-self call.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    /// Human-readable token name.
    #[serde(default)]
    pub display_name: String,
    /// Policies attached to the token.
    #[serde(default)]
    pub policies: Vec<String>,
    /// Remaining time-to-live in seconds (0 = never expires).
    #[serde(default)]
    pub ttl: i64,
}

/// Server health, from the unauthenticated health endpoint.
///
/// Vault reports seal/standby states through non-2xx status codes with the
/// same body shape, so every field defaults rather than failing the decode.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    /// Whether the server has been initialized.
    #[serde(default)]
    pub initialized: bool,
    /// Whether the server is sealed.
    #[serde(default = "default_sealed")]
    pub sealed: bool,
    /// Server version string.
    #[serde(default)]
    pub version: String,
    /// Cluster name, if the server reports one.
    #[serde(default)]
    pub cluster_name: Option<String>,
}

fn default_sealed() -> bool {
    true
}

// --- Internal API response types ---

/// Generic `{"data": ...}` envelope the server wraps responses in.
#[derive(Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Deserialize)]
pub(crate) struct ListBody {
    #[serde(default)]
    pub keys: Vec<String>,
}

#[derive(Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<String>,
}

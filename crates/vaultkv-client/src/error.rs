//! Error types for the Vault KV client.

/// All errors that can occur when talking to the vault server.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Missing or invalid local configuration.
    #[error("vault config error: {0}")]
    Config(String),

    /// The server returned an HTTP error.
    #[error("vault API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the server's `errors` array.
        message: String,
    },

    /// Authentication failed (401/403).
    #[error("vault auth error: {0}")]
    Auth(String),

    /// No secret exists at the requested path (404).
    #[error("no secret found at path: {path}")]
    NotFound {
        /// The secret path that was requested.
        path: String,
    },

    /// Request timed out.
    #[error("vault request timed out")]
    Timeout,

    /// Network or HTTP client error.
    #[error("vault network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("vault json error: {0}")]
    Json(#[from] serde_json::Error),
}

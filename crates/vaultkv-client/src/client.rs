//! Vault KV v2 client implementation.

use reqwest::{Method, StatusCode};

use crate::error::VaultError;
use crate::types::{
    ApiErrorBody, DataEnvelope, HealthStatus, KvSecret, ListBody, SecretData, TokenInfo,
    VersionMetadata,
};
use crate::{VaultClient, VaultConfig, DEFAULT_ADDR, DEFAULT_MOUNT, DEFAULT_TIMEOUT};

impl VaultClient {
    /// Create a client with just a token. Address and mount come from the
    /// environment or the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(token: impl Into<String>) -> Result<Self, VaultError> {
        Self::with_config(VaultConfig {
            token: token.into(),
            ..VaultConfig::default()
        })
    }

    /// Create a client entirely from `VAULT_ADDR`, `VAULT_TOKEN`, and
    /// `VAULT_MOUNT`.
    ///
    /// A missing token is not an error here: unauthenticated operations
    /// (health) still work, and authenticated ones fail with
    /// `VaultError::Config` when first used.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_env() -> Result<Self, VaultError> {
        Self::with_config(VaultConfig::default())
    }

    /// Create a client with full configuration. Empty fields fall back to
    /// the environment, then to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[allow(clippy::needless_pass_by_value)]
    pub fn with_config(cfg: VaultConfig) -> Result<Self, VaultError> {
        let token = first_non_empty(&[&cfg.token, &env_var("VAULT_TOKEN")]);

        let addr = first_non_empty(&[&cfg.addr, &env_var("VAULT_ADDR"), DEFAULT_ADDR])
            .trim_end_matches('/')
            .to_owned();

        let mount = first_non_empty(&[&cfg.mount, &env_var("VAULT_MOUNT"), DEFAULT_MOUNT])
            .trim_matches('/')
            .to_owned();

        let timeout = if cfg.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            cfg.timeout
        };

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vaultkv-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(VaultError::Network)?;

        Ok(Self {
            addr,
            token,
            mount,
            http,
        })
    }

    /// Server base URL this client talks to.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// KV mount path this client operates under.
    #[must_use]
    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Write a secret payload at `path` (create-or-update).
    ///
    /// The server stores a new version and returns its metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid or the request fails.
    pub async fn put(&self, path: &str, data: &SecretData) -> Result<VersionMetadata, VaultError> {
        validate_path(path)?;
        let body = serde_json::json!({ "data": data });
        let resp: DataEnvelope<VersionMetadata> = self
            .request(Method::POST, self.data_url(path), None, Some(body))
            .await?;
        Ok(resp.data)
    }

    /// Read the latest version of the secret at `path`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if nothing is stored at the path.
    pub async fn get(&self, path: &str) -> Result<KvSecret, VaultError> {
        self.get_version(path, None).await
    }

    /// Read a specific version of the secret at `path`, or the latest when
    /// `version` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the path or version does not exist.
    pub async fn get_version(
        &self,
        path: &str,
        version: Option<u64>,
    ) -> Result<KvSecret, VaultError> {
        validate_path(path)?;
        let query = version.map(|v| ("version", v.to_string()));
        match self
            .request::<DataEnvelope<KvSecret>>(Method::GET, self.data_url(path), query, None)
            .await
        {
            Ok(resp) => Ok(resp.data),
            Err(VaultError::Api { status: 404, .. }) => Err(VaultError::NotFound {
                path: path.to_owned(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Soft-delete the latest version of the secret at `path`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if nothing is stored at the path.
    pub async fn delete(&self, path: &str) -> Result<(), VaultError> {
        validate_path(path)?;
        match self
            .request::<serde_json::Value>(Method::DELETE, self.data_url(path), None, None)
            .await
        {
            Ok(_) => Ok(()),
            Err(VaultError::Api { status: 404, .. }) => Err(VaultError::NotFound {
                path: path.to_owned(),
            }),
            Err(e) => Err(e),
        }
    }

    /// List secret key names under `prefix`. An empty prefix lists the mount
    /// root. Nested prefixes are reported with a trailing `/`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if no keys exist under the prefix.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, VaultError> {
        validate_prefix(prefix)?;
        let url = format!(
            "{}/v1/{}/metadata/{}",
            self.addr,
            self.mount,
            encode_path(prefix)
        );
        match self
            .request::<DataEnvelope<ListBody>>(
                Method::GET,
                url,
                Some(("list", "true".to_owned())),
                None,
            )
            .await
        {
            Ok(resp) => Ok(resp.data.keys),
            Err(VaultError::Api { status: 404, .. }) => Err(VaultError::NotFound {
                path: prefix.to_owned(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Look up the token this client authenticates with.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Auth` if the token is invalid or expired.
    pub async fn lookup_token(&self) -> Result<TokenInfo, VaultError> {
        let url = format!("{}/v1/auth/token/lookup-self", self.addr);
        let resp: DataEnvelope<TokenInfo> = self.request(Method::GET, url, None, None).await?;
        Ok(resp.data)
    }

    /// Whether the client's token is accepted by the server.
    ///
    /// An invalid or expired token yields `Ok(false)`; transport and server
    /// failures are still surfaced as errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached.
    pub async fn is_authenticated(&self) -> Result<bool, VaultError> {
        if self.token.is_empty() {
            return Ok(false);
        }
        match self.lookup_token().await {
            Ok(_) => Ok(true),
            Err(VaultError::Auth(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch server health from the unauthenticated health endpoint.
    ///
    /// Vault encodes sealed/standby/uninitialized states as non-2xx status
    /// codes with the same body shape, so any response with a parseable
    /// health body succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached or the body is not
    /// a health document.
    pub async fn health(&self) -> Result<HealthStatus, VaultError> {
        let url = format!("{}/v1/sys/health", self.addr);
        let resp = self.http.get(&url).send().await.map_err(map_transport)?;
        let status = resp.status();
        let text = resp.text().await.map_err(VaultError::Network)?;
        if text.is_empty() {
            return Err(VaultError::Api {
                status: status.as_u16(),
                message: "empty health response".to_owned(),
            });
        }
        serde_json::from_str(&text).map_err(VaultError::Json)
    }

    // --- Private ---

    fn data_url(&self, path: &str) -> String {
        format!(
            "{}/v1/{}/data/{}",
            self.addr,
            self.mount,
            encode_path(path)
        )
    }

    fn auth_token(&self) -> Result<&str, VaultError> {
        if self.token.is_empty() {
            return Err(VaultError::Config(
                "missing token: set VAULT_TOKEN or pass a token in the config".to_owned(),
            ));
        }
        Ok(&self.token)
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        query: Option<(&str, String)>,
        body: Option<serde_json::Value>,
    ) -> Result<T, VaultError> {
        let token = self.auth_token()?;
        let mut req = self
            .http
            .request(method, &url)
            .header("X-Vault-Token", token);

        if let Some((key, value)) = query {
            req = req.query(&[(key, value)]);
        }
        if let Some(ref b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(map_transport)?;
        let status = resp.status();

        if status.is_success() {
            let text = resp.text().await.map_err(VaultError::Network)?;
            if text.is_empty() {
                // DELETE responds 204 with no body.
                return serde_json::from_str("null").map_err(VaultError::Json);
            }
            return serde_json::from_str(&text).map_err(VaultError::Json);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .map(|b| b.errors.join("; "))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(VaultError::Auth(message));
        }

        Err(VaultError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn map_transport(err: reqwest::Error) -> VaultError {
    if err.is_timeout() {
        VaultError::Timeout
    } else {
        VaultError::Network(err)
    }
}

/// Percent-encode each path segment, preserving `/` separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn validate_path(path: &str) -> Result<(), VaultError> {
    if path.is_empty() {
        return Err(VaultError::Config(
            "secret path must not be empty".to_owned(),
        ));
    }
    validate_prefix(path)
}

fn validate_prefix(path: &str) -> Result<(), VaultError> {
    if path.contains("..") {
        return Err(VaultError::Config(
            "path traversal (..) is not allowed in secret paths".to_owned(),
        ));
    }
    if path.contains('\0') {
        return Err(VaultError::Config(
            "null bytes are not allowed in secret paths".to_owned(),
        ));
    }
    Ok(())
}

fn env_var(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

fn first_non_empty(vals: &[&str]) -> String {
    for v in vals {
        if !v.is_empty() {
            return (*v).to_owned();
        }
    }
    String::new()
}

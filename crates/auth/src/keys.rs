//! Trusted signing keys, indexed by key id (`kid`).
//!
//! The identity provider publishes its public keys as a JWKS document. Keys
//! rotate, so a token is always matched to a key by its `kid` header rather
//! than verified against a single default key.

use std::collections::HashMap;
use std::path::Path;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::jwk::JwkSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("failed to read key set: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse key set: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to fetch key set: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("key set contains no usable keys")]
    Empty,
}

#[derive(Clone, Default)]
pub struct TrustedKeys {
    keys: HashMap<String, DecodingKey>,
}

impl TrustedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, kid: impl Into<String>, key: DecodingKey) -> Self {
        self.insert(kid, key);
        self
    }

    pub fn insert(&mut self, kid: impl Into<String>, key: DecodingKey) {
        self.keys.insert(kid.into(), key);
    }

    /// Build from a JWKS document. Keys without a `kid` or of an unsupported
    /// type are skipped.
    pub fn from_jwks(set: &JwkSet) -> Self {
        let mut keys = HashMap::new();
        for jwk in &set.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                tracing::warn!("skipping JWK without kid");
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    keys.insert(kid, key);
                }
                Err(e) => tracing::warn!(%kid, error = %e, "skipping unusable JWK"),
            }
        }
        Self { keys }
    }

    pub fn from_json(json: &str) -> Result<Self, KeySetError> {
        let set: JwkSet = serde_json::from_str(json)?;
        Self::from_jwks(&set).non_empty()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KeySetError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Fetch the JWKS document once from the identity provider.
    pub async fn fetch(url: &str) -> Result<Self, KeySetError> {
        tracing::info!(%url, "fetching trusted signing keys");
        let set: JwkSet = reqwest::get(url)
            .await?
            .error_for_status()?
            .json()
            .await?;
        Self::from_jwks(&set).non_empty()
    }

    pub fn get(&self, kid: &str) -> Option<&DecodingKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    fn non_empty(self) -> Result<Self, KeySetError> {
        if self.is_empty() {
            Err(KeySetError::Empty)
        } else {
            Ok(self)
        }
    }
}

impl core::fmt::Debug for TrustedKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut kids: Vec<&str> = self.key_ids().collect();
        kids.sort_unstable();
        f.debug_struct("TrustedKeys").field("kids", &kids).finish()
    }
}

use async_trait::async_trait;
use std::{sync::Arc, time::Duration};

use crate::services::{
    cache::{CacheClient, CacheError, ValkeyClient},
    credential::Credential,
    session::store::{SessionError, SessionStore},
};

/// Session store backed by any `CacheClient` (Valkey in production).
///
/// Sessions are JSON-encoded credentials under `<prefix>:<session_id>`.
#[derive(Clone)]
pub struct ValkeySessionStore<C: CacheClient> {
    cache: Arc<C>,
    prefix: String,
}

impl ValkeySessionStore<ValkeyClient> {
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, CacheError> {
        let client = ValkeyClient::new(url).await?;
        Ok(Self::new_with_cache(Arc::new(client), prefix))
    }
}

impl<C: CacheClient> ValkeySessionStore<C> {
    pub fn new_with_cache(cache: Arc<C>, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, session_id: &str) -> String {
        format!("{}:{}", self.prefix, session_id)
    }

    /// Write a session. The login flow lives elsewhere; this is for seeding
    /// shared backends and tests.
    pub async fn put_credential(
        &self,
        session_id: &str,
        credential: &Credential,
        ttl: Duration,
    ) -> Result<(), SessionError> {
        let value = serde_json::to_string(credential)?;
        self.cache
            .set_with_ttl(&self.key(session_id), &value, ttl)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<C: CacheClient> SessionStore for ValkeySessionStore<C> {
    async fn get_valid_credential(
        &self,
        session_id: &str,
    ) -> Result<Option<Credential>, SessionError> {
        let Some(raw) = self.cache.get_string(&self.key(session_id)).await? else {
            return Ok(None);
        };

        let credential: Credential = match serde_json::from_str(&raw) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(
                    backend = self.cache.backend_name(),
                    error = %err,
                    "malformed session credential"
                );
                return Ok(None);
            }
        };

        if !credential.is_valid() {
            tracing::debug!(expiry = ?credential.expiry, "session credential expired");
            return Ok(None);
        }

        Ok(Some(credential))
    }
}

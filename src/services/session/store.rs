use async_trait::async_trait;

use crate::services::cache::CacheError;
use crate::services::credential::Credential;

/// Read side of the session store.
///
/// Returns:
/// - `Ok(Some(_))` => a credential that is valid right now
/// - `Ok(None)`    => no session, malformed session, or expired credential
/// - `Err(_)`      => backend failure (caller must treat as authentication failure)
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_valid_credential(
        &self,
        session_id: &str,
    ) -> Result<Option<Credential>, SessionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("session encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

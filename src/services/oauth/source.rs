use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::services::credential::Credential;
use crate::services::oauth::{
    config::PrivilegedConfig,
    error::OAuthError,
    token::{self, TokenClient},
};

/// Yields a currently-valid credential, refreshing it when needed.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self) -> Result<Credential, OAuthError>;
}

/// End-user credential that refreshes itself with the refresh-token grant.
///
/// Lives for a single request; the refreshed token is not written back to the
/// session store.
pub struct RefreshingTokenSource {
    http: reqwest::Client,
    client: TokenClient,
    current: Mutex<Credential>,
}

impl RefreshingTokenSource {
    pub fn new(http: reqwest::Client, client: TokenClient, credential: Credential) -> Self {
        Self {
            http,
            client,
            current: Mutex::new(credential),
        }
    }
}

#[async_trait]
impl TokenSource for RefreshingTokenSource {
    async fn token(&self) -> Result<Credential, OAuthError> {
        let mut current = self.current.lock().await;
        if current.is_valid() {
            return Ok(current.clone());
        }

        let refresh_token = current.refresh_token.clone().ok_or(OAuthError::Expired)?;

        tracing::debug!("refreshing expired user credential");
        let mut refreshed = token::refresh(&self.client, &self.http, &refresh_token).await?;

        // Issuers may omit the refresh token on refresh; keep the old one.
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = Some(refresh_token);
        }

        *current = refreshed.clone();
        Ok(refreshed)
    }
}

/// Service identity credential from the client-credentials grant.
///
/// The token is cached until it expires, so it is shared across requests.
pub struct ClientCredentialsSource {
    http: reqwest::Client,
    client: TokenClient,
    config: PrivilegedConfig,
    cached: Mutex<Option<Credential>>,
}

impl ClientCredentialsSource {
    pub fn new(http: reqwest::Client, config: PrivilegedConfig) -> Self {
        let client = token::token_client(&config.client_id, &config.client_secret, &config.token_url);
        Self {
            http,
            client,
            config,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TokenSource for ClientCredentialsSource {
    async fn token(&self) -> Result<Credential, OAuthError> {
        let mut cached = self.cached.lock().await;
        if let Some(credential) = cached.as_ref().filter(|c| c.is_valid()) {
            return Ok(credential.clone());
        }

        tracing::debug!(client_id = %self.config.client_id, "fetching service credential");
        let credential =
            token::client_credentials(&self.client, &self.http, &self.config.scopes).await?;

        *cached = Some(credential.clone());
        Ok(credential)
    }
}

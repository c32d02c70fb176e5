use std::sync::Arc;

use reqwest::RequestBuilder;

use crate::services::credential::Credential;
use crate::services::oauth::{
    config::{IssuerConfig, PrivilegedConfig},
    error::OAuthError,
    source::{ClientCredentialsSource, RefreshingTokenSource, TokenSource},
    token::{self, TokenClient},
};

/// HTTP client bound to a credential source.
///
/// Every request gets `Authorization: Bearer <token>` from the source, which
/// refreshes the token first if it has expired.
#[derive(Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
}

impl OAuthClient {
    pub fn new(http: reqwest::Client, tokens: Arc<dyn TokenSource>) -> Self {
        Self { http, tokens }
    }

    pub fn request(&self, method: reqwest::Method, url: url::Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Attach the current token and send.
    pub async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, OAuthError> {
        let credential = self.tokens.token().await?;
        let res = request.bearer_auth(&credential.access_token).send().await?;
        Ok(res)
    }
}

/// Builds clients for the two identities the proxy forwards as.
pub struct OAuthClientFactory {
    http: reqwest::Client,
    issuer: TokenClient,
    privileged: Arc<ClientCredentialsSource>,
}

impl OAuthClientFactory {
    pub fn new(http: reqwest::Client, issuer: IssuerConfig, privileged: PrivilegedConfig) -> Self {
        let privileged = Arc::new(ClientCredentialsSource::new(http.clone(), privileged));
        let issuer = token::token_client(&issuer.client_id, &issuer.client_secret, &issuer.token_url);
        Self {
            http,
            issuer,
            privileged,
        }
    }

    /// Client acting as the end user. Refreshes through the issuer when expired.
    pub fn user_client(&self, credential: Credential) -> OAuthClient {
        let source = RefreshingTokenSource::new(self.http.clone(), self.issuer.clone(), credential);
        OAuthClient::new(self.http.clone(), Arc::new(source))
    }

    /// Client acting as the application itself.
    pub fn privileged_client(&self) -> OAuthClient {
        OAuthClient::new(self.http.clone(), self.privileged.clone())
    }
}

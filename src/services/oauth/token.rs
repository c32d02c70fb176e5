//! Token endpoint exchange through `oauth2`: refresh-token grant for users,
//! client-credentials grant for the service identity.
use chrono::{Duration, Utc};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{
    ClientId, ClientSecret, EndpointNotSet, EndpointSet, RefreshToken, Scope, TokenResponse,
    TokenUrl,
};
use url::Url;

use crate::services::credential::Credential;
use crate::services::oauth::error::OAuthError;

/// OAuth client with only the token endpoint configured.
pub type TokenClient =
    BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Client authenticating to `token_url` with HTTP Basic credentials.
pub fn token_client(client_id: &str, client_secret: &str, token_url: &Url) -> TokenClient {
    BasicClient::new(ClientId::new(client_id.to_string()))
        .set_client_secret(ClientSecret::new(client_secret.to_string()))
        .set_token_uri(TokenUrl::from_url(token_url.clone()))
}

pub async fn refresh(
    client: &TokenClient,
    http: &reqwest::Client,
    refresh_token: &str,
) -> Result<Credential, OAuthError> {
    let refresh_token = RefreshToken::new(refresh_token.to_string());
    let res = client
        .exchange_refresh_token(&refresh_token)
        .request_async(http)
        .await?;
    Ok(credential_from(&res))
}

pub async fn client_credentials(
    client: &TokenClient,
    http: &reqwest::Client,
    scopes: &[String],
) -> Result<Credential, OAuthError> {
    let res = client
        .exchange_client_credentials()
        .add_scopes(scopes.iter().cloned().map(Scope::new))
        .request_async(http)
        .await?;
    Ok(credential_from(&res))
}

fn credential_from(res: &BasicTokenResponse) -> Credential {
    let mut credential = Credential::bearer(res.access_token().secret());
    credential.refresh_token = res.refresh_token().map(|t| t.secret().to_string());
    credential.expiry = res
        .expires_in()
        .filter(|d| !d.is_zero())
        .and_then(|d| Duration::from_std(d).ok())
        .map(|d| Utc::now() + d);
    credential
}

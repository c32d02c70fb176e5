use url::Url;

/// Issuer settings used to refresh end-user credentials.
#[derive(Clone)]
pub struct IssuerConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: Url,
}

/// Settings for the application's own (service) identity.
#[derive(Clone)]
pub struct PrivilegedConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: Url,
    pub scopes: Vec<String>,
}

// Secrets are not printable via Debug.
impl std::fmt::Debug for IssuerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuerConfig")
            .field("client_id", &self.client_id)
            .field("token_url", &self.token_url.as_str())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for PrivilegedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivilegedConfig")
            .field("client_id", &self.client_id)
            .field("token_url", &self.token_url.as_str())
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

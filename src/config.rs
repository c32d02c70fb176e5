/*
 * Responsibility
 * - Load settings from environment variables (.env supported)
 * - Validate them (startup fails when something required is missing)
 */
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::services::oauth::{IssuerConfig, PrivilegedConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub valkey_url: String,
    pub session_cookie_name: String,
    pub session_key_prefix: String,

    // Upstream bases: user-delegated (/v2) and privileged (/uaa)
    pub api_url: Url,
    pub uaa_url: Url,

    pub issuer: IssuerConfig,
    pub privileged: PrivilegedConfig,

    pub upstream_timeout: Duration,
    pub request_body_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let url = |key: &'static str| {
            required(key).and_then(|v| Url::parse(&v).map_err(|_| ConfigError::Invalid(key)))
        };

        let port: u16 = number(&lookup, "PORT")?.unwrap_or(3000);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let valkey_url = required("VALKEY_URL")?;
        let session_cookie_name =
            lookup("SESSION_COOKIE_NAME").unwrap_or_else(|| "session".to_string());
        let session_key_prefix =
            lookup("SESSION_KEY_PREFIX").unwrap_or_else(|| "session".to_string());

        let api_url = url("API_URL")?;
        let uaa_url = url("UAA_URL")?;

        let token_url = url("OAUTH_TOKEN_URL")?;
        let issuer = IssuerConfig {
            client_id: required("OAUTH_CLIENT_ID")?,
            client_secret: required("OAUTH_CLIENT_SECRET")?,
            token_url: token_url.clone(),
        };

        let privileged_token_url = match lookup("PRIVILEGED_TOKEN_URL") {
            Some(_) => url("PRIVILEGED_TOKEN_URL")?,
            None => token_url,
        };
        let privileged = PrivilegedConfig {
            client_id: required("PRIVILEGED_CLIENT_ID")?,
            client_secret: required("PRIVILEGED_CLIENT_SECRET")?,
            token_url: privileged_token_url,
            scopes: lookup("PRIVILEGED_SCOPES")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        let upstream_timeout =
            Duration::from_secs(number(&lookup, "UPSTREAM_TIMEOUT_SECONDS")?.unwrap_or(30));
        let request_body_limit: usize =
            number(&lookup, "REQUEST_BODY_LIMIT_BYTES")?.unwrap_or(1024 * 1024);

        Ok(Self {
            addr,
            app_env,
            valkey_url,
            session_cookie_name,
            session_key_prefix,
            api_url,
            uaa_url,
            issuer,
            privileged,
            upstream_timeout,
            request_body_limit,
        })
    }
}

/// Optional numeric setting; present but unparsable is an error, not a default.
fn number<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().parse().map_err(|_| ConfigError::Invalid(key)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("VALKEY_URL", "redis://localhost:6379"),
            ("API_URL", "https://api.example.com"),
            ("UAA_URL", "https://uaa.example.com"),
            ("OAUTH_CLIENT_ID", "deck"),
            ("OAUTH_CLIENT_SECRET", "deck-secret"),
            ("OAUTH_TOKEN_URL", "https://login.example.com/oauth/token"),
            ("PRIVILEGED_CLIENT_ID", "deck-admin"),
            ("PRIVILEGED_CLIENT_SECRET", "admin-secret"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_apply() {
        let config = load(&base()).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.session_cookie_name, "session");
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert_eq!(config.request_body_limit, 1024 * 1024);
        assert_eq!(config.privileged.token_url, config.issuer.token_url);
        assert!(config.privileged.scopes.is_empty());
    }

    #[test]
    fn overrides_are_read() {
        let mut vars = base();
        vars.insert("PORT", "8080");
        vars.insert("APP_ENV", "PROD");
        vars.insert("PRIVILEGED_TOKEN_URL", "https://uaa.example.com/oauth/token");
        vars.insert("PRIVILEGED_SCOPES", "scim.read, cloud_controller.admin ,");

        let config = load(&vars).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(
            config.privileged.token_url.as_str(),
            "https://uaa.example.com/oauth/token"
        );
        assert_eq!(
            config.privileged.scopes,
            vec!["scim.read".to_string(), "cloud_controller.admin".to_string()]
        );
    }

    #[test]
    fn missing_required_value_is_reported() {
        let mut vars = base();
        vars.remove("API_URL");

        assert!(matches!(load(&vars), Err(ConfigError::Missing("API_URL"))));
    }

    #[test]
    fn invalid_values_are_reported() {
        let mut vars = base();
        vars.insert("UAA_URL", "not a url");
        assert!(matches!(load(&vars), Err(ConfigError::Invalid("UAA_URL"))));

        let mut vars = base();
        vars.insert("PORT", "http");
        assert!(matches!(load(&vars), Err(ConfigError::Invalid("PORT"))));
    }

    #[test]
    fn invalid_numbers_are_not_replaced_by_defaults() {
        let mut vars = base();
        vars.insert("UPSTREAM_TIMEOUT_SECONDS", "30s");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid("UPSTREAM_TIMEOUT_SECONDS"))
        ));

        let mut vars = base();
        vars.insert("REQUEST_BODY_LIMIT_BYTES", "-1");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))
        ));

        let mut vars = base();
        vars.insert("UPSTREAM_TIMEOUT_SECONDS", "5");
        vars.insert("REQUEST_BODY_LIMIT_BYTES", "2048");
        let config = load(&vars).unwrap();
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert_eq!(config.request_body_limit, 2048);
    }

    #[test]
    fn debug_does_not_print_secrets() {
        let printed = format!("{:?}", load(&base()).unwrap());

        assert!(!printed.contains("deck-secret"));
        assert!(!printed.contains("admin-secret"));
    }
}

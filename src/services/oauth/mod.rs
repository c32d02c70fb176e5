pub mod client;
pub mod config;
pub mod error;
pub mod source;
pub mod token;

pub use client::{OAuthClient, OAuthClientFactory};
pub use config::{IssuerConfig, PrivilegedConfig};
pub use error::OAuthError;

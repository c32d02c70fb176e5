pub mod cache;
pub mod credential;
pub mod forwarder;
pub mod oauth;
pub mod session;

pub use credential::Credential;
pub use forwarder::Forwarder;

//! Authenticating reverse proxy.
//!
//! Requests carrying a session cookie are checked against the session store;
//! admitted requests are forwarded upstream either as the logged-in user or as
//! the application's own service identity, and the upstream response is
//! relayed back unchanged.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

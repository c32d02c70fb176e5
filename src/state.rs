/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Cheap to clone (everything behind Arc)
 * - Holds configuration and collaborators only; nothing request-scoped
 */
use std::sync::Arc;

use url::Url;

use crate::services::{Forwarder, session::SessionStore};

/// Where the two proxy routes forward to.
#[derive(Clone, Debug)]
pub struct Upstreams {
    pub api_url: Url,
    pub uaa_url: Url,
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub session_cookie_name: String,
    pub forwarder: Arc<Forwarder>,
    pub upstreams: Upstreams,
}

impl AppState {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        session_cookie_name: impl Into<String>,
        forwarder: Arc<Forwarder>,
        upstreams: Upstreams,
    ) -> Self {
        Self {
            sessions,
            session_cookie_name: session_cookie_name.into(),
            forwarder,
            upstreams,
        }
    }
}

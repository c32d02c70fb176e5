//! Session credential check → `UserCredential` in request extensions.
//!
//! The session id comes from the session cookie; the session store decides
//! whether the credential behind it is still valid. Anything else (no cookie,
//! unknown session, expired credential, store failure) ends the request with
//! the fixed 401 body.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{http::request::Parts, response::IntoResponse};
use tower_cookies::Cookies;

use crate::api::extractors::UserCredential;
use crate::error::AppError;
use crate::middleware::pipeline::{Flow, Stage};
use crate::services::session::SessionStore;

pub struct AuthorizationGate {
    sessions: Arc<dyn SessionStore>,
    cookie_name: String,
}

impl AuthorizationGate {
    pub fn new(sessions: Arc<dyn SessionStore>, cookie_name: impl Into<String>) -> Self {
        Self {
            sessions,
            cookie_name: cookie_name.into(),
        }
    }

    fn session_id(&self, parts: &Parts) -> Option<String> {
        let Some(cookies) = parts.extensions.get::<Cookies>() else {
            // CookieManagerLayer must wrap the gated routes.
            tracing::error!("cookie manager layer missing; rejecting request");
            return None;
        };

        cookies
            .get(&self.cookie_name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

fn reject() -> Flow {
    Flow::Halt(AppError::Unauthorized.into_response())
}

#[async_trait]
impl Stage for AuthorizationGate {
    fn name(&self) -> &'static str {
        "authorization_gate"
    }

    async fn evaluate(&self, parts: &mut Parts) -> Flow {
        let Some(session_id) = self.session_id(parts) else {
            tracing::debug!(path = %parts.uri.path(), "no session cookie");
            return reject();
        };

        match self.sessions.get_valid_credential(&session_id).await {
            Ok(Some(credential)) => {
                // middleware → extractor
                parts.extensions.insert(UserCredential::new(credential));
                Flow::Continue
            }
            Ok(None) => {
                tracing::debug!(path = %parts.uri.path(), "no valid credential for session");
                reject()
            }
            Err(err) => {
                tracing::warn!(error = ?err, "session store failure");
                reject()
            }
        }
    }
}

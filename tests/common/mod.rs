//! Shared fixtures: a wiremock server standing in for the API, UAA and token
//! endpoint, plus an in-memory session store seeded with known sessions.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
};
use chrono::{Duration as ChronoDuration, Utc};
use deck_proxy::{
    app::{build_router, http_client},
    services::{
        Credential, Forwarder,
        cache::MemoryCache,
        oauth::{IssuerConfig, OAuthClientFactory, PrivilegedConfig},
        session::ValkeySessionStore,
    },
    state::{AppState, Upstreams},
};
use serde_json::json;
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER_TOKEN: &str = "user-token";
pub const SERVICE_TOKEN: &str = "service-token";
pub const VALID_SESSION: &str = "session=valid-session";
pub const EXPIRED_SESSION: &str = "session=expired-session";
pub const BODY_LIMIT: usize = 1024 * 1024;

pub struct TestApp {
    pub router: Router,
    pub upstream: MockServer,
    pub forwarder: Arc<Forwarder>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_api_url(None).await
    }

    /// `api_url` overrides the user-delegated upstream (e.g. an unreachable address).
    pub async fn spawn_with_api_url(api_url: Option<Url>) -> Self {
        let upstream = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": SERVICE_TOKEN,
                "token_type": "bearer",
                "expires_in": 3600
            })))
            .mount(&upstream)
            .await;

        let base = Url::parse(&upstream.uri()).unwrap();
        let token_url = base.join("/oauth/token").unwrap();

        let sessions = ValkeySessionStore::new_with_cache(Arc::new(MemoryCache::new()), "session");
        let ttl = Duration::from_secs(300);
        sessions
            .put_credential(
                "valid-session",
                &Credential::bearer(USER_TOKEN).with_expiry(Utc::now() + ChronoDuration::hours(1)),
                ttl,
            )
            .await
            .unwrap();
        sessions
            .put_credential(
                "expired-session",
                &Credential::bearer("old-token")
                    .with_refresh_token("refresh-1")
                    .with_expiry(Utc::now() - ChronoDuration::hours(1)),
                ttl,
            )
            .await
            .unwrap();

        let clients = OAuthClientFactory::new(
            http_client(Duration::from_secs(5)).unwrap(),
            IssuerConfig {
                client_id: "deck".into(),
                client_secret: "deck-secret".into(),
                token_url: token_url.clone(),
            },
            PrivilegedConfig {
                client_id: "deck-admin".into(),
                client_secret: "admin-secret".into(),
                token_url,
                scopes: vec!["scim.read".into()],
            },
        );
        let forwarder = Arc::new(Forwarder::new(Arc::new(clients), BODY_LIMIT));

        let state = AppState::new(
            Arc::new(sessions),
            "session",
            forwarder.clone(),
            Upstreams {
                api_url: api_url.unwrap_or_else(|| base.clone()),
                uaa_url: base.join("/uaa-upstream").unwrap(),
            },
        );

        Self {
            router: build_router(state, BODY_LIMIT),
            upstream,
            forwarder,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> Relayed {
        let res = self.router.clone().oneshot(req).await.unwrap();
        Relayed::read(res).await
    }

    /// Requests the upstream saw, excluding token endpoint calls.
    pub async fn upstream_calls(&self) -> Vec<wiremock::Request> {
        self.upstream
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path() != "/oauth/token")
            .collect()
    }
}

#[derive(Debug)]
pub struct Relayed {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Relayed {
    pub async fn read(res: axum::response::Response) -> Self {
        let status = res.status();
        let headers = res.headers().clone();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        Self {
            status,
            headers,
            body,
        }
    }
}

pub fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap()
}

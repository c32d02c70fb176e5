//! Request forwarding on behalf of the end user or the application itself.
//!
//! Both variants go through `submit`, so status, headers and body are relayed
//! the same way whichever identity made the call.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderName, Method, header},
    response::Response,
};
use http_body_util::LengthLimitError;
use url::Url;

use crate::error::AppError;
use crate::services::credential::Credential;
use crate::services::oauth::{OAuthClient, OAuthClientFactory};

/// Inbound headers copied onto the outbound request. Cookies and the inbound
/// `authorization` header never leave this process.
const FORWARDED_REQUEST_HEADERS: [&str; 2] = ["content-type", "accept"];

// RFC 9110 §7.6.1
const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub struct Forwarder {
    clients: Arc<OAuthClientFactory>,
    body_limit: usize,
}

impl Forwarder {
    pub fn new(clients: Arc<OAuthClientFactory>, body_limit: usize) -> Self {
        Self {
            clients,
            body_limit,
        }
    }

    /// Forward `req` to `target` as the user who owns `credential`.
    pub async fn forward_as_user(
        &self,
        req: Request,
        target: Url,
        credential: &Credential,
    ) -> Result<Response, AppError> {
        let client = self.clients.user_client(credential.clone());
        self.submit(&client, req, target).await
    }

    /// Forward `req` to `target` with the application's service identity.
    pub async fn forward_privileged(&self, req: Request, target: Url) -> Result<Response, AppError> {
        let client = self.clients.privileged_client();
        self.submit(&client, req, target).await
    }

    async fn submit(
        &self,
        client: &OAuthClient,
        req: Request,
        target: Url,
    ) -> Result<Response, AppError> {
        let (parts, body) = req.into_parts();

        let body = axum::body::to_bytes(body, self.body_limit)
            .await
            .map_err(|err| {
                if exceeds_limit(&err) {
                    return AppError::PayloadTooLarge;
                }
                tracing::warn!(error = %err, "failed to read inbound body");
                AppError::bad_request("UNREADABLE_BODY", "request body could not be read")
            })?;

        let mut outbound = client.request(parts.method.clone(), target.clone());
        for name in FORWARDED_REQUEST_HEADERS {
            if let Some(value) = parts.headers.get(name) {
                outbound = outbound.header(name, value.clone());
            }
        }
        if !body.is_empty() {
            outbound = outbound.body(body);
        }

        tracing::debug!(method = %parts.method, target = %target, "forwarding request");

        let upstream = client.send(outbound).await?;
        relay(upstream, parts.method == Method::HEAD).await
    }
}

/// Copy status, end-to-end headers and the full body of the upstream response.
///
/// The upstream response is consumed here; its connection goes back to the pool
/// (or is closed) whether or not the body read succeeds.
async fn relay(upstream: reqwest::Response, head: bool) -> Result<Response, AppError> {
    let status = upstream.status();
    let headers = end_to_end_headers(upstream.headers(), head);

    let body = upstream.bytes().await.map_err(AppError::bad_gateway)?;

    tracing::debug!(status = %status, bytes = body.len(), "relaying upstream response");

    let mut res = Response::new(Body::from(body));
    *res.status_mut() = status;
    *res.headers_mut() = headers;
    Ok(res)
}

/// `content-length` is recomputed from the relayed body, except for `HEAD`
/// where there is no body and the upstream value is the answer.
fn end_to_end_headers(upstream: &HeaderMap, head: bool) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream.iter() {
        if is_hop_by_hop(name) || (!head && *name == header::CONTENT_LENGTH) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Chunked bodies carry no `content-length`, so the limit only trips while
/// reading. The limit error can sit several layers down the source chain.
fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

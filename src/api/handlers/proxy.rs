/*
 * Responsibility
 * - ANY /v2/{*path}  → API upstream, as the logged-in user
 * - ANY /uaa/{*path} → UAA upstream, as the application itself
 * - Target URL = upstream base + inbound path (raw, still percent-encoded) + query
 */
use axum::{
    extract::{Request, State},
    http::Uri,
    response::Response,
};
use url::Url;

use crate::{api::extractors::UserCredential, error::AppError, state::AppState};

pub async fn api_proxy(
    State(state): State<AppState>,
    credential: UserCredential,
    req: Request,
) -> Result<Response, AppError> {
    // The upstream API is versioned under the same /v2 prefix, so the path is kept.
    let target = upstream_target(&state.upstreams.api_url, req.uri(), "")?;
    state
        .forwarder
        .forward_as_user(req, target, credential.credential())
        .await
}

pub async fn uaa_proxy(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    let target = upstream_target(&state.upstreams.uaa_url, req.uri(), "/uaa")?;
    state.forwarder.forward_privileged(req, target).await
}

/// Build the upstream URL for `uri`, dropping `strip` from the front of its path.
///
/// Dot segments are refused: URL parsing would resolve them and could move the
/// target outside the upstream base path.
pub(crate) fn upstream_target(base: &Url, uri: &Uri, strip: &str) -> Result<Url, AppError> {
    let path = uri
        .path()
        .strip_prefix(strip)
        .filter(|p| p.starts_with('/'))
        .ok_or_else(|| AppError::bad_request("INVALID_PATH", "invalid proxy path"))?;

    if path.split('/').any(is_dot_segment) {
        return Err(AppError::bad_request("INVALID_PATH", "invalid proxy path"));
    }

    let mut target = base.clone();
    let root = base.path().trim_end_matches('/');
    target.set_path(&format!("{root}{path}"));
    target.set_query(uri.query());
    Ok(target)
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | ".." | "%2e" | "%2e%2e" | ".%2e" | "%2e."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(base: &str, uri: &str, strip: &str) -> Result<Url, AppError> {
        upstream_target(
            &Url::parse(base).unwrap(),
            &uri.parse::<Uri>().unwrap(),
            strip,
        )
    }

    #[test]
    fn keeps_path_and_query() {
        let url = target(
            "https://api.example.com",
            "/v2/organizations/abc/summary?inline-relations-depth=1",
            "",
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.example.com/v2/organizations/abc/summary?inline-relations-depth=1"
        );
    }

    #[test]
    fn strips_route_prefix_and_respects_base_path() {
        let url = target("https://login.example.com/uaa/", "/uaa/Users?filter=x", "/uaa").unwrap();
        assert_eq!(url.as_str(), "https://login.example.com/uaa/Users?filter=x");
    }

    #[test]
    fn base_query_is_replaced() {
        let url = target("https://api.example.com/?stale=1", "/v2/apps", "").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v2/apps");
    }

    #[test]
    fn percent_encoding_survives() {
        let url = target("https://api.example.com", "/v2/spaces/a%20b", "").unwrap();
        assert_eq!(url.path(), "/v2/spaces/a%20b");
    }

    #[test]
    fn dot_segments_are_refused() {
        assert!(target("https://api.example.com/base", "/v2/../../admin", "").is_err());
        assert!(target("https://api.example.com/base", "/v2/%2E%2E/admin", "").is_err());
        assert!(target("https://uaa.example.com", "/uaa/./Users", "/uaa").is_err());
    }
}

/*
 * Responsibility
 * - URL structure of the proxy
 * - /health is public; everything else runs behind the authorization gate
 */
use axum::{
    Router,
    routing::{any, get},
};

use crate::api::handlers::{
    auth_status::auth_status,
    health::health,
    proxy::{api_proxy, uaa_proxy},
};
use crate::middleware::{gate::AuthorizationGate, pipeline::Pipeline};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let gate = AuthorizationGate::new(state.sessions.clone(), state.session_cookie_name.clone());

    let gated = Router::new()
        .route("/v2/authstatus", get(auth_status))
        .route("/v2/{*path}", any(api_proxy))
        .route("/uaa/{*path}", any(uaa_proxy));

    Router::new()
        .route("/health", get(health))
        .merge(Pipeline::new().stage(gate).apply(gated))
}

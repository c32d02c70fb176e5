/*
 * Responsibility
 * - GET /v2/authstatus
 * - The browser client polls this to learn whether its session is still logged in.
 *   Reaching the handler at all means the gate admitted the request.
 */
use axum::{Json, response::IntoResponse};
use serde_json::json;

pub async fn auth_status() -> impl IntoResponse {
    Json(json!({"status": "authorized"}))
}

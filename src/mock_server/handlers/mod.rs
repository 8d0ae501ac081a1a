//! HTTP request handlers for the mock server.

pub mod channels;
pub mod users;

pub use channels::*;
pub use users::*;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::mock_server::state::{MockState, TokenGrant};

/// Kraken-shaped error response.
pub(crate) fn kraken_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "status": status.as_u16(),
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Reject requests without the expected `Client-ID`.
pub(crate) fn check_client_id(state: &MockState, headers: &HeaderMap) -> Result<(), Response> {
    let sent = headers.get("client-id").and_then(|v| v.to_str().ok());
    match (&state.required_client_id, sent) {
        (_, None) => Err(kraken_error(StatusCode::BAD_REQUEST, "No client id specified")),
        (Some(required), Some(sent)) if required != sent => {
            Err(kraken_error(StatusCode::BAD_REQUEST, "Invalid client id specified"))
        }
        _ => Ok(()),
    }
}

/// Resolve the `Authorization: OAuth <token>` header.
pub(crate) fn require_grant<'a>(
    state: &'a MockState,
    headers: &HeaderMap,
    scope: &str,
) -> Result<&'a TokenGrant, Response> {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let grant = state
        .grant_for(authorization)
        .ok_or_else(|| kraken_error(StatusCode::UNAUTHORIZED, "invalid oauth token"))?;

    if !grant.scopes.iter().any(|s| s == scope) {
        return Err(kraken_error(
            StatusCode::FORBIDDEN,
            format!("Missing required scope {scope}"),
        ));
    }
    Ok(grant)
}

/// Slice `items` by `offset`/`limit` the way kraken does.
pub(crate) fn window<T: Clone>(items: &[&T], offset: u32, limit: u32) -> Vec<T> {
    items
        .iter()
        .skip(offset as usize)
        .take(limit.clamp(1, crate::MAX_LIMIT) as usize)
        .map(|item| (*item).clone())
        .collect()
}

//! User endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{check_client_id, kraken_error};
use crate::mock_server::state::MockState;
use crate::UserList;

/// Query parameters for looking users up by login.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub login: Option<String>,
}

/// GET /users?login=a,b
pub async fn get_users(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(query): Query<UsersQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Err(response) = check_client_id(&state, &headers) {
        return response;
    }

    let Some(login) = query.login.filter(|l| !l.is_empty()) else {
        return kraken_error(StatusCode::BAD_REQUEST, "No login names specified");
    };

    let logins: Vec<&str> = login.split(',').collect();
    let users: Vec<_> = state
        .users_by_login(&logins)
        .into_iter()
        .cloned()
        .collect();

    (
        StatusCode::OK,
        Json(UserList {
            total: users.len() as u64,
            users,
        }),
    )
        .into_response()
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Err(response) = check_client_id(&state, &headers) {
        return response;
    }

    match state.get_user(&id) {
        Some(user) => (StatusCode::OK, Json(user.clone())).into_response(),
        None => kraken_error(StatusCode::NOT_FOUND, format!("User {id} does not exist")),
    }
}

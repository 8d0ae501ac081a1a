//! Channel endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{check_client_id, kraken_error, require_grant, window};
use crate::mock_server::state::MockState;
use crate::{BroadcastType, Direction, VideoSort, DEFAULT_LIMIT};

/// Query parameters for listing followers.
#[derive(Debug, Default, Deserialize)]
pub struct FollowsQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub cursor: Option<String>,
    pub direction: Option<Direction>,
}

/// Query parameters for listing videos.
#[derive(Debug, Default, Deserialize)]
pub struct VideosQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub broadcast_type: Option<String>,
    pub language: Option<String>,
    pub sort: Option<VideoSort>,
}

/// GET /channels/{id}
pub async fn get_channel(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Err(response) = check_client_id(&state, &headers) {
        return response;
    }

    match state.get_channel(&id) {
        Some(channel) => (StatusCode::OK, Json(channel.clone())).into_response(),
        None => channel_not_found(&id),
    }
}

/// GET /channel (requires `channel_read`)
pub async fn get_authenticated_channel(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Err(response) = check_client_id(&state, &headers) {
        return response;
    }

    let grant = match require_grant(&state, &headers, "channel_read") {
        Ok(grant) => grant,
        Err(response) => return response,
    };

    match state.get_channel(&grant.user_id) {
        Some(channel) => {
            let mut channel = channel.clone();
            channel.email = Some(format!("{}@example.com", channel.name));
            channel.stream_key = Some(format!("live_{}_mock", channel.id));
            (StatusCode::OK, Json(channel)).into_response()
        }
        None => channel_not_found(&grant.user_id),
    }
}

/// GET /channels/{id}/follows
pub async fn list_follows(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<FollowsQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Err(response) = check_client_id(&state, &headers) {
        return response;
    }
    if state.get_channel(&id).is_none() {
        return channel_not_found(&id);
    }

    // The cursor encodes the next offset and wins over `offset`.
    let offset = match query.cursor.as_deref().filter(|c| !c.is_empty()) {
        Some(cursor) => match cursor.parse::<u32>() {
            Ok(offset) => offset,
            Err(_) => return kraken_error(StatusCode::BAD_REQUEST, "Invalid cursor"),
        },
        None => query.offset.unwrap_or(0),
    };
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let all = state.list_follows(&id, query.direction.unwrap_or(Direction::Desc));
    let follows = window(&all, offset, limit);
    let next = offset as usize + follows.len();
    let cursor = if next < all.len() {
        next.to_string()
    } else {
        String::new()
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "_cursor": cursor,
            "_total": all.len(),
            "follows": follows,
        })),
    )
        .into_response()
}

/// GET /channels/{id}/teams
pub async fn list_teams(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Err(response) = check_client_id(&state, &headers) {
        return response;
    }
    if state.get_channel(&id).is_none() {
        return channel_not_found(&id);
    }

    let teams: Vec<_> = state.list_teams(&id).into_iter().cloned().collect();
    (StatusCode::OK, Json(serde_json::json!({ "teams": teams }))).into_response()
}

/// GET /channels/{id}/videos
pub async fn list_videos(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<VideosQuery>,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Err(response) = check_client_id(&state, &headers) {
        return response;
    }
    if state.get_channel(&id).is_none() {
        return channel_not_found(&id);
    }

    let types = match parse_broadcast_types(query.broadcast_type.as_deref()) {
        Ok(types) => types,
        Err(response) => return response,
    };

    let mut all = state.list_videos(&id, &types, query.sort.unwrap_or(VideoSort::Time));
    if let Some(languages) = query.language.as_deref().filter(|l| !l.is_empty()) {
        let languages: Vec<&str> = languages.split(',').collect();
        all.retain(|v| {
            v.language
                .as_deref()
                .is_some_and(|lang| languages.contains(&lang))
        });
    }

    let videos = window(
        &all,
        query.offset.unwrap_or(0),
        query.limit.unwrap_or(DEFAULT_LIMIT),
    );

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "_total": all.len(),
            "videos": videos,
        })),
    )
        .into_response()
}

fn parse_broadcast_types(raw: Option<&str>) -> Result<Vec<BroadcastType>, Response> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(|t| match t {
            "archive" => Ok(BroadcastType::Archive),
            "highlight" => Ok(BroadcastType::Highlight),
            "upload" => Ok(BroadcastType::Upload),
            other => Err(kraken_error(
                StatusCode::BAD_REQUEST,
                format!("Invalid broadcast_type: {other}"),
            )),
        })
        .collect()
}

fn channel_not_found(id: &str) -> Response {
    kraken_error(StatusCode::NOT_FOUND, format!("Channel '{id}' does not exist"))
}

//! Channel follower model.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::TwitchClient;
use crate::error::Result;
use crate::pagination::{Page, PaginationParams};
use crate::query::RequestOptions;
use crate::traits::{List, DEFAULT_LIMIT};

use super::User;

/// A user following a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Follow {
    /// When the follow happened.
    pub created_at: DateTime<Utc>,
    /// Whether the follower gets live notifications.
    #[serde(default)]
    pub notifications: bool,
    pub user: User,
}

/// Sort direction by follow date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Filters for listing followers.
#[derive(Debug, Clone, Default)]
pub struct FollowListQuery {
    /// Defaults to newest first on the API side.
    pub direction: Option<Direction>,
}

/// Query type for follower listing (includes channel ID).
pub type FollowQuery = (String, FollowListQuery);

/// API response wrapper for listing followers.
#[derive(Debug, Deserialize)]
struct FollowListResponse {
    #[serde(rename = "_cursor", default)]
    cursor: Option<String>,
    #[serde(rename = "_total", default)]
    total: Option<u64>,
    #[serde(default)]
    follows: Vec<Follow>,
}

#[async_trait]
impl List for Follow {
    type Query = FollowQuery; // (channel_id, filters)

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &TwitchClient,
        query: &Self::Query,
        params: &PaginationParams,
    ) -> Result<Page<Self>> {
        let (channel_id, filters) = query;
        let options = params
            .apply(RequestOptions::new(), DEFAULT_LIMIT)
            .with_opt("direction", filters.direction);

        let data: FollowListResponse = client
            .get_json(&format!("/channels/{channel_id}/follows"), Some(&options), false)
            .await?;

        Ok(Page::new(
            data.follows,
            params.offset.unwrap_or(0),
            params.effective_limit(DEFAULT_LIMIT),
            data.total,
        )
        .with_cursor(data.cursor))
    }
}

/// Fetch one page of a channel's followers.
///
/// # Example
///
/// ```ignore
/// let page = get_channel_followers(&client, 23161357, Default::default(), &Default::default()).await?;
/// for follow in &page {
///     println!("{} since {}", follow.user.display_name, follow.created_at);
/// }
/// ```
pub async fn get_channel_followers(
    client: &TwitchClient,
    channel_id: impl fmt::Display,
    query: FollowListQuery,
    params: &PaginationParams,
) -> Result<Page<Follow>> {
    Follow::list_page(client, &(channel_id.to_string(), query), params).await
}

//! Video model and trait implementations.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::TwitchClient;
use crate::error::Result;
use crate::pagination::{Page, PaginationParams};
use crate::query::{construct_comma_list, RequestOptions};
use crate::traits::{List, DEFAULT_LIMIT};

/// A video on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Video ID (e.g. "v106400740").
    #[serde(rename = "_id", deserialize_with = "super::id::deserialize")]
    pub id: String,

    #[serde(default)]
    pub broadcast_id: Option<u64>,

    /// "archive", "highlight" or "upload".
    pub broadcast_type: String,

    pub channel: VideoChannel,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub description_html: Option<String>,

    /// Frames per second keyed by resolution name.
    #[serde(default)]
    pub fps: HashMap<String, f64>,

    #[serde(default)]
    pub game: Option<String>,

    #[serde(default)]
    pub language: Option<String>,

    /// Duration in seconds.
    #[serde(default)]
    pub length: u64,

    #[serde(default)]
    pub preview: Preview,

    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    /// Frame size keyed by resolution name.
    #[serde(default)]
    pub resolutions: HashMap<String, String>,

    /// "recording" or "recorded".
    #[serde(default)]
    pub status: Option<String>,

    /// Comma-separated tags.
    #[serde(default)]
    pub tag_list: String,

    #[serde(default)]
    pub thumbnails: Thumbnails,

    pub title: String,

    pub url: String,

    /// "public" or "private".
    #[serde(default)]
    pub viewable: Option<String>,

    #[serde(default)]
    pub viewable_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub views: u64,
}

/// Channel summary embedded in a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoChannel {
    #[serde(rename = "_id", deserialize_with = "super::id::deserialize")]
    pub id: String,
    pub name: String,
    pub display_name: String,
}

/// Preview image URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preview {
    #[serde(default)]
    pub large: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub small: String,
    /// URL with `{width}`/`{height}` placeholders.
    #[serde(default)]
    pub template: String,
}

/// Thumbnail sets by size.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub large: Vec<Thumbnail>,
    #[serde(default)]
    pub medium: Vec<Thumbnail>,
    #[serde(default)]
    pub small: Vec<Thumbnail>,
    #[serde(default)]
    pub template: Vec<Thumbnail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub url: String,
}

/// Kind of video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastType {
    Archive,
    Highlight,
    Upload,
}

impl fmt::Display for BroadcastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Archive => "archive",
            Self::Highlight => "highlight",
            Self::Upload => "upload",
        })
    }
}

/// Sort order for video listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSort {
    Time,
    Views,
}

impl fmt::Display for VideoSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Time => "time",
            Self::Views => "views",
        })
    }
}

/// Filters for listing a channel's videos.
#[derive(Debug, Clone, Default)]
pub struct VideoListQuery {
    /// Only these kinds. Empty means the API default (all).
    pub broadcast_type: Vec<BroadcastType>,
    /// Only these languages (e.g. "en").
    pub language: Vec<String>,
    pub sort: Option<VideoSort>,
}

impl VideoListQuery {
    fn to_options(&self) -> RequestOptions {
        RequestOptions::new()
            .with_opt("broadcast_type", construct_comma_list(&self.broadcast_type))
            .with_opt("language", construct_comma_list(&self.language))
            .with_opt("sort", self.sort)
    }
}

/// Query type for video listing (includes channel ID).
pub type VideoQuery = (String, VideoListQuery);

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(rename = "_total", default)]
    total: Option<u64>,
    #[serde(default)]
    videos: Vec<Video>,
}

#[async_trait]
impl List for Video {
    type Query = VideoQuery; // (channel_id, filters)

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &TwitchClient,
        query: &Self::Query,
        params: &PaginationParams,
    ) -> Result<Page<Self>> {
        let (channel_id, filters) = query;
        let options = params.apply(filters.to_options(), DEFAULT_LIMIT);

        let data: VideoListResponse = client
            .get_json(&format!("/channels/{channel_id}/videos"), Some(&options), false)
            .await?;

        Ok(Page::new(
            data.videos,
            params.offset.unwrap_or(0),
            params.effective_limit(DEFAULT_LIMIT),
            data.total,
        ))
    }
}

/// Fetch one page of a channel's videos.
pub async fn get_channel_videos(
    client: &TwitchClient,
    channel_id: impl fmt::Display,
    query: VideoListQuery,
    params: &PaginationParams,
) -> Result<Page<Video>> {
    Video::list_page(client, &(channel_id.to_string(), query), params).await
}

//! Team model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::TwitchClient;
use crate::error::Result;

/// A Twitch team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "_id", deserialize_with = "super::id::deserialize")]
    pub id: String,
    pub name: String,
    pub display_name: String,
    /// Team description (HTML).
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TeamListResponse {
    #[serde(default)]
    teams: Vec<Team>,
}

/// Teams a channel belongs to (`GET /channels/{id}/teams`).
#[tracing::instrument(skip(client, channel_id), fields(channel_id = %channel_id))]
pub async fn get_channel_teams(
    client: &TwitchClient,
    channel_id: impl fmt::Display,
) -> Result<Vec<Team>> {
    let data: TeamListResponse = client
        .get_json(&format!("/channels/{channel_id}/teams"), None, false)
        .await?;
    Ok(data.teams)
}

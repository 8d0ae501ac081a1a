//! User model and lookups.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::TwitchClient;
use crate::error::Result;
use crate::query::{construct_comma_list, RequestOptions};
use crate::traits::Get;

/// A Twitch user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Numeric user ID, as a string.
    #[serde(rename = "_id", deserialize_with = "super::id::deserialize")]
    pub id: String,

    /// Login name (lowercase).
    pub name: String,

    pub display_name: String,

    /// Account type ("user", "staff", ...).
    #[serde(rename = "type", default)]
    pub user_type: Option<String>,

    #[serde(default)]
    pub bio: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Profile image URL.
    #[serde(default)]
    pub logo: Option<String>,
}

/// Response of `GET /users?login=...`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserList {
    #[serde(rename = "_total", default)]
    pub total: u64,
    #[serde(default)]
    pub users: Vec<User>,
}

#[async_trait]
impl Get for User {
    type Id = u64;

    #[tracing::instrument(skip(client))]
    async fn get(client: &TwitchClient, id: u64) -> Result<Self> {
        client.get_json(&format!("/users/{id}"), None, false).await
    }
}

/// Look up users by login name.
///
/// Returns an empty list without calling the API when `logins` is empty.
///
/// # Example
///
/// ```ignore
/// let users = get_users_by_login(&client, &["lirik", "monstercat"]).await?;
/// assert_eq!(users.total, 2);
/// ```
#[tracing::instrument(skip(client, logins))]
pub async fn get_users_by_login<S: AsRef<str>>(
    client: &TwitchClient,
    logins: &[S],
) -> Result<UserList> {
    let Some(login) = construct_comma_list(logins.iter().map(|s| s.as_ref())) else {
        return Ok(UserList::default());
    };

    let options = RequestOptions::new().with("login", login);
    client.get_json("/users", Some(&options), false).await
}

//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::TwitchClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// # Example
///
/// ```ignore
/// use twitchapi::{Channel, ClientConfig, Get, TwitchClient};
///
/// let client = TwitchClient::new(ClientConfig::from_env())?;
/// let channel = Channel::get(&client, 23161357).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id: Send;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not exist or the request fails.
    async fn get(client: &TwitchClient, id: Self::Id) -> Result<Self>;
}

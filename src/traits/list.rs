//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::TwitchClient;
use crate::error::Result;
use crate::pagination::{Page, PaginationParams};

/// Default page size for list operations.
pub const DEFAULT_LIMIT: u32 = 25;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// List entities with offset/cursor pagination.
///
/// # Example
///
/// ```ignore
/// use twitchapi::{ClientConfig, Follow, FollowListQuery, List, PaginationParams, TwitchClient};
///
/// let client = TwitchClient::new(ClientConfig::from_env())?;
/// let query = ("23161357".to_string(), FollowListQuery::default());
///
/// // Fetch a single page
/// let page = Follow::list_page(&client, &query, &PaginationParams::window(0, 50)).await?;
///
/// // Fetch everything
/// let all = Follow::list_all(&client, &query).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters for filtering.
    type Query: Send + Sync;

    /// List one page of entities.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &TwitchClient,
        query: &Self::Query,
        params: &PaginationParams,
    ) -> Result<Page<Self>>;

    /// List all entities matching the query (fetches all pages).
    ///
    /// Follows `_cursor` when the endpoint returns one and advances the
    /// offset otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &TwitchClient, query: &Self::Query) -> Result<Vec<Self>> {
        let mut all_items = Vec::new();
        let mut params = PaginationParams::window(0, crate::pagination::MAX_LIMIT);
        let mut pages = 0;

        loop {
            let page = Self::list_page(client, query, &params).await?;
            pages += 1;

            let done = !page.has_more || page.is_empty();
            params = page.next_params();
            all_items.extend(page.items);

            if done {
                break;
            }

            if pages >= MAX_PAGES {
                tracing::warn!("Reached pagination limit of {} pages, stopping", MAX_PAGES);
                break;
            }
        }

        Ok(all_items)
    }
}

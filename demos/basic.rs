//! Basic example demonstrating the kraken API client.
//!
//! Run with:
//! ```
//! TWITCH_TOKEN=your-client-id cargo run --example basic
//! ```

use twitchapi::{
    get_channel_teams, get_users_by_login, BroadcastType, Channel, ClientConfig,
    FollowListQuery, Get, PaginationParams, TwitchClient, VideoListQuery, VideoSort,
};

#[tokio::main]
async fn main() -> twitchapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating kraken client...");
    let client = TwitchClient::new(ClientConfig::from_env())?;
    println!("Connected to: {}", client.base_url());

    // Resolve login names to users
    println!("\n--- Looking up users ---");
    let users = get_users_by_login(&client, &["lirik", "monstercat"]).await?;
    println!("Found {} users", users.total);

    for user in &users.users {
        println!("  - {} ({})", user.display_name, user.id);
    }

    let Some(first) = users.users.first() else {
        println!("\nNo users found");
        return Ok(());
    };
    let Ok(id) = first.id.parse::<u64>() else {
        println!("\nUnexpected user id: {}", first.id);
        return Ok(());
    };

    println!("\n--- Channel Details ---");
    let channel = Channel::get(&client, id).await?;
    println!("Channel: {}", channel.display_name);
    println!("  Status: {}", channel.status.as_deref().unwrap_or(""));
    println!("  Game: {}", channel.game.as_deref().unwrap_or("unknown"));
    println!("  Partner: {}", channel.partner);
    println!("  Followers: {}", channel.followers);

    println!("\n--- Latest Followers ---");
    let follows = channel
        .followers(&client, FollowListQuery::default(), &PaginationParams::window(0, 5))
        .await?;
    for follow in &follows {
        println!("  - {} since {}", follow.user.display_name, follow.created_at);
    }

    println!("\n--- Teams ---");
    for team in get_channel_teams(&client, id).await? {
        println!("  - {}", team.display_name);
    }

    println!("\n--- Most viewed highlights ---");
    let videos = channel
        .videos(
            &client,
            VideoListQuery {
                broadcast_type: vec![BroadcastType::Highlight],
                sort: Some(VideoSort::Views),
                ..Default::default()
            },
            &PaginationParams::window(0, 5),
        )
        .await?;
    for video in &videos {
        println!("  - {} ({} views)", video.title, video.views);
    }

    println!("\nDone!");
    Ok(())
}

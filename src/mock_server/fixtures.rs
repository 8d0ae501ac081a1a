//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{DateTime, Utc};

use crate::{Channel, Follow, Preview, Team, Thumbnails, User, Video, VideoChannel};

/// Token accepted by the default scenario, bound to lirik.
pub const DEFAULT_TOKEN: &str = "test-token";

/// Client ID used throughout the fixtures.
pub const DEFAULT_CLIENT_ID: &str = "test-client-id";

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// Data set loaded by [`MockServer::start`](super::MockServer::start).
pub struct DefaultScenario {
    pub users: Vec<User>,
    pub channels: Vec<Channel>,
    pub follows: Vec<(String, Vec<Follow>)>,
    pub teams: Vec<(String, Vec<Team>)>,
    pub videos: Vec<(String, Vec<Video>)>,
}

fn ts(value: &str) -> DateTime<Utc> {
    value.parse().expect("fixture timestamps are RFC 3339")
}

impl Fixtures {
    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Create a user with required fields only.
    pub fn user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            display_name: name.to_string(),
            user_type: Some("user".to_string()),
            bio: None,
            created_at: ts("2012-01-01T00:00:00Z"),
            updated_at: ts("2017-01-01T00:00:00Z"),
            logo: None,
        }
    }

    // =========================================================================
    // Channel Fixtures
    // =========================================================================

    /// Create a channel with required fields only.
    pub fn channel(id: &str, name: &str) -> Channel {
        Channel {
            id: id.to_string(),
            name: name.to_string(),
            display_name: name.to_string(),
            status: None,
            game: None,
            mature: Some(false),
            broadcaster_language: Some("en".to_string()),
            language: Some("en".to_string()),
            logo: None,
            video_banner: None,
            profile_banner: None,
            profile_banner_background_color: None,
            partner: false,
            url: format!("https://www.twitch.tv/{name}"),
            views: 0,
            followers: 0,
            created_at: ts("2012-01-01T00:00:00Z"),
            updated_at: ts("2017-01-01T00:00:00Z"),
            email: None,
            stream_key: None,
        }
    }

    /// Create a partnered channel that is currently playing `game`.
    pub fn partner_channel(id: &str, name: &str, game: &str, followers: u64) -> Channel {
        let mut channel = Self::channel(id, name);
        channel.partner = true;
        channel.game = Some(game.to_string());
        channel.status = Some(game.to_string());
        channel.followers = followers;
        channel.views = followers * 100;
        channel
    }

    // =========================================================================
    // Follow Fixtures
    // =========================================================================

    /// Create a follow by user `user_id` at `created_at` (RFC 3339).
    pub fn follow(user_id: &str, user_name: &str, created_at: &str) -> Follow {
        Follow {
            created_at: ts(created_at),
            notifications: false,
            user: Self::user(user_id, user_name),
        }
    }

    // =========================================================================
    // Team Fixtures
    // =========================================================================

    pub fn team(id: &str, name: &str) -> Team {
        Team {
            id: id.to_string(),
            name: name.to_string(),
            display_name: name.to_string(),
            info: Some(format!("Team {name}")),
            logo: None,
            banner: None,
            background: None,
            created_at: ts("2014-01-01T00:00:00Z"),
            updated_at: ts("2017-01-01T00:00:00Z"),
        }
    }

    // =========================================================================
    // Video Fixtures
    // =========================================================================

    /// Create a video owned by `channel_id`.
    pub fn video(id: &str, channel_id: &str, broadcast_type: &str) -> Video {
        Self::video_for(&Self::channel(channel_id, &format!("channel{channel_id}")), id, broadcast_type)
    }

    /// Create a video owned by `channel`.
    pub fn video_for(channel: &Channel, id: &str, broadcast_type: &str) -> Video {
        Video {
            id: id.to_string(),
            broadcast_id: Some(1),
            broadcast_type: broadcast_type.to_string(),
            channel: VideoChannel {
                id: channel.id.clone(),
                name: channel.name.clone(),
                display_name: channel.display_name.clone(),
            },
            created_at: ts("2017-01-01T00:00:00Z"),
            description: None,
            description_html: None,
            fps: Default::default(),
            game: channel.game.clone(),
            language: Some("en".to_string()),
            length: 3600,
            preview: Preview::default(),
            published_at: None,
            resolutions: Default::default(),
            status: Some("recorded".to_string()),
            tag_list: String::new(),
            thumbnails: Thumbnails::default(),
            title: format!("{} - {id}", channel.display_name),
            url: format!("https://www.twitch.tv/videos/{}", id.trim_start_matches('v')),
            viewable: Some("public".to_string()),
            viewable_at: None,
            views: 0,
        }
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// lirik and monstercat, with followers, a team and a few videos on lirik.
    pub fn default_scenario() -> DefaultScenario {
        let lirik = Self::partner_channel("23161357", "lirik", "Thimbleweed Park", 1_834_271);
        let monstercat = Self::partner_channel("27446517", "monstercat", "Music", 512_000);

        let follows = vec![
            Self::follow("100", "early_bird", "2015-03-01T12:00:00Z"),
            Self::follow("101", "regular", "2016-06-15T18:30:00Z"),
            Self::follow("102", "newcomer", "2017-02-10T09:15:00Z"),
        ];

        let mut highlight = Self::video_for(&lirik, "v200", "highlight");
        highlight.created_at = ts("2017-02-01T00:00:00Z");
        highlight.views = 50_000;
        let mut archive = Self::video_for(&lirik, "v201", "archive");
        archive.created_at = ts("2017-03-01T00:00:00Z");
        archive.views = 12_000;
        let upload = Self::video_for(&lirik, "v202", "upload");

        DefaultScenario {
            users: vec![Self::user("23161357", "lirik"), Self::user("27446517", "monstercat")],
            follows: vec![(lirik.id.clone(), follows)],
            teams: vec![(lirik.id.clone(), vec![Self::team("10", "staff")])],
            videos: vec![(lirik.id.clone(), vec![highlight, archive, upload])],
            channels: vec![lirik, monstercat],
        }
    }
}

//! Twitch API model types.

mod channel;
mod follow;
mod team;
mod user;
mod video;

pub use channel::*;
pub use follow::*;
pub use team::*;
pub use user::*;
pub use video::*;

/// Kraken returns `_id` as a string on some resources and a number on
/// others. Normalize to a string.
pub(crate) mod id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match RawId::deserialize(d)? {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        })
    }
}

//! Trait definitions for Twitch endpoint operations.
//!
//! Each model type implements the traits its endpoints support.

mod get;
mod list;

pub use get::Get;
pub use list::{List, DEFAULT_LIMIT};

//! Follow graph (SoundCloud)

mod client;
mod model;
mod soundcloud_client;

pub use client::FollowGraphClient;
pub use model::Identity;
pub use soundcloud_client::SoundcloudClient;

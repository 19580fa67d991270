//! Core library for gig-radar
//!
//! This crate contains the domain model and upstream clients, including:
//! - Follow graph lookups (SoundCloud)
//! - Events directory lookups (Songkick)
//! - Runtime configuration

pub mod config;
pub mod directory;
pub mod error;
pub mod follow;
mod http;

pub use config::{Config, HttpConfig, ServiceConfig};
pub use directory::{DirectoryClient, EventRecord, MatchedEntity, SongkickClient};
pub use error::Error;
pub use follow::{FollowGraphClient, Identity, SoundcloudClient};
pub type Result<T> = std::result::Result<T, Error>;

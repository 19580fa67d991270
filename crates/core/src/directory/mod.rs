//! Events directory (Songkick)
//!
//! Name search and per-artist event lookup.

mod client;
mod model;
mod songkick_client;

pub use client::DirectoryClient;
pub use model::{EventRecord, MatchedEntity};
pub use songkick_client::SongkickClient;

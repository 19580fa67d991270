//! Directory client trait

use async_trait::async_trait;

use super::model::{EventRecord, MatchedEntity};
use crate::Result;

/// Interface to an events directory
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Search by name. `Ok(None)` means nothing matched.
    async fn find_entity(&self, name: &str) -> Result<Option<MatchedEntity>>;

    /// Fetch the first upcoming event of an entity.
    ///
    /// The entity must carry at least one identifier.
    async fn fetch_events(&self, entity: &MatchedEntity) -> Result<Option<EventRecord>>;
}

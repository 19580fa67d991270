//! Follow graph client trait

use async_trait::async_trait;

use super::model::Identity;
use crate::Result;

/// Interface to a social follow graph
#[async_trait]
pub trait FollowGraphClient: Send + Sync {
    /// Resolve a handle to an account. Fails with `UserNotFound` when the
    /// service has no such account.
    async fn resolve_user(&self, name: &str) -> Result<Identity>;

    /// Accounts the given user follows
    async fn list_followings(&self, user_id: i64) -> Result<Vec<Identity>>;
}

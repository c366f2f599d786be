use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Post;
use crate::error::RepoError;

/// Generic repository trait defining standard document operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Returns `RepoError::NotFound` if nothing was removed.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post document store.
///
/// Likes and comments are part of the post document; there is no separate
/// storage for them.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts, newest `date` first.
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError>;

    /// Replace the stored document only if its version still equals
    /// `expected_version`. On success the stored version is
    /// `expected_version + 1` and the saved post is returned.
    ///
    /// Fails with `RepoError::VersionConflict` if another writer got there
    /// first, and with `RepoError::NotFound` if the post is gone.
    async fn replace_if_version(&self, post: Post, expected_version: i64)
    -> Result<Post, RepoError>;
}

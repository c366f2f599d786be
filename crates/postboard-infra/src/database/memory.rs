//! In-memory post store - used when no database is configured, and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use postboard_core::domain::Post;
use postboard_core::error::RepoError;
use postboard_core::ports::{BaseRepository, PostRepository};

/// Post store backed by a HashMap behind an async RwLock.
///
/// Replaces are conditional on the stored version, the same contract the
/// PostgreSQL store enforces. Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&entity.id) {
            return Err(RepoError::Constraint("Post already exists".to_string()));
        }
        store.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self.store.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    async fn replace_if_version(
        &self,
        mut post: Post,
        expected_version: i64,
    ) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let stored = store.get_mut(&post.id).ok_or(RepoError::NotFound)?;

        if stored.version != expected_version {
            return Err(RepoError::VersionConflict);
        }

        post.version = expected_version + 1;
        *stored = post.clone();
        Ok(post)
    }
}

use std::future::Future;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Content, Post};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

use super::config::ProtocolConfig;
use super::locks::PostLocks;

/// Post mutation protocol.
///
/// Every mutation of an existing post runs as read-modify-write under the
/// post's in-process lock, and is persisted with a conditional replace keyed
/// on the version that was read. A version conflict (another process wrote
/// in between) re-runs the whole read-check-mutate cycle, so preconditions are
/// always evaluated against the document that ends up being replaced.
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    locks: PostLocks,
    config: ProtocolConfig,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, config: ProtocolConfig) -> Self {
        Self {
            repo,
            locks: PostLocks::new(),
            config,
        }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Create a post owned by `author`.
    pub async fn create(&self, author: Uuid, content: Content) -> Result<Post, DomainError> {
        self.config
            .text_rules
            .check(&content.text)
            .map_err(DomainError::Validation)?;

        let post = Post::new(author, content);
        let saved = self.store(self.repo.save(post)).await?;

        tracing::debug!(post_id = %saved.id, user_id = %author, "Post created");
        Ok(saved)
    }

    /// All posts, newest first.
    pub async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        let mut posts = self
            .store(self.repo.find_all_newest_first())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to list posts");
                DomainError::from(e)
            })?;

        for post in &mut posts {
            post.dedupe_likes();
        }
        Ok(posts)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Post, DomainError> {
        self.fetch(id).await
    }

    /// Delete a post. Only its owner may do so.
    pub async fn delete(&self, id: Uuid, requester: Uuid) -> Result<(), DomainError> {
        let _guard = self.locks.acquire(id).await;

        let post = self.fetch(id).await?;
        if !post.is_owned_by(requester) {
            tracing::debug!(post_id = %id, user_id = %requester, "Delete refused: not the owner");
            return Err(DomainError::NotAuthorized);
        }

        match self.store(self.repo.delete(id)).await {
            Ok(()) => {
                tracing::debug!(post_id = %id, "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(DomainError::PostNotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn like(&self, post_id: Uuid, user: Uuid) -> Result<Post, DomainError> {
        self.mutate(post_id, |post| post.like(user)).await
    }

    pub async fn unlike(&self, post_id: Uuid, user: Uuid) -> Result<Post, DomainError> {
        self.mutate(post_id, |post| post.unlike(user)).await
    }

    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author: Uuid,
        content: Content,
    ) -> Result<Post, DomainError> {
        self.config
            .text_rules
            .check(&content.text)
            .map_err(DomainError::Validation)?;

        // Built once so a retried attempt inserts the same comment id.
        let comment = Comment::new(author, content);
        self.mutate(post_id, |post| {
            post.add_comment(comment.clone());
            Ok(())
        })
        .await
    }

    pub async fn remove_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        requester: Uuid,
    ) -> Result<Post, DomainError> {
        let policy = self.config.comment_delete_policy;
        self.mutate(post_id, |post| {
            let comment = post.comment(comment_id).ok_or(DomainError::CommentNotFound {
                post_id,
                comment_id,
            })?;
            if !policy.permits(requester, post, comment) {
                return Err(DomainError::NotAuthorized);
            }
            post.remove_comment(comment_id).map(|_| ())
        })
        .await
    }

    /// Read-modify-write of one post under its lock, retrying on version conflicts.
    async fn mutate<F>(&self, post_id: Uuid, mut apply: F) -> Result<Post, DomainError>
    where
        F: FnMut(&mut Post) -> Result<(), DomainError> + Send,
    {
        let _guard = self.locks.acquire(post_id).await;
        let mut attempt = 0;

        loop {
            let mut post = self.fetch(post_id).await?;
            let expected_version = post.version;

            if let Err(e) = apply(&mut post) {
                tracing::debug!(post_id = %post_id, reason = %e, "Mutation rejected");
                return Err(e);
            }

            match self
                .store(self.repo.replace_if_version(post, expected_version))
                .await
            {
                Ok(saved) => return Ok(saved),
                Err(RepoError::VersionConflict) if attempt < self.config.max_conflict_retries => {
                    attempt += 1;
                    tracing::warn!(post_id = %post_id, attempt, "Version conflict, retrying");
                }
                Err(RepoError::VersionConflict) => {
                    tracing::warn!(post_id = %post_id, "Version conflict, giving up");
                    return Err(DomainError::Conflict(post_id));
                }
                Err(RepoError::NotFound) => return Err(DomainError::PostNotFound(post_id)),
                Err(e) => {
                    tracing::error!(post_id = %post_id, error = %e, "Failed to save post");
                    return Err(e.into());
                }
            }
        }
    }

    async fn fetch(&self, id: Uuid) -> Result<Post, DomainError> {
        let mut post = self
            .store(self.repo.find_by_id(id))
            .await?
            .ok_or(DomainError::PostNotFound(id))?;

        let dropped = post.dedupe_likes();
        if dropped > 0 {
            tracing::warn!(post_id = %id, dropped, "Collapsed duplicate likes");
        }
        Ok(post)
    }

    async fn store<T>(
        &self,
        call: impl Future<Output = Result<T, RepoError>>,
    ) -> Result<T, RepoError> {
        tokio::time::timeout(self.config.store_timeout, call)
            .await
            .map_err(|_| RepoError::Timeout(self.config.store_timeout))?
    }
}

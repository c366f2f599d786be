//! Domain-level error types.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationErrors;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Post not found: {0}")]
    PostNotFound(Uuid),

    #[error("Comment {comment_id} not found on post {post_id}")]
    CommentNotFound { post_id: Uuid, comment_id: Uuid },

    #[error("User not authorized")]
    NotAuthorized,

    #[error("User already liked this post")]
    AlreadyLiked,

    #[error("User has not yet liked this post")]
    NotLiked,

    #[error("Post {0} was modified concurrently")]
    Conflict(Uuid),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Stored version does not match the expected version")]
    VersionConflict,

    #[error("Stored document is malformed: {0}")]
    Corrupt(String),

    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        DomainError::StoreUnavailable(err.to_string())
    }
}

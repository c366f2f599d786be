//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/posts` and `POST /api/posts/comment/{id}`.
///
/// A missing `text` deserializes to an empty string so it is reported as a
/// validation error rather than a malformed body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
    pub user: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub date: DateTime<Utc>,
}

/// A post as returned by every post endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub likes: Vec<LikeResponse>,
    pub comments: Vec<CommentResponse>,
    pub date: DateTime<Utc>,
}

/// Reply of the `GET /api/posts/test` probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Author-supplied content for a new post or comment.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub text: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// A like - one per user per post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub user: Uuid,
}

/// A comment embedded in its parent post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub date: DateTime<Utc>,
}

impl Comment {
    pub fn new(user: Uuid, content: Content) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            text: content.text,
            name: content.name,
            avatar: content.avatar,
            date: Utc::now(),
        }
    }
}

/// Post aggregate - owns its likes and comments outright.
///
/// Both collections are ordered most-recent-first. `version` is bumped by the
/// store on every successful conditional replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub date: DateTime<Utc>,
    pub version: i64,
}

impl Post {
    /// Create a new post with empty likes and comments.
    pub fn new(user: Uuid, content: Content) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            text: content.text,
            name: content.name,
            avatar: content.avatar,
            likes: Vec::new(),
            comments: Vec::new(),
            date: Utc::now(),
            version: 0,
        }
    }

    pub fn is_owned_by(&self, user: Uuid) -> bool {
        self.user == user
    }

    pub fn is_liked_by(&self, user: Uuid) -> bool {
        self.likes.iter().any(|like| like.user == user)
    }

    /// Prepend a like for `user`.
    pub fn like(&mut self, user: Uuid) -> Result<(), DomainError> {
        if self.is_liked_by(user) {
            return Err(DomainError::AlreadyLiked);
        }
        self.likes.insert(0, Like { user });
        Ok(())
    }

    /// Remove the first like belonging to `user`.
    pub fn unlike(&mut self, user: Uuid) -> Result<(), DomainError> {
        let index = self
            .likes
            .iter()
            .position(|like| like.user == user)
            .ok_or(DomainError::NotLiked)?;
        self.likes.remove(index);
        Ok(())
    }

    /// Prepend a comment and return its assigned id.
    pub fn add_comment(&mut self, comment: Comment) -> Uuid {
        let id = comment.id;
        self.comments.insert(0, comment);
        id
    }

    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    /// Remove the comment with `comment_id` and hand it back.
    pub fn remove_comment(&mut self, comment_id: Uuid) -> Result<Comment, DomainError> {
        let index = self
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or(DomainError::CommentNotFound {
                post_id: self.id,
                comment_id,
            })?;
        Ok(self.comments.remove(index))
    }

    /// Collapse duplicate likes left behind by older writers, keeping the most
    /// recent entry per user. Returns how many entries were dropped.
    pub fn dedupe_likes(&mut self) -> usize {
        let before = self.likes.len();
        let mut seen = std::collections::HashSet::with_capacity(before);
        self.likes.retain(|like| seen.insert(like.user));
        before - self.likes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> Post {
        Post::new(
            Uuid::new_v4(),
            Content {
                text: "hello from the board".to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_new_post_is_empty() {
        let p = post();
        assert!(p.likes.is_empty());
        assert!(p.comments.is_empty());
        assert_eq!(p.version, 0);
    }

    #[test]
    fn test_like_prepends() {
        let mut p = post();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        p.like(first).unwrap();
        p.like(second).unwrap();

        assert_eq!(p.likes[0].user, second);
        assert_eq!(p.likes[1].user, first);
    }

    #[test]
    fn test_double_like_rejected() {
        let mut p = post();
        let user = Uuid::new_v4();
        p.like(user).unwrap();

        let err = p.like(user).unwrap_err();
        assert!(matches!(err, DomainError::AlreadyLiked));
        assert_eq!(p.likes.len(), 1);
    }

    #[test]
    fn test_unlike_without_like() {
        let mut p = post();
        assert!(matches!(
            p.unlike(Uuid::new_v4()),
            Err(DomainError::NotLiked)
        ));
    }

    #[test]
    fn test_unlike_removes_only_first_match() {
        let mut p = post();
        let user = Uuid::new_v4();
        p.likes = vec![Like { user }, Like { user }];

        p.unlike(user).unwrap();
        assert_eq!(p.likes, vec![Like { user }]);
    }

    #[test]
    fn test_comment_round_trip() {
        let mut p = post();
        let author = Uuid::new_v4();
        let id = p.add_comment(Comment::new(
            author,
            Content {
                text: "first comment here".to_string(),
                ..Default::default()
            },
        ));

        assert_eq!(p.comment(id).map(|c| c.user), Some(author));
        let removed = p.remove_comment(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(p.comments.is_empty());
    }

    #[test]
    fn test_remove_unknown_comment() {
        let mut p = post();
        let missing = Uuid::new_v4();
        match p.remove_comment(missing) {
            Err(DomainError::CommentNotFound { comment_id, .. }) => assert_eq!(comment_id, missing),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_dedupe_likes_keeps_most_recent() {
        let mut p = post();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        p.likes = vec![Like { user: a }, Like { user: b }, Like { user: a }];

        assert_eq!(p.dedupe_likes(), 1);
        assert_eq!(p.likes, vec![Like { user: a }, Like { user: b }]);
    }
}

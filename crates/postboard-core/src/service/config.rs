use std::str::FromStr;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::validation::TextRules;

/// Who may remove a comment from a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentDeletePolicy {
    /// Any authenticated user. Matches the historical behaviour of the API.
    #[default]
    AnyAuthenticated,
    /// Only the comment's author.
    Author,
    /// The comment's author or the owner of the post.
    AuthorOrPostOwner,
}

impl CommentDeletePolicy {
    pub fn permits(&self, requester: Uuid, post: &Post, comment: &Comment) -> bool {
        match self {
            CommentDeletePolicy::AnyAuthenticated => true,
            CommentDeletePolicy::Author => comment.user == requester,
            CommentDeletePolicy::AuthorOrPostOwner => {
                comment.user == requester || post.is_owned_by(requester)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown comment delete policy '{0}' (expected any, author or author-or-owner)")]
pub struct ParsePolicyError(String);

impl FromStr for CommentDeletePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" | "any-authenticated" => Ok(Self::AnyAuthenticated),
            "author" => Ok(Self::Author),
            "author-or-owner" => Ok(Self::AuthorOrPostOwner),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// Tunables of the mutation protocol.
#[derive(Debug, Clone)]
pub struct ProtocolConfig {
    /// Upper bound for any single store call.
    pub store_timeout: Duration,
    /// Extra attempts after a version conflict before giving up.
    pub max_conflict_retries: u32,
    pub comment_delete_policy: CommentDeletePolicy,
    pub text_rules: TextRules,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(5),
            max_conflict_retries: 3,
            comment_delete_policy: CommentDeletePolicy::default(),
            text_rules: TextRules::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!(
            "any".parse::<CommentDeletePolicy>().unwrap(),
            CommentDeletePolicy::AnyAuthenticated
        );
        assert_eq!(
            " Author ".parse::<CommentDeletePolicy>().unwrap(),
            CommentDeletePolicy::Author
        );
        assert_eq!(
            "author-or-owner".parse::<CommentDeletePolicy>().unwrap(),
            CommentDeletePolicy::AuthorOrPostOwner
        );
        assert!("nobody".parse::<CommentDeletePolicy>().is_err());
    }
}

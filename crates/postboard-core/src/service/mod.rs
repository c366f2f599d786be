//! The post mutation protocol and its configuration.

mod config;
mod locks;
mod posts;

pub use config::{CommentDeletePolicy, ParsePolicyError, ProtocolConfig};
pub use locks::{PostGuard, PostLocks};
pub use posts::PostService;

//! # Postboard Core
//!
//! The domain layer of the Postboard backend: the Post aggregate with its
//! embedded likes and comments, the rules for mutating it, and the ports
//! that infrastructure must implement.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::DomainError;
pub use service::{CommentDeletePolicy, PostService, ProtocolConfig};

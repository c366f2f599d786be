//! Domain entities - the Post aggregate and what it embeds.

mod post;

pub use post::{Comment, Content, Like, Post};

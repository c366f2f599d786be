//! Post entity for SeaORM.
//!
//! The whole aggregate is one row: likes and comments are JSONB arrays, so a
//! single conditional UPDATE replaces the post together with its collections.

use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};

use postboard_core::domain::{Comment, Like, Post};
use postboard_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    #[sea_orm(nullable)]
    pub name: Option<String>,
    #[sea_orm(nullable)]
    pub avatar: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub likes: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub comments: Json,
    pub date: DateTimeWithTimeZone,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl TryFrom<Model> for Post {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let likes: Vec<Like> = serde_json::from_value(model.likes)
            .map_err(|e| RepoError::Corrupt(format!("post {} likes: {}", model.id, e)))?;
        let comments: Vec<Comment> = serde_json::from_value(model.comments)
            .map_err(|e| RepoError::Corrupt(format!("post {} comments: {}", model.id, e)))?;

        Ok(Self {
            id: model.id,
            user: model.user_id,
            text: model.text,
            name: model.name,
            avatar: model.avatar,
            likes,
            comments,
            date: model.date.into(),
            version: model.version,
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Json, RepoError> {
    serde_json::to_value(value).map_err(|e| RepoError::Query(e.to_string()))
}

/// Full row for inserting a new post.
pub fn insert_model(post: &Post) -> Result<ActiveModel, RepoError> {
    Ok(ActiveModel {
        id: Set(post.id),
        user_id: Set(post.user),
        text: Set(post.text.clone()),
        name: Set(post.name.clone()),
        avatar: Set(post.avatar.clone()),
        likes: Set(to_json(&post.likes)?),
        comments: Set(to_json(&post.comments)?),
        date: Set(post.date.into()),
        version: Set(post.version),
    })
}

/// Columns written by a replace. `id`, `user_id` and `date` are immutable
/// and left out.
pub fn replace_model(post: &Post, version: i64) -> Result<ActiveModel, RepoError> {
    Ok(ActiveModel {
        id: NotSet,
        user_id: NotSet,
        text: Set(post.text.clone()),
        name: Set(post.name.clone()),
        avatar: Set(post.avatar.clone()),
        likes: Set(to_json(&post.likes)?),
        comments: Set(to_json(&post.comments)?),
        date: NotSet,
        version: Set(version),
    })
}

//! PostgreSQL post store.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use postboard_core::domain::Post;
use postboard_core::error::RepoError;
use postboard_core::ports::{BaseRepository, PostRepository};

use super::entity::post::{self, Entity as PostEntity};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn query_error(e: DbErr) -> RepoError {
    match e {
        DbErr::Conn(err) => RepoError::Connection(err.to_string()),
        DbErr::ConnectionAcquire(err) => RepoError::Connection(err.to_string()),
        other => {
            let err_str = other.to_string();
            if err_str.contains("duplicate") || err_str.contains("unique") {
                RepoError::Constraint("Post already exists".to_string())
            } else {
                RepoError::Query(err_str)
            }
        }
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?
            .map(Post::try_from)
            .transpose()
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let model = post::insert_model(&entity)?
            .insert(&self.db)
            .await
            .map_err(query_error)?;

        Post::try_from(model)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        PostEntity::find()
            .order_by_desc(post::Column::Date)
            .all(&self.db)
            .await
            .map_err(query_error)?
            .into_iter()
            .map(Post::try_from)
            .collect()
    }

    async fn replace_if_version(
        &self,
        mut post: Post,
        expected_version: i64,
    ) -> Result<Post, RepoError> {
        let next_version = expected_version + 1;

        let result = PostEntity::update_many()
            .set(post::replace_model(&post, next_version)?)
            .filter(post::Column::Id.eq(post.id))
            .filter(post::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            // Either the row is gone or someone else bumped the version.
            let exists = PostEntity::find_by_id(post.id)
                .one(&self.db)
                .await
                .map_err(query_error)?
                .is_some();

            tracing::debug!(post_id = %post.id, expected_version, exists, "Conditional replace missed");
            return Err(if exists {
                RepoError::VersionConflict
            } else {
                RepoError::NotFound
            });
        }

        post.version = next_version;
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use crate::database::entity::post;
    use crate::database::postgres_repo::PostgresPostRepository;
    use postboard_core::domain::{Like, Post};
    use postboard_core::error::RepoError;
    use postboard_core::ports::{BaseRepository, PostRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(id: uuid::Uuid, version: i64, likes: serde_json::Value) -> post::Model {
        post::Model {
            id,
            user_id: uuid::Uuid::new_v4(),
            text: "Test Post body".to_owned(),
            name: Some("Tester".to_owned()),
            avatar: None,
            likes,
            comments: serde_json::json!([]),
            date: chrono::Utc::now().into(),
            version,
        }
    }

    fn domain_post(id: uuid::Uuid) -> Post {
        Post {
            id,
            user: uuid::Uuid::new_v4(),
            text: "Test Post body".to_owned(),
            name: None,
            avatar: None,
            likes: Vec::new(),
            comments: Vec::new(),
            date: chrono::Utc::now(),
            version: 4,
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id_decodes_likes() {
        let post_id = uuid::Uuid::new_v4();
        let liker = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(
                post_id,
                2,
                serde_json::json!([{ "user": liker }]),
            )]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let post = repo.find_by_id(post_id).await.unwrap().unwrap();

        assert_eq!(post.id, post_id);
        assert_eq!(post.version, 2);
        assert_eq!(post.likes, vec![Like { user: liker }]);
    }

    #[tokio::test]
    async fn test_find_post_with_malformed_likes() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(
                post_id,
                0,
                serde_json::json!({ "not": "an array" }),
            )]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let result = repo.find_by_id(post_id).await;

        assert!(matches!(result, Err(RepoError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_replace_if_version_success() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let saved = repo
            .replace_if_version(domain_post(post_id), 4)
            .await
            .unwrap();

        assert_eq!(saved.version, 5);
    }

    #[tokio::test]
    async fn test_replace_if_version_conflict() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results(vec![vec![model(post_id, 5, serde_json::json!([]))]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let result = repo.replace_if_version(domain_post(post_id), 4).await;

        assert!(matches!(result, Err(RepoError::VersionConflict)));
    }

    #[tokio::test]
    async fn test_replace_if_version_missing_post() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let result = repo.replace_if_version(domain_post(post_id), 4).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let result = repo.delete(uuid::Uuid::new_v4()).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}

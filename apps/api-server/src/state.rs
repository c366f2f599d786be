//! Application state - shared across all handlers.

use std::sync::Arc;

use postboard_core::ports::PostRepository;
use postboard_core::{PostService, ProtocolConfig};
use postboard_infra::InMemoryPostRepository;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    /// Name of the active post store, reported by the health check.
    pub store: &'static str,
    pub legacy_list_not_found: bool,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let (repo, store) = Self::post_store(config).await;
        tracing::info!(store, "Application state initialized");

        Self {
            posts: Arc::new(PostService::new(repo, config.protocol.clone())),
            store,
            legacy_list_not_found: config.legacy_list_not_found,
        }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(protocol: ProtocolConfig) -> Self {
        Self {
            store: "memory",
            ..Self::with_repository(Arc::new(InMemoryPostRepository::new()), protocol, true)
        }
    }

    /// State over an arbitrary post store.
    pub fn with_repository(
        repo: Arc<dyn PostRepository>,
        protocol: ProtocolConfig,
        legacy_list_not_found: bool,
    ) -> Self {
        Self {
            posts: Arc::new(PostService::new(repo, protocol)),
            store: "custom",
            legacy_list_not_found,
        }
    }

    #[cfg(feature = "postgres")]
    async fn post_store(config: &AppConfig) -> (Arc<dyn PostRepository>, &'static str) {
        use postboard_infra::database::{DatabaseConfig, PostgresPostRepository, connect};

        let Some(settings) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (Arc::new(InMemoryPostRepository::new()), "memory");
        };

        let db_config = DatabaseConfig {
            max_connections: settings.max_connections,
            min_connections: settings.min_connections,
            ..DatabaseConfig::new(settings.url.clone())
        };

        match connect(&db_config).await {
            Ok(conn) => (Arc::new(PostgresPostRepository::new(conn)), "postgres"),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (Arc::new(InMemoryPostRepository::new()), "memory")
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn post_store(config: &AppConfig) -> (Arc<dyn PostRepository>, &'static str) {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        (Arc::new(InMemoryPostRepository::new()), "memory")
    }
}

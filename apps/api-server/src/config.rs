//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use postboard_core::validation::TextRules;
use postboard_core::{CommentDeletePolicy, ProtocolConfig};

/// Database settings, present only when `DATABASE_URL` is set.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseSettings>,
    pub protocol: ProtocolConfig,
    /// Report store failures on `GET /api/posts` as 404 "no posts found",
    /// the way older clients expect.
    pub legacy_list_not_found: bool,
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseSettings {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            database,
            protocol: Self::protocol_from_env(),
            legacy_list_not_found: flag("LEGACY_LIST_NOT_FOUND", true),
        }
    }

    fn protocol_from_env() -> ProtocolConfig {
        let defaults = ProtocolConfig::default();

        let comment_delete_policy = match env::var("COMMENT_DELETE_POLICY") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}; falling back to 'any'", e);
                CommentDeletePolicy::default()
            }),
            Err(_) => defaults.comment_delete_policy,
        };

        let text_rules = TextRules {
            min_chars: parsed("POST_TEXT_MIN").unwrap_or(defaults.text_rules.min_chars),
            max_chars: parsed("POST_TEXT_MAX").unwrap_or(defaults.text_rules.max_chars),
        };

        ProtocolConfig {
            store_timeout: parsed("STORE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_timeout),
            max_conflict_retries: parsed("CONFLICT_RETRIES")
                .unwrap_or(defaults.max_conflict_retries),
            comment_delete_policy,
            text_rules,
        }
    }
}

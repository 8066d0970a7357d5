//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PostStore, UserRepository};
use quill_infra::database::{
    DatabaseConfig, InMemoryPostStore, InMemoryUserRepository, PostgresPostStore,
    PostgresUserRepository, connect,
};

/// Shared application state. Repositories are injected here once at startup;
/// route code never manages connections.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        match db_config {
            Some(config) => match connect(config).await {
                Ok(conn) => Self {
                    posts: Arc::new(PostgresPostStore::new(conn.clone())),
                    users: Arc::new(PostgresUserRepository::new(conn)),
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running with in-memory repositories.");
                Self::in_memory()
            }
        }
    }

    /// State backed by in-memory repositories; also what the handler tests
    /// run against.
    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostStore::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }
}

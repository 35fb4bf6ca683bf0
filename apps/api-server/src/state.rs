//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ops::{CatalogService, CommentService, PostService, UserService};
use quill_core::ports::{CommentStore, FileStore, PasswordService, PostStore, TagStore, UserStore};
use quill_infra::{Argon2PasswordService, DiskFileStore, MemoryStore};

use crate::config::AppConfig;

struct Stores {
    users: Arc<dyn UserStore>,
    tags: Arc<dyn TagStore>,
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
}

fn memory_stores() -> Stores {
    let store = Arc::new(MemoryStore::new());
    Stores {
        users: store.clone(),
        tags: store.clone(),
        posts: store.clone(),
        comments: store,
    }
}

#[cfg(feature = "postgres")]
async fn postgres_stores(config: &AppConfig, url: &str) -> Option<Stores> {
    use quill_infra::database::{DatabaseConfig, connect};
    use quill_infra::{
        PostgresCommentStore, PostgresPostStore, PostgresTagStore, PostgresUserStore,
    };

    let db_config = DatabaseConfig {
        url: url.to_string(),
        max_connections: config.db_max_connections,
        min_connections: config.db_min_connections,
    };

    match connect(&db_config).await {
        Ok(conn) => Some(Stores {
            users: Arc::new(PostgresUserStore::new(conn.clone())),
            tags: Arc::new(PostgresTagStore::new(conn.clone())),
            posts: Arc::new(PostgresPostStore::new(conn.clone())),
            comments: Arc::new(PostgresCommentStore::new(conn)),
        }),
        Err(e) => {
            tracing::error!("Failed to connect to database: {e}. Using in-memory fallback.");
            None
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let files: Arc<dyn FileStore> = Arc::new(DiskFileStore::new(&config.media_root));

        #[cfg(feature = "postgres")]
        let stores = match &config.database_url {
            Some(url) => match postgres_stores(config, url).await {
                Some(stores) => stores,
                None => memory_stores(),
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                memory_stores()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let stores = {
            tracing::info!("Running without postgres feature - using in-memory store");
            memory_stores()
        };

        tracing::info!("Application state initialized");

        Self {
            users: Arc::new(UserService::new(stores.users, passwords, files)),
            posts: Arc::new(PostService::new(stores.posts, stores.tags.clone())),
            comments: Arc::new(CommentService::new(stores.comments)),
            catalog: Arc::new(CatalogService::new(stores.tags)),
        }
    }
}

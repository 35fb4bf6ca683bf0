//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the database backends, authentication services and
//! file storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory stores only
//! - `postgres` - PostgreSQL store support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;
pub mod files;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use database::MemoryStore;
pub use files::DiskFileStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, PostgresCommentStore, PostgresPostStore, PostgresTagStore, PostgresUserStore,
};

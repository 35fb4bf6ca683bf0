//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod files;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use files::{FileError, FileStore};
pub use repository::{CommentStore, PostStore, TagStore, UserStore};

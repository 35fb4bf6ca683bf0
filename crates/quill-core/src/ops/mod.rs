//! Resource operations.
//!
//! Services orchestrate the policy engine, query scoper, tag resolver, slug
//! generator and entity stores into the create/read/update/delete behavior
//! the boundary layer exposes. Every operation receives the caller identity
//! explicitly; there is no ambient request context.

mod comments;
mod posts;
mod tags;
mod users;

pub use comments::{CommentPatch, CommentService, NewComment};
pub use posts::{NewPost, PostPatch, PostService};
pub use tags::{CatalogService, resolve_tags};
pub use users::{NewUser, ProfileImage, UserPatch, UserService};

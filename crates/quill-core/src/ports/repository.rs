//! Entity store ports.
//!
//! Implementations must enforce relational integrity: inserts referencing a
//! missing row fail with `Integrity`, and deletes cascade as documented on
//! each method. Post listings are newest-first, comment listings
//! oldest-first, tag listings by name; the page window applies after that
//! ordering.

use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post, Tag, User};
use crate::error::StoreError;
use crate::query::{Page, PostFilter};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new user. Fails with `Integrity` on a duplicate username or
    /// email.
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    async fn update(&self, user: User) -> Result<User, StoreError>;

    /// Delete a user, cascading to their posts and comments.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait TagStore: Send + Sync {
    /// List tags ordered by name, windowed by `page`.
    async fn list(&self, page: &Page) -> Result<Vec<Tag>, StoreError>;

    /// First row matching `name` exactly, if any. Duplicate rows are
    /// legitimate; which duplicate is returned is unspecified but stable.
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, StoreError>;

    async fn insert(&self, tag: Tag) -> Result<Tag, StoreError>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// List posts matching `filter`, newest-first, windowed by `page`, with
    /// no duplicates even when tag filters join across the tag relation.
    async fn list(&self, filter: &PostFilter, page: &Page) -> Result<Vec<Post>, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError>;

    /// Snapshot of every slug currently in use, for slug derivation.
    async fn slugs(&self) -> Result<HashSet<String>, StoreError>;

    async fn insert(&self, post: Post) -> Result<Post, StoreError>;

    async fn update(&self, post: Post) -> Result<Post, StoreError>;

    /// Delete a post, cascading to its comments and tag-relation rows.
    /// Tags themselves survive.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// List comments oldest-first, windowed by `page`.
    async fn list(&self, page: &Page) -> Result<Vec<Comment>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, StoreError>;

    /// Insert a comment. Fails with `Integrity` when the referenced post or
    /// author does not exist.
    async fn insert(&self, comment: Comment) -> Result<Comment, StoreError>;

    async fn update(&self, comment: Comment) -> Result<Comment, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

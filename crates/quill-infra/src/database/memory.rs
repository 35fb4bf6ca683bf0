//! In-memory entity store - used in tests and as fallback when no database
//! is configured.
//!
//! One struct backs all four store ports so that relational integrity and
//! cascade deletes can be enforced across tables. Data is lost on process
//! restart. Tags live in a `Vec` so duplicate names keep insertion order and
//! `find_by_name` returns the first match, mirroring the SQL backend.

use std::collections::HashMap;
use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Post, Tag, User};
use quill_core::error::StoreError;
use quill_core::ports::{CommentStore, PostStore, TagStore, UserStore};
use quill_core::query::{Page, PostFilter};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    tags: Vec<Tag>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

/// In-memory store over async-locked tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Integrity(
                "Duplicate value for a unique column".to_string(),
            ));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        // Cascade: the user's posts, those posts' comments, and the user's
        // own comments elsewhere.
        let doomed_posts: HashSet<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|_, p| p.author_id != id);
        tables
            .comments
            .retain(|_, c| c.author_id != id && !doomed_posts.contains(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn list(&self, page: &Page) -> Result<Vec<Tag>, StoreError> {
        let tables = self.tables.read().await;
        let mut tags = tables.tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page.slice(tags))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.iter().find(|t| t.name == name).cloned())
    }

    async fn insert(&self, tag: Tag) -> Result<Tag, StoreError> {
        let mut tables = self.tables.write().await;
        tables.tags.push(tag.clone());
        Ok(tag)
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(&self, filter: &PostFilter, page: &Page) -> Result<Vec<Post>, StoreError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| {
                let username = tables
                    .users
                    .get(&p.author_id)
                    .map(|u| u.username.as_str())
                    .unwrap_or("");
                filter.matches(p, username)
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.slice(posts))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn slugs(&self) -> Result<HashSet<String>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().map(|p| p.slug.clone()).collect())
    }

    async fn insert(&self, post: Post) -> Result<Post, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(StoreError::Integrity(
                "Post references a missing author".to_string(),
            ));
        }
        if tables.posts.values().any(|p| p.slug == post.slug) {
            return Err(StoreError::Integrity(
                "Duplicate value for a unique column".to_string(),
            ));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(StoreError::NotFound);
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        // Cascade: the post's comments. Tags survive detachment.
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn list(&self, page: &Page) -> Result<Vec<Comment>, StoreError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables.comments.values().cloned().collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(page.slice(comments))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(StoreError::Integrity(
                "Comment references a missing post".to_string(),
            ));
        }
        if !tables.users.contains_key(&comment.author_id) {
            return Err(StoreError::Integrity(
                "Comment references a missing author".to_string(),
            ));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.comments.contains_key(&comment.id) {
            return Err(StoreError::NotFound);
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.comments.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

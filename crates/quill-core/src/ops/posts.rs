//! Post resource operations.

use std::sync::Arc;

use crate::domain::{Category, Post};
use crate::error::CoreError;
use crate::policy::{self, Action, Caller, Resource};
use crate::ports::{PostStore, TagStore};
use crate::query::{Page, PostFilter};
use crate::slug;

use super::tags::resolve_tags;

const TITLE_MAX: usize = 100;

/// Payload for post creation. The author is always the caller; any
/// payload-supplied author is dropped before this struct is built.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub category: Category,
    pub tags: Vec<String>,
}

/// Partial update of a post. The slug and author are not patchable.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
}

pub struct PostService {
    posts: Arc<dyn PostStore>,
    tags: Arc<dyn TagStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, tags: Arc<dyn TagStore>) -> Self {
        Self { posts, tags }
    }

    /// Create a post authored by the caller. Tags go through the resolver,
    /// the title through slug derivation against the current slug snapshot.
    pub async fn create(&self, caller: Option<&Caller>, input: NewPost) -> Result<Post, CoreError> {
        policy::check_operation(caller, Action::Create, Resource::Post)?;
        let caller = caller.ok_or(CoreError::Unauthenticated)?;

        validate_title(&input.title)?;
        validate_body(&input.body)?;

        let tags = resolve_tags(self.tags.as_ref(), &input.tags).await?;
        let existing = self.posts.slugs().await?;
        let slug = slug::unique_slug(&input.title, &existing);

        let post = Post::new(
            input.title,
            slug,
            input.body,
            input.category,
            caller.id,
            tags,
        );
        Ok(self.posts.insert(post).await?)
    }

    /// List posts visible to anyone, narrowed by the scoped filter and
    /// windowed by `page`.
    pub async fn list(
        &self,
        caller: Option<&Caller>,
        filter: PostFilter,
        page: Page,
    ) -> Result<Vec<Post>, CoreError> {
        policy::check_operation(caller, Action::List, Resource::Post)?;
        Ok(self.posts.list(&filter, &page).await?)
    }

    /// Fetch a single post by slug; open to anonymous callers.
    pub async fn get(&self, caller: Option<&Caller>, slug: &str) -> Result<Post, CoreError> {
        policy::check_operation(caller, Action::Read, Resource::Post)?;
        self.posts
            .find_by_slug(slug)
            .await?
            .ok_or(CoreError::NotFound)
    }

    /// Update a post the caller authored. The slug never changes, even when
    /// the title does.
    pub async fn update(
        &self,
        caller: Option<&Caller>,
        slug: &str,
        patch: PostPatch,
    ) -> Result<Post, CoreError> {
        policy::check_operation(caller, Action::Update, Resource::Post)?;
        let caller = caller.ok_or(CoreError::Unauthenticated)?;

        let mut post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or(CoreError::NotFound)?;
        policy::check_object(caller, Resource::Post, post.author_id)?;

        if let Some(title) = patch.title {
            validate_title(&title)?;
            post.title = title;
        }
        if let Some(body) = patch.body {
            validate_body(&body)?;
            post.body = body;
        }
        if let Some(category) = patch.category {
            post.category = category;
        }
        if let Some(names) = patch.tags {
            post.tags = resolve_tags(self.tags.as_ref(), &names).await?;
        }
        post.updated_at = chrono::Utc::now();

        Ok(self.posts.update(post).await?)
    }

    /// Delete a post the caller authored, cascading to its comments.
    pub async fn delete(&self, caller: Option<&Caller>, slug: &str) -> Result<(), CoreError> {
        policy::check_operation(caller, Action::Delete, Resource::Post)?;
        let caller = caller.ok_or(CoreError::Unauthenticated)?;

        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or(CoreError::NotFound)?;
        policy::check_object(caller, Resource::Post, post.author_id)?;

        Ok(self.posts.delete(post.id).await?)
    }
}

fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title is required".into()));
    }
    // Character count, not byte length; multibyte titles count per char.
    if title.chars().count() > TITLE_MAX {
        return Err(CoreError::Validation(format!(
            "Title must be at most {TITLE_MAX} characters"
        )));
    }
    Ok(())
}

fn validate_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation("Body is required".into()));
    }
    Ok(())
}

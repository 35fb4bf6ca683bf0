//! Comment resource operations.
//!
//! Any authenticated user may comment on any existing post; the comment's
//! author is always the caller regardless of the payload. Listing is open
//! to anonymous callers, mutation is limited to the comment's author.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Comment;
use crate::error::CoreError;
use crate::policy::{self, Action, Caller, Resource};
use crate::ports::CommentStore;
use crate::query::Page;

/// Payload for comment creation. Any author field in the wire payload is
/// discarded before this struct is built.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub body: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub body: Option<String>,
}

pub struct CommentService {
    comments: Arc<dyn CommentStore>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentStore>) -> Self {
        Self { comments }
    }

    pub async fn create(
        &self,
        caller: Option<&Caller>,
        input: NewComment,
    ) -> Result<Comment, CoreError> {
        policy::check_operation(caller, Action::Create, Resource::Comment)?;
        let caller = caller.ok_or(CoreError::Unauthenticated)?;

        validate_body(&input.body)?;

        let comment = Comment::new(input.body, caller.id, input.post_id);
        // The store rejects a dangling post reference with Integrity.
        Ok(self.comments.insert(comment).await?)
    }

    pub async fn list(&self, caller: Option<&Caller>, page: Page) -> Result<Vec<Comment>, CoreError> {
        policy::check_operation(caller, Action::List, Resource::Comment)?;
        Ok(self.comments.list(&page).await?)
    }

    pub async fn get(&self, caller: Option<&Caller>, id: Uuid) -> Result<Comment, CoreError> {
        policy::check_operation(caller, Action::Read, Resource::Comment)?;
        self.comments
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound)
    }

    pub async fn update(
        &self,
        caller: Option<&Caller>,
        id: Uuid,
        patch: CommentPatch,
    ) -> Result<Comment, CoreError> {
        policy::check_operation(caller, Action::Update, Resource::Comment)?;
        let caller = caller.ok_or(CoreError::Unauthenticated)?;

        let mut comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound)?;
        policy::check_object(caller, Resource::Comment, comment.author_id)?;

        if let Some(body) = patch.body {
            validate_body(&body)?;
            comment.body = body;
        }
        comment.updated_at = chrono::Utc::now();

        Ok(self.comments.update(comment).await?)
    }

    pub async fn delete(&self, caller: Option<&Caller>, id: Uuid) -> Result<(), CoreError> {
        policy::check_operation(caller, Action::Delete, Resource::Comment)?;
        let caller = caller.ok_or(CoreError::Unauthenticated)?;

        let comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotFound)?;
        policy::check_object(caller, Resource::Comment, comment.author_id)?;

        Ok(self.comments.delete(comment.id).await?)
    }
}

fn validate_body(body: &str) -> Result<(), CoreError> {
    if body.trim().is_empty() {
        return Err(CoreError::Validation("Comment body is required".into()));
    }
    Ok(())
}

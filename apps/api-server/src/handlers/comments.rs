//! Comment handlers. Same shape as posts: open reads, owner-scoped writes.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::ops::{CommentPatch, NewComment};
use quill_core::query::Page;
use quill_shared::dto::{CommentResponse, CreateCommentRequest, PageQuery, UpdateCommentRequest};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/comments
pub async fn list(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = Page {
        limit: query.limit,
        offset: query.offset,
    };
    let comments = state.comments.list(identity.caller().as_ref(), page).await?;

    let response: Vec<CommentResponse> = comments.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let comment = state
        .comments
        .create(
            Some(&identity.caller()),
            NewComment {
                post_id: req.post_id,
                body: req.body,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// GET /api/comments/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .get(identity.caller().as_ref(), *path)
        .await?;
    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

/// PUT/PATCH /api/comments/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let comment = state
        .comments
        .update(
            Some(&identity.caller()),
            *path,
            CommentPatch { body: req.body },
        )
        .await?;

    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

/// DELETE /api/comments/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .comments
        .delete(Some(&identity.caller()), *path)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

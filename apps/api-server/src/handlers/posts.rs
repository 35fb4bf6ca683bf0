//! Post handlers. Reads are open; writes require a token and are scoped
//! to the caller's own posts.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::ops::{NewPost, PostPatch};
use quill_core::query::{Page, PostFilter};
use quill_shared::dto::{CreatePostRequest, PostListQuery, PostResponse, UpdatePostRequest};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn parse_filter(query: PostListQuery) -> Result<(PostFilter, Page), AppError> {
    let tags = match query.tags.as_deref() {
        Some(raw) => {
            let ids = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    Uuid::parse_str(s)
                        .map_err(|_| AppError::Validation(format!("Invalid tag id: {s}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            if ids.is_empty() { None } else { Some(ids) }
        }
        None => None,
    };

    let tag_names = query
        .tag_names
        .as_deref()
        .map(PostFilter::parse_tag_names)
        .filter(|names| !names.is_empty());

    let filter = PostFilter {
        search: query.search,
        category: query.category,
        tags,
        tag_names,
        author: query.author,
        created_after: query.created_after,
        created_before: query.created_before,
        has_tags: query.has_tags,
    };
    let page = Page {
        limit: query.limit,
        offset: query.offset,
    };
    Ok((filter, page))
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let (filter, page) = parse_filter(query.into_inner())?;
    let posts = state
        .posts
        .list(identity.caller().as_ref(), filter, page)
        .await?;

    let response: Vec<PostResponse> = posts.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .create(
            Some(&identity.caller()),
            NewPost {
                title: req.title,
                body: req.body,
                category: req.category,
                tags: req.tags,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// GET /api/posts/{slug}
pub async fn get(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(identity.caller().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// PUT/PATCH /api/posts/{slug}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .update(
            Some(&identity.caller()),
            &path,
            PostPatch {
                title: req.title,
                body: req.body,
                category: req.category,
                tags: req.tags,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// DELETE /api/posts/{slug}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.delete(Some(&identity.caller()), &path).await?;
    Ok(HttpResponse::NoContent().finish())
}

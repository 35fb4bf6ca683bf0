//! Tag and category listings. Both require a token.

use actix_web::{HttpResponse, web};

use quill_core::query::Page;
use quill_shared::dto::{PageQuery, TagResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/tags
pub async fn tags(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = Page {
        limit: query.limit,
        offset: query.offset,
    };
    let tags = state.catalog.list_tags(Some(&identity.caller()), page).await?;

    let response: Vec<TagResponse> = tags.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /api/categories
pub async fn categories(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let categories = state.catalog.list_categories(Some(&identity.caller()))?;
    Ok(HttpResponse::Ok().json(categories))
}

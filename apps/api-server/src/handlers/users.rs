//! User handlers. The user resource is always the caller's own record;
//! there is no way to address another account.

use actix_web::{HttpResponse, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use quill_core::ops::{NewUser, ProfileImage, UserPatch};
use quill_shared::dto::{RegisterUserRequest, UpdateUserRequest, UserResponse};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn decode_picture(username: &str, encoded: &str) -> Result<ProfileImage, AppError> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|_| AppError::Validation("profile_picture must be valid base64".to_string()))?;
    Ok(ProfileImage {
        filename: format!("{username}.png"),
        bytes,
    })
}

/// POST /api/user
///
/// Registration is for anonymous callers only; an authenticated caller
/// gets a 403 from the policy layer.
pub async fn register(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let profile_picture = req
        .profile_picture
        .as_deref()
        .map(|encoded| decode_picture(&req.username, encoded))
        .transpose()?;

    let user = state
        .users
        .register(
            identity.caller().as_ref(),
            NewUser {
                username: req.username,
                email: req.email,
                password: req.password,
                bio: req.bio.unwrap_or_default(),
                profile_picture,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// GET /api/user
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.users.me(Some(&identity.caller())).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PUT/PATCH /api/user
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let profile_picture = req
        .profile_picture
        .as_deref()
        .map(|encoded| decode_picture(&identity.username, encoded))
        .transpose()?;

    let user = state
        .users
        .update(
            Some(&identity.caller()),
            UserPatch {
                email: req.email,
                password: req.password,
                bio: req.bio,
                profile_picture,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// DELETE /api/user
pub async fn delete(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    state.users.delete(Some(&identity.caller())).await?;
    Ok(HttpResponse::NoContent().finish())
}

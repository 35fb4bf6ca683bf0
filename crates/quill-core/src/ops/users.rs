//! User resource operations.
//!
//! The user resource is a fixed "self" object: registration is open to
//! anonymous callers only, and every other operation targets the caller's
//! own record. There is no user enumeration.

use std::sync::Arc;

use crate::domain::User;
use crate::error::CoreError;
use crate::policy::{self, Action, Caller, Resource};
use crate::ports::{FileStore, PasswordService, UserStore};

const USERNAME_MAX: usize = 150;
const PASSWORD_MIN: usize = 8;

/// An uploaded profile image. The bytes are opaque to the core; they go to
/// the file store, which hands back the reference kept on the user.
#[derive(Debug, Clone)]
pub struct ProfileImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Payload for self-registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: String,
    pub profile_picture: Option<ProfileImage>,
}

/// Partial update of the caller's own record.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<ProfileImage>,
}

pub struct UserService {
    users: Arc<dyn UserStore>,
    passwords: Arc<dyn PasswordService>,
    files: Arc<dyn FileStore>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: Arc<dyn PasswordService>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            users,
            passwords,
            files,
        }
    }

    async fn store_image(&self, image: ProfileImage) -> Result<String, CoreError> {
        self.files
            .store(&image.filename, &image.bytes)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))
    }

    /// Anonymous-only self-registration.
    pub async fn register(
        &self,
        caller: Option<&Caller>,
        input: NewUser,
    ) -> Result<User, CoreError> {
        policy::check_operation(caller, Action::Create, Resource::User)?;

        validate_username(&input.username)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        // Hash before touching the store; the hash is CPU-bound and must not
        // hold a transaction open.
        let password_hash = self
            .passwords
            .hash(&input.password)
            .map_err(|e| CoreError::Internal(e.to_string()))?;

        let profile_picture = match input.profile_picture {
            Some(image) => Some(self.store_image(image).await?),
            None => None,
        };

        let user = User::new(
            input.username,
            input.email,
            password_hash,
            input.bio,
            profile_picture,
        );

        Ok(self.users.insert(user).await?)
    }

    /// The caller's own record. This is also the "list" path for the user
    /// resource: it never enumerates other users.
    pub async fn me(&self, caller: Option<&Caller>) -> Result<User, CoreError> {
        policy::check_operation(caller, Action::Read, Resource::User)?;
        let caller = caller.ok_or(CoreError::Unauthenticated)?;

        let user = self
            .users
            .find_by_id(caller.id)
            .await?
            .ok_or(CoreError::NotFound)?;
        policy::check_object(caller, Resource::User, user.id)?;
        Ok(user)
    }

    /// Update the caller's own record. Serves both full and partial update;
    /// the policy rules for the two are identical.
    pub async fn update(
        &self,
        caller: Option<&Caller>,
        patch: UserPatch,
    ) -> Result<User, CoreError> {
        policy::check_operation(caller, Action::Update, Resource::User)?;
        let caller = caller.ok_or(CoreError::Unauthenticated)?;

        let mut user = self
            .users
            .find_by_id(caller.id)
            .await?
            .ok_or(CoreError::NotFound)?;
        policy::check_object(caller, Resource::User, user.id)?;

        if let Some(email) = patch.email {
            validate_email(&email)?;
            user.email = email;
        }
        if let Some(password) = patch.password {
            validate_password(&password)?;
            user.password_hash = self
                .passwords
                .hash(&password)
                .map_err(|e| CoreError::Internal(e.to_string()))?;
        }
        if let Some(bio) = patch.bio {
            user.bio = bio;
        }
        if let Some(image) = patch.profile_picture {
            user.profile_picture = Some(self.store_image(image).await?);
        }
        user.updated_at = chrono::Utc::now();

        Ok(self.users.update(user).await?)
    }

    /// Delete the caller's own record, cascading to their posts and comments.
    pub async fn delete(&self, caller: Option<&Caller>) -> Result<(), CoreError> {
        policy::check_operation(caller, Action::Delete, Resource::User)?;
        let caller = caller.ok_or(CoreError::Unauthenticated)?;

        let user = self
            .users
            .find_by_id(caller.id)
            .await?
            .ok_or(CoreError::NotFound)?;
        policy::check_object(caller, Resource::User, user.id)?;

        Ok(self.users.delete(user.id).await?)
    }

    /// Verify a username/password pair for the identity layer. Returns
    /// `Unauthenticated` on any mismatch without revealing which part failed.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, CoreError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(CoreError::Unauthenticated)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| CoreError::Internal(e.to_string()))?;

        if valid {
            Ok(user)
        } else {
            Err(CoreError::Unauthenticated)
        }
    }
}

fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.trim().is_empty() {
        return Err(CoreError::Validation("Username is required".into()));
    }
    if username.chars().count() > USERNAME_MAX {
        return Err(CoreError::Validation(format!(
            "Username must be at most {USERNAME_MAX} characters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.is_empty() || !email.contains('@') {
        return Err(CoreError::Validation("Invalid email address".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}

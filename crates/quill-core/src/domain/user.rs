use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - the unit of authorization.
///
/// The password is held only as a salted hash; plaintext never reaches
/// storage. `profile_picture` is an opaque reference handed back by the
/// file-store port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub bio: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        bio: String,
        profile_picture: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            bio,
            profile_picture,
            created_at: now,
            updated_at: now,
        }
    }
}

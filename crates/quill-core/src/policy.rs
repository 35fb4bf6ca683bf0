//! Access policy engine.
//!
//! Authorization is a two-stage, stateless decision made by plain functions:
//! [`check_operation`] runs before any fetch and only looks at the caller and
//! the requested action; [`check_object`] runs after the target entity is
//! loaded and compares ownership. Resource operations compose the two with
//! ordinary calls; nothing here reads ambient state.

use uuid::Uuid;

use crate::error::CoreError;

/// The authenticated principal attached to a request, as supplied by the
/// identity layer. Anonymous requests carry no `Caller`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub username: String,
}

/// The operation being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    PartialUpdate,
    Delete,
    List,
}

impl Action {
    fn is_read_only(self) -> bool {
        matches!(self, Action::Read | Action::List)
    }
}

/// The resource kind the operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Post,
    Comment,
    Tag,
    Category,
}

/// Pre-fetch check: may `caller` attempt `action` on `resource` at all?
///
/// User creation is anonymous-only: an authenticated caller attempting
/// self-registration is `Forbidden`, which is distinct from the
/// `Unauthenticated` returned when auth is missing where required.
pub fn check_operation(
    caller: Option<&Caller>,
    action: Action,
    resource: Resource,
) -> Result<(), CoreError> {
    match resource {
        Resource::User => match action {
            Action::Create => match caller {
                None => Ok(()),
                Some(_) => Err(CoreError::Forbidden),
            },
            _ => require_auth(caller),
        },
        Resource::Post | Resource::Comment => {
            if action.is_read_only() {
                Ok(())
            } else {
                require_auth(caller)
            }
        }
        // Tags and categories expose listing only, behind authentication.
        Resource::Tag | Resource::Category => match action {
            Action::List => require_auth(caller),
            _ => Err(CoreError::Forbidden),
        },
    }
}

/// Post-fetch check: may `caller` act on the loaded object owned by `owner`?
///
/// For posts and comments an ownership mismatch is reported as `NotFound`
/// rather than `Forbidden`, so a caller cannot distinguish "exists but is
/// not yours" from "does not exist". The user resource is the caller's own
/// record by construction, so a mismatch there is a categorical denial.
pub fn check_object(caller: &Caller, resource: Resource, owner: Uuid) -> Result<(), CoreError> {
    match resource {
        Resource::User => {
            if owner == caller.id {
                Ok(())
            } else {
                Err(CoreError::Forbidden)
            }
        }
        Resource::Post | Resource::Comment => {
            if owner == caller.id {
                Ok(())
            } else {
                Err(CoreError::NotFound)
            }
        }
        Resource::Tag | Resource::Category => Err(CoreError::Forbidden),
    }
}

fn require_auth(caller: Option<&Caller>) -> Result<(), CoreError> {
    match caller {
        Some(_) => Ok(()),
        None => Err(CoreError::Unauthenticated),
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity. Names are intentionally not unique-constrained; the resolver
/// maps a name to the first matching row and tolerates duplicates produced
/// by concurrent resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

impl Tag {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }
}

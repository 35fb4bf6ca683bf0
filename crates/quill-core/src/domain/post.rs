use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Tag;
use crate::error::CoreError;

/// The fixed category set. Categories are not persisted entities; listing
/// them returns this enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "SPORTS")]
    Sports,
    #[serde(rename = "EDUCATION")]
    Education,
    #[serde(rename = "ENTERTAINMENT")]
    Entertainment,
    #[serde(rename = "TECHNOLOGY")]
    Technology,
    #[serde(rename = "CURRENT AFFAIRS")]
    CurrentAffairs,
    #[serde(rename = "POLITICS")]
    Politics,
    #[serde(rename = "FINANCE")]
    Finance,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Sports,
        Category::Education,
        Category::Entertainment,
        Category::Technology,
        Category::CurrentAffairs,
        Category::Politics,
        Category::Finance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sports => "SPORTS",
            Category::Education => "EDUCATION",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Technology => "TECHNOLOGY",
            Category::CurrentAffairs => "CURRENT AFFAIRS",
            Category::Politics => "POLITICS",
            Category::Finance => "FINANCE",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| CoreError::Validation(format!("Unknown category: {s}")))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post entity.
///
/// The slug is derived from the title at creation and never changes
/// afterwards; the author is likewise immutable. Timestamps are
/// server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub category: Category,
    pub author_id: Uuid,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post. The slug must already be uniquified by the caller.
    pub fn new(
        title: String,
        slug: String,
        body: String,
        category: Category,
        author_id: Uuid,
        tags: Vec<Tag>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            body,
            category,
            author_id,
            tags,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for cat in Category::ALL {
            assert_eq!(cat.as_str().parse::<Category>().unwrap(), cat);
        }
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        let err = "GARDENING".parse::<Category>().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn category_serializes_with_spaces() {
        let json = serde_json::to_string(&Category::CurrentAffairs).unwrap();
        assert_eq!(json, "\"CURRENT AFFAIRS\"");
    }
}

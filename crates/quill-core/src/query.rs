//! Query scoping for post listings.
//!
//! A [`PostFilter`] is built from request parameters and handed to the post
//! store, which narrows the candidate set before executing. All present
//! filters compose with AND; `search` and `tag_names` are each an OR across
//! their matched fields. Results must be duplicate-free even though tag
//! membership is a join.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};

/// Limit/offset window over a listing. Absent bounds mean the full result
/// set, ordered per the store's contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Page {
    /// Apply the window to an already ordered, in-memory result.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = self.offset.unwrap_or(0) as usize;
        let limit = self.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(limit).collect()
    }
}

/// Optional narrowing filters for the post listing.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Case-insensitive substring over title OR body OR author username.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<Category>,
    /// Membership in any of the given tag ids.
    pub tags: Option<Vec<Uuid>>,
    /// Membership in any of the given tag names.
    pub tag_names: Option<Vec<String>>,
    /// Case-insensitive substring over the author's username.
    pub author: Option<String>,
    /// Inclusive lower bound on creation time.
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time.
    pub created_before: Option<DateTime<Utc>>,
    /// Whether the post must have (or must not have) any tags.
    pub has_tags: Option<bool>,
}

impl PostFilter {
    /// Split a comma-separated tag-name parameter, dropping empty segments.
    pub fn parse_tag_names(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.tag_names.is_none()
            && self.author.is_none()
            && self.created_after.is_none()
            && self.created_before.is_none()
            && self.has_tags.is_none()
    }

    /// Evaluate the filter against a single post. Used by the in-memory
    /// store; the SQL backend translates the same semantics into conditions.
    pub fn matches(&self, post: &Post, author_username: &str) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = post.title.to_lowercase().contains(&needle)
                || post.body.to_lowercase().contains(&needle)
                || author_username.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some(category) = self.category {
            if post.category != category {
                return false;
            }
        }

        if let Some(ids) = &self.tags {
            if !post.tags.iter().any(|t| ids.contains(&t.id)) {
                return false;
            }
        }

        if let Some(names) = &self.tag_names {
            if !post.tags.iter().any(|t| names.contains(&t.name)) {
                return false;
            }
        }

        if let Some(author) = &self.author {
            if !author_username
                .to_lowercase()
                .contains(&author.to_lowercase())
            {
                return false;
            }
        }

        if let Some(after) = self.created_after {
            if post.created_at < after {
                return false;
            }
        }

        if let Some(before) = self.created_before {
            if post.created_at > before {
                return false;
            }
        }

        if let Some(has_tags) = self.has_tags {
            if post.tags.is_empty() == has_tags {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tag;

    fn post_with_tags(title: &str, body: &str, category: Category, tags: &[&str]) -> Post {
        Post::new(
            title.to_string(),
            "slug".to_string(),
            body.to_string(),
            category,
            Uuid::new_v4(),
            tags.iter().map(|n| Tag::new(n.to_string())).collect(),
        )
    }

    #[test]
    fn empty_filter_matches_everything() {
        let post = post_with_tags("Hello", "World", Category::Sports, &[]);
        assert!(PostFilter::default().matches(&post, "alice"));
    }

    #[test]
    fn search_spans_title_body_and_author() {
        let post = post_with_tags("Rust tricks", "borrow checker", Category::Technology, &[]);
        for needle in ["rust", "BORROW", "ali"] {
            let filter = PostFilter {
                search: Some(needle.to_string()),
                ..Default::default()
            };
            assert!(filter.matches(&post, "alice"), "needle {needle}");
        }
        let filter = PostFilter {
            search: Some("python".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&post, "alice"));
    }

    #[test]
    fn filters_compose_with_and() {
        let post = post_with_tags("Post", "Body", Category::Technology, &["django", "web"]);
        let filter = PostFilter {
            category: Some(Category::Technology),
            tag_names: Some(vec!["django".to_string(), "web".to_string()]),
            ..Default::default()
        };
        assert!(filter.matches(&post, "alice"));

        let filter = PostFilter {
            category: Some(Category::Sports),
            tag_names: Some(vec!["django".to_string()]),
            ..Default::default()
        };
        assert!(!filter.matches(&post, "alice"));
    }

    #[test]
    fn has_tags_distinguishes_tagged_posts() {
        let tagged = post_with_tags("A", "B", Category::Finance, &["money"]);
        let bare = post_with_tags("A", "B", Category::Finance, &[]);
        let filter = PostFilter {
            has_tags: Some(true),
            ..Default::default()
        };
        assert!(filter.matches(&tagged, "u"));
        assert!(!filter.matches(&bare, "u"));
        let filter = PostFilter {
            has_tags: Some(false),
            ..Default::default()
        };
        assert!(!filter.matches(&tagged, "u"));
        assert!(filter.matches(&bare, "u"));
    }

    #[test]
    fn date_bounds_are_inclusive_range() {
        let post = post_with_tags("A", "B", Category::Politics, &[]);
        let filter = PostFilter {
            created_after: Some(post.created_at - chrono::TimeDelta::hours(1)),
            created_before: Some(post.created_at + chrono::TimeDelta::hours(1)),
            ..Default::default()
        };
        assert!(filter.matches(&post, "u"));
        let filter = PostFilter {
            created_after: Some(post.created_at + chrono::TimeDelta::hours(1)),
            ..Default::default()
        };
        assert!(!filter.matches(&post, "u"));
    }

    #[test]
    fn page_slices_after_ordering() {
        let items = vec![1, 2, 3, 4, 5];
        let window = Page {
            limit: Some(2),
            offset: Some(1),
        };
        assert_eq!(window.slice(items.clone()), vec![2, 3]);

        let tail = Page {
            limit: None,
            offset: Some(3),
        };
        assert_eq!(tail.slice(items.clone()), vec![4, 5]);

        let beyond = Page {
            limit: Some(10),
            offset: Some(9),
        };
        assert!(beyond.slice(items.clone()).is_empty());

        assert_eq!(Page::default().slice(items.clone()), items);
    }

    #[test]
    fn tag_name_parsing_trims_and_drops_empties() {
        assert_eq!(
            PostFilter::parse_tag_names(" django, web ,,rust"),
            vec!["django", "web", "rust"]
        );
        assert!(PostFilter::parse_tag_names(" , ").is_empty());
    }
}

//! Tag resolution and the tag/category catalog.

use std::sync::Arc;

use crate::domain::{Category, Tag};
use crate::error::CoreError;
use crate::policy::{self, Action, Caller, Resource};
use crate::ports::TagStore;
use crate::query::Page;

const TAG_NAME_MAX: usize = 15;

/// Get-or-create resolution of tag names to tag rows.
///
/// Names are trimmed and deduplicated; each distinct name maps to the first
/// existing row with that exact name, or to a freshly inserted row. Two
/// concurrent resolutions of the same name may both insert - duplicate rows
/// are an accepted tolerance and are not serialized away with a lock.
pub async fn resolve_tags(store: &dyn TagStore, names: &[String]) -> Result<Vec<Tag>, CoreError> {
    let mut resolved: Vec<Tag> = Vec::with_capacity(names.len());

    for raw in names {
        let name = raw.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("Tag name must not be empty".into()));
        }
        if name.chars().count() > TAG_NAME_MAX {
            return Err(CoreError::Validation(format!(
                "Tag name must be at most {TAG_NAME_MAX} characters"
            )));
        }
        if resolved.iter().any(|t| t.name == name) {
            continue;
        }

        let tag = match store.find_by_name(name).await? {
            Some(tag) => tag,
            None => store.insert(Tag::new(name.to_string())).await?,
        };
        resolved.push(tag);
    }

    Ok(resolved)
}

/// Read-only listings of tags and the fixed category set.
pub struct CatalogService {
    tags: Arc<dyn TagStore>,
}

impl CatalogService {
    pub fn new(tags: Arc<dyn TagStore>) -> Self {
        Self { tags }
    }

    pub async fn list_tags(&self, caller: Option<&Caller>, page: Page) -> Result<Vec<Tag>, CoreError> {
        policy::check_operation(caller, Action::List, Resource::Tag)?;
        Ok(self.tags.list(&page).await?)
    }

    /// Categories are an enumeration, not stored rows; no store hit.
    pub fn list_categories(&self, caller: Option<&Caller>) -> Result<Vec<Category>, CoreError> {
        policy::check_operation(caller, Action::List, Resource::Category)?;
        Ok(Category::ALL.to_vec())
    }
}

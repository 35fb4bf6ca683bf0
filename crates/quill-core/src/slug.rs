//! Slug generation.
//!
//! Slugs are the public identity of a post: lowercase, hyphenated, URL-safe,
//! and unique across all posts. Generation is deterministic for a given
//! title and existing-slug snapshot, except for the random fallback used
//! when a title transliterates to nothing.

use std::collections::HashSet;

use uuid::Uuid;

/// Transliterate a title into a lowercase hyphenated slug base.
/// ASCII alphanumerics are kept; every other run of characters collapses to
/// a single hyphen. May return an empty string for titles with no ASCII
/// alphanumerics.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Derive a unique slug for `title` against the `existing` snapshot.
///
/// Collisions are resolved with a `-2`, `-3`, ... counter suffix. An empty
/// transliteration falls back to a random token so the result is never
/// empty.
pub fn unique_slug(title: &str, existing: &HashSet<String>) -> String {
    let base = slugify(title);
    let base = if base.is_empty() {
        format!("post-{}", Uuid::new_v4().simple())
    } else {
        base
    };

    if !existing.contains(&base) {
        return base;
    }

    let mut counter = 2u64;
    loop {
        let candidate = format!("{base}-{counter}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(slugs: &[&str]) -> HashSet<String> {
        slugs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust  2024  "), "rust-2024");
        assert_eq!(slugify("Already-Slugged"), "already-slugged");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("café über alles"), "caf-ber-alles");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn no_leading_or_trailing_hyphens() {
        assert_eq!(slugify("...dots..."), "dots");
        assert!(!slugify("!bang!").starts_with('-'));
    }

    #[test]
    fn collision_appends_counter() {
        let existing = set(&["my-post", "my-post-2"]);
        assert_eq!(unique_slug("My Post", &existing), "my-post-3");
        assert_eq!(unique_slug("Fresh Title", &existing), "fresh-title");
    }

    #[test]
    fn empty_transliteration_falls_back_to_token() {
        let slug = unique_slug("!!!", &HashSet::new());
        assert!(!slug.is_empty());
        assert!(slug.starts_with("post-"));
        assert!(
            slug.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        );
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let existing = set(&["a-title"]);
        assert_eq!(
            unique_slug("A Title", &existing),
            unique_slug("A Title", &existing)
        );
    }
}

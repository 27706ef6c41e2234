use std::fmt;

use serde::{Deserialize, Serialize};

use super::GroupId;
use crate::error::DomainError;

pub const TITLE_MAX_LEN: usize = 200;
pub const SLUG_MAX_LEN: usize = 50;

/// A named collection of posts, addressed by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl NewGroup {
    /// Validate and normalize a group before it reaches the store.
    pub fn new(title: &str, slug: &str, description: &str) -> Result<Self, DomainError> {
        let title = super::clean_text("title", title)?;
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::validation(
                "title",
                format!("must be at most {TITLE_MAX_LEN} characters"),
            ));
        }

        let slug = slug.trim();
        if !is_valid_slug(slug) {
            return Err(DomainError::validation(
                "slug",
                "must consist of letters, numbers, underscores or hyphens",
            ));
        }
        if slug.len() > SLUG_MAX_LEN {
            return Err(DomainError::validation(
                "slug",
                format!("must be at most {SLUG_MAX_LEN} characters"),
            ));
        }

        Ok(Self {
            title,
            slug: slug.to_string(),
            description: description.trim().to_string(),
        })
    }
}

/// ASCII letters, digits, `-` and `_`, at least one character.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_rules() {
        assert!(is_valid_slug("test_slug-1"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("cyrillic-тест"));
        assert!(!is_valid_slug("a/b"));
    }

    #[test]
    fn test_new_group_rejects_long_title() {
        let title = "x".repeat(TITLE_MAX_LEN + 1);
        let err = NewGroup::new(&title, "slug", "").unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: "title", .. }));
    }

    #[test]
    fn test_new_group_trims() {
        let group = NewGroup::new("  Cats ", " cats ", " about cats ").unwrap();
        assert_eq!(group.title, "Cats");
        assert_eq!(group.slug, "cats");
        assert_eq!(group.description, "about cats");
    }
}

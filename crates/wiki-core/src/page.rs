//! Page entity and title rules

use crate::error::{Result, WikiError};

/// Previous-title value that marks a save as the creation of a new page
pub const NEW_PAGE_SENTINEL: &str = "new";

/// A stored page, keyed by its title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// A page with no content yet, shown when editing a title that does not exist
    pub fn empty(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Check that a title can be used as a storage key by every backend.
///
/// Titles double as file names for the file store, so anything that could
/// escape the pages directory or collide with temporary files is rejected.
pub fn validate_title(title: &str) -> Result<()> {
    let reason = if title.is_empty() {
        Some("title must not be empty")
    } else if title.contains(|c: char| c == '/' || c == '\\') {
        Some("title must not contain path separators")
    } else if title.chars().any(char::is_control) {
        Some("title must not contain control characters")
    } else if title.starts_with('.') {
        Some("title must not start with a dot")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(WikiError::InvalidTitle {
            title: title.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Like [`validate_title`], but also refuses the creation sentinel as a target
pub fn validate_new_title(title: &str) -> Result<()> {
    validate_title(title)?;
    if title == NEW_PAGE_SENTINEL {
        return Err(WikiError::InvalidTitle {
            title: title.to_string(),
            reason: "title is reserved",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_titles() {
        for title in ["alpha", "Shopping list", "2024-01-01", "naïve café", "a.b"] {
            assert!(validate_title(title).is_ok(), "{title} should be valid");
        }
    }

    #[test]
    fn test_rejects_traversal_and_separators() {
        for title in ["", "../etc/passwd", "a/b", "a\\b", "..", ".", ".hidden", "a\0b", "line\nbreak"] {
            let err = validate_title(title).unwrap_err();
            assert!(
                matches!(err, WikiError::InvalidTitle { .. }),
                "{title:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_sentinel_only_rejected_as_target() {
        assert!(validate_title(NEW_PAGE_SENTINEL).is_ok());
        assert!(validate_new_title(NEW_PAGE_SENTINEL).is_err());
        assert!(validate_new_title("newer").is_ok());
    }

    #[test]
    fn test_empty_page() {
        let page = Page::empty("missing");
        assert_eq!(page.title, "missing");
        assert!(page.body.is_empty());
        assert_eq!(page.body_text(), "");
    }
}

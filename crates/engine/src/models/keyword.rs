//! Gallery keyword model and its write-side validation.

use serde::{Deserialize, Serialize};

/// Longest keyword accepted on update.
pub const MAX_KEYWORD_LEN: usize = 255;

/// A keyword attached to a gallery.
///
/// Nothing enforces uniqueness of `(gallery_id, keyword)`; readers
/// deduplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GalleryKeyword {
    /// Primary key.
    pub id: i64,

    /// Owning gallery.
    pub gallery_id: i64,

    /// Keyword text, trimmed on update.
    pub keyword: String,
}

/// Input for updating a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateGalleryKeyword {
    pub keyword: String,
}

/// A field-level validation failure, reported back to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordFieldError {
    pub field: &'static str,
    pub message: String,
}

impl UpdateGalleryKeyword {
    /// Validate the input, returning every problem found.
    ///
    /// Commas are rejected because the flat keyword column is
    /// comma-delimited.
    pub fn validate(&self) -> Result<(), Vec<KeywordFieldError>> {
        let mut errors = Vec::new();
        let keyword = self.keyword.trim();

        if keyword.is_empty() {
            errors.push(KeywordFieldError {
                field: "keyword",
                message: "can't be blank".to_string(),
            });
        }
        if keyword.chars().count() > MAX_KEYWORD_LEN {
            errors.push(KeywordFieldError {
                field: "keyword",
                message: format!("is too long (maximum is {MAX_KEYWORD_LEN} characters)"),
            });
        }
        if keyword.contains(',') {
            errors.push(KeywordFieldError {
                field: "keyword",
                message: "can't contain commas".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// The value that gets stored.
    pub fn normalized(&self) -> &str {
        self.keyword.trim()
    }
}

//! Render error types.

use thiserror::Error;

/// Structural problems with a tag invocation.
///
/// These abort the render pass: template authors need to see them rather
/// than get a silently different listing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GalleryTagError {
    #[error("invalid value for attribute `level`: {0:?}. Valid values are: current, top, bottom, all")]
    InvalidLevel(String),

    #[error("`by` attribute must be set to a valid field name, got {0:?}")]
    InvalidSortField(String),

    #[error("unknown tag `{0}`")]
    UnknownTag(String),

    #[error("tag `{tag}` does not accept attribute `{attribute}`")]
    UnknownAttribute { tag: String, attribute: String },

    #[error("tag `{tag}`: invalid value {value:?} for attribute `{attribute}`")]
    InvalidAttribute {
        tag: String,
        attribute: String,
        value: String,
    },

    #[error("tag `{0}` requires a gallery in scope")]
    NoGallery(String),

    #[error("tag `{0}` must be used inside `gallery:keywords:each`")]
    NoKeyword(String),

    #[error("gallery hierarchy contains a cycle at gallery {0}")]
    HierarchyCycle(i64),
}

/// Anything that can abort a render pass.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Tag(#[from] GalleryTagError),

    #[error("gallery store error")]
    Store(#[from] anyhow::Error),
}

impl RenderError {
    /// The tag validation error, if this is one.
    pub fn as_tag_error(&self) -> Option<&GalleryTagError> {
        match self {
            RenderError::Tag(e) => Some(e),
            RenderError::Store(_) => None,
        }
    }
}

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn tag_error_messages_name_the_attribute() {
        let err = GalleryTagError::InvalidSortField("colour".to_string());
        assert!(err.to_string().contains("colour"));

        let err = GalleryTagError::UnknownAttribute {
            tag: "gallery:name".to_string(),
            attribute: "sfe".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "tag `gallery:name` does not accept attribute `sfe`"
        );
    }

    #[test]
    fn render_error_exposes_tag_error() {
        let err: RenderError = GalleryTagError::InvalidLevel("side".to_string()).into();
        assert_eq!(
            err.as_tag_error(),
            Some(&GalleryTagError::InvalidLevel("side".to_string()))
        );

        let err: RenderError = anyhow::anyhow!("connection reset").into();
        assert!(err.as_tag_error().is_none());
    }
}

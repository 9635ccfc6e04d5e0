//! Gallery model: a node in the gallery forest.
//!
//! Galleries nest through `parent_id`. Two keyword representations
//! coexist: the flat comma-delimited `keywords` column used for inline
//! rendering, and the `gallery_keywords` association used for filtering
//! and iteration (see [`crate::keywords`]).

use serde::{Deserialize, Serialize};

/// A gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Gallery {
    /// Primary key.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// URL path segment, unique among siblings.
    pub slug: String,

    /// Sort key within its parent.
    pub position: i32,

    /// Hidden galleries never appear in listings.
    pub hidden: bool,

    /// External galleries never appear in listings.
    pub external: bool,

    /// Parent gallery (NULL for top-level galleries).
    pub parent_id: Option<i64>,

    /// Denormalized count of child galleries.
    pub children_count: i32,

    /// Flat comma-delimited keyword list.
    pub keywords: Option<String>,
}

impl Gallery {
    /// Whether this gallery is eligible for listings.
    pub fn is_listed(&self) -> bool {
        !self.hidden && !self.external
    }

    /// Whether this gallery sits at the top of the forest.
    pub fn is_top(&self) -> bool {
        self.parent_id.is_none()
    }
}

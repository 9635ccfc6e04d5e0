//! Gallery item model. Only counted by the engine.

use serde::{Deserialize, Serialize};

/// An item (photo) owned by a gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GalleryItem {
    /// Primary key.
    pub id: i64,

    /// Owning gallery.
    pub gallery_id: i64,

    /// Display name.
    pub name: String,

    /// Sort key within its gallery.
    pub position: i32,
}

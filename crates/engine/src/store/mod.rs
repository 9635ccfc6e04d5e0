//! Persistence boundary for galleries, keywords and items.
//!
//! Two backends implement [`GalleryStore`]: PostgreSQL through sqlx, and an
//! in-process store that evaluates the same [`GalleryQuery`] values.

mod memory;
mod postgres;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Gallery, GalleryKeyword, UpdateGalleryKeyword};
use crate::query::GalleryQuery;

pub use memory::MemoryGalleryStore;
pub use postgres::PgGalleryStore;

/// Read and keyword-write access to the gallery tables.
///
/// Lookups that miss return `Ok(None)`; only store failures are errors.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Find a gallery by primary key.
    async fn find_gallery(&self, id: i64) -> Result<Option<Gallery>>;

    /// Find a gallery by exact name.
    async fn find_gallery_by_name(&self, name: &str) -> Result<Option<Gallery>>;

    /// Run a listing query.
    async fn list_galleries(&self, query: &GalleryQuery) -> Result<Vec<Gallery>>;

    /// Count galleries matching a listing query, ignoring pagination.
    async fn count_galleries(&self, query: &GalleryQuery) -> Result<u64>;

    /// Keyword rows of a gallery in id order, duplicates included.
    async fn gallery_keywords(&self, gallery_id: i64) -> Result<Vec<GalleryKeyword>>;

    /// Number of child galleries, hidden and external ones included.
    async fn count_children(&self, gallery_id: i64) -> Result<u64>;

    /// Number of items in a gallery.
    async fn count_items(&self, gallery_id: i64) -> Result<u64>;

    /// Find a keyword belonging to a gallery.
    async fn find_keyword(&self, gallery_id: i64, keyword_id: i64)
    -> Result<Option<GalleryKeyword>>;

    /// Update a keyword; `None` if it does not exist under that gallery.
    async fn update_keyword(
        &self,
        gallery_id: i64,
        keyword_id: i64,
        input: &UpdateGalleryKeyword,
    ) -> Result<Option<GalleryKeyword>>;

    /// Delete a keyword; `false` if it did not exist under that gallery.
    async fn delete_keyword(&self, gallery_id: i64, keyword_id: i64) -> Result<bool>;
}

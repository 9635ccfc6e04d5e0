//! Gallery repository: single-gallery lookups and listings.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::models::Gallery;
use crate::query::{GalleryQuery, GalleryQueryBuilder};
use crate::store::GalleryStore;

/// Resolves galleries and runs listing queries against a [`GalleryStore`].
#[derive(Clone)]
pub struct GalleryRepository {
    store: Arc<dyn GalleryStore>,
}

impl GalleryRepository {
    pub fn new(store: Arc<dyn GalleryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn GalleryStore> {
        &self.store
    }

    /// Find a gallery by id. A miss is `Ok(None)`.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Gallery>> {
        self.store.find_gallery(id).await
    }

    /// Find a gallery by exact name. A miss is `Ok(None)`.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Gallery>> {
        self.store.find_gallery_by_name(name).await
    }

    /// Run a validated listing query.
    pub async fn list(&self, query: &GalleryQuery) -> Result<Vec<Gallery>> {
        debug!(
            parent = ?query.parent(),
            keywords = query.keywords().len(),
            sort = %query.sort(),
            "listing galleries"
        );
        self.store.list_galleries(query).await
    }

    /// Number of galleries a listing would return without pagination.
    pub async fn count(&self, query: &GalleryQuery) -> Result<u64> {
        self.store.count_galleries(query).await
    }

    /// List the visible children of `gallery`.
    ///
    /// `options` supplies ordering and pagination; its parent scope is
    /// replaced by `gallery`.
    pub async fn children_of(
        &self,
        gallery: &Gallery,
        options: GalleryQueryBuilder,
    ) -> crate::RenderResult<Vec<Gallery>> {
        let query = options.children_of(gallery.id).build()?;
        Ok(self.list(&query).await?)
    }
}

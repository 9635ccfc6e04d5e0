//! Hierarchy navigation: ancestor chains, breadcrumbs, gallery paths and
//! child/item existence checks.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::context::RenderContext;
use crate::error::{GalleryTagError, RenderResult};
use crate::helpers::{html_escape, join_url};
use crate::models::Gallery;
use crate::store::GalleryStore;

/// Separator placed between breadcrumbs when none is given.
pub const DEFAULT_BREADCRUMB_SEPARATOR: &str = " &gt; ";

/// One element of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub gallery: Gallery,

    /// Path of the gallery relative to the base gallery, e.g. `a/b`.
    pub path: String,
}

/// Structural queries over the gallery forest.
#[derive(Clone)]
pub struct HierarchyNavigator {
    store: Arc<dyn GalleryStore>,
}

impl HierarchyNavigator {
    pub fn new(store: Arc<dyn GalleryStore>) -> Self {
        Self { store }
    }

    /// Ancestors of `gallery`, nearest first.
    ///
    /// The walk stops at `base_gallery_id` (which is included) or at the
    /// forest root. A dangling `parent_id` ends the walk; a cycle is an
    /// error.
    pub async fn ancestors(
        &self,
        gallery: &Gallery,
        base_gallery_id: Option<i64>,
    ) -> RenderResult<Vec<Gallery>> {
        let mut ancestors = Vec::new();
        let mut seen = HashSet::from([gallery.id]);

        if Some(gallery.id) == base_gallery_id {
            return Ok(ancestors);
        }

        let mut next = gallery.parent_id;
        while let Some(parent_id) = next {
            if !seen.insert(parent_id) {
                warn!(gallery = gallery.id, parent_id, "cycle in gallery hierarchy");
                return Err(GalleryTagError::HierarchyCycle(parent_id).into());
            }
            let Some(parent) = self.store.find_gallery(parent_id).await? else {
                warn!(gallery = gallery.id, parent_id, "gallery parent does not exist");
                break;
            };
            let reached_base = Some(parent.id) == base_gallery_id;
            next = parent.parent_id;
            ancestors.push(parent);
            if reached_base {
                break;
            }
        }

        Ok(ancestors)
    }

    /// The trail from the topmost ancestor down to `gallery` itself, each
    /// with its path relative to `base_gallery_id`.
    pub async fn breadcrumb_trail(
        &self,
        gallery: &Gallery,
        base_gallery_id: Option<i64>,
    ) -> RenderResult<Vec<Crumb>> {
        let mut chain = self.ancestors(gallery, base_gallery_id).await?;
        chain.reverse();
        chain.push(gallery.clone());

        let mut segments: Vec<&str> = Vec::new();
        let mut trail = Vec::with_capacity(chain.len());
        for ancestor in &chain {
            if Some(ancestor.id) != base_gallery_id {
                segments.push(&ancestor.slug);
            }
            trail.push(Crumb {
                gallery: ancestor.clone(),
                path: segments.join("/"),
            });
        }
        Ok(trail)
    }

    /// Path of `gallery` relative to `base_gallery_id`.
    pub async fn path(
        &self,
        gallery: &Gallery,
        base_gallery_id: Option<i64>,
    ) -> RenderResult<String> {
        let trail = self.breadcrumb_trail(gallery, base_gallery_id).await?;
        Ok(trail.last().map(|c| c.path.clone()).unwrap_or_default())
    }

    /// Render breadcrumbs with a caller-supplied crumb renderer.
    pub async fn breadcrumbs_with<F>(
        &self,
        gallery: &Gallery,
        base_gallery_id: Option<i64>,
        separator: &str,
        render: F,
    ) -> RenderResult<String>
    where
        F: Fn(&Crumb) -> String + Send + Sync,
    {
        let trail = self.breadcrumb_trail(gallery, base_gallery_id).await?;
        Ok(trail.iter().map(render).collect::<Vec<_>>().join(separator))
    }

    /// Render breadcrumbs for a page.
    ///
    /// The crumb for the page's current gallery is plain text when no item
    /// is current; every other crumb links to the gallery under the page
    /// URL.
    pub async fn breadcrumbs(
        &self,
        gallery: &Gallery,
        context: &RenderContext,
        separator: &str,
    ) -> RenderResult<String> {
        let current_id = context.current_gallery_id();
        let here_is_plain = context.current_item.is_none();

        self.breadcrumbs_with(gallery, context.base_gallery_id(), separator, |crumb| {
            let name = html_escape(&crumb.gallery.name);
            if here_is_plain && current_id == Some(crumb.gallery.id) {
                name
            } else {
                format!(
                    r#"<a href="{}">{name}</a>"#,
                    html_escape(&join_url(&context.page_url, &crumb.path))
                )
            }
        })
        .await
    }

    /// Whether the gallery has any child galleries.
    pub async fn has_children(&self, gallery: &Gallery) -> Result<bool> {
        Ok(self.children_count(gallery).await? > 0)
    }

    /// Number of child galleries, hidden and external ones included.
    pub async fn children_count(&self, gallery: &Gallery) -> Result<u64> {
        self.store.count_children(gallery.id).await
    }

    /// Whether the gallery holds any items.
    pub async fn has_items(&self, gallery: &Gallery) -> Result<bool> {
        Ok(self.items_count(gallery).await? > 0)
    }

    /// Number of items in the gallery.
    pub async fn items_count(&self, gallery: &Gallery) -> Result<u64> {
        self.store.count_items(gallery.id).await
    }
}

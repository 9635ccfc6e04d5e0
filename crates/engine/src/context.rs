//! Render context and gallery resolution.
//!
//! A [`RenderContext`] holds the ambient pointers of one render pass. It is
//! immutable and owned by that pass, so concurrent renders never see each
//! other's state. Enclosing tags bind values for their subtree by deriving
//! a new [`Scope`]; the parent scope is left untouched.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::models::{Gallery, GalleryItem};
use crate::repository::GalleryRepository;

/// Ambient state of a single render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Gallery the page is currently showing.
    pub current_gallery: Option<Arc<Gallery>>,

    /// Keyword filter the page was requested with.
    pub current_keyword: Option<String>,

    /// Item the page is currently showing.
    pub current_item: Option<Arc<GalleryItem>>,

    /// Root of the hierarchy this page presents.
    pub base_gallery: Option<Arc<Gallery>>,

    /// URL of the page, used as the base of gallery links.
    pub page_url: String,
}

impl RenderContext {
    /// A context for a page at `page_url` with nothing current.
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            ..Self::default()
        }
    }

    pub fn with_current_gallery(mut self, gallery: Gallery) -> Self {
        self.current_gallery = Some(Arc::new(gallery));
        self
    }

    pub fn with_current_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.current_keyword = Some(keyword.into());
        self
    }

    pub fn with_current_item(mut self, item: GalleryItem) -> Self {
        self.current_item = Some(Arc::new(item));
        self
    }

    pub fn with_base_gallery(mut self, gallery: Gallery) -> Self {
        self.base_gallery = Some(Arc::new(gallery));
        self
    }

    pub fn base_gallery_id(&self) -> Option<i64> {
        self.base_gallery.as_ref().map(|g| g.id)
    }

    pub fn current_gallery_id(&self) -> Option<i64> {
        self.current_gallery.as_ref().map(|g| g.id)
    }
}

/// One frame of nested rendering: the ambient context plus the values
/// enclosing tags have bound.
#[derive(Debug, Clone)]
pub struct Scope {
    context: Arc<RenderContext>,
    gallery: Option<Arc<Gallery>>,
    keyword: Option<Arc<str>>,
}

impl Scope {
    /// The outermost scope of a render pass.
    pub fn new(context: RenderContext) -> Self {
        Self {
            context: Arc::new(context),
            gallery: None,
            keyword: None,
        }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Gallery bound by the innermost enclosing tag.
    pub fn gallery(&self) -> Option<&Arc<Gallery>> {
        self.gallery.as_ref()
    }

    /// Keyword bound by the innermost `gallery:keywords:each`.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// A child scope with `gallery` bound.
    pub fn with_gallery(&self, gallery: Arc<Gallery>) -> Self {
        Self {
            gallery: Some(gallery),
            ..self.clone()
        }
    }

    /// A child scope with `keyword` bound.
    pub fn with_keyword(&self, keyword: &str) -> Self {
        Self {
            keyword: Some(Arc::from(keyword)),
            ..self.clone()
        }
    }
}

/// Explicit `id`/`name` attributes of a gallery-selecting tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GallerySelector {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl GallerySelector {
    /// Whether the tag named a gallery itself.
    pub fn is_explicit(&self) -> bool {
        self.id.is_some() || self.name.is_some()
    }
}

/// Resolve the gallery a tag operates on.
///
/// Tried in order: the gallery bound in `scope`, the `name` attribute, the
/// `id` attribute, the ambient current gallery, the base gallery. Once an
/// explicit attribute is given its lookup is the answer, hit or miss.
pub async fn resolve_gallery(
    repository: &GalleryRepository,
    selector: &GallerySelector,
    scope: &Scope,
) -> Result<Option<Arc<Gallery>>> {
    if let Some(gallery) = scope.gallery() {
        return Ok(Some(Arc::clone(gallery)));
    }

    if let Some(name) = &selector.name {
        let gallery = repository.find_by_name(name).await?;
        if gallery.is_none() {
            debug!(name = %name, "no gallery with that name");
        }
        return Ok(gallery.map(Arc::new));
    }

    if let Some(id) = selector.id {
        let gallery = repository.find_by_id(id).await?;
        if gallery.is_none() {
            debug!(id, "no gallery with that id");
        }
        return Ok(gallery.map(Arc::new));
    }

    let context = scope.context();
    Ok(context
        .current_gallery
        .clone()
        .or_else(|| context.base_gallery.clone()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::MemoryGalleryStore;

    fn gallery(id: i64, name: &str) -> Gallery {
        Gallery {
            id,
            name: name.to_string(),
            description: None,
            slug: name.to_lowercase(),
            position: 1,
            hidden: false,
            external: false,
            parent_id: None,
            children_count: 0,
            keywords: None,
        }
    }

    fn repository() -> GalleryRepository {
        let store = Arc::new(MemoryGalleryStore::new());
        store.insert_gallery(gallery(1, "Travel"));
        store.insert_gallery(gallery(2, "Family"));
        GalleryRepository::new(store)
    }

    fn scope() -> Scope {
        Scope::new(
            RenderContext::new("/")
                .with_current_gallery(gallery(1, "Travel"))
                .with_base_gallery(gallery(2, "Family")),
        )
    }

    async fn resolved(selector: GallerySelector) -> Option<i64> {
        resolve_gallery(&repository(), &selector, &scope())
            .await
            .unwrap()
            .map(|g| g.id)
    }

    #[tokio::test]
    async fn explicit_hits_win_over_ambient() {
        let by_name = GallerySelector {
            id: None,
            name: Some("Family".to_string()),
        };
        assert_eq!(resolved(by_name).await, Some(2));

        let by_id = GallerySelector {
            id: Some(2),
            name: None,
        };
        assert_eq!(resolved(by_id).await, Some(2));
    }

    #[tokio::test]
    async fn explicit_misses_resolve_to_none() {
        let by_name = GallerySelector {
            id: None,
            name: Some("Nope".to_string()),
        };
        assert_eq!(resolved(by_name).await, None);

        // A missed name is not retried as an id.
        let both = GallerySelector {
            id: Some(1),
            name: Some("Nope".to_string()),
        };
        assert_eq!(resolved(both).await, None);

        let by_id = GallerySelector {
            id: Some(999),
            name: None,
        };
        assert_eq!(resolved(by_id).await, None);
    }

    #[tokio::test]
    async fn no_selector_uses_current_then_base() {
        assert_eq!(resolved(GallerySelector::default()).await, Some(1));

        let base_only = Scope::new(RenderContext::new("/").with_base_gallery(gallery(2, "Family")));
        let resolved = resolve_gallery(&repository(), &GallerySelector::default(), &base_only)
            .await
            .unwrap();
        assert_eq!(resolved.map(|g| g.id), Some(2));
    }
}

//! Gallery engine test utilities.
//!
//! Fixture builders, a ready-made gallery forest held in a
//! [`MemoryGalleryStore`], and string assertions for rendered output.

use std::sync::Arc;

use gallery_engine::tags::{Engine, Node, Renderer, TagRegistry};
use gallery_engine::{
    EngineSettings, Gallery, GalleryItem, GalleryKeyword, GalleryStore, MemoryGalleryStore,
    RenderContext, RenderResult,
};

/// Create a visible top-level test gallery with default values.
///
/// The slug is the lowercased name with spaces replaced by `-`.
pub fn test_gallery(id: i64, name: &str) -> TestGallery {
    TestGallery {
        gallery: Gallery {
            id,
            name: name.to_string(),
            description: None,
            slug: name.to_lowercase().replace(' ', "-"),
            position: 1,
            hidden: false,
            external: false,
            parent_id: None,
            children_count: 0,
            keywords: None,
        },
    }
}

/// A test gallery builder.
#[derive(Debug, Clone)]
pub struct TestGallery {
    gallery: Gallery,
}

impl TestGallery {
    /// Nest under a parent gallery.
    pub fn child_of(mut self, parent_id: i64) -> Self {
        self.gallery.parent_id = Some(parent_id);
        self
    }

    /// Set the position.
    pub fn at(mut self, position: i32) -> Self {
        self.gallery.position = position;
        self
    }

    /// Set the slug.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.gallery.slug = slug.to_string();
        self
    }

    /// Set the flat keyword column.
    pub fn with_keywords(mut self, keywords: &str) -> Self {
        self.gallery.keywords = Some(keywords.to_string());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.gallery.description = Some(description.to_string());
        self
    }

    /// Mark as hidden.
    pub fn hidden(mut self) -> Self {
        self.gallery.hidden = true;
        self
    }

    /// Mark as external.
    pub fn external(mut self) -> Self {
        self.gallery.external = true;
        self
    }

    pub fn build(self) -> Gallery {
        self.gallery
    }
}

impl From<TestGallery> for Gallery {
    fn from(test: TestGallery) -> Self {
        test.gallery
    }
}

/// Create a keyword row.
pub fn test_keyword(id: i64, gallery_id: i64, keyword: &str) -> GalleryKeyword {
    GalleryKeyword {
        id,
        gallery_id,
        keyword: keyword.to_string(),
    }
}

/// Create an item row.
pub fn test_item(id: i64, gallery_id: i64) -> GalleryItem {
    GalleryItem {
        id,
        gallery_id,
        name: format!("Photo {id}"),
        position: i32::try_from(id).unwrap_or(i32::MAX),
    }
}

/// Ids of the galleries in [`scenario_store`].
pub mod ids {
    /// Top level, position 1.
    pub const A: i64 = 1;
    /// Child of A, position 1, keyword "sunset" (stored twice).
    pub const B: i64 = 2;
    /// Child of A, position 2, keyword "rain".
    pub const C: i64 = 3;
    /// Hidden top-level gallery, keyword "sunset".
    pub const HIDDEN: i64 = 4;
    /// External child of A, position 3.
    pub const EXTERNAL: i64 = 5;
    /// Top level, position 2, no children.
    pub const D: i64 = 6;
}

/// A small gallery forest:
///
/// ```text
/// A (top, 1)
/// ├── B (1, "sunset", one item)
/// ├── C (2, "rain")
/// └── External (3, external)
/// D (top, 2)
/// Hidden (top, 3, hidden, "sunset")
/// ```
pub fn scenario_store() -> Arc<MemoryGalleryStore> {
    let store = MemoryGalleryStore::new();
    store.insert_gallery(test_gallery(ids::A, "A").at(1).build());
    store.insert_gallery(
        test_gallery(ids::B, "B")
            .child_of(ids::A)
            .at(1)
            .with_keywords("sunset,beach")
            .build(),
    );
    store.insert_gallery(
        test_gallery(ids::C, "C")
            .child_of(ids::A)
            .at(2)
            .with_keywords("rain")
            .build(),
    );
    store.insert_gallery(
        test_gallery(ids::EXTERNAL, "External")
            .child_of(ids::A)
            .at(3)
            .external()
            .build(),
    );
    store.insert_gallery(test_gallery(ids::D, "D").at(2).build());
    store.insert_gallery(test_gallery(ids::HIDDEN, "Hidden").at(3).hidden().build());

    store.insert_keyword(test_keyword(1, ids::B, "sunset"));
    store.insert_keyword(test_keyword(2, ids::C, "rain"));
    store.insert_keyword(test_keyword(3, ids::B, "sunset"));
    store.insert_keyword(test_keyword(4, ids::HIDDEN, "sunset"));

    store.insert_item(test_item(1, ids::B));
    Arc::new(store)
}

/// A renderer over `store` with every gallery tag registered.
pub fn renderer(store: Arc<dyn GalleryStore>) -> Renderer {
    renderer_with(store, EngineSettings::default())
}

/// A renderer over `store` with custom settings.
pub fn renderer_with(store: Arc<dyn GalleryStore>, settings: EngineSettings) -> Renderer {
    Renderer::new(
        Arc::new(Engine::new(store, settings)),
        Arc::new(TagRegistry::with_gallery_tags()),
    )
}

/// Render a template over [`scenario_store`].
pub async fn render_scenario(nodes: &[Node], context: RenderContext) -> RenderResult<String> {
    renderer(scenario_store()).render(nodes, context).await
}

/// Assertion helpers for rendered output.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}

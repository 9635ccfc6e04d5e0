#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Rendering goes through the real registry and renderer over the
//! scenario forest from `gallery-test-utils`. [`CountingStore`] wraps a
//! store to observe how many queries a render issued.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use gallery_engine::models::UpdateGalleryKeyword;
use gallery_engine::tags::TagNode;
use gallery_engine::{
    Gallery, GalleryKeyword, GalleryQuery, GalleryStore, MemoryGalleryStore, Node, RenderContext,
    RenderResult,
};
use gallery_test_utils::{renderer, scenario_store};

/// A store that counts every call before delegating.
pub struct CountingStore {
    inner: Arc<MemoryGalleryStore>,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: Arc<MemoryGalleryStore>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl GalleryStore for CountingStore {
    async fn find_gallery(&self, id: i64) -> Result<Option<Gallery>> {
        self.hit();
        self.inner.find_gallery(id).await
    }

    async fn find_gallery_by_name(&self, name: &str) -> Result<Option<Gallery>> {
        self.hit();
        self.inner.find_gallery_by_name(name).await
    }

    async fn list_galleries(&self, query: &GalleryQuery) -> Result<Vec<Gallery>> {
        self.hit();
        self.inner.list_galleries(query).await
    }

    async fn count_galleries(&self, query: &GalleryQuery) -> Result<u64> {
        self.hit();
        self.inner.count_galleries(query).await
    }

    async fn gallery_keywords(&self, gallery_id: i64) -> Result<Vec<GalleryKeyword>> {
        self.hit();
        self.inner.gallery_keywords(gallery_id).await
    }

    async fn count_children(&self, gallery_id: i64) -> Result<u64> {
        self.hit();
        self.inner.count_children(gallery_id).await
    }

    async fn count_items(&self, gallery_id: i64) -> Result<u64> {
        self.hit();
        self.inner.count_items(gallery_id).await
    }

    async fn find_keyword(
        &self,
        gallery_id: i64,
        keyword_id: i64,
    ) -> Result<Option<GalleryKeyword>> {
        self.hit();
        self.inner.find_keyword(gallery_id, keyword_id).await
    }

    async fn update_keyword(
        &self,
        gallery_id: i64,
        keyword_id: i64,
        input: &UpdateGalleryKeyword,
    ) -> Result<Option<GalleryKeyword>> {
        self.hit();
        self.inner.update_keyword(gallery_id, keyword_id, input).await
    }

    async fn delete_keyword(&self, gallery_id: i64, keyword_id: i64) -> Result<bool> {
        self.hit();
        self.inner.delete_keyword(gallery_id, keyword_id).await
    }
}

/// Fetch a scenario gallery by id.
pub async fn gallery(id: i64) -> Gallery {
    scenario_store().find_gallery(id).await.unwrap().unwrap()
}

/// Render over a fresh scenario store.
pub async fn render(nodes: &[Node], context: RenderContext) -> RenderResult<String> {
    renderer(scenario_store()).render(nodes, context).await
}

/// Render with a page URL of `/` and no ambient galleries.
pub async fn render_plain(nodes: &[Node]) -> String {
    render(nodes, RenderContext::new("/")).await.unwrap()
}

/// `<r:galleries:each ...><r:gallery:name/>,</r:galleries:each>`
pub fn name_list(tag: &str, attrs: &[(&str, &str)]) -> Node {
    let mut node = Node::tag(tag);
    for (k, v) in attrs {
        node = node.attr(*k, *v);
    }
    node.child(Node::tag("gallery:name")).child(",").into()
}

/// A template holding a single tag.
pub fn one(tag: TagNode) -> Vec<Node> {
    vec![Node::from(tag)]
}

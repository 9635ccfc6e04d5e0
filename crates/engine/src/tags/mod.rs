//! Gallery tags.
//!
//! This module provides:
//! - Engine: the gallery services a tag can reach
//! - TagRegistry: tag name -> handler, with attribute checks
//! - GalleryTag: the gallery tag family
//! - Renderer: walks a [`Node`] tree, dispatching tags and expanding bodies
//! - params: typed attribute structs, one per tag family

mod gallery;
pub mod params;
mod registry;
mod render;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::EngineSettings;
use crate::context::Scope;
use crate::error::RenderResult;
use crate::hierarchy::HierarchyNavigator;
use crate::keywords::KeywordIndex;
use crate::repository::GalleryRepository;
use crate::store::GalleryStore;

pub use gallery::GalleryTag;
pub use registry::TagRegistry;
pub use render::{Node, Renderer, TagNode};

/// Tag attributes as written by the template author.
pub type Attributes = BTreeMap<String, String>;

/// Services available to tag handlers.
pub struct Engine {
    pub repository: GalleryRepository,
    pub keywords: KeywordIndex,
    pub navigator: HierarchyNavigator,
    pub settings: EngineSettings,
}

impl Engine {
    pub fn new(store: Arc<dyn GalleryStore>, settings: EngineSettings) -> Self {
        Self {
            repository: GalleryRepository::new(Arc::clone(&store)),
            keywords: KeywordIndex::new(Arc::clone(&store)),
            navigator: HierarchyNavigator::new(store),
            settings,
        }
    }
}

/// Nested content of a tag, rendered on demand.
#[async_trait]
pub trait Expand: Send + Sync {
    /// Render the content in `scope`.
    async fn expand(&self, scope: &Scope) -> RenderResult<String>;
}

/// One tag invocation.
pub struct TagCall<'a> {
    pub name: &'a str,
    pub attrs: &'a Attributes,
    pub scope: &'a Scope,
    pub engine: &'a Engine,
    body: Option<&'a dyn Expand>,
}

impl<'a> TagCall<'a> {
    pub fn new(
        name: &'a str,
        attrs: &'a Attributes,
        scope: &'a Scope,
        engine: &'a Engine,
        body: Option<&'a dyn Expand>,
    ) -> Self {
        Self {
            name,
            attrs,
            scope,
            engine,
            body,
        }
    }

    /// Whether the tag was written with content (`<r:x>...</r:x>`).
    pub fn is_double(&self) -> bool {
        self.body.is_some()
    }

    /// Render the content in the tag's own scope.
    pub async fn expand(&self) -> RenderResult<String> {
        self.expand_in(self.scope).await
    }

    /// Render the content in a derived scope. Single tags render nothing.
    pub async fn expand_in(&self, scope: &Scope) -> RenderResult<String> {
        match self.body {
            Some(body) => body.expand(scope).await,
            None => Ok(String::new()),
        }
    }
}

/// A renderable tag.
#[async_trait]
pub trait TagHandler: Send + Sync {
    /// Attribute names the tag accepts; `None` accepts any.
    fn attributes(&self) -> Option<&'static [&'static str]>;

    /// Render the tag.
    async fn render(&self, call: &TagCall<'_>) -> RenderResult<String>;
}

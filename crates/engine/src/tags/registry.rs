//! Tag registry - maps tag names to handlers.
//!
//! Attribute names are checked here, before a handler runs, so a typo in a
//! template fails the render instead of being ignored.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::gallery::GalleryTag;
use super::{TagCall, TagHandler};
use crate::error::{GalleryTagError, RenderResult};

/// Registry mapping tag names to handlers.
#[derive(Default)]
pub struct TagRegistry {
    handlers: HashMap<String, Arc<dyn TagHandler>>,
}

impl TagRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the whole gallery tag family.
    pub fn with_gallery_tags() -> Self {
        let mut registry = Self::new();
        for tag in GalleryTag::ALL {
            registry.register(tag.name(), tag);
        }
        registry
    }

    /// Register a handler, replacing any previous one for `name`.
    pub fn register(&mut self, name: impl Into<String>, handler: impl TagHandler + 'static) {
        self.handlers.insert(name.into(), Arc::new(handler));
    }

    /// Get the handler for a tag.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn TagHandler>> {
        self.handlers.get(name)
    }

    /// Check if a tag is registered.
    pub fn has_tag(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Get all registered tag names.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(|s| s.as_str())
    }

    /// Get total number of registered tags.
    pub fn tag_count(&self) -> usize {
        self.handlers.len()
    }

    /// Validate a call and run its handler.
    pub async fn dispatch(&self, call: &TagCall<'_>) -> RenderResult<String> {
        let Some(handler) = self.get(call.name) else {
            warn!(tag = call.name, "unknown tag");
            return Err(GalleryTagError::UnknownTag(call.name.to_string()).into());
        };

        if let Some(allowed) = handler.attributes()
            && let Some(attribute) = call.attrs.keys().find(|k| !allowed.contains(&k.as_str()))
        {
            warn!(tag = call.name, attribute = %attribute, "rejected tag attribute");
            return Err(GalleryTagError::UnknownAttribute {
                tag: call.name.to_string(),
                attribute: attribute.clone(),
            }
            .into());
        }

        debug!(tag = call.name, double = call.is_double(), "dispatching tag");
        handler.render(call).await
    }
}

//! Render tree and renderer.
//!
//! Templates reach the engine already parsed into [`Node`]s. The renderer
//! walks them in order, dispatching each tag through the registry and
//! handing the tag its children as an [`Expand`] body.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::{Attributes, Engine, Expand, TagCall, TagRegistry};
use crate::context::{RenderContext, Scope};
use crate::error::RenderResult;

/// A node of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal output.
    Text(String),
    /// A tag invocation.
    Tag(TagNode),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Start a tag node.
    pub fn tag(name: impl Into<String>) -> TagNode {
        TagNode::new(name)
    }
}

impl From<TagNode> for Node {
    fn from(tag: TagNode) -> Self {
        Node::Tag(tag)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::text(text)
    }
}

/// A tag with its attributes and, for double tags, its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    pub name: String,
    pub attrs: Attributes,
    /// `None` for single tags (`<r:x/>`).
    pub body: Option<Vec<Node>>,
}

impl TagNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Attributes::new(),
            body: None,
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Append a child, turning this into a double tag.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.body.get_or_insert_with(Vec::new).push(node.into());
        self
    }

    /// Make this a double tag even if it has no children.
    pub fn double(mut self) -> Self {
        self.body.get_or_insert_with(Vec::new);
        self
    }
}

/// Children of a tag node, rendered back through the renderer.
struct NodeBody<'a> {
    renderer: &'a Renderer,
    nodes: &'a [Node],
}

#[async_trait]
impl<'a> Expand for NodeBody<'a> {
    async fn expand(&self, scope: &Scope) -> RenderResult<String> {
        self.renderer.render_nodes(self.nodes, scope).await
    }
}

type RenderFuture<'a> = Pin<Box<dyn Future<Output = RenderResult<String>> + Send + 'a>>;

/// Renders node trees against an [`Engine`].
#[derive(Clone)]
pub struct Renderer {
    engine: Arc<Engine>,
    registry: Arc<TagRegistry>,
}

impl Renderer {
    pub fn new(engine: Arc<Engine>, registry: Arc<TagRegistry>) -> Self {
        Self { engine, registry }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Render a template in a fresh render pass.
    pub async fn render(&self, nodes: &[Node], context: RenderContext) -> RenderResult<String> {
        let scope = Scope::new(context);
        self.render_nodes(nodes, &scope).await
    }

    /// Render nodes in order, concatenating their output.
    pub fn render_nodes<'a>(&'a self, nodes: &'a [Node], scope: &'a Scope) -> RenderFuture<'a> {
        Box::pin(async move {
            let mut output = String::new();
            for node in nodes {
                match node {
                    Node::Text(text) => output.push_str(text),
                    Node::Tag(tag) => {
                        let body = tag.body.as_deref().map(|nodes| NodeBody {
                            renderer: self,
                            nodes,
                        });
                        let call = TagCall::new(
                            &tag.name,
                            &tag.attrs,
                            scope,
                            &self.engine,
                            body.as_ref().map(|b| b as &dyn Expand),
                        );
                        output.push_str(&self.registry.dispatch(&call).await?);
                    }
                }
            }
            Ok(output)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_and_double_tags() {
        let single = Node::tag("gallery:name");
        assert!(single.body.is_none());

        let double = Node::tag("galleries").double();
        assert_eq!(double.body, Some(Vec::new()));

        let nested = Node::tag("galleries:each")
            .attr("level", "top")
            .child(Node::tag("gallery:name"))
            .child(", ");
        assert_eq!(nested.attrs.get("level").map(String::as_str), Some("top"));
        assert_eq!(nested.body.as_ref().map(Vec::len), Some(2));
    }
}

//! The gallery tag family.
//!
//! Listing tags (`galleries:each`, `gallery:children:each`) expand their
//! content once per gallery with that gallery bound in scope. Conditional
//! tags come in `if_*`/`unless_*` pairs where `unless_*` is always the
//! exact negation of `if_*`.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;

use super::params::{
    BREADCRUMB_ATTRS, CHILDREN_ATTRS, ChildrenParams, EACH_ATTRS, EachParams, LinkParams,
    NameParams, SELECT_ATTRS, SeparatorParams, parse_selector,
};
use super::{TagCall, TagHandler};
use crate::context::{GallerySelector, resolve_gallery};
use crate::error::{GalleryTagError, RenderResult};
use crate::helpers::html_escape;
use crate::keywords::{filter_clause, join_separator};
use crate::models::Gallery;
use crate::query::{GalleryQuery, ParentScope};

/// Whitespace runs replaced by `gallery:name safe="true"`.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex literal"));

const NO_ATTRS: &[&str] = &[];
const NAME_ATTRS: &[&str] = &["safe"];
const KEYWORDS_ATTRS: &[&str] = &["separator"];

/// Every gallery tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryTag {
    Galleries,
    GalleriesEach,
    Gallery,
    IfCurrent,
    UnlessCurrent,
    Current,
    IfCurrentKeywords,
    UnlessCurrentKeywords,
    CurrentKeywords,
    Name,
    Description,
    Keywords,
    KeywordsEach,
    KeywordsKeyword,
    KeywordsLink,
    Breadcrumbs,
    ChildrenEach,
    IfChildren,
    UnlessChildren,
    IfGalleries,
    UnlessGalleries,
    IfItems,
    UnlessItems,
    ChildrenSize,
    ItemsSize,
}

impl GalleryTag {
    pub const ALL: [GalleryTag; 25] = [
        GalleryTag::Galleries,
        GalleryTag::GalleriesEach,
        GalleryTag::Gallery,
        GalleryTag::IfCurrent,
        GalleryTag::UnlessCurrent,
        GalleryTag::Current,
        GalleryTag::IfCurrentKeywords,
        GalleryTag::UnlessCurrentKeywords,
        GalleryTag::CurrentKeywords,
        GalleryTag::Name,
        GalleryTag::Description,
        GalleryTag::Keywords,
        GalleryTag::KeywordsEach,
        GalleryTag::KeywordsKeyword,
        GalleryTag::KeywordsLink,
        GalleryTag::Breadcrumbs,
        GalleryTag::ChildrenEach,
        GalleryTag::IfChildren,
        GalleryTag::UnlessChildren,
        GalleryTag::IfGalleries,
        GalleryTag::UnlessGalleries,
        GalleryTag::IfItems,
        GalleryTag::UnlessItems,
        GalleryTag::ChildrenSize,
        GalleryTag::ItemsSize,
    ];

    /// Name the tag is registered under.
    pub fn name(self) -> &'static str {
        match self {
            GalleryTag::Galleries => "galleries",
            GalleryTag::GalleriesEach => "galleries:each",
            GalleryTag::Gallery => "gallery",
            GalleryTag::IfCurrent => "gallery:if_current",
            GalleryTag::UnlessCurrent => "gallery:unless_current",
            GalleryTag::Current => "gallery:current",
            GalleryTag::IfCurrentKeywords => "gallery:if_current_keywords",
            GalleryTag::UnlessCurrentKeywords => "gallery:unless_current_keywords",
            GalleryTag::CurrentKeywords => "gallery:current_keywords",
            GalleryTag::Name => "gallery:name",
            GalleryTag::Description => "gallery:description",
            GalleryTag::Keywords => "gallery:keywords",
            GalleryTag::KeywordsEach => "gallery:keywords:each",
            GalleryTag::KeywordsKeyword => "gallery:keywords:keyword",
            GalleryTag::KeywordsLink => "gallery:keywords:link",
            GalleryTag::Breadcrumbs => "gallery:breadcrumbs",
            GalleryTag::ChildrenEach => "gallery:children:each",
            GalleryTag::IfChildren => "gallery:if_children",
            GalleryTag::UnlessChildren => "gallery:unless_children",
            GalleryTag::IfGalleries => "gallery:if_galleries",
            GalleryTag::UnlessGalleries => "gallery:unless_galleries",
            GalleryTag::IfItems => "gallery:if_items",
            GalleryTag::UnlessItems => "gallery:unless_items",
            GalleryTag::ChildrenSize => "gallery:children_size",
            GalleryTag::ItemsSize => "gallery:items_size",
        }
    }
}

/// Expand the content when `condition` holds.
async fn branch(call: &TagCall<'_>, condition: bool) -> RenderResult<String> {
    if condition {
        call.expand().await
    } else {
        Ok(String::new())
    }
}

/// Expand the content once per gallery, each bound in scope.
async fn expand_each(call: &TagCall<'_>, galleries: Vec<Gallery>) -> RenderResult<String> {
    let mut content = String::new();
    for gallery in galleries {
        let scope = call.scope.with_gallery(Arc::new(gallery));
        content.push_str(&call.expand_in(&scope).await?);
    }
    Ok(content)
}

async fn find_gallery(
    call: &TagCall<'_>,
    selector: &GallerySelector,
) -> RenderResult<Option<Arc<Gallery>>> {
    Ok(resolve_gallery(&call.engine.repository, selector, call.scope).await?)
}

async fn require_gallery(
    call: &TagCall<'_>,
    selector: &GallerySelector,
) -> RenderResult<Arc<Gallery>> {
    find_gallery(call, selector)
        .await?
        .ok_or_else(|| GalleryTagError::NoGallery(call.name.to_string()).into())
}

fn require_keyword<'a>(call: &'a TagCall<'_>) -> RenderResult<&'a str> {
    call.scope
        .keyword()
        .ok_or_else(|| GalleryTagError::NoKeyword(call.name.to_string()).into())
}

/// Whether there is anything to list: the gallery's children, or the
/// visible top-level galleries when no gallery is in scope.
async fn has_galleries(call: &TagCall<'_>) -> RenderResult<bool> {
    let selector = parse_selector(call.name, call.attrs)?;
    match find_gallery(call, &selector).await? {
        Some(gallery) => Ok(call.engine.navigator.has_children(&gallery).await?),
        None => {
            let query = GalleryQuery::builder().parent(ParentScope::Top).build()?;
            Ok(call.engine.repository.count(&query).await? > 0)
        }
    }
}

async fn has_children(call: &TagCall<'_>) -> RenderResult<bool> {
    let selector = parse_selector(call.name, call.attrs)?;
    match find_gallery(call, &selector).await? {
        Some(gallery) => Ok(call.engine.navigator.has_children(&gallery).await?),
        None => Ok(false),
    }
}

async fn has_items(call: &TagCall<'_>) -> RenderResult<bool> {
    let selector = parse_selector(call.name, call.attrs)?;
    match find_gallery(call, &selector).await? {
        Some(gallery) => Ok(call.engine.navigator.has_items(&gallery).await?),
        None => Ok(false),
    }
}

#[async_trait]
impl TagHandler for GalleryTag {
    fn attributes(&self) -> Option<&'static [&'static str]> {
        let attrs = match self {
            GalleryTag::GalleriesEach => EACH_ATTRS,
            GalleryTag::ChildrenEach => CHILDREN_ATTRS,
            GalleryTag::Breadcrumbs => BREADCRUMB_ATTRS,
            GalleryTag::Name => NAME_ATTRS,
            GalleryTag::Keywords => KEYWORDS_ATTRS,
            GalleryTag::KeywordsLink => return None,
            GalleryTag::Gallery
            | GalleryTag::IfChildren
            | GalleryTag::UnlessChildren
            | GalleryTag::IfGalleries
            | GalleryTag::UnlessGalleries
            | GalleryTag::IfItems
            | GalleryTag::UnlessItems
            | GalleryTag::ChildrenSize
            | GalleryTag::ItemsSize => SELECT_ATTRS,
            GalleryTag::Galleries
            | GalleryTag::IfCurrent
            | GalleryTag::UnlessCurrent
            | GalleryTag::Current
            | GalleryTag::IfCurrentKeywords
            | GalleryTag::UnlessCurrentKeywords
            | GalleryTag::CurrentKeywords
            | GalleryTag::Description
            | GalleryTag::KeywordsEach
            | GalleryTag::KeywordsKeyword => NO_ATTRS,
        };
        Some(attrs)
    }

    async fn render(&self, call: &TagCall<'_>) -> RenderResult<String> {
        let engine = call.engine;
        let context = call.scope.context();

        match self {
            GalleryTag::Galleries => call.expand().await,

            GalleryTag::GalleriesEach => {
                let params = EachParams::parse(call.name, call.attrs)?;
                let parent = ParentScope::for_level(
                    params.level,
                    context.current_gallery_id(),
                    context.base_gallery_id(),
                );
                let query = params.sort.apply(
                    GalleryQuery::builder().parent(parent),
                    engine.settings.default_limit,
                );
                let query = filter_clause(query, &params.keywords).build()?;
                let galleries = engine.repository.list(&query).await?;
                expand_each(call, galleries).await
            }

            GalleryTag::Gallery => {
                let selector = parse_selector(call.name, call.attrs)?;
                match find_gallery(call, &selector).await? {
                    Some(gallery) => call.expand_in(&call.scope.with_gallery(gallery)).await,
                    None if selector.is_explicit() => {
                        Err(GalleryTagError::NoGallery(call.name.to_string()).into())
                    }
                    None => call.expand().await,
                }
            }

            GalleryTag::IfCurrent => branch(call, context.current_gallery.is_some()).await,
            GalleryTag::UnlessCurrent => branch(call, context.current_gallery.is_none()).await,

            GalleryTag::Current => match &context.current_gallery {
                Some(gallery) => {
                    let scope = call.scope.with_gallery(Arc::clone(gallery));
                    call.expand_in(&scope).await
                }
                None => Ok(String::new()),
            },

            GalleryTag::IfCurrentKeywords => {
                branch(call, context.current_keyword.is_some()).await
            }
            GalleryTag::UnlessCurrentKeywords => {
                branch(call, context.current_keyword.is_none()).await
            }
            GalleryTag::CurrentKeywords => Ok(context
                .current_keyword
                .as_deref()
                .map(html_escape)
                .unwrap_or_default()),

            GalleryTag::Name => {
                let params = NameParams::parse(call.attrs);
                let gallery = require_gallery(call, &GallerySelector::default()).await?;
                let name = if params.safe {
                    WHITESPACE.replace_all(&gallery.name, "_").into_owned()
                } else {
                    gallery.name.clone()
                };
                Ok(html_escape(&name))
            }

            GalleryTag::Description => {
                let gallery = require_gallery(call, &GallerySelector::default()).await?;
                Ok(gallery
                    .description
                    .as_deref()
                    .map(html_escape)
                    .unwrap_or_default())
            }

            GalleryTag::Keywords => {
                let params = SeparatorParams::parse(call.name, call.attrs)?;
                let gallery = require_gallery(call, &GallerySelector::default()).await?;
                if call.is_double() {
                    return call.expand_in(&call.scope.with_gallery(gallery)).await;
                }
                let separator = params
                    .separator
                    .as_deref()
                    .unwrap_or(engine.settings.keyword_separator.as_str());
                let keywords = html_escape(gallery.keywords.as_deref().unwrap_or_default());
                Ok(join_separator(&keywords, separator))
            }

            GalleryTag::KeywordsEach => {
                let gallery = require_gallery(call, &GallerySelector::default()).await?;
                let scope = call.scope.with_gallery(Arc::clone(&gallery));
                let mut content = String::new();
                for keyword in engine.keywords.keywords_of(&gallery).await? {
                    content.push_str(&call.expand_in(&scope.with_keyword(&keyword)).await?);
                }
                Ok(content)
            }

            GalleryTag::KeywordsKeyword => Ok(html_escape(require_keyword(call)?)),

            GalleryTag::KeywordsLink => {
                let keyword = require_keyword(call)?;
                let params = LinkParams::parse(call.attrs);
                let attributes: String = params
                    .html_attributes
                    .iter()
                    .map(|(k, v)| format!(r#" {k}="{}""#, html_escape(v)))
                    .collect();
                let text = if call.is_double() {
                    call.expand().await?
                } else {
                    html_escape(keyword)
                };
                let href = format!(
                    "{}?keywords={}",
                    context.page_url.trim_end_matches('/'),
                    urlencoding::encode(keyword)
                );
                Ok(format!(
                    r#"<a href="{}"{attributes}>{text}</a>"#,
                    html_escape(&href)
                ))
            }

            GalleryTag::Breadcrumbs => {
                let params = SeparatorParams::parse(call.name, call.attrs)?;
                let gallery = require_gallery(call, &params.selector).await?;
                let separator = params
                    .separator
                    .as_deref()
                    .unwrap_or(engine.settings.breadcrumb_separator.as_str());
                engine
                    .navigator
                    .breadcrumbs(&gallery, context, separator)
                    .await
            }

            GalleryTag::ChildrenEach => {
                // Parameters are validated before the gallery lookup.
                let params = ChildrenParams::parse(call.name, call.attrs)?;
                let options = params
                    .sort
                    .apply(GalleryQuery::builder(), engine.settings.default_limit);
                let gallery = require_gallery(call, &params.selector).await?;
                let children = engine.repository.children_of(&gallery, options).await?;
                expand_each(call, children).await
            }

            GalleryTag::IfChildren => branch(call, has_children(call).await?).await,
            GalleryTag::UnlessChildren => branch(call, !has_children(call).await?).await,
            GalleryTag::IfGalleries => branch(call, has_galleries(call).await?).await,
            GalleryTag::UnlessGalleries => branch(call, !has_galleries(call).await?).await,
            GalleryTag::IfItems => branch(call, has_items(call).await?).await,
            GalleryTag::UnlessItems => branch(call, !has_items(call).await?).await,

            GalleryTag::ChildrenSize => {
                let selector = parse_selector(call.name, call.attrs)?;
                let gallery = require_gallery(call, &selector).await?;
                Ok(engine.navigator.children_count(&gallery).await?.to_string())
            }

            GalleryTag::ItemsSize => {
                let selector = parse_selector(call.name, call.attrs)?;
                let gallery = require_gallery(call, &selector).await?;
                Ok(engine.navigator.items_count(&gallery).await?.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = GalleryTag::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), GalleryTag::ALL.len());
    }

    #[test]
    fn link_accepts_any_attribute() {
        assert!(GalleryTag::KeywordsLink.attributes().is_none());
        assert_eq!(GalleryTag::Galleries.attributes(), Some(NO_ATTRS));
        assert_eq!(GalleryTag::GalleriesEach.attributes(), Some(EACH_ATTRS));
    }
}

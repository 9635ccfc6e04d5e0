//! Typed tag parameters.
//!
//! Each tag family parses its string attributes once into one of these
//! structs. Values are validated here, before any store access.

use crate::context::GallerySelector;
use crate::error::GalleryTagError;
use crate::keywords::parse_keyword_list;
use crate::query::{GalleryQueryBuilder, Level, SortDirection, SortField};

use super::Attributes;

/// Attributes of gallery-selecting tags.
pub const SELECT_ATTRS: &[&str] = &["id", "name"];
/// Attributes of `gallery:children:each`.
pub const CHILDREN_ATTRS: &[&str] = &["id", "name", "by", "order", "limit", "offset"];
/// Attributes of `galleries:each`.
pub const EACH_ATTRS: &[&str] = &["level", "keywords", "by", "order", "limit", "offset"];
/// Attributes of `gallery:breadcrumbs`.
pub const BREADCRUMB_ATTRS: &[&str] = &["id", "name", "separator"];

fn invalid(tag: &str, attribute: &str, value: &str) -> GalleryTagError {
    GalleryTagError::InvalidAttribute {
        tag: tag.to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

fn parse_u64(
    tag: &str,
    attrs: &Attributes,
    attribute: &str,
) -> Result<Option<u64>, GalleryTagError> {
    attrs
        .get(attribute)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(tag, attribute, value))
        })
        .transpose()
}

/// `by`, `order`, `limit` and `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortParams {
    pub by: SortField,
    pub direction: SortDirection,
    pub limit: Option<u64>,
    pub offset: u64,
}

impl SortParams {
    pub fn parse(tag: &str, attrs: &Attributes) -> Result<Self, GalleryTagError> {
        let by = match attrs.get("by") {
            Some(by) => by.parse()?,
            None => SortField::default(),
        };
        Ok(Self {
            by,
            direction: SortDirection::parse_lenient(attrs.get("order").map(String::as_str)),
            limit: parse_u64(tag, attrs, "limit")?,
            offset: parse_u64(tag, attrs, "offset")?.unwrap_or(0),
        })
    }

    /// Apply ordering and pagination to a listing.
    pub fn apply(&self, query: GalleryQueryBuilder, default_limit: u64) -> GalleryQueryBuilder {
        query
            .sort(self.by)
            .direction(self.direction)
            .limit(self.limit.unwrap_or(default_limit))
            .offset(self.offset)
    }
}

/// `id` and `name`.
pub fn parse_selector(tag: &str, attrs: &Attributes) -> Result<GallerySelector, GalleryTagError> {
    let id = attrs
        .get("id")
        .map(|value| {
            value
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid(tag, "id", value))
        })
        .transpose()?;
    Ok(GallerySelector {
        id,
        name: attrs.get("name").cloned(),
    })
}

/// Parameters of `galleries:each`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EachParams {
    pub level: Level,
    pub keywords: Vec<String>,
    pub sort: SortParams,
}

impl EachParams {
    pub fn parse(tag: &str, attrs: &Attributes) -> Result<Self, GalleryTagError> {
        let level = match attrs.get("level") {
            Some(level) => level.parse()?,
            None => Level::default(),
        };
        Ok(Self {
            level,
            keywords: attrs
                .get("keywords")
                .map(String::as_str)
                .map(parse_keyword_list)
                .unwrap_or_default(),
            sort: SortParams::parse(tag, attrs)?,
        })
    }
}

/// Parameters of `gallery:children:each`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildrenParams {
    pub selector: GallerySelector,
    pub sort: SortParams,
}

impl ChildrenParams {
    pub fn parse(tag: &str, attrs: &Attributes) -> Result<Self, GalleryTagError> {
        Ok(Self {
            selector: parse_selector(tag, attrs)?,
            sort: SortParams::parse(tag, attrs)?,
        })
    }
}

/// Parameters of `gallery:name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameParams {
    /// Replace whitespace runs with `_`.
    pub safe: bool,
}

impl NameParams {
    pub fn parse(attrs: &Attributes) -> Self {
        Self {
            safe: attrs
                .get("safe")
                .is_some_and(|v| !matches!(v.trim(), "false" | "0" | "")),
        }
    }
}

/// Parameters of `gallery:keywords` and `gallery:breadcrumbs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorParams {
    pub selector: GallerySelector,
    pub separator: Option<String>,
}

impl SeparatorParams {
    pub fn parse(tag: &str, attrs: &Attributes) -> Result<Self, GalleryTagError> {
        Ok(Self {
            selector: parse_selector(tag, attrs)?,
            separator: attrs.get("separator").cloned(),
        })
    }
}

/// Parameters of `gallery:keywords:link`: every attribute becomes an
/// HTML attribute of the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkParams {
    pub html_attributes: Vec<(String, String)>,
}

impl LinkParams {
    pub fn parse(attrs: &Attributes) -> Self {
        Self {
            html_attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect(),
        }
    }
}

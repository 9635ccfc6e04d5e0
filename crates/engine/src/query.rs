//! Gallery listing queries.
//!
//! A [`GalleryQuery`] is an immutable description of one listing: parent
//! scope, keyword membership, ordering and pagination. It is validated once
//! by [`GalleryQueryBuilder::build`] and can then be rendered to SQL with
//! SeaQuery or evaluated by an in-memory store. Hidden and external
//! galleries are always excluded.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use sea_query::{Alias, Asterisk, Expr, Order, PostgresQueryBuilder, Query, SelectStatement};
use serde::{Deserialize, Serialize};

use crate::error::GalleryTagError;
use crate::models::Gallery;

/// Gallery table name.
pub const GALLERY_TABLE: &str = "galleries";

/// Keyword association table name.
pub const KEYWORD_TABLE: &str = "gallery_keywords";

/// Limit used when a listing does not ask for one; effectively unbounded.
pub const DEFAULT_LIMIT: u64 = 9999;

/// Which part of the hierarchy `galleries:each` lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Children of the current gallery (or of the base gallery).
    Current,
    /// Galleries without a parent.
    Top,
    /// Galleries without children.
    Bottom,
    /// No hierarchy constraint.
    #[default]
    All,
}

impl FromStr for Level {
    type Err = GalleryTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Level::Current),
            "top" => Ok(Level::Top),
            "bottom" => Ok(Level::Bottom),
            "all" => Ok(Level::All),
            other => Err(GalleryTagError::InvalidLevel(other.to_string())),
        }
    }
}

/// Gallery columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Name,
    Description,
    Slug,
    #[default]
    Position,
    Hidden,
    External,
    ParentId,
    ChildrenCount,
    Keywords,
}

impl SortField {
    /// Every sortable column.
    pub const ALL: [SortField; 10] = [
        SortField::Id,
        SortField::Name,
        SortField::Description,
        SortField::Slug,
        SortField::Position,
        SortField::Hidden,
        SortField::External,
        SortField::ParentId,
        SortField::ChildrenCount,
        SortField::Keywords,
    ];

    /// Column name in the galleries table.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Description => "description",
            SortField::Slug => "slug",
            SortField::Position => "position",
            SortField::Hidden => "hidden",
            SortField::External => "external",
            SortField::ParentId => "parent_id",
            SortField::ChildrenCount => "children_count",
            SortField::Keywords => "keywords",
        }
    }

    /// Compare two galleries on this column, ascending.
    ///
    /// NULLs sort after every value, as PostgreSQL does for `ASC`.
    pub fn compare(self, a: &Gallery, b: &Gallery) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Description => nulls_last(&a.description, &b.description),
            SortField::Slug => a.slug.cmp(&b.slug),
            SortField::Position => a.position.cmp(&b.position),
            SortField::Hidden => a.hidden.cmp(&b.hidden),
            SortField::External => a.external.cmp(&b.external),
            SortField::ParentId => nulls_last(&a.parent_id, &b.parent_id),
            SortField::ChildrenCount => a.children_count.cmp(&b.children_count),
            SortField::Keywords => nulls_last(&a.keywords, &b.keywords),
        }
    }
}

impl FromStr for SortField {
    type Err = GalleryTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.column() == s)
            .ok_or_else(|| GalleryTagError::InvalidSortField(s.to_string()))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

fn nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a direction case-insensitively; anything unrecognised is `Asc`.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("desc" | "descending") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// Parent constraint of a listing, after `level` has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentScope {
    /// No parent constraint.
    #[default]
    Any,
    /// `parent_id IS NULL`.
    Top,
    /// `children_count = 0`.
    Childless,
    /// `parent_id = id`.
    ChildrenOf(i64),
}

impl ParentScope {
    /// Resolve a `level` against the ambient current and base galleries.
    ///
    /// `current` with neither gallery available is unconstrained.
    pub fn for_level(level: Level, current_id: Option<i64>, base_id: Option<i64>) -> Self {
        match level {
            Level::All => ParentScope::Any,
            Level::Top => ParentScope::Top,
            Level::Bottom => ParentScope::Childless,
            Level::Current => current_id
                .or(base_id)
                .map_or(ParentScope::Any, ParentScope::ChildrenOf),
        }
    }
}

/// A validated, immutable gallery listing query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryQuery {
    parent: ParentScope,
    keywords: Vec<String>,
    sort: SortField,
    direction: SortDirection,
    limit: u64,
    offset: u64,
}

impl GalleryQuery {
    /// Start building a listing query.
    pub fn builder() -> GalleryQueryBuilder {
        GalleryQueryBuilder::default()
    }

    pub fn parent(&self) -> ParentScope {
        self.parent
    }

    /// Keywords a gallery must have at least one of; empty means no filter.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn sort(&self) -> SortField {
        self.sort
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Order two galleries as this query would, ties broken by id.
    pub fn ordering(&self, a: &Gallery, b: &Gallery) -> Ordering {
        let primary = self.sort.compare(a, b);
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// Build the SELECT statement for this listing.
    pub fn select_statement(&self) -> SelectStatement {
        let mut query = Query::select();
        query
            .column((Alias::new(GALLERY_TABLE), Asterisk))
            .from(Alias::new(GALLERY_TABLE));

        self.add_filters(&mut query);
        if !self.keywords.is_empty() {
            // The join yields one row per matching keyword.
            query.distinct();
        }

        let order = match self.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };
        query.order_by(
            (Alias::new(GALLERY_TABLE), Alias::new(self.sort.column())),
            order,
        );
        if self.sort != SortField::Id {
            query.order_by((Alias::new(GALLERY_TABLE), Alias::new("id")), Order::Asc);
        }
        query.limit(self.limit);
        query.offset(self.offset);
        query
    }

    /// Render the listing as PostgreSQL.
    pub fn to_sql(&self) -> String {
        self.select_statement().to_string(PostgresQueryBuilder)
    }

    /// Render a count of matching galleries, ignoring pagination.
    pub fn to_count_sql(&self) -> String {
        let mut query = Query::select();
        query
            .expr(Expr::cust(format!(
                "COUNT(DISTINCT \"{GALLERY_TABLE}\".\"id\")"
            )))
            .from(Alias::new(GALLERY_TABLE));
        self.add_filters(&mut query);
        query.to_string(PostgresQueryBuilder)
    }

    fn add_filters(&self, query: &mut SelectStatement) {
        let column = |name: &str| Expr::col((Alias::new(GALLERY_TABLE), Alias::new(name)));

        query.and_where(column("hidden").eq(false));
        query.and_where(column("external").eq(false));

        match self.parent {
            ParentScope::Any => {}
            ParentScope::Top => {
                query.and_where(column("parent_id").is_null());
            }
            ParentScope::Childless => {
                query.and_where(column("children_count").eq(0));
            }
            ParentScope::ChildrenOf(id) => {
                query.and_where(column("parent_id").eq(id));
            }
        }

        if !self.keywords.is_empty() {
            query.inner_join(
                Alias::new(KEYWORD_TABLE),
                Expr::col((Alias::new(GALLERY_TABLE), Alias::new("id")))
                    .equals((Alias::new(KEYWORD_TABLE), Alias::new("gallery_id"))),
            );
            query.and_where(
                Expr::col((Alias::new(KEYWORD_TABLE), Alias::new("keyword")))
                    .is_in(self.keywords.clone()),
            );
        }
    }
}

/// Builder for [`GalleryQuery`]. Nothing is checked until [`build`].
///
/// [`build`]: GalleryQueryBuilder::build
#[derive(Debug, Clone, Default)]
pub struct GalleryQueryBuilder {
    parent: ParentScope,
    keywords: Vec<String>,
    sort_by: Option<String>,
    direction: SortDirection,
    limit: Option<u64>,
    offset: u64,
}

impl GalleryQueryBuilder {
    pub fn parent(mut self, parent: ParentScope) -> Self {
        self.parent = parent;
        self
    }

    /// Restrict to children of a gallery.
    pub fn children_of(self, gallery_id: i64) -> Self {
        self.parent(ParentScope::ChildrenOf(gallery_id))
    }

    /// Restrict to galleries having at least one of `keywords`.
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords
            .into_iter()
            .map(Into::into)
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    /// Order by a column name; validated in [`build`](Self::build).
    pub fn sort_by(mut self, column: impl Into<String>) -> Self {
        self.sort_by = Some(column.into());
        self
    }

    /// Order by an already-validated column.
    pub fn sort(mut self, field: SortField) -> Self {
        self.sort_by = Some(field.column().to_string());
        self
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Validate and freeze the query.
    pub fn build(self) -> Result<GalleryQuery, GalleryTagError> {
        let sort = match self.sort_by.as_deref() {
            Some(column) => column.parse()?,
            None => SortField::default(),
        };

        Ok(GalleryQuery {
            parent: self.parent,
            keywords: self.keywords,
            sort,
            direction: self.direction,
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            offset: self.offset,
        })
    }
}

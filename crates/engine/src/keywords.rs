//! Keyword index.
//!
//! Galleries carry keywords twice: as the flat comma-delimited
//! [`Gallery::keywords`] column, rendered inline through
//! [`join_separator`], and as `gallery_keywords` rows, which drive
//! filtering ([`filter_clause`]) and iteration ([`KeywordIndex::keywords_of`]).

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;

use crate::models::Gallery;
use crate::query::{GalleryQuery, GalleryQueryBuilder};
use crate::store::GalleryStore;

/// Separator used by [`join_separator`] when none is given.
pub const DEFAULT_KEYWORD_SEPARATOR: &str = " ";

/// Relational keyword lookups.
#[derive(Clone)]
pub struct KeywordIndex {
    store: Arc<dyn GalleryStore>,
}

impl KeywordIndex {
    pub fn new(store: Arc<dyn GalleryStore>) -> Self {
        Self { store }
    }

    /// Unique keywords of a gallery, in first-seen row order.
    pub async fn keywords_of(&self, gallery: &Gallery) -> Result<Vec<String>> {
        let rows = self.store.gallery_keywords(gallery.id).await?;
        let mut seen = HashSet::new();
        Ok(rows
            .into_iter()
            .map(|row| row.keyword)
            .filter(|keyword| seen.insert(keyword.clone()))
            .collect())
    }

    /// Galleries having at least one of `keywords`, in default order.
    pub async fn galleries_with(&self, keywords: &[String]) -> crate::RenderResult<Vec<Gallery>> {
        let query = filter_clause(GalleryQuery::builder(), keywords).build()?;
        Ok(self.store.list_galleries(&query).await?)
    }
}

/// Render the flat keyword column with commas replaced by `separator`.
pub fn join_separator(keywords: &str, separator: &str) -> String {
    keywords.replace(',', separator)
}

/// Split a `keywords="a, b"` attribute into trimmed, non-empty keywords.
pub fn parse_keyword_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Add keyword membership (any of `keywords`) to a listing.
pub fn filter_clause(query: GalleryQueryBuilder, keywords: &[String]) -> GalleryQueryBuilder {
    query.keywords(keywords.iter().cloned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn join_replaces_every_comma() {
        assert_eq!(join_separator("sea,sky,sand", " | "), "sea | sky | sand");
        assert_eq!(
            join_separator("sea,sky", DEFAULT_KEYWORD_SEPARATOR),
            "sea sky"
        );
        assert_eq!(join_separator("", ", "), "");
    }

    #[test]
    fn join_is_idempotent_without_commas() {
        for source in ["sea,sky,sand", "single", "a,,b"] {
            let once = join_separator(source, " / ");
            assert_eq!(join_separator(&once, " / "), once);
        }
    }

    #[test]
    fn keyword_list_parsing() {
        assert_eq!(
            parse_keyword_list("key1, key2,key3 ,,"),
            vec!["key1", "key2", "key3"]
        );
        assert!(parse_keyword_list(" , ").is_empty());
    }

    #[test]
    fn filter_clause_sets_membership() {
        let keywords = vec!["sunset".to_string()];
        let query = filter_clause(GalleryQuery::builder(), &keywords)
            .build()
            .unwrap();
        assert_eq!(query.keywords(), keywords.as_slice());
    }
}

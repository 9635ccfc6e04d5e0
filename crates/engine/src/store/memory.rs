//! In-process gallery store.
//!
//! Evaluates [`GalleryQuery`] values directly over in-memory tables. The
//! denormalized `children_count` is recomputed from the live tables on
//! every read, so it always matches the real number of children.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

use super::GalleryStore;
use crate::models::{Gallery, GalleryItem, GalleryKeyword, UpdateGalleryKeyword};
use crate::query::{GalleryQuery, ParentScope};

#[derive(Debug, Default)]
struct Tables {
    galleries: Vec<Gallery>,
    keywords: Vec<GalleryKeyword>,
    items: Vec<GalleryItem>,
}

impl Tables {
    fn children_of(&self, gallery_id: i64) -> usize {
        self.galleries
            .iter()
            .filter(|g| g.parent_id == Some(gallery_id))
            .count()
    }

    fn hydrate(&self, gallery: &Gallery) -> Gallery {
        let mut gallery = gallery.clone();
        gallery.children_count = i32::try_from(self.children_of(gallery.id)).unwrap_or(i32::MAX);
        gallery
    }

    fn has_any_keyword(&self, gallery_id: i64, wanted: &[String]) -> bool {
        self.keywords
            .iter()
            .any(|k| k.gallery_id == gallery_id && wanted.contains(&k.keyword))
    }

    fn matches(&self, gallery: &Gallery, query: &GalleryQuery) -> bool {
        if !gallery.is_listed() {
            return false;
        }
        let parent_ok = match query.parent() {
            ParentScope::Any => true,
            ParentScope::Top => gallery.parent_id.is_none(),
            ParentScope::Childless => gallery.children_count == 0,
            ParentScope::ChildrenOf(id) => gallery.parent_id == Some(id),
        };
        parent_ok
            && (query.keywords().is_empty() || self.has_any_keyword(gallery.id, query.keywords()))
    }

    fn matching(&self, query: &GalleryQuery) -> Vec<Gallery> {
        self.galleries
            .iter()
            .map(|g| self.hydrate(g))
            .filter(|g| self.matches(g, query))
            .collect()
    }
}

/// A [`GalleryStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryGalleryStore {
    tables: RwLock<Tables>,
}

impl MemoryGalleryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a gallery.
    pub fn insert_gallery(&self, gallery: Gallery) {
        let mut tables = self.tables.write();
        tables.galleries.retain(|g| g.id != gallery.id);
        tables.galleries.push(gallery);
    }

    /// Insert a keyword row. Duplicate keywords per gallery are allowed.
    pub fn insert_keyword(&self, keyword: GalleryKeyword) {
        let mut tables = self.tables.write();
        tables.keywords.retain(|k| k.id != keyword.id);
        tables.keywords.push(keyword);
        tables.keywords.sort_by_key(|k| k.id);
    }

    /// Insert or replace an item.
    pub fn insert_item(&self, item: GalleryItem) {
        let mut tables = self.tables.write();
        tables.items.retain(|i| i.id != item.id);
        tables.items.push(item);
    }
}

#[async_trait]
impl GalleryStore for MemoryGalleryStore {
    async fn find_gallery(&self, id: i64) -> Result<Option<Gallery>> {
        let tables = self.tables.read();
        Ok(tables
            .galleries
            .iter()
            .find(|g| g.id == id)
            .map(|g| tables.hydrate(g)))
    }

    async fn find_gallery_by_name(&self, name: &str) -> Result<Option<Gallery>> {
        let tables = self.tables.read();
        Ok(tables
            .galleries
            .iter()
            .filter(|g| g.name == name)
            .min_by_key(|g| g.id)
            .map(|g| tables.hydrate(g)))
    }

    async fn list_galleries(&self, query: &GalleryQuery) -> Result<Vec<Gallery>> {
        let mut galleries = self.tables.read().matching(query);
        galleries.sort_by(|a, b| query.ordering(a, b));

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit()).unwrap_or(usize::MAX);
        Ok(galleries.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_galleries(&self, query: &GalleryQuery) -> Result<u64> {
        Ok(self.tables.read().matching(query).len() as u64)
    }

    async fn gallery_keywords(&self, gallery_id: i64) -> Result<Vec<GalleryKeyword>> {
        Ok(self
            .tables
            .read()
            .keywords
            .iter()
            .filter(|k| k.gallery_id == gallery_id)
            .cloned()
            .collect())
    }

    async fn count_children(&self, gallery_id: i64) -> Result<u64> {
        Ok(self.tables.read().children_of(gallery_id) as u64)
    }

    async fn count_items(&self, gallery_id: i64) -> Result<u64> {
        Ok(self
            .tables
            .read()
            .items
            .iter()
            .filter(|i| i.gallery_id == gallery_id)
            .count() as u64)
    }

    async fn find_keyword(
        &self,
        gallery_id: i64,
        keyword_id: i64,
    ) -> Result<Option<GalleryKeyword>> {
        Ok(self
            .tables
            .read()
            .keywords
            .iter()
            .find(|k| k.id == keyword_id && k.gallery_id == gallery_id)
            .cloned())
    }

    async fn update_keyword(
        &self,
        gallery_id: i64,
        keyword_id: i64,
        input: &UpdateGalleryKeyword,
    ) -> Result<Option<GalleryKeyword>> {
        let mut tables = self.tables.write();
        let Some(keyword) = tables
            .keywords
            .iter_mut()
            .find(|k| k.id == keyword_id && k.gallery_id == gallery_id)
        else {
            return Ok(None);
        };
        keyword.keyword = input.normalized().to_string();
        Ok(Some(keyword.clone()))
    }

    async fn delete_keyword(&self, gallery_id: i64, keyword_id: i64) -> Result<bool> {
        let mut tables = self.tables.write();
        let before = tables.keywords.len();
        tables
            .keywords
            .retain(|k| !(k.id == keyword_id && k.gallery_id == gallery_id));
        Ok(tables.keywords.len() < before)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::query::SortDirection;

    fn gallery(id: i64, parent_id: Option<i64>, position: i32) -> Gallery {
        Gallery {
            id,
            name: format!("Gallery {id}"),
            description: None,
            slug: format!("g{id}"),
            position,
            hidden: false,
            external: false,
            parent_id,
            children_count: 0,
            keywords: None,
        }
    }

    fn store() -> MemoryGalleryStore {
        let store = MemoryGalleryStore::new();
        store.insert_gallery(gallery(1, None, 2));
        store.insert_gallery(gallery(2, None, 1));
        store.insert_gallery(gallery(3, Some(1), 1));
        store.insert_gallery(Gallery {
            hidden: true,
            ..gallery(4, Some(1), 2)
        });
        store
    }

    #[tokio::test]
    async fn children_count_is_live() {
        let store = store();
        let g1 = store.find_gallery(1).await.unwrap().unwrap();
        assert_eq!(g1.children_count, 2);
        assert_eq!(store.count_children(1).await.unwrap(), 2);
        assert_eq!(store.count_children(2).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn listing_orders_and_paginates() {
        let store = store();
        let query = GalleryQuery::builder()
            .parent(ParentScope::Top)
            .direction(SortDirection::Desc)
            .build()
            .unwrap();
        let ids: Vec<i64> = store
            .list_galleries(&query)
            .await
            .unwrap()
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);

        let query = GalleryQuery::builder().offset(1).limit(1).build().unwrap();
        let page = store.list_galleries(&query).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(store.count_galleries(&query).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn bottom_level_uses_live_children() {
        let store = store();
        let query = GalleryQuery::builder()
            .parent(ParentScope::Childless)
            .build()
            .unwrap();
        let mut ids: Vec<i64> = store
            .list_galleries(&query)
            .await
            .unwrap()
            .iter()
            .map(|g| g.id)
            .collect();
        ids.sort_unstable();
        // Gallery 4 is childless but hidden.
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn keyword_writes_are_scoped_to_gallery() {
        let store = store();
        store.insert_keyword(GalleryKeyword {
            id: 10,
            gallery_id: 3,
            keyword: "sunset".to_string(),
        });

        assert!(store.find_keyword(1, 10).await.unwrap().is_none());
        let input = UpdateGalleryKeyword {
            keyword: " dusk ".to_string(),
        };
        assert!(store.update_keyword(1, 10, &input).await.unwrap().is_none());
        let updated = store.update_keyword(3, 10, &input).await.unwrap().unwrap();
        assert_eq!(updated.keyword, "dusk");

        assert!(!store.delete_keyword(1, 10).await.unwrap());
        assert!(store.delete_keyword(3, 10).await.unwrap());
        assert!(store.gallery_keywords(3).await.unwrap().is_empty());
    }
}

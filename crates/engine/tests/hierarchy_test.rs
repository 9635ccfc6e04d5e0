#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Hierarchy navigation integration tests.
//!
//! Ancestor walks, breadcrumb trails and paths over the scenario forest,
//! plus the malformed-forest cases.

mod common;

use std::sync::Arc;

use gallery_engine::hierarchy::DEFAULT_BREADCRUMB_SEPARATOR;
use gallery_engine::query::ParentScope;
use gallery_engine::{
    GalleryQuery, GalleryRepository, GalleryTagError, HierarchyNavigator, MemoryGalleryStore,
    RenderContext, SortDirection,
};
use gallery_test_utils::{ids, scenario_store, test_gallery, test_item};

use common::gallery;

fn navigator() -> HierarchyNavigator {
    HierarchyNavigator::new(scenario_store())
}

// -------------------------------------------------------------------------
// Ancestors and paths
// -------------------------------------------------------------------------

#[tokio::test]
async fn ancestors_nearest_first() {
    let store = MemoryGalleryStore::new();
    store.insert_gallery(test_gallery(1, "Root").build());
    store.insert_gallery(test_gallery(2, "Middle").child_of(1).build());
    store.insert_gallery(test_gallery(3, "Leaf").child_of(2).build());
    let store = Arc::new(store);
    let navigator = HierarchyNavigator::new(store.clone());
    let leaf = GalleryRepository::new(store)
        .find_by_id(3)
        .await
        .unwrap()
        .unwrap();

    let names: Vec<String> = navigator
        .ancestors(&leaf, None)
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Middle", "Root"]);

    // The base gallery is included and ends the walk.
    let names: Vec<String> = navigator
        .ancestors(&leaf, Some(2))
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Middle"]);

    assert_eq!(navigator.path(&leaf, None).await.unwrap(), "root/middle/leaf");
    assert_eq!(navigator.path(&leaf, Some(2)).await.unwrap(), "leaf");
}

#[tokio::test]
async fn top_level_gallery_has_no_ancestors() {
    let a = gallery(ids::A).await;
    assert!(navigator().ancestors(&a, None).await.unwrap().is_empty());
    assert!(navigator().ancestors(&a, Some(ids::A)).await.unwrap().is_empty());
}

#[tokio::test]
async fn dangling_parent_ends_the_walk() {
    let store = MemoryGalleryStore::new();
    store.insert_gallery(test_gallery(2, "Orphan").child_of(99).build());
    let orphan = test_gallery(2, "Orphan").child_of(99).build();

    let navigator = HierarchyNavigator::new(Arc::new(store));
    assert!(navigator.ancestors(&orphan, None).await.unwrap().is_empty());
    assert_eq!(navigator.path(&orphan, None).await.unwrap(), "orphan");
}

#[tokio::test]
async fn cycles_are_reported() {
    let store = MemoryGalleryStore::new();
    store.insert_gallery(test_gallery(1, "One").child_of(2).build());
    store.insert_gallery(test_gallery(2, "Two").child_of(1).build());
    let one = test_gallery(1, "One").child_of(2).build();

    let err = HierarchyNavigator::new(Arc::new(store))
        .ancestors(&one, None)
        .await
        .unwrap_err();
    assert_eq!(err.as_tag_error(), Some(&GalleryTagError::HierarchyCycle(1)));
}

#[tokio::test]
async fn breadcrumb_trail_paths() {
    let c = gallery(ids::C).await;
    let trail = navigator().breadcrumb_trail(&c, None).await.unwrap();
    let crumbs: Vec<(&str, &str)> = trail
        .iter()
        .map(|crumb| (crumb.gallery.name.as_str(), crumb.path.as_str()))
        .collect();
    assert_eq!(crumbs, vec![("A", "a"), ("C", "a/c")]);
}

#[tokio::test]
async fn breadcrumbs_with_custom_renderer() {
    let c = gallery(ids::C).await;
    let output = navigator()
        .breadcrumbs_with(&c, None, DEFAULT_BREADCRUMB_SEPARATOR, |crumb| {
            crumb.gallery.name.to_lowercase()
        })
        .await
        .unwrap();
    assert_eq!(output, "a &gt; c");
}

// -------------------------------------------------------------------------
// Children and items
// -------------------------------------------------------------------------

#[tokio::test]
async fn child_and_item_counts() {
    let navigator = navigator();
    let a = gallery(ids::A).await;
    let b = gallery(ids::B).await;

    assert!(navigator.has_children(&a).await.unwrap());
    assert_eq!(navigator.children_count(&a).await.unwrap(), 3);
    assert!(!navigator.has_children(&b).await.unwrap());

    assert!(navigator.has_items(&b).await.unwrap());
    assert_eq!(navigator.items_count(&b).await.unwrap(), 1);
    assert!(!navigator.has_items(&a).await.unwrap());
}

// -------------------------------------------------------------------------
// End to end
// -------------------------------------------------------------------------

#[tokio::test]
async fn three_gallery_scenario() {
    let store = MemoryGalleryStore::new();
    store.insert_gallery(test_gallery(1, "A").at(1).build());
    store.insert_gallery(test_gallery(2, "B").child_of(1).at(1).build());
    store.insert_gallery(test_gallery(3, "C").child_of(1).at(2).build());
    store.insert_keyword(gallery_test_utils::test_keyword(1, 2, "sunset"));
    store.insert_keyword(gallery_test_utils::test_keyword(2, 3, "rain"));
    store.insert_item(test_item(1, 3));
    let store = Arc::new(store);

    let repository = GalleryRepository::new(store.clone());
    let navigator = HierarchyNavigator::new(store);

    let top = GalleryQuery::builder()
        .parent(ParentScope::Top)
        .build()
        .unwrap();
    let names: Vec<String> = repository
        .list(&top)
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["A"]);

    let a = repository.find_by_id(1).await.unwrap().unwrap();
    let children = repository
        .children_of(
            &a,
            GalleryQuery::builder()
                .sort_by("position")
                .direction(SortDirection::Asc),
        )
        .await
        .unwrap();
    let names: Vec<&str> = children.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["B", "C"]);

    let sunset = GalleryQuery::builder().keywords(["sunset"]).build().unwrap();
    let names: Vec<String> = repository
        .list(&sunset)
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["B"]);

    let c = repository.find_by_id(3).await.unwrap().unwrap();
    let context = RenderContext::new("/").with_current_gallery(c.clone());
    let crumbs = navigator
        .breadcrumbs(&c, &context, DEFAULT_BREADCRUMB_SEPARATOR)
        .await
        .unwrap();
    assert_eq!(crumbs, r#"<a href="/a">A</a> &gt; C"#);
}

//! Gallery Engine Library
//!
//! Query, filtering, ordering and hierarchy traversal for nested photo
//! galleries, plus the gallery tag family that renders them.
//! The `gallery` binary is a thin CLI over the same services.

pub mod admin;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod helpers;
pub mod hierarchy;
pub mod keywords;
pub mod models;
pub mod query;
pub mod repository;
pub mod store;
pub mod tags;

pub use config::{Config, EngineSettings};
pub use context::{RenderContext, Scope};
pub use error::{GalleryTagError, RenderError, RenderResult};
pub use hierarchy::HierarchyNavigator;
pub use keywords::KeywordIndex;
pub use models::{Gallery, GalleryItem, GalleryKeyword};
pub use query::{GalleryQuery, Level, SortDirection, SortField};
pub use repository::GalleryRepository;
pub use store::{GalleryStore, MemoryGalleryStore, PgGalleryStore};
pub use tags::{Engine, Node, Renderer, TagRegistry};

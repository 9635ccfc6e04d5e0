//! Gallery data models.

pub mod gallery;
pub mod item;
pub mod keyword;

pub use gallery::Gallery;
pub use item::GalleryItem;
pub use keyword::{GalleryKeyword, KeywordFieldError, UpdateGalleryKeyword};

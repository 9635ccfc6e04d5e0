//! Gallery keyword administration.
//!
//! The write side of the keyword association: edit, update and destroy a
//! single keyword addressed by `(gallery_id, keyword_id)`. Each operation
//! returns an [`AdminOutcome`] describing what the caller should do next;
//! routing, sessions and flash messages belong to the host application.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{GalleryKeyword, KeywordFieldError, UpdateGalleryKeyword};
use crate::store::GalleryStore;

/// Listing the admin falls back to when a keyword cannot be found.
pub const GALLERIES_PATH: &str = "/admin/galleries";

/// Result of a keyword admin operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdminOutcome {
    /// Show the edit form for this keyword.
    Edit { keyword: GalleryKeyword },
    /// The keyword was saved.
    Saved { redirect: String },
    /// Validation failed; show the form again with the submitted input.
    Invalid {
        errors: Vec<KeywordFieldError>,
        input: String,
    },
    /// The keyword was deleted.
    Removed { redirect: String },
    /// No keyword with that id belongs to the gallery.
    NotFound { redirect: String },
}

impl AdminOutcome {
    /// Where the caller should redirect, if anywhere.
    pub fn redirect(&self) -> Option<&str> {
        match self {
            AdminOutcome::Saved { redirect }
            | AdminOutcome::Removed { redirect }
            | AdminOutcome::NotFound { redirect } => Some(redirect),
            AdminOutcome::Edit { .. } | AdminOutcome::Invalid { .. } => None,
        }
    }
}

/// Path of a gallery's edit page.
pub fn gallery_edit_path(gallery_id: i64) -> String {
    format!("{GALLERIES_PATH}/{gallery_id}/edit")
}

/// Path of a keyword's edit page.
pub fn keyword_edit_path(gallery_id: i64, keyword_id: i64) -> String {
    format!("{GALLERIES_PATH}/{gallery_id}/keywords/{keyword_id}/edit")
}

fn not_found(gallery_id: i64, keyword_id: i64) -> AdminOutcome {
    warn!(gallery_id, keyword_id, "gallery keyword not found");
    AdminOutcome::NotFound {
        redirect: GALLERIES_PATH.to_string(),
    }
}

/// Keyword CRUD over a [`GalleryStore`].
#[derive(Clone)]
pub struct KeywordAdmin {
    store: Arc<dyn GalleryStore>,
}

impl KeywordAdmin {
    pub fn new(store: Arc<dyn GalleryStore>) -> Self {
        Self { store }
    }

    /// Load a keyword for its edit form.
    pub async fn edit(&self, gallery_id: i64, keyword_id: i64) -> Result<AdminOutcome> {
        match self.store.find_keyword(gallery_id, keyword_id).await? {
            Some(keyword) => Ok(AdminOutcome::Edit { keyword }),
            None => Ok(not_found(gallery_id, keyword_id)),
        }
    }

    /// Validate and save a keyword.
    ///
    /// With `continue_editing` the caller is sent back to the keyword's own
    /// form, otherwise to the owning gallery.
    pub async fn update(
        &self,
        gallery_id: i64,
        keyword_id: i64,
        input: UpdateGalleryKeyword,
        continue_editing: bool,
    ) -> Result<AdminOutcome> {
        if self.store.find_keyword(gallery_id, keyword_id).await?.is_none() {
            return Ok(not_found(gallery_id, keyword_id));
        }

        if let Err(errors) = input.validate() {
            info!(gallery_id, keyword_id, errors = errors.len(), "rejected keyword update");
            return Ok(AdminOutcome::Invalid {
                errors,
                input: input.keyword,
            });
        }

        let normalized = UpdateGalleryKeyword {
            keyword: input.normalized().to_string(),
        };
        let Some(saved) = self
            .store
            .update_keyword(gallery_id, keyword_id, &normalized)
            .await?
        else {
            // Deleted between the lookup and the write.
            return Ok(not_found(gallery_id, keyword_id));
        };

        info!(gallery_id, keyword_id, keyword = %saved.keyword, "gallery keyword updated");
        let redirect = if continue_editing {
            keyword_edit_path(gallery_id, keyword_id)
        } else {
            gallery_edit_path(gallery_id)
        };
        Ok(AdminOutcome::Saved { redirect })
    }

    /// Delete a keyword.
    pub async fn destroy(&self, gallery_id: i64, keyword_id: i64) -> Result<AdminOutcome> {
        if !self.store.delete_keyword(gallery_id, keyword_id).await? {
            return Ok(not_found(gallery_id, keyword_id));
        }
        info!(gallery_id, keyword_id, "gallery keyword deleted");
        Ok(AdminOutcome::Removed {
            redirect: GALLERIES_PATH.to_string(),
        })
    }
}

//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

use crate::hierarchy::DEFAULT_BREADCRUMB_SEPARATOR;
use crate::keywords::DEFAULT_KEYWORD_SEPARATOR;
use crate::query::DEFAULT_LIMIT;

/// Settings the tag family reads while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Row limit for listings without a `limit` attribute (default: 9999).
    pub default_limit: u64,

    /// Separator between breadcrumbs (default: ` &gt; `).
    pub breadcrumb_separator: String,

    /// Separator between keywords (default: a single space).
    pub keyword_separator: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            breadcrumb_separator: DEFAULT_BREADCRUMB_SEPARATOR.to_string(),
            keyword_separator: DEFAULT_KEYWORD_SEPARATOR.to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL. Only the CLI requires it.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 5).
    pub database_max_connections: u32,

    /// URL of the page that hosts the gallery tags (default: /).
    pub page_url: String,

    /// Gallery treated as the root of breadcrumbs and `level="current"`.
    pub base_gallery_id: Option<i64>,

    pub settings: EngineSettings,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let default_limit = lookup("GALLERY_DEFAULT_LIMIT")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("GALLERY_DEFAULT_LIMIT must be a valid u64")?
            .unwrap_or(DEFAULT_LIMIT);

        let breadcrumb_separator = lookup("GALLERY_BREADCRUMB_SEPARATOR")
            .unwrap_or_else(|| DEFAULT_BREADCRUMB_SEPARATOR.to_string());

        let keyword_separator = lookup("GALLERY_KEYWORD_SEPARATOR")
            .unwrap_or_else(|| DEFAULT_KEYWORD_SEPARATOR.to_string());

        let page_url = lookup("GALLERY_PAGE_URL").unwrap_or_else(|| "/".to_string());

        let base_gallery_id = lookup("GALLERY_BASE_ID")
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().parse::<i64>())
            .transpose()
            .context("GALLERY_BASE_ID must be a valid gallery id")?;

        Ok(Self {
            database_url,
            database_max_connections,
            page_url,
            base_gallery_id,
            settings: EngineSettings {
                default_limit,
                breadcrumb_separator,
                keyword_separator,
            },
        })
    }

    /// The database URL, or an error naming the missing variable.
    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL environment variable is required")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.page_url, "/");
        assert_eq!(config.base_gallery_id, None);
        assert_eq!(config.settings, EngineSettings::default());
        assert_eq!(config.settings.default_limit, 9999);
        assert_eq!(config.settings.breadcrumb_separator, " &gt; ");
        assert_eq!(config.settings.keyword_separator, " ");
        assert!(config.require_database_url().is_err());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/gallery"),
            ("GALLERY_DEFAULT_LIMIT", "50"),
            ("GALLERY_BREADCRUMB_SEPARATOR", " / "),
            ("GALLERY_PAGE_URL", "/photos/"),
            ("GALLERY_BASE_ID", "4"),
        ])
        .unwrap();
        assert_eq!(
            config.require_database_url().unwrap(),
            "postgres://localhost/gallery"
        );
        assert_eq!(config.settings.default_limit, 50);
        assert_eq!(config.settings.breadcrumb_separator, " / ");
        assert_eq!(config.page_url, "/photos/");
        assert_eq!(config.base_gallery_id, Some(4));
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(config(&[("GALLERY_DEFAULT_LIMIT", "lots")]).is_err());
        assert!(config(&[("GALLERY_BASE_ID", "root")]).is_err());
        assert!(config(&[("DATABASE_MAX_CONNECTIONS", "-1")]).is_err());
    }
}

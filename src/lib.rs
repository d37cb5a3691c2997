//! post-directory: a tag-filtered article directory for static sites
//!
//! Loads a pre-generated `index.json`, derives a tag cloud and renders a
//! date-sorted, filterable list of posts into a host page.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod i18n;
pub mod loader;
pub mod page;
pub mod render;
pub mod server;

use anyhow::Result;
use std::path::Path;
use std::time::Duration;

use config::{IndexSourceKind, WidgetConfig, DEFAULT_CONFIG_FILE};
use helpers::Location;
use loader::{FileSource, HttpSource, IndexLoader, IndexSource, LoadError};
use page::Page;

/// The post directory application
#[derive(Clone)]
pub struct Directory {
    /// Widget configuration
    pub config: WidgetConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (served) directory
    pub public_dir: std::path::PathBuf,
    /// UI labels
    pub i18n: i18n::I18n,
}

impl Directory {
    /// Create a new instance from a directory, reading `post-directory.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(DEFAULT_CONFIG_FILE);

        let config = if config_path.exists() {
            WidgetConfig::load(&config_path)?
        } else {
            WidgetConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Create an instance from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: WidgetConfig) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);

        let mut i18n = i18n::I18n::new(&config.language);
        i18n.load_languages(base_dir.join(&config.languages_dir))?;

        Ok(Self {
            config,
            base_dir,
            public_dir,
            i18n,
        })
    }

    /// Index source selected by the configuration
    pub fn source(&self) -> Box<dyn IndexSource> {
        match self.config.source {
            IndexSourceKind::Http => Box::new(HttpSource::new(
                &self.config.index_full_url(),
                Duration::from_secs(self.config.timeout_secs),
            )),
            IndexSourceKind::File => {
                Box::new(FileSource::new(self.public_dir.join(self.config.index_path())))
            }
        }
    }

    /// Loader wired to the configured source and labels
    pub fn loader(&self) -> IndexLoader<Box<dyn IndexSource>> {
        IndexLoader::new(self.source(), self.i18n.clone())
            .with_visible_count(self.config.visible_count)
    }

    /// Build the page for `location` and run the loader on it once
    pub fn render_page(
        &self,
        location: &Location,
    ) -> (Page, Result<Vec<content::Post>, LoadError>) {
        let mut page = Page::new(&self.config);
        let result = self.loader().init(&mut page, location);
        (page, result)
    }
}

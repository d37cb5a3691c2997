//! Widget configuration (post-directory.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Configuration file looked up in the base directory
pub const DEFAULT_CONFIG_FILE: &str = "post-directory.yml";

/// Where the post index is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndexSourceKind {
    /// Fetch `index_url` relative to `base_url`
    Http,
    /// Read `index_url` relative to `public_dir`
    #[default]
    File,
}

/// Main widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    // Page
    pub title: String,
    pub language: String,
    pub languages_dir: String,

    // Index
    pub index_url: String,
    pub source: IndexSourceKind,
    pub base_url: String,
    pub public_dir: String,
    pub timeout_secs: u64,

    // Tag navigation
    pub visible_count: usize,

    // Host containers
    pub tag_nav_id: String,
    pub posts_id: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            title: "Posts".to_string(),
            language: "en".to_string(),
            languages_dir: "languages".to_string(),

            index_url: "/index.json".to_string(),
            source: IndexSourceKind::File,
            base_url: "http://localhost:4000".to_string(),
            public_dir: "public".to_string(),
            timeout_secs: 30,

            visible_count: 5,

            tag_nav_id: "tag-nav".to_string(),
            posts_id: "posts".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl WidgetConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: WidgetConfig = serde_yaml::from_str(&content)?;
        if config.visible_count == 0 {
            anyhow::bail!("visible_count must be at least 1");
        }
        Ok(config)
    }

    /// Index location with the leading slash stripped, for joining onto a directory
    pub fn index_path(&self) -> &str {
        self.index_url.trim_start_matches('/')
    }

    /// Full URL of the index when fetched over HTTP
    pub fn index_full_url(&self) -> String {
        if self.index_url.starts_with("http://") || self.index_url.starts_with("https://") {
            return self.index_url.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.index_path()
        )
    }
}

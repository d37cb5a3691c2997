//! Index loading: fetch index.json, render both containers, report failure

mod source;

pub use source::{Fetched, FileSource, HttpSource, IndexSource, StaticSource, MAX_INDEX_BYTES};

use thiserror::Error;

use crate::content::{parse_entries, posts_of, IndexEntry, Post};
use crate::helpers::{html_escape, Location};
use crate::i18n::I18n;
use crate::page::Page;
use crate::render::{render_posts, render_tag_nav, VISIBLE_COUNT};

/// Failure to obtain the post index
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to load index.json")]
    Status { status: u16 },

    #[error("invalid index.json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to fetch index.json: {0}")]
    Transport(String),

    #[error("failed to read index.json: {0}")]
    Io(#[from] std::io::Error),
}

/// Bootstraps the page from a post index
pub struct IndexLoader<S> {
    source: S,
    i18n: I18n,
    visible_count: usize,
}

impl<S: IndexSource> IndexLoader<S> {
    pub fn new(source: S, i18n: I18n) -> Self {
        Self {
            source,
            i18n,
            visible_count: VISIBLE_COUNT,
        }
    }

    /// Override how many tags stay visible while collapsed
    pub fn with_visible_count(mut self, visible_count: usize) -> Self {
        self.visible_count = visible_count.max(1);
        self
    }

    /// Fetch and parse the index, keeping non-object elements in place
    pub fn load_entries(&self) -> Result<Vec<IndexEntry>, LoadError> {
        tracing::debug!("Fetching post index from {}", self.source.describe());

        let fetched = self.source.fetch()?;
        if !fetched.is_success() {
            return Err(LoadError::Status {
                status: fetched.status,
            });
        }

        let entries = parse_entries(&fetched.body)?;
        tracing::debug!("Loaded {} index entries", entries.len());
        Ok(entries)
    }

    /// Fetch and parse the index into posts
    ///
    /// Elements that are not objects carry no tags and no fields; they are
    /// dropped with a warning.
    pub fn load(&self) -> Result<Vec<Post>, LoadError> {
        Ok(posts_of(self.load_entries()?))
    }

    /// Load the index and render both containers of `page`
    ///
    /// On failure the posts container shows the error and the tag
    /// navigation is left as it was. The error is also returned.
    pub fn init(&self, page: &mut Page, location: &Location) -> Result<Vec<Post>, LoadError> {
        match self.load() {
            Ok(posts) => {
                render_tag_nav(
                    page.tag_nav_mut(),
                    &posts,
                    location,
                    &self.i18n,
                    self.visible_count,
                );
                render_posts(page.posts_mut(), &posts, location, &self.i18n);
                Ok(posts)
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", self.source.describe(), e);
                page.posts_mut().replace_content(self.error_html(&e));
                Err(e)
            }
        }
    }

    fn error_html(&self, error: &LoadError) -> String {
        format!(
            r#"<p class="loading">{}</p>"#,
            html_escape(&self.i18n.get_with("error.load_failed", &error.to_string()))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;

    const INDEX: &str = r#"[
        {"title": "Intro", "url": "/intro/", "date": "2024-01-01", "tags": ["rust"]},
        {"title": "Deep <dive>", "url": "/deep/", "date": "2024-03-01", "tags": "rust, web"}
    ]"#;

    fn loader(status: u16, body: &str) -> IndexLoader<StaticSource> {
        IndexLoader::new(StaticSource::new(status, body), I18n::default())
    }

    #[test]
    fn test_init_renders_both_containers() {
        let mut page = Page::new(&WidgetConfig::default());
        let posts = loader(200, INDEX)
            .init(&mut page, &Location::parse("/"))
            .unwrap();

        assert_eq!(posts.len(), 2);
        assert!(page.tag_nav().content().contains("rust (2)"));
        let list = page.posts().content();
        assert!(list.contains("Deep &lt;dive&gt;"));
        assert!(list.find("/deep/").unwrap() < list.find("/intro/").unwrap());
    }

    #[test]
    fn test_init_applies_query_filter() {
        let mut page = Page::new(&WidgetConfig::default());
        loader(200, INDEX)
            .init(&mut page, &Location::parse("/?tag=web"))
            .unwrap();

        assert!(page.posts().content().contains("/deep/"));
        assert!(!page.posts().content().contains("/intro/"));
        assert!(page.tag_nav().content().contains("tag visible active"));
    }

    #[test]
    fn test_http_500_shows_error_and_leaves_nav_empty() {
        let mut page = Page::new(&WidgetConfig::default());
        let result = loader(500, "").init(&mut page, &Location::parse("/"));

        assert!(matches!(result, Err(LoadError::Status { status: 500 })));
        assert_eq!(
            page.posts().content(),
            r#"<p class="loading">Failed to load: failed to load index.json</p>"#
        );
        assert!(page.tag_nav().is_empty());
    }

    #[test]
    fn test_invalid_json_is_load_error() {
        let mut page = Page::new(&WidgetConfig::default());
        let result = loader(200, "<html>oops</html>").init(&mut page, &Location::parse("/"));

        assert!(matches!(result, Err(LoadError::Parse(_))));
        assert!(page
            .posts()
            .content()
            .starts_with(r#"<p class="loading">Failed to load: invalid index.json"#));
        assert!(page.tag_nav().is_empty());
    }

    #[test]
    fn test_null_entry_is_dropped_under_filter() {
        let body = r#"[null, {"title": "A", "url": "/a/", "tags": "x"}]"#;
        let mut page = Page::new(&WidgetConfig::default());
        let posts = loader(200, body)
            .init(&mut page, &Location::parse("/?tag=x"))
            .unwrap();

        assert_eq!(posts.len(), 1);
        assert!(page.tag_nav().content().contains("x (1)"));
        assert!(page.posts().content().contains(r#"<a href="/a/">A</a>"#));
    }

    #[test]
    fn test_stray_entry_is_skipped_without_filter() {
        let body = r#"["stray", {"title": "A", "url": "/a/", "tags": "x"}, 42]"#;
        let mut page = Page::new(&WidgetConfig::default());
        let posts = loader(200, body)
            .init(&mut page, &Location::parse("/"))
            .unwrap();

        assert_eq!(posts.len(), 1);
        assert!(page.tag_nav().content().contains("x (1)"));
        let list = page.posts().content();
        assert_eq!(list.matches("dir-item").count(), 1);
        assert!(!list.contains("stray"));

        let entries = loader(200, body).load_entries().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].as_post().is_none());
    }

    #[test]
    fn test_error_text_is_escaped() {
        let error = LoadError::Transport("<img src=x onerror=alert(1)>".to_string());
        let html = loader(200, "[]").error_html(&error);
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_localized_error() {
        let mut page = Page::new(&WidgetConfig::default());
        let _ = IndexLoader::new(StaticSource::new(404, ""), I18n::new("zh-CN"))
            .init(&mut page, &Location::default());
        assert_eq!(
            page.posts().content(),
            r#"<p class="loading">加载失败：failed to load index.json</p>"#
        );
    }

    #[test]
    fn test_visible_count_override() {
        let mut page = Page::new(&WidgetConfig::default());
        IndexLoader::new(StaticSource::new(200, INDEX), I18n::default())
            .with_visible_count(1)
            .init(&mut page, &Location::default())
            .unwrap();
        assert!(page.tag_nav().content().contains("Expand all tags (2)"));
    }
}

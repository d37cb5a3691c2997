//! Host page with the containers the renderers write into

use crate::config::WidgetConfig;
use crate::helpers::html_escape;

/// Script reproducing the tag toggle in the browser
///
/// Mirrors `TagNav::toggle`: flips `collapsed` on the list, the button label
/// and `aria-expanded`. Labels come from the button's data attributes.
const TOGGLE_SCRIPT: &str = r#"<script>
(function() {
    var toggle = document.querySelector('.tag-toggle');
    var list = document.querySelector('.tags-list');
    if (!toggle || !list) return;
    toggle.addEventListener('click', function(e) {
        e.preventDefault();
        var expanded = toggle.getAttribute('aria-expanded') !== 'true';
        list.classList.toggle('collapsed', !expanded);
        toggle.textContent = expanded ? toggle.dataset.collapseLabel : toggle.dataset.expandLabel;
        toggle.setAttribute('aria-expanded', expanded ? 'true' : 'false');
    });
})();
</script>
"#;

/// An element identified by a fixed id whose content is replaced wholesale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    id: String,
    content: String,
}

impl Container {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            content: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Replace everything inside the container
    pub fn replace_content(&mut self, html: String) {
        self.content = html;
    }
}

/// The page hosting the widget
///
/// Both containers exist before anything is rendered; renderers only ever
/// replace their content.
#[derive(Debug, Clone)]
pub struct Page {
    title: String,
    language: String,
    tag_nav: Container,
    posts: Container,
}

impl Page {
    /// Create an empty page with the configured container ids
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            title: config.title.clone(),
            language: config.language.clone(),
            tag_nav: Container::new(&config.tag_nav_id),
            posts: Container::new(&config.posts_id),
        }
    }

    pub fn tag_nav(&self) -> &Container {
        &self.tag_nav
    }

    pub fn tag_nav_mut(&mut self) -> &mut Container {
        &mut self.tag_nav
    }

    pub fn posts(&self) -> &Container {
        &self.posts
    }

    pub fn posts_mut(&mut self) -> &mut Container {
        &mut self.posts
    }

    /// Look up a container by id
    pub fn container(&self, id: &str) -> Option<&Container> {
        [&self.tag_nav, &self.posts].into_iter().find(|c| c.id == id)
    }

    /// Serialize the page into a complete HTML document
    pub fn to_html(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="generator" content="post-directory {version}">
<title>{title}</title>
</head>
<body>
<nav id="{nav_id}">{nav}</nav>
<main id="{posts_id}">{posts}</main>
{script}</body>
</html>
"#,
            lang = html_escape(&self.language),
            version = env!("CARGO_PKG_VERSION"),
            title = html_escape(&self.title),
            nav_id = html_escape(self.tag_nav.id()),
            nav = self.tag_nav.content(),
            posts_id = html_escape(self.posts.id()),
            posts = self.posts.content(),
            script = TOGGLE_SCRIPT,
        )
    }
}

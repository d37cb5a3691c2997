//! Tag navigation: tag counts, visibility and the expand/collapse toggle

use crate::content::{tag_counts, Post};
use crate::helpers::url::tag_href;
use crate::helpers::{class_attr, html_escape, link_to, Location};
use crate::i18n::I18n;
use crate::page::Container;

/// Number of tags shown before the list is expanded
pub const VISIBLE_COUNT: usize = 5;

/// One rendered tag link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub tag: String,
    pub count: usize,
    /// Within the first `visible_count` entries
    pub visible: bool,
    /// Equal to the tag selected in the URL
    pub active: bool,
}

/// Tag navigation state for one page load
#[derive(Debug, Clone)]
pub struct TagNav {
    entries: Vec<TagEntry>,
    active_tag: Option<String>,
    expanded: bool,
    visible_count: usize,
}

impl TagNav {
    /// Count tags over `posts` and derive the initial state
    ///
    /// The list starts expanded only when the active tag would otherwise be
    /// hidden past the first `visible_count` entries.
    pub fn build(posts: &[Post], active_tag: Option<&str>, visible_count: usize) -> Self {
        let entries: Vec<TagEntry> = tag_counts(posts)
            .into_iter()
            .enumerate()
            .map(|(idx, tc)| TagEntry {
                active: active_tag == Some(tc.tag.as_str()),
                visible: idx < visible_count,
                tag: tc.tag,
                count: tc.count,
            })
            .collect();

        let expanded = entries
            .iter()
            .position(|e| e.active)
            .is_some_and(|idx| idx >= visible_count);

        Self {
            entries,
            active_tag: active_tag.map(str::to_string),
            expanded,
            visible_count,
        }
    }

    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    pub fn active_tag(&self) -> Option<&str> {
        self.active_tag.as_deref()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Number of distinct tags
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// The toggle only exists when some tags can be hidden
    pub fn has_toggle(&self) -> bool {
        self.total() > self.visible_count
    }

    /// Flip between expanded and collapsed, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Label of the toggle button for the current state
    pub fn toggle_label(&self, i18n: &I18n) -> String {
        if self.expanded {
            i18n.get("nav.collapse")
        } else {
            i18n.get_count("nav.expand", self.total())
        }
    }

    /// Render the navigation markup
    pub fn render(&self, i18n: &I18n) -> String {
        let all_class = if self.active_tag.is_none() { "active" } else { "" };
        let mut html = link_to("./", &[all_class], &html_escape(&i18n.get("nav.all")));

        if self.entries.is_empty() {
            return html;
        }

        let list_class = if self.expanded { "" } else { "collapsed" };
        html.push_str(&format!(
            r#"<div class="{}">"#,
            class_attr(&["tags-list", list_class])
        ));

        for entry in &self.entries {
            let label = format!("{} ({})", entry.tag, entry.count);
            html.push_str(&link_to(
                &tag_href(&entry.tag),
                &[
                    "tag",
                    if entry.visible { "visible" } else { "" },
                    if entry.active { "active" } else { "" },
                ],
                &html_escape(&label),
            ));
        }

        html.push_str("</div>");

        if self.has_toggle() {
            html.push_str(&format!(
                r#"<button type="button" class="tag-toggle" aria-expanded="{}" data-expand-label="{}" data-collapse-label="{}">{}</button>"#,
                self.expanded,
                html_escape(&i18n.get_count("nav.expand", self.total())),
                html_escape(&i18n.get("nav.collapse")),
                html_escape(&self.toggle_label(i18n)),
            ));
        }

        html
    }
}

/// Render the tag navigation into its container, replacing prior content
pub fn render_tag_nav(
    container: &mut Container,
    posts: &[Post],
    location: &Location,
    i18n: &I18n,
    visible_count: usize,
) -> TagNav {
    let active_tag = location.active_tag();
    let nav = TagNav::build(posts, active_tag.as_deref(), visible_count);

    tracing::debug!(
        "Rendering {} tags (active: {:?}, expanded: {})",
        nav.total(),
        nav.active_tag(),
        nav.is_expanded()
    );

    container.replace_content(nav.render(i18n));
    nav
}

//! Article directory: filtered, date-sorted post list

use crate::content::{extract_tags, Post};
use crate::helpers::{html_escape, Location};
use crate::i18n::I18n;
use crate::page::Container;

/// Posts carrying `filter`, or all posts when there is no filter
pub fn filter_posts<'a>(posts: &'a [Post], filter: Option<&str>) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|post| match filter {
            None => true,
            Some(tag) => extract_tags(Some(*post)).iter().any(|t| t == tag),
        })
        .collect()
}

/// Newest first by date text; undated posts go last, ties keep index order
pub fn sort_by_date_desc(posts: &mut [&Post]) {
    posts.sort_by(|a, b| b.sort_key().cmp(a.sort_key()));
}

fn directory(title: &str, list_class: &str, items: &str) -> String {
    format!(
        r#"<div class="directory"><h2 class="dir-title">{}</h2><div class="{}">{}</div></div>"#,
        html_escape(title),
        list_class,
        items
    )
}

/// Render the directory markup for `posts` under `filter`
pub fn render_post_list(posts: &[Post], filter: Option<&str>, i18n: &I18n) -> String {
    render_directory(filter_posts(posts, filter), i18n)
}

/// Directory markup for posts that already passed the filter
fn render_directory(mut shown: Vec<&Post>, i18n: &I18n) -> String {
    let title = i18n.get("directory.title");

    if shown.is_empty() {
        return directory(
            &title,
            "dir-list loading",
            &html_escape(&i18n.get("directory.empty")),
        );
    }

    sort_by_date_desc(&mut shown);

    let mut items = String::new();
    for post in shown {
        items.push_str(&format!(
            r#"<div class="dir-item"><a href="{}">{}</a><span class="meta">{}</span></div>"#,
            post.url.as_deref().unwrap_or_default(),
            html_escape(post.title.as_deref().unwrap_or_default()),
            html_escape(post.sort_key()),
        ));
    }

    directory(&title, "dir-list", &items)
}

/// Render the directory into its container, replacing prior content
///
/// Returns the number of posts shown.
pub fn render_posts(
    container: &mut Container,
    posts: &[Post],
    location: &Location,
    i18n: &I18n,
) -> usize {
    let filter = location.active_tag();
    let shown = filter_posts(posts, filter.as_deref());
    let count = shown.len();

    tracing::debug!(
        "Rendering {} of {} posts (filter: {:?})",
        count,
        posts.len(),
        filter
    );

    container.replace_content(render_directory(shown, i18n));
    count
}

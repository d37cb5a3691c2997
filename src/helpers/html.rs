//! HTML helper functions

use std::fmt::Display;

/// Escape HTML special characters
///
/// Any displayable value is accepted and converted to its string form first.
///
/// # Examples
/// ```
/// use post_directory::helpers::html_escape;
/// assert_eq!(html_escape("<b>"), "&lt;b&gt;");
/// assert_eq!(html_escape(&42), "42");
/// ```
pub fn html_escape<T: Display + ?Sized>(value: &T) -> String {
    let s = value.to_string();
    let mut escaped = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

/// Join class names, skipping empty ones
pub fn class_attr(classes: &[&str]) -> String {
    classes
        .iter()
        .filter(|c| !c.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate an anchor tag
///
/// `href` is inserted verbatim, `text` must already be escaped.
///
/// # Examples
/// ```ignore
/// link_to("?tag=rust", &["tag", "active"], "rust (3)")
/// // -> <a href="?tag=rust" class="tag active">rust (3)</a>
/// ```
pub fn link_to(href: &str, classes: &[&str], text: &str) -> String {
    let class = class_attr(classes);
    if class.is_empty() {
        format!(r#"<a href="{}">{}</a>"#, href, text)
    } else {
        format!(r#"<a href="{}" class="{}">{}</a>"#, href, class, text)
    }
}

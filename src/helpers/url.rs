//! URL helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped by the browser's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Query parameter carrying the active tag
pub const TAG_PARAM: &str = "tag";

/// Encode a single URL component
///
/// # Examples
/// ```
/// use post_directory::helpers::encode_uri_component;
/// assert_eq!(encode_uri_component("c++ & rust"), "c%2B%2B%20%26%20rust");
/// ```
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Decode a form-encoded query component (`+` is a space)
fn decode_query_component(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Build the href selecting a tag, relative to the current page
pub fn tag_href(tag: &str) -> String {
    format!("?{}={}", TAG_PARAM, encode_uri_component(tag))
}

/// The URL the page was opened with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Path without query or fragment
    pub path: String,
    /// Raw query string without the leading `?`
    pub query: String,
}

impl Location {
    /// Split a request target such as `/posts/?tag=rust#top`
    pub fn parse(target: &str) -> Self {
        let target = target.split('#').next().unwrap_or_default();
        match target.split_once('?') {
            Some((path, query)) => Self {
                path: path.to_string(),
                query: query.to_string(),
            },
            None => Self {
                path: target.to_string(),
                query: String::new(),
            },
        }
    }

    /// First value of a query parameter, decoded
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .find_map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_query_component(key) == name).then(|| decode_query_component(value))
            })
    }

    /// The tag selected through the query, if any
    ///
    /// An empty `tag=` counts as no selection.
    pub fn active_tag(&self) -> Option<String> {
        self.query_param(TAG_PARAM).filter(|tag| !tag.is_empty())
    }
}

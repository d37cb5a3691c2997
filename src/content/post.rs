//! Post model as found in index.json

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One entry of the post index
///
/// Fields are read leniently: scalars of any JSON type keep their text form
/// and missing fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,

    /// Link to the post, trusted as-is
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,

    /// Publication date, compared as text
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,

    /// Raw tag field: an array, a comma separated string, or anything else
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub tags: Value,

    /// Fields the renderer does not use
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Post {
    /// Create a post with the fields the renderer uses
    pub fn new(title: &str, url: &str, date: Option<&str>) -> Self {
        Self {
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            date: date.map(str::to_string),
            ..Self::default()
        }
    }

    /// Set the raw tag field
    pub fn with_tags(mut self, tags: Value) -> Self {
        self.tags = tags;
        self
    }

    /// Date used for ordering, empty when missing
    pub fn sort_key(&self) -> &str {
        self.date.as_deref().unwrap_or_default()
    }

    /// Problems that make this entry render incompletely
    pub fn problems(&self) -> Vec<&'static str> {
        let mut problems = Vec::new();
        if self.title.is_none() {
            problems.push("missing title");
        }
        if self.url.is_none() {
            problems.push("missing url");
        }
        if !matches!(self.tags, Value::Null | Value::Array(_) | Value::String(_)) {
            problems.push("tags is neither an array nor a string");
        }
        problems
    }
}

/// Text form of a JSON scalar; `null` has none
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => scalar_text(&value),
    })
}

/// One element of the index array
#[derive(Debug, Clone, PartialEq)]
pub enum IndexEntry {
    /// An object, read as a post
    Post(Post),
    /// `null` or any other non-object element
    Stray(Value),
}

impl IndexEntry {
    pub fn as_post(&self) -> Option<&Post> {
        match self {
            IndexEntry::Post(post) => Some(post),
            IndexEntry::Stray(_) => None,
        }
    }
}

/// Parse the body of index.json, keeping every element in position
///
/// Only a body that is not a JSON array is an error.
pub fn parse_entries(body: &str) -> serde_json::Result<Vec<IndexEntry>> {
    let values: Vec<Value> = serde_json::from_str(body)?;
    values
        .into_iter()
        .map(|value| match value {
            Value::Object(_) => serde_json::from_value(value).map(IndexEntry::Post),
            other => Ok(IndexEntry::Stray(other)),
        })
        .collect()
}

/// Parse the body of index.json into posts, skipping non-object elements
pub fn parse_index(body: &str) -> serde_json::Result<Vec<Post>> {
    Ok(posts_of(parse_entries(body)?))
}

/// Posts of `entries`, in order; stray elements are logged and dropped
pub fn posts_of(entries: Vec<IndexEntry>) -> Vec<Post> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            IndexEntry::Post(post) => Some(post),
            IndexEntry::Stray(value) => {
                tracing::warn!(
                    "Skipping index.json entry #{}: not an object ({})",
                    index,
                    value
                );
                None
            }
        })
        .collect()
}

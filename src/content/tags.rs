//! Tag extraction and counting

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::post::{scalar_text, Post};

/// A distinct tag and the number of posts carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Normalize a post's tag field into tag strings, in source order
///
/// Arrays are taken element by element, strings are split on commas with
/// blank pieces dropped. Anything else yields no tags.
pub fn extract_tags(post: Option<&Post>) -> Vec<String> {
    let Some(post) = post else {
        return Vec::new();
    };

    match &post.tags {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Count tags over all posts, most used first, ties by name
pub fn tag_counts(posts: &[Post]) -> Vec<TagCount> {
    let mut tags: HashMap<String, usize> = HashMap::new();

    for post in posts {
        for tag in extract_tags(Some(post)) {
            *tags.entry(tag).or_insert(0) += 1;
        }
    }

    let mut sorted: Vec<TagCount> = tags
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));

    tracing::debug!("Counted {} distinct tags", sorted.len());
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_with(tags: Value) -> Post {
        Post::new("T", "/t/", None).with_tags(tags)
    }

    #[test]
    fn test_extract_from_string() {
        assert_eq!(
            extract_tags(Some(&post_with(json!("a, b ,c")))),
            vec!["a", "b", "c"]
        );
        assert_eq!(extract_tags(Some(&post_with(json!(" , x,, ")))), vec!["x"]);
    }

    #[test]
    fn test_extract_from_array_unchanged() {
        assert_eq!(
            extract_tags(Some(&post_with(json!(["x", "y"])))),
            vec!["x", "y"]
        );
        assert_eq!(
            extract_tags(Some(&post_with(json!([" spaced ", "y"])))),
            vec![" spaced ", "y"]
        );
    }

    #[test]
    fn test_extract_missing_or_unsupported() {
        assert!(extract_tags(None).is_empty());
        assert!(extract_tags(Some(&post_with(Value::Null))).is_empty());
        assert!(extract_tags(Some(&post_with(json!(42)))).is_empty());
        assert!(extract_tags(Some(&post_with(json!(true)))).is_empty());
        assert!(extract_tags(Some(&post_with(json!({"a": 1})))).is_empty());
    }

    #[test]
    fn test_extract_coerces_scalar_elements() {
        assert_eq!(
            extract_tags(Some(&post_with(json!(["a", 2, null, ["b"]])))),
            vec!["a", "2"]
        );
    }

    #[test]
    fn test_tag_counts_order() {
        let posts = vec![
            post_with(json!(["B", "A", "C"])),
            post_with(json!("A, B")),
            post_with(json!(["B", "A"])),
        ];

        let counts = tag_counts(&posts);
        assert_eq!(
            counts,
            vec![
                TagCount { tag: "A".to_string(), count: 3 },
                TagCount { tag: "B".to_string(), count: 3 },
                TagCount { tag: "C".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_tag_counts_case_sensitive() {
        let posts = vec![post_with(json!(["rust", "Rust"]))];
        let counts = tag_counts(&posts);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].tag, "Rust");
    }
}

//! Content module - the post index entries and their tags

mod post;
pub mod tags;

pub use post::{parse_entries, parse_index, posts_of, IndexEntry, Post};
pub use tags::{extract_tags, tag_counts, TagCount};

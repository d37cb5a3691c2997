//! Renderers writing into the page containers

pub mod post_list;
pub mod tag_nav;

pub use post_list::{filter_posts, render_post_list, render_posts, sort_by_date_desc};
pub use tag_nav::{render_tag_nav, TagEntry, TagNav, VISIBLE_COUNT};

//! Helper functions for rendering
//!
//! HTML escaping and URL handling shared by the renderers.

mod html;
pub mod url;

pub use html::*;
pub use url::{encode_uri_component, Location};

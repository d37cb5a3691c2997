//! CLI command implementations

pub mod check;
pub mod render;
pub mod tags;

//! Tables of contents.
//!
//! Building one is three steps: [`scan_headings`] finds the article's headings (giving ids to those without one),
//! [`build_outline`] turns that flat list into a well-formed hierarchy, and [`render_outline`] turns the hierarchy back
//! into document nodes.
mod builder;
mod headings;
mod render;

pub use builder::*;
pub use headings::*;
pub use render::*;

//! The passes that resolve a page's references: included articles, footnotes, and wiki links.
//!
//! Each pass mutates the page in place and returns a small report of what it did. Problems that only affect one
//! reference (an unknown include title, a dangling link) never fail a pass; they're logged and reported.
mod footnotes;
mod includes;
mod links;
mod uri;

pub use footnotes::*;
pub use includes::*;
pub use links::*;
pub use uri::*;

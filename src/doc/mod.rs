//! The document tree and the page metadata that the post-processing passes work on.
//!
//! A [`Page`] is deserialized from the server's output, mutated in place by the passes in [`crate::pipeline`], and then
//! written out by [`crate::output`].
mod metadata;
mod plain_text;
mod tree;
pub mod walk;

pub use metadata::*;
pub use plain_text::*;
pub use tree::*;

/// A page together with its metadata, the unit that the CLI reads.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct PageInput {
    pub page: Page,
    #[serde(default)]
    pub metadata: PageMetadata,
}

#[cfg(test)]
mod tree_test_utils;
#[cfg(test)]
pub(crate) use tree_test_utils::*;

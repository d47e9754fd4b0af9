//! Post-processing for rendered wiki articles.
//!
//! A wiki server renders an article to a tree of nodes, and ships it as a [`doc::Page`] together with some
//! [metadata](doc::PageMetadata). This crate turns that page into its final form:
//!
//! - [include placeholders](doc::Include) get the included articles spliced in;
//! - inline [footnotes](doc::Footnote) move to the page's aside, leaving numbered marks behind;
//! - [tables of contents](doc::Toc) get filled with an outline of the article's headings;
//! - internal [links](doc::Link) become site paths, marked as available or missing.
//!
//! [`pipeline::Pipeline`] runs all of these in order. The [`run`] module wraps that up with reading and writing, the
//! way the `wikipage` CLI does it.
pub mod doc;
pub mod outline;
pub mod output;
pub mod pipeline;
pub mod resolve;
pub mod run;
mod util;

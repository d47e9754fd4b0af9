//! End-to-end runs.
//!
//! This module reads a page file, runs it through the [`crate::pipeline`], and writes it out with [`crate::output`].
//! It's what the CLI does, but it can also run within-process.
//!
//! ## Example
//!
//! ```
//! # use wikipage::run;
//!
//! // First, let's define a mocked I/O. Replace this with whatever you need.
//! #[derive(Default)]
//! struct MockIo {
//!     stdout: Vec<u8>,
//! }
//!
//! impl run::OsFacade for MockIo {
//!     fn read_stdin(&self) -> std::io::Result<String> {
//!         Ok(r#"{
//!             "page": {"article": {"id": 1, "body": [
//!                 {"kind": "element", "tag": "p", "children": [
//!                     {"kind": "link", "href": "hello", "children": [{"kind": "text", "value": "hi"}]}
//!                 ]}
//!             ]}},
//!             "metadata": {"link_targets": {"hello": {"canonical_title": "Hello", "article_id": 2}}}
//!         }"#
//!         .to_string())
//!     }
//!
//!     fn read_file(&self, path: &str) -> std::io::Result<String> {
//!         Err(std::io::Error::new(std::io::ErrorKind::NotFound, path))
//!     }
//!
//!     fn stdout(&mut self) -> impl std::io::Write {
//!         &mut self.stdout
//!     }
//!
//!     fn write_error(&mut self, err: run::Error) {
//!         eprintln!("{err}")
//!     }
//! }
//!
//! // Now, use it:
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let cli_options = run::RunOptions::default(); // HTML output, reading the page from "stdin"
//!
//! let mut os_facade = MockIo::default();
//! let processed = run::run(&cli_options, &mut os_facade);
//! let stdout_text = String::from_utf8(os_facade.stdout)?;
//!
//! assert_eq!(processed, true);
//! assert_eq!(
//!     stdout_text,
//!     concat!(
//!         "<article class=\"main\" data-article-id=\"1\">\n",
//!         "<p><a class=\"wiki-link available\" href=\"/Hello\">hi</a></p>\n",
//!         "</article>\n",
//!         "<aside></aside>\n",
//!     )
//! );
//! #
//! #     Ok(())
//! # }
//! ```
mod cli;
mod run_main;

pub use cli::*;
pub use run_main::*;

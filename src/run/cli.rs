use crate::pipeline::{PipelineOptions, DOWNLOADS_CLASS};
use clap::{Parser, ValueEnum};
use derive_builder::Builder;
use std::fmt::{Display, Formatter};

macro_rules! create_options_structs {
    (
        $(
            $(#[$meta:meta])*
            clap $clap:tt
            pub $name:ident : $ty:ty
        ),* $(,)?
    ) => {
        #[derive(Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Parser)]
        #[command(version, about, long_about = None)]
        #[doc(hidden)]
        pub struct CliOptions {
            $(
            $(#[$meta])*
            #[arg$clap]
            pub(crate) $name: $ty,
            )*

            // clap-only stuff:

            /// The page file to process, as JSON. If not provided, or if it's "-", standard input will be used.
            ///
            /// The file holds the page's tree and the metadata needed to resolve it:
            /// {"page": {...}, "metadata": {"include_titles": {...}, "link_targets": {...}}}
            #[arg()]
            pub(crate) page_file_path: Option<String>,
        }

        /// Options analogous to the wikipage CLI's switches.
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Builder)]
        pub struct RunOptions {
            $(
            $(#[$meta])*
            pub $name: $ty,
            )*

            /// The page file to read, or `None` (or `"-"`) for stdin.
            pub page_file_path: Option<String>,
        }

        impl From<CliOptions> for RunOptions {
            fn from(value: CliOptions) -> Self {
                Self {
                    $($name: value.$name,)*
                    page_file_path: value.page_file_path,
                }
            }
        }
    };
}

create_options_structs! {
    /// Specifies the output format. Defaults to HTML.
    clap(long, short, default_value_t = OutputFormat::Html)
    pub output: OutputFormat,

    /// Headings with this class are left out of tables of contents. Can be given more than once.
    clap(long = "toc-exclude", value_name = "CLASS", default_values_t = [DOWNLOADS_CLASS.to_string()])
    pub toc_exclude: Vec<String>,

    /// Quiet: do not print anything to stdout. The exit code will still be 0 if the page was processed, and non-0 if
    /// it couldn't be.
    clap(long, short)
    pub quiet: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output: OutputFormat::Html,
            toc_exclude: vec![DOWNLOADS_CLASS.to_string()],
            quiet: false,
            page_file_path: None,
        }
    }
}

impl From<&RunOptions> for PipelineOptions {
    fn from(cli: &RunOptions) -> Self {
        PipelineOptions {
            toc_exclude_classes: cli.toc_exclude.clone(),
        }
    }
}

/// Output formats, analogous to `--output` in the CLI.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum OutputFormat {
    /// Output the processed page as HTML: the main article, any included articles that weren't spliced in, and the
    /// aside with its footnotes.
    #[default]
    Html,

    /// Output the processed page as JSON, in the same shape as the input's "page" field.
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let self_str = match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        };
        f.write_str(self_str)
    }
}

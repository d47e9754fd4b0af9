use crate::doc::PageInput;
use crate::output::{write_json, HtmlWriter};
use crate::pipeline::{Pipeline, PipelineError};
use crate::run::cli::OutputFormat;
use crate::run::RunOptions;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::{env, io};

/// The run's overall possible error.
#[derive(Debug)]
pub enum Error {
    /// The page file isn't a valid page.
    PageParse(serde_json::Error),

    /// Couldn't read the page file.
    FileReadError(Input, io::Error),

    /// The page couldn't be processed.
    ///
    /// This comes from [`Pipeline::run`].
    Pipeline(PipelineError),

    /// Couldn't write the output.
    Output(io::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::PageParse(err) => Some(err),
            Error::FileReadError(_, err) | Error::Output(err) => Some(err),
            Error::Pipeline(err) => Some(err),
        }
    }
}

/// Stdin or an input file by path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Input {
    Stdin,
    FilePath(String),
}

impl Error {
    pub(crate) fn from_io_error(error: io::Error, file: Input) -> Self {
        Error::FileReadError(file, error)
    }
}

impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Stdin => f.write_str("stdin"),
            Input::FilePath(file) => write!(f, "file {file:?}"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::PageParse(err) => {
                writeln!(f, "Page parse error:")?;
                writeln!(f, "{err}")
            }
            Error::FileReadError(file, err) => {
                if env::var("WIKIPAGE_PORTABLE_ERRORS").unwrap_or_default().is_empty() {
                    writeln!(f, "{err} while reading {file}")
                } else {
                    writeln!(f, "{} while reading {file}", err.kind())
                }
            }
            Error::Pipeline(err) => writeln!(f, "{err}"),
            Error::Output(err) => writeln!(f, "{err} while writing output"),
        }
    }
}

/// A simple facade for handling I/O.
///
/// This trait lets you do "I/O-y stuff" like mocking out stdin or reading files. The [`run`] method uses it.
pub trait OsFacade {
    /// Read stdin (or your mock of it) to a `String`.
    fn read_stdin(&self) -> io::Result<String>;

    /// Read a file path (or your mock of one) to a `String`.
    fn read_file(&self, path: &str) -> io::Result<String>;

    /// Get a writer for stdout (or your mock of it).
    fn stdout(&mut self) -> impl Write;

    /// Handle an error.
    fn write_error(&mut self, err: Error);

    /// Read the page file, treating a missing path or `"-"` as stdin.
    fn read_page_file(&self, page_file_path: Option<&str>) -> Result<String, Error> {
        match page_file_path {
            None | Some("-") => self.read_stdin().map_err(|err| Error::from_io_error(err, Input::Stdin)),
            Some(path) => self
                .read_file(path)
                .map_err(|err| Error::from_io_error(err, Input::FilePath(path.to_string()))),
        }
    }
}

/// Runs wikipage end to end.
///
/// This uses the provided [RunOptions] and [OsFacade] to read a page file, runs the page through the [`Pipeline`], and
/// then writes it to the given [`OsFacade`] in the format specified by [`RunOptions::output`].
///
/// Returns whether the page was processed; any error goes to [`OsFacade::write_error`].
pub fn run(cli: &RunOptions, os: &mut impl OsFacade) -> bool {
    match run_or_error(cli, os) {
        Ok(()) => true,
        Err(err) => {
            os.write_error(err);
            false
        }
    }
}

fn run_or_error(cli: &RunOptions, os: &mut impl OsFacade) -> Result<(), Error> {
    let contents = os.read_page_file(cli.page_file_path.as_deref())?;
    let PageInput { mut page, metadata } = serde_json::from_str(&contents).map_err(Error::PageParse)?;

    Pipeline::new(cli.into())
        .run(&mut page, &metadata)
        .map_err(Error::Pipeline)?;

    if !cli.quiet {
        let stdout = os.stdout();
        let written = match cli.output {
            OutputFormat::Html => HtmlWriter::default().write_page(&page, stdout),
            OutputFormat::Json => write_json(&page, stdout),
        };
        written.map_err(Error::Output)?;
    }

    Ok(())
}

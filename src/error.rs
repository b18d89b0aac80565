//! Error types for yEnc operations

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for yEnc operations
#[derive(Error, Debug)]
pub enum YencError {
    /// I/O error while reading an input
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed `=ybegin`, `=ypart` or `=yend` line
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Missing required header field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A numeric field that does not parse
    #[error("Invalid value for '{field}': {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// `begin`/`end` that do not describe a 1-based inclusive range
    #[error("Invalid part range: begin={begin} end={end}")]
    InvalidPartRange { begin: usize, end: usize },

    /// `write` called before any header supplied a filename
    #[error("Unable to write to file: filename not set")]
    FilenameNotSet,

    /// The output path exists but is not a directory
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The output directory could not be created
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output file could not be opened or written
    #[error("Error writing to file {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A specialized `Result` type for yEnc operations
pub type Result<T> = std::result::Result<T, YencError>;

/*!
 * Error types for the srtgears library.
 *
 * This module contains custom error types for different parts of the library,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while reading or writing subtitle formats
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Reading from the source or writing to the sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested operation is not implemented for the format
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Errors raised by the executor when the requested option set cannot run
#[derive(Error, Debug, PartialEq)]
pub enum ExecError {
    /// No primary subtitle pack was supplied
    #[error("Input file must be specified ('--in')!")]
    MissingInput,

    /// Concatenation or merging was requested without a second pack
    #[error("2nd input file must be specified ('--in2')!")]
    MissingSecondInput,

    /// Subtitles were modified but there is nowhere to write them
    #[error("Output file must be specified ('--out')!")]
    MissingOutput,

    /// Splitting was requested without a second destination
    #[error("2nd output file must be specified when splitting ('--out2')!")]
    MissingSecondOutput,

    /// A time option could not be parsed
    #[error("Invalid time for {option}: {value}")]
    InvalidTime {
        /// Name of the offending option
        option: &'static str,
        /// The rejected value
        value: String,
    },

    /// Options that cannot be combined
    #[error("Conflicting options: {0}")]
    ConflictingOptions(String),

    /// A position token is not one of the known tokens
    #[error("Invalid pos value: {0}")]
    InvalidPos(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from reading or writing subtitles
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the executor
    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    /// Error in the configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

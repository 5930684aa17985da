//! Global error handling for concatfs
//!
//! Only configuration problems and the final write are fatal. Everything that
//! can go wrong per path or per file is represented as a value instead
//! (see [`crate::collector::SkippedPath`] and [`crate::writer::FileBody`]).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for concatfs operations
#[derive(Error, Debug)]
pub enum ConcatError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The output destination could not be opened or written
    #[error("Failed to write output to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Specialized Result type for concatfs operations
pub type Result<T> = std::result::Result<T, ConcatError>;

/// Creates a ConcatError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::ConcatError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// main returns io::Result, so the binary needs this conversion
impl From<ConcatError> for io::Error {
    fn from(err: ConcatError) -> Self {
        match err {
            ConcatError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}

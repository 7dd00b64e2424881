//! Typed failures raised while reading survey CSV files.
//!
//! Two levels are distinguished:
//!
//! - [`CsvParsingError`]: a whole file (or a row within it) could not be
//!   processed. Always carries the offending file.
//! - [`FormatError`]: a single textual value could not be converted to its
//!   target type. Carries no file and may chain the lower-level cause.
//!
//! [`ParseError`] is the family both belong to, so handlers can match broadly
//! or narrowly.

use std::{
    error::Error as StdError,
    path::{Path, PathBuf},
};

use thiserror::Error;

pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Misuse detected while constructing a component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid argument: {0}")]
pub struct InvalidArgument(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (file {})", file.display())]
pub struct CsvParsingError {
    file: PathBuf,
    message: String,
}

impl CsvParsingError {
    pub fn new(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        let message = message.into();
        debug_assert!(!message.is_empty(), "parse error message must not be empty");
        Self {
            file: file.into(),
            message,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// File name component for user-facing reports, falling back to the full
    /// path when there is none.
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.display().to_string())
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct FormatError {
    message: String,
    #[source]
    cause: Option<BoxedCause>,
}

impl FormatError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        debug_assert!(!message.is_empty(), "format error message must not be empty");
        Self {
            message,
            cause: None,
        }
    }

    pub fn with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        let mut error = Self::new(message);
        error.cause = Some(cause.into());
        error
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Lifts a field-level failure into a file-scoped one. `location` names
    /// where in the file the value sat (row, column).
    pub fn in_file(&self, file: impl Into<PathBuf>, location: &str) -> CsvParsingError {
        let message = if location.is_empty() {
            self.message.clone()
        } else {
            format!("{location}: {}", self.message)
        };
        CsvParsingError::new(file, message)
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    File(#[from] CsvParsingError),
    #[error(transparent)]
    Field(#[from] FormatError),
}

impl ParseError {
    /// The offending file, when this failure is file-scoped.
    pub fn file(&self) -> Option<&Path> {
        match self {
            ParseError::File(err) => Some(err.file()),
            ParseError::Field(_) => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ParseError::File(err) => err.message(),
            ParseError::Field(err) => err.message(),
        }
    }
}

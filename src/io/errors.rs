//! Errors for table and dictionary loading.
//!
//! [`IoError`] covers failures of the readers in [`crate::io`]: the
//! underlying byte stream, CSV decoding, unknown labels, and any engine error
//! raised while turning parsed rows into matrices or fundamentals.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::impression::errors::ActError;

/// Result alias for [`crate::io`] operations.
pub type IoResult<T> = Result<T, IoError>;

/// Unified error type for the table and dictionary readers.
#[derive(Debug)]
pub enum IoError {
    // ---- Transport ----
    /// Reading the underlying stream failed.
    Io(std::io::Error),

    /// CSV decoding or record deserialization failed.
    Csv(csv::Error),

    // ---- Content ----
    /// A table had no data rows.
    EmptyTable,

    /// A table's column count is not supported.
    UnsupportedColumns { found: usize, valid: &'static [usize] },

    /// A concept label is absent from the culture dictionary.
    MissingLabel { label: String },

    /// The parsed content was rejected by the engine.
    Act(ActError),
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::Io(e) => Some(e),
            IoError::Csv(e) => Some(e),
            IoError::Act(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::Io(e) => write!(f, "I/O error: {e}"),
            IoError::Csv(e) => write!(f, "CSV error: {e}"),
            IoError::EmptyTable => write!(f, "Table has no data rows"),
            IoError::UnsupportedColumns { found, valid } => {
                write!(f, "Table has {found} coefficient columns; expected one of {valid:?}")
            }
            IoError::MissingLabel { label } => {
                write!(f, "Label {label:?} not found in the culture dictionary")
            }
            IoError::Act(e) => write!(f, "{e}"),
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        IoError::Io(err)
    }
}

impl From<csv::Error> for IoError {
    fn from(err: csv::Error) -> Self {
        IoError::Csv(err)
    }
}

impl From<ActError> for IoError {
    fn from(err: ActError) -> Self {
        IoError::Act(err)
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<IoError> for PyErr {
    fn from(err: IoError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

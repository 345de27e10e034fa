//! Errors for the ACT impression engine (shape checks, enumeration lookups,
//! term parsing, and optimizer failures).
//!
//! This module defines the engine error type, [`ActError`], used across the
//! Python-facing API and the internal Rust core. It implements
//! `Display`/`Error` and converts to `PyErr` for PyO3.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Errors raised for an unrecognized enumeration value (method, pattern,
//!   transient spec, weight mode) always name the offending value and the
//!   valid set.
//! - Shape failures are fatal to the current construction; nothing is
//!   recovered silently and no partial [`Event`](crate::impression::Event) is
//!   ever returned.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::impression::core::epa::Role;

/// Crate-wide result alias for ACT engine operations that may produce
/// [`ActError`].
pub type ActResult<T> = Result<T, ActError>;

/// Unified error type for the ACT engine.
///
/// Covers matrix/vector shape incompatibilities, unrecognized enumeration
/// values, interaction-term parsing, coefficient-table parsing, and failures
/// of the closed-form optimizer.
#[derive(Debug, Clone, PartialEq)]
pub enum ActError {
    // ---- Shapes ----
    /// A matrix does not have the shape the weighting apparatus requires.
    ShapeMismatch { what: &'static str, expected: (usize, usize), found: (usize, usize) },

    /// Vector lengths between `f`, `t`, and the weighting matrices disagree.
    DimensionError { what: &'static str, expected: usize, found: usize },

    /// Simple deflection inputs differ in length.
    LengthMismatch { fundamentals: usize, transients: usize },

    // ---- Enumerations ----
    /// Coefficient method name outside the closed enumeration.
    UnknownMethod { name: String, valid: &'static [&'static str] },

    /// Interaction pattern name outside the built-in set.
    InvalidPattern { name: String, valid: &'static [&'static str] },

    /// Transient spec string is neither a pattern name nor a recognized mode.
    InvalidTransientSpec { spec: String, valid: &'static [&'static str] },

    /// Weight mode string other than `identity`.
    InvalidWeightMode { mode: String, valid: &'static [&'static str] },

    /// Event element name outside Actor/Behavior/Object/Setting.
    InvalidRole { name: String, valid: &'static [&'static str] },

    // ---- Terms and tables ----
    /// An interaction term label does not follow the role×axis grammar.
    InvalidTerm { term: String, reason: &'static str },

    /// A term references a coordinate outside the fundamental vector.
    IndexOutOfRange { term: String, index: usize, len: usize },

    /// A coefficient series requested from a table is absent.
    MissingEquation { key: String },

    /// A Z-table row could not be parsed.
    InvalidTableRow { row: usize, reason: String },

    /// The fundamentals do not contain the requested participant.
    MissingRole { role: Role },

    /// An input vector or matrix holds NaN or an infinity.
    NonFinite { what: &'static str, index: usize },

    // ---- Optimizer ----
    /// The 3×3 gradient system for the target element is not invertible.
    SingularSystem { role: Role },

    /// The stationary point of the target element is not a minimum.
    NonConvex { role: Role, min_eigenvalue: f64 },
}

impl std::error::Error for ActError {}

impl std::fmt::Display for ActError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shapes ----
            ActError::ShapeMismatch { what, expected, found } => {
                write!(
                    f,
                    "Shape mismatch for {what}: expected {}x{}, got {}x{}",
                    expected.0, expected.1, found.0, found.1
                )
            }
            ActError::DimensionError { what, expected, found } => {
                write!(f, "Dimension error for {what}: expected length {expected}, got {found}")
            }
            ActError::LengthMismatch { fundamentals, transients } => {
                write!(
                    f,
                    "Lengths of fundamentals ({fundamentals}) and transients ({transients}) are not equal"
                )
            }
            // ---- Enumerations ----
            ActError::UnknownMethod { name, valid } => {
                write!(f, "Method must be one of {valid:?}, but got {name:?}")
            }
            ActError::InvalidPattern { name, valid } => {
                write!(f, "{name:?} is not a valid interaction pattern; expected one of {valid:?}")
            }
            ActError::InvalidTransientSpec { spec, valid } => {
                write!(f, "{spec:?} is not a valid transient estimator; expected one of {valid:?}")
            }
            ActError::InvalidWeightMode { mode, valid } => {
                write!(f, "{mode:?} is not a valid weight mode; expected one of {valid:?}")
            }
            ActError::InvalidRole { name, valid } => {
                write!(f, "{name:?} is not an event element; expected one of {valid:?}")
            }
            // ---- Terms and tables ----
            ActError::InvalidTerm { term, reason } => {
                write!(f, "Invalid interaction term {term:?}: {reason}")
            }
            ActError::IndexOutOfRange { term, index, len } => {
                write!(
                    f,
                    "Term {term:?} references coordinate {index}, but the fundamental vector has length {len}"
                )
            }
            ActError::MissingEquation { key } => {
                write!(f, "Coefficient table has no series for equation {key:?}")
            }
            ActError::InvalidTableRow { row, reason } => {
                write!(f, "Invalid coefficient table row {row}: {reason}")
            }
            ActError::MissingRole { role } => {
                write!(f, "Event has no {role} element")
            }
            ActError::NonFinite { what, index } => {
                write!(f, "Non-finite value in {what} at index {index}")
            }
            // ---- Optimizer ----
            ActError::SingularSystem { role } => {
                write!(f, "Linear system for the optimal {role} is singular")
            }
            ActError::NonConvex { role, min_eigenvalue } => {
                write!(
                    f,
                    "Deflection is not convex in the {role} (smallest eigenvalue {min_eigenvalue}); no minimum exists"
                )
            }
        }
    }
}

/// Convert an [`ActError`] into a Python `ValueError` with the error message.
///
/// This is used at the Rust↔Python boundary to surface domain errors cleanly.
#[cfg(feature = "python-bindings")]
impl std::convert::From<ActError> for PyErr {
    fn from(err: ActError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

//! Matrix factory — selection, coefficient, and weight matrices.
//!
//! Purpose
//! -------
//! Build the linear-algebra apparatus of the ACT quadratic form: the
//! selection matrix `Z` and coefficient matrix `M` from raw coefficient-table
//! rows, the block weight matrix that couples fundamentals and transients,
//! and the first-order weight vectors.
//!
//! Key behaviors
//! -------------
//! - [`parse_ztable`] splits each raw row into a digit row of `Z` (after
//!   stripping a leading `Z`/`z`) and a coefficient row of `M`, then stacks an
//!   identity block above the digit block.
//! - [`build_weight_matrix`] returns `[[W, −W], [−W, W]]`, or with `M`,
//!   `[[W, −W·Mᵗ], [−M·W, M·W·Mᵗ]]`.
//! - [`build_first_order_weights`] expands [`FirstOrderWeights`] to a vector.
//!
//! Invariants & assumptions
//! ------------------------
//! - `M` has shape `terms × n` where `n` is the fundamental length; row `j`
//!   pairs with term `j` of the transient vector.
//! - The digit string of every label has one digit per coefficient column,
//!   so `Z` is `(k + rows) × k` with `k` coefficient columns.
//!
//! Conventions
//! -----------
//! - With `M` present, `r·W·rᵗ` for `r = [f, t]` equals
//!   `(f − Mᵗt)ᵗ W (f − Mᵗt)` when `W` is symmetric: `Mᵗt` is the predicted
//!   transient impression.
use ndarray::{Array1, Array2, ArrayView2, concatenate, s, Axis};

use crate::impression::{
    core::options::{FirstOrderWeights, WeightSpec},
    errors::{ActError, ActResult},
};

/// Parsed coefficient table: selection matrix, coefficient matrix, and the
/// equation name of each coefficient column.
#[derive(Debug, Clone, PartialEq)]
pub struct ZTable {
    /// `(k + rows) × k` selection matrix, identity block first.
    pub z: Array2<u8>,
    /// `rows × k` coefficient matrix.
    pub m: Array2<f64>,
    pub columns: Vec<String>,
}

impl ZTable {
    /// Digit block of `Z` (one row per coefficient row).
    pub fn digit_block(&self) -> ArrayView2<'_, u8> {
        self.z.slice(s![self.m.ncols().., ..])
    }
}

/// Build `(Z, M)` from raw table rows.
///
/// Parameters
/// ----------
/// - `rows`: `&[Vec<S>]`
///   One entry per table row; cell 0 is the label (`"Z100100000"`), the
///   remaining cells are coefficients.
/// - `column_order`: `&[&str]`
///   Equation names of the coefficient columns, e.g. `Ae … Oa`.
///
/// Errors
/// ------
/// - [`ActError::InvalidTableRow`] when a row has the wrong number of cells,
///   a label lacks the `Z` prefix or has a digit count other than
///   `column_order.len()`, or a coefficient is not a float.
pub fn parse_ztable<S: AsRef<str>>(rows: &[Vec<S>], column_order: &[&str]) -> ActResult<ZTable> {
    let k = column_order.len();
    let mut digits = Array2::<u8>::zeros((rows.len(), k));
    let mut m = Array2::<f64>::zeros((rows.len(), k));
    for (i, row) in rows.iter().enumerate() {
        if row.len() != k + 1 {
            return Err(ActError::InvalidTableRow {
                row: i,
                reason: format!("expected {} cells, got {}", k + 1, row.len()),
            });
        }
        let label = row[0].as_ref().trim();
        let code = label
            .strip_prefix('Z')
            .or_else(|| label.strip_prefix('z'))
            .ok_or_else(|| ActError::InvalidTableRow {
                row: i,
                reason: format!("label {label:?} does not start with Z"),
            })?;
        if code.chars().count() != k {
            return Err(ActError::InvalidTableRow {
                row: i,
                reason: format!("label {label:?} has {} digits, expected {k}", code.chars().count()),
            });
        }
        for (j, c) in code.chars().enumerate() {
            let d = c.to_digit(10).ok_or_else(|| ActError::InvalidTableRow {
                row: i,
                reason: format!("label {label:?} contains non-digit {c:?}"),
            })?;
            digits[[i, j]] = d as u8;
        }
        for (j, cell) in row[1..].iter().enumerate() {
            let cell = cell.as_ref().trim();
            m[[i, j]] = cell.parse::<f64>().map_err(|_| ActError::InvalidTableRow {
                row: i,
                reason: format!("coefficient {cell:?} in column {} is not a number", column_order[j]),
            })?;
        }
    }
    let identity = Array2::<u8>::from_shape_fn((k, k), |(i, j)| u8::from(i == j));
    let z = concatenate![Axis(0), identity, digits];
    Ok(ZTable { z, m, columns: column_order.iter().map(|c| c.to_string()).collect() })
}

/// Build the block weight matrix for a fundamental vector of length `n`.
///
/// Returns `[[W, −W], [−W, W]]` (`2n × 2n`) without `m`, or
/// `[[W, −W·Mᵗ], [−M·W, M·W·Mᵗ]]` (`(n + terms) × (n + terms)`) with it.
///
/// # Errors
/// - [`ActError::ShapeMismatch`] if an explicit base weight is not `n × n`
///   or `m` does not have `n` columns.
pub fn build_weight_matrix(
    base: &WeightSpec, n: usize, m: Option<ArrayView2<f64>>,
) -> ActResult<Array2<f64>> {
    let w = match base {
        WeightSpec::Identity => Array2::<f64>::eye(n),
        WeightSpec::Explicit(w) => {
            if w.dim() != (n, n) {
                return Err(ActError::ShapeMismatch {
                    what: "base weight matrix",
                    expected: (n, n),
                    found: w.dim(),
                });
            }
            w.clone()
        }
    };
    let (upper_right, lower_left, lower_right) = match m {
        None => (-&w, -&w, w.clone()),
        Some(m) => {
            if m.ncols() != n {
                return Err(ActError::ShapeMismatch {
                    what: "coefficient matrix",
                    expected: (m.nrows(), n),
                    found: m.dim(),
                });
            }
            let mw = m.dot(&w);
            (-w.dot(&m.t()), -&mw, mw.dot(&m.t()))
        }
    };
    let upper = concatenate![Axis(1), w, upper_right];
    let lower = concatenate![Axis(1), lower_left, lower_right];
    Ok(concatenate![Axis(0), upper, lower])
}

/// Expand first-order weights into a vector of length `len`.
///
/// `Uniform` yields ones, except that on the transient side (`m` present) it
/// yields `M · 1`. `Explicit` vectors are returned as given; their length is
/// checked when the event assembles `vft`.
pub fn build_first_order_weights(
    v: &FirstOrderWeights, len: usize, m: Option<ArrayView2<f64>>,
) -> Array1<f64> {
    match (v, m) {
        (FirstOrderWeights::Explicit(v), _) => v.clone(),
        (FirstOrderWeights::Uniform, Some(m)) => m.dot(&Array1::<f64>::ones(m.ncols())),
        (FirstOrderWeights::Uniform, None) => Array1::ones(len),
    }
}

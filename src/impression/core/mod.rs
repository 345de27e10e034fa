//! core — EPA containers, interaction patterns, coefficients, and weights.
//!
//! Purpose
//! -------
//! Collect the building blocks of ACT impression formation: typed EPA
//! profiles, the interaction-term grammar and its built-in patterns, the
//! cultural-equation coefficient tables, the weight-matrix factory, the
//! matrix-free deflection evaluator, and event configuration. The event
//! evaluator and optimizer in `models` build on top of these primitives.
//!
//! Key behaviors
//! -------------
//! - Name every coordinate of the fundamental vector through [`Role`] and
//!   [`Axis`], and carry participant ratings in [`Fundamentals`].
//! - Parse term labels (`"AeBe"`, `"1"`) into [`Term`]s and resolve named
//!   ([`PatternName`]), custom, or selection-derived [`InteractionPattern`]s
//!   against a fundamental vector.
//! - Provide the built-in Heise coefficients ([`CoefficientTable`]) and parse
//!   Z-table rows into selection/coefficient matrices ([`ZTable`]).
//! - Assemble block weight matrices and first-order weight vectors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fundamental vectors have length 9 (ABO) or 12 (ABOS) and follow the
//!   `A B O [S]` × `E P A` layout.
//! - A term references each role at most once, so every pattern is affine in
//!   any single element's EPA triple.
//!
//! Conventions
//! -----------
//! - Matrices are `ndarray` arrays; coefficient matrices are `terms × n`.
//! - Errors surface as [`ActError`](crate::impression::ActError).

pub mod coefficients;
pub mod deflection;
pub mod epa;
pub mod matrices;
pub mod options;
pub mod pattern;

pub use self::coefficients::{CoefficientTable, EQUATION_KEYS, HEISE_DEFAULT, HEISE_DEFAULT_TERMS, Method};
pub use self::deflection::{DeflectionBreakdown, simple_deflection, simple_deflection_breakdown};
pub use self::epa::{Axis, EPA_DIM, Epa, Fundamentals, Role};
pub use self::matrices::{ZTable, build_first_order_weights, build_weight_matrix, parse_ztable};
pub use self::options::{EventOptions, FirstOrderWeights, TransientSpec, WeightSpec};
pub use self::pattern::{Coord, INTERCEPT_LABEL, InteractionPattern, PatternName, Term};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_act::impression::core::prelude::*;
//
// to import the core ACT surface in a single line.

pub mod prelude {
    pub use super::coefficients::{CoefficientTable, Method};
    pub use super::deflection::{simple_deflection, simple_deflection_breakdown};
    pub use super::epa::{Axis, Epa, Fundamentals, Role};
    pub use super::matrices::{ZTable, parse_ztable};
    pub use super::options::{EventOptions, FirstOrderWeights, TransientSpec, WeightSpec};
    pub use super::pattern::{InteractionPattern, PatternName};
}

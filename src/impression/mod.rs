//! impression — ACT impression formation: events, deflection, optimization.
//!
//! Purpose
//! -------
//! Provide the computational core of Affect Control Theory. Participants of
//! an event (Actor, Behavior, Object, optional Setting) carry fundamental
//! EPA ratings; cultural equations predict the transient impressions the
//! event produces; deflection measures how far the two diverge; and the
//! optimizer finds the element rating that would minimize that divergence.
//!
//! Key behaviors
//! -------------
//! - Collect typed building blocks in [`core`]: EPA containers, the
//!   interaction-term grammar and built-in patterns, coefficient tables,
//!   Z-table parsing, weight assembly, and event options.
//! - Evaluate events and optimize elements in [`models`] via [`Event`] and
//!   [`optimize`].
//! - Centralize the error surface in [`errors`] ([`ActError`],
//!   [`ActResult`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every dimension (fundamental length, term count, coefficient shape,
//!   weight lengths) is validated before any algebra; failures return an
//!   [`ActError`] and never a partial result.
//! - Events are immutable once built.
//!
//! Conventions
//! -----------
//! - Fundamental vectors follow the `Ae Ap Aa Be Bp Ba Oe Op Oa [Se Sp Sa]`
//!   layout; coordinate `k` is `(Role::from_index(k / 3), Axis k % 3)`.
//! - The stack performs no I/O; reading Z-tables and culture dictionaries
//!   lives in `crate::io`. Event construction and optimization emit
//!   `tracing` debug events only.
//!
//! Downstream usage
//! ----------------
//! 1. Build [`Fundamentals`] from EPA triples (or a flat slice).
//! 2. Configure [`EventOptions`]: coefficient matrix or Z-table, weights,
//!    transient spec, first-order weights.
//! 3. `Event::new(fundamentals, options)?.deflection()`.
//! 4. `optimize(&event, Role::Behavior)?` for the optimal behavior.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; the end-to-end Z-table →
//!   event → optimization pipeline is exercised under `tests/`.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    Axis, CoefficientTable, DeflectionBreakdown, Epa, EventOptions, FirstOrderWeights,
    Fundamentals, InteractionPattern, Method, PatternName, Role, Term, TransientSpec,
    WeightSpec, ZTable, build_first_order_weights, build_weight_matrix, parse_ztable,
    simple_deflection, simple_deflection_breakdown,
};

pub use self::errors::{ActError, ActResult};

pub use self::models::{Event, OptimalElement, optimize};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_act::impression::prelude::*;
//
// to import the main ACT surface in a single line.

pub mod prelude {
    pub use super::{
        ActError, ActResult, Axis, CoefficientTable, Epa, Event, EventOptions, FirstOrderWeights,
        Fundamentals, InteractionPattern, OptimalElement, PatternName, Role, TransientSpec,
        WeightSpec, ZTable, optimize, simple_deflection,
    };
}

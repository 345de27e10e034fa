//! Event options — configuration for building an ACT event.
//!
//! Purpose
//! -------
//! Collect the configuration knobs of event construction in one place: the
//! optional coefficient and selection matrices, the base weight matrix, the
//! transient-estimation spec, and the optional first-order weights. Knobs
//! that accept either a mode name or an array are tagged enums.
//!
//! Key behaviors
//! -------------
//! - [`WeightSpec`]: identity base weight or an explicit `n × n` matrix.
//! - [`TransientSpec`]: named built-in pattern, custom pattern, a pattern
//!   derived from the selection matrix, or an explicit transient vector.
//! - [`FirstOrderWeights`]: uniform weights or an explicit vector.
//! - [`EventOptions`]: builder-style bundle consumed by
//!   [`Event::new`](crate::impression::Event::new).
//!
//! Invariants & assumptions
//! ------------------------
//! - Options are plain data carriers. Shape checks happen when the event is
//!   built, where `n` (the fundamental length) is known.
//! - Absent first-order weights contribute nothing to deflection.
//! - The default transient spec is the named Heise pattern, which resolves to
//!   more terms than the fundamental vector has coordinates. An event
//!   therefore needs either a coefficient matrix (`with_coefficients`,
//!   `with_ztable`, `with_equations`, `with_method`) or explicit transients;
//!   with explicit transients, identity weight, and no first-order weights
//!   the event evaluates the plain squared distance.
//!
//! Conventions
//! -----------
//! - String forms parse through `FromStr` and are case-sensitive for pattern
//!   names (`"Heise"`, `"Smith-Lovin"`), matching the cultural-equation
//!   literature.
use std::str::FromStr;

use ndarray::{Array1, Array2};

use crate::impression::{
    core::{
        coefficients::{CoefficientTable, EQUATION_KEYS, Method},
        epa::EPA_DIM,
        matrices::ZTable,
        pattern::{InteractionPattern, PatternName},
    },
    errors::{ActError, ActResult},
};

/// Base weight for the quadratic form.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeightSpec {
    /// `n × n` identity.
    #[default]
    Identity,
    /// Caller-supplied `n × n` matrix, typically diagonal.
    Explicit(Array2<f64>),
}

impl WeightSpec {
    pub const VALID: &'static [&'static str] = &["identity"];
}

impl FromStr for WeightSpec {
    type Err = ActError;

    fn from_str(s: &str) -> ActResult<Self> {
        match s {
            "identity" => Ok(WeightSpec::Identity),
            other => Err(ActError::InvalidWeightMode {
                mode: other.to_string(),
                valid: WeightSpec::VALID,
            }),
        }
    }
}

/// First-order (linear) weights for one side of the combined vector.
#[derive(Debug, Clone, PartialEq)]
pub enum FirstOrderWeights {
    /// All ones; on the transient side with a coefficient matrix `M`,
    /// `M · 1` so every interaction term is weighted equally.
    Uniform,
    /// Used as given.
    Explicit(Array1<f64>),
}

/// How the transient vector `t` is obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum TransientSpec {
    /// Built-in pattern, sized to the event's participants.
    Named(PatternName),
    /// Caller-defined term list.
    Pattern(InteractionPattern),
    /// Terms derived from the digit block of the event's selection matrix.
    Selection,
    /// Transient vector used verbatim.
    Explicit(Array1<f64>),
}

impl TransientSpec {
    pub const VALID: &'static [&'static str] = &["Heise", "Smith-Lovin", "selection"];
}

impl Default for TransientSpec {
    fn default() -> Self {
        TransientSpec::Named(PatternName::Heise)
    }
}

impl FromStr for TransientSpec {
    type Err = ActError;

    fn from_str(s: &str) -> ActResult<Self> {
        match s {
            "selection" => Ok(TransientSpec::Selection),
            other => other.parse::<PatternName>().map(TransientSpec::Named).map_err(|_| {
                ActError::InvalidTransientSpec { spec: other.to_string(), valid: TransientSpec::VALID }
            }),
        }
    }
}

/// `EventOptions` — construction-time configuration for an [`Event`].
///
/// Fields
/// ------
/// - `coefficients`: `Option<Array2<f64>>`
///   Coefficient matrix `M` (`terms × n`). When present the weight matrix is
///   augmented and transients are projected through `M`.
/// - `selection`: `Option<Array2<u8>>`
///   Selection matrix `Z`; required by [`TransientSpec::Selection`].
/// - `weights`: [`WeightSpec`]
/// - `transients`: [`TransientSpec`]
/// - `fundamental_weights`, `transient_weights`: `Option<FirstOrderWeights>`
///   `None` contributes zeros to the linear term.
///
/// [`Event`]: crate::impression::Event
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventOptions {
    pub coefficients: Option<Array2<f64>>,
    pub selection: Option<Array2<u8>>,
    pub weights: WeightSpec,
    pub transients: TransientSpec,
    pub fundamental_weights: Option<FirstOrderWeights>,
    pub transient_weights: Option<FirstOrderWeights>,
}

impl EventOptions {
    pub fn new() -> Self {
        EventOptions::default()
    }

    /// Use both halves of a parsed Z-table and derive transients from its
    /// selection rows.
    pub fn with_ztable(mut self, table: &ZTable) -> Self {
        self.coefficients = Some(table.m.clone());
        self.selection = Some(table.z.clone());
        self.transients = TransientSpec::Selection;
        self
    }

    /// Use every series of `table`, in table order, as the coefficient matrix.
    pub fn with_coefficient_table(mut self, table: &CoefficientTable) -> ActResult<Self> {
        self.coefficients = Some(table.to_matrix()?);
        Ok(self)
    }

    /// Use `table` as the coefficient matrix for the terms of `pattern` over
    /// the equations of an event with `participants` elements, carrying
    /// missing equations over (see [`CoefficientTable::completed_matrix`]).
    pub fn with_equations(
        mut self, table: &CoefficientTable, pattern: InteractionPattern, participants: usize,
    ) -> ActResult<Self> {
        let keys = &EQUATION_KEYS[..EPA_DIM * participants.min(4)];
        self.coefficients = Some(table.completed_matrix(&pattern, keys)?);
        self.transients = TransientSpec::Pattern(pattern);
        Ok(self)
    }

    /// Built-in dataset of `method` with its own predictor pattern, for an
    /// Actor/Behavior/Object event.
    pub fn with_method(self, method: Method) -> ActResult<Self> {
        self.with_equations(&CoefficientTable::builtin(method), method.pattern()?, 3)
    }

    pub fn with_coefficients(mut self, m: Array2<f64>) -> Self {
        self.coefficients = Some(m);
        self
    }

    pub fn with_selection(mut self, z: Array2<u8>) -> Self {
        self.selection = Some(z);
        self
    }

    pub fn with_weights(mut self, weights: WeightSpec) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_transients(mut self, transients: TransientSpec) -> Self {
        self.transients = transients;
        self
    }

    pub fn with_fundamental_weights(mut self, v: FirstOrderWeights) -> Self {
        self.fundamental_weights = Some(v);
        self
    }

    pub fn with_transient_weights(mut self, v: FirstOrderWeights) -> Self {
        self.transient_weights = Some(v);
        self
    }
}

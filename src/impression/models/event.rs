//! ACT events — fundamentals, transients, and deflection.
//!
//! Purpose
//! -------
//! Provide [`Event`], the single canonical evaluator of an ACT event. An
//! event owns its fundamental vector `f`, its transient vector `t`, the
//! block weight matrix, and the first-order weight row vector `vft`, and
//! computes deflection once, at construction:
//!
//! `U = r · W · rᵗ + vft · rᵗ`, with `r = [f, t]`.
//!
//! Key behaviors
//! -------------
//! - Resolve `t` from an interaction pattern (named, custom, or derived from
//!   the selection matrix) or take it verbatim.
//! - Validate every length and reject non-finite inputs before any algebra:
//!   a failed construction yields no event and no partial deflection.
//! - Project transients through `M` to report the predicted post-event EPA
//!   profile ([`Event::transient_impressions`]).
//! - Rebuild the event with one element substituted
//!   ([`Event::with_element`]); the optimizer uses this to report the
//!   deflection it achieves.
//!
//! Invariants & assumptions
//! ------------------------
//! - Without `M`, `t.len() == n`; with `M`, `t.len() == M.nrows()` and
//!   `M.ncols() == n`.
//! - `vft.len() == n + t.len()`.
//! - Events are immutable. Recomputing deflection means building a new
//!   event.
//!
//! Conventions
//! -----------
//! - With no first-order weights and the identity base weight, deflection
//!   equals `Σ (f_i − t_i)²` without `M` and `‖f − Mᵗt‖²` with it.
use ndarray::{Array1, Array2, concatenate, Axis};
use tracing::debug;

use crate::impression::{
    core::{
        epa::{Epa, Fundamentals, Role},
        matrices::{build_first_order_weights, build_weight_matrix},
        options::{EventOptions, TransientSpec},
        pattern::InteractionPattern,
    },
    errors::{ActError, ActResult},
};

/// `Event` — one evaluated ACT event.
///
/// Purpose
/// -------
/// Aggregate the fundamental and transient vectors of an event with the
/// weighting apparatus and expose the resulting deflection.
///
/// Fields
/// ------
/// - `fundamentals`: [`Fundamentals`]
///   Participant EPA profiles the event was built from.
/// - `f`, `t`: `Array1<f64>`
///   Fundamental vector (length `n`) and transient vector.
/// - `pattern`: `Option<InteractionPattern>`
///   Pattern `t` was resolved from; `None` for explicit transients.
/// - `options`: [`EventOptions`]
///   Configuration, kept so the event can be rebuilt around a substituted
///   element.
/// - `weight_matrix`, `vft`, `deflection`
///   Block weight matrix, first-order weights, and the eager result.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    fundamentals: Fundamentals,
    f: Array1<f64>,
    t: Array1<f64>,
    pattern: Option<InteractionPattern>,
    options: EventOptions,
    weight_matrix: Array2<f64>,
    vft: Array1<f64>,
    deflection: f64,
}

impl Event {
    /// Build an event and evaluate its deflection.
    ///
    /// Parameters
    /// ----------
    /// - `fundamentals`: [`Fundamentals`]
    ///   Actor, Behavior, Object, and optional Setting ratings.
    /// - `options`: [`EventOptions`]
    ///   Coefficient/selection matrices, weight mode, transient spec, and
    ///   first-order weights.
    ///
    /// Errors
    /// ------
    /// - [`ActError::InvalidTransientSpec`] for `TransientSpec::Selection`
    ///   without a selection matrix.
    /// - [`ActError::IndexOutOfRange`] / [`ActError::ShapeMismatch`] from
    ///   pattern resolution and weight assembly.
    /// - [`ActError::DimensionError`] when `t` or a first-order weight vector
    ///   has the wrong length.
    /// - [`ActError::NonFinite`] when fundamentals, transients, coefficients,
    ///   or weights hold NaN or an infinity.
    pub fn new(fundamentals: Fundamentals, options: EventOptions) -> ActResult<Self> {
        let f = fundamentals.to_vector();
        let n = f.len();
        validate_finite("fundamental vector", f.iter())?;

        let (pattern, t) = match &options.transients {
            TransientSpec::Named(name) => {
                let p = InteractionPattern::named(*name, fundamentals.participants());
                let t = p.resolve(f.view())?;
                (Some(p), t)
            }
            TransientSpec::Pattern(p) => (Some(p.clone()), p.resolve(f.view())?),
            TransientSpec::Selection => {
                let z = options.selection.as_ref().ok_or_else(|| {
                    ActError::InvalidTransientSpec {
                        spec: "selection (no selection matrix supplied)".to_string(),
                        valid: TransientSpec::VALID,
                    }
                })?;
                let p = InteractionPattern::from_selection(z.view(), z.ncols())?;
                let t = p.resolve(f.view())?;
                (Some(p), t)
            }
            TransientSpec::Explicit(t) => (None, t.clone()),
        };

        validate_finite("transient vector", t.iter())?;
        let m = options.coefficients.as_ref().map(|m| m.view());
        if let Some(m) = m {
            validate_finite("coefficient matrix", m.iter())?;
        }
        let expected_t = m.map_or(n, |m| m.nrows());
        if t.len() != expected_t {
            return Err(ActError::DimensionError {
                what: "transient vector",
                expected: expected_t,
                found: t.len(),
            });
        }

        let weight_matrix = build_weight_matrix(&options.weights, n, m)?;

        let vf = match &options.fundamental_weights {
            Some(v) => build_first_order_weights(v, n, None),
            None => Array1::zeros(n),
        };
        let vt = match &options.transient_weights {
            Some(v) => build_first_order_weights(v, t.len(), m),
            None => Array1::zeros(t.len()),
        };
        if vf.len() != n {
            return Err(ActError::DimensionError {
                what: "fundamental first-order weights",
                expected: n,
                found: vf.len(),
            });
        }
        if vt.len() != t.len() {
            return Err(ActError::DimensionError {
                what: "transient first-order weights",
                expected: t.len(),
                found: vt.len(),
            });
        }
        let vft = concatenate![Axis(0), vf, vt];
        validate_finite("weight matrix", weight_matrix.iter())?;
        validate_finite("first-order weights", vft.iter())?;

        let r = concatenate![Axis(0), f, t];
        let deflection = quadratic_form(&weight_matrix, &vft, &r);
        debug!(n, terms = t.len(), coefficients = m.is_some(), deflection, "built ACT event");

        Ok(Event { fundamentals, f, t, pattern, options, weight_matrix, vft, deflection })
    }

    /// Rebuild the event with the element at `role` replaced.
    ///
    /// Pattern-based transients are re-derived from the new fundamentals;
    /// explicit transients are reused unchanged.
    pub fn with_element(&self, role: Role, epa: Epa) -> ActResult<Event> {
        Event::new(self.fundamentals.replace(role, epa)?, self.options.clone())
    }

    pub fn deflection(&self) -> f64 {
        self.deflection
    }

    pub fn fundamentals(&self) -> &Fundamentals {
        &self.fundamentals
    }

    /// Fundamental vector `f`.
    pub fn fundamental_vector(&self) -> &Array1<f64> {
        &self.f
    }

    /// Transient vector `t`.
    pub fn transients(&self) -> &Array1<f64> {
        &self.t
    }

    pub fn pattern(&self) -> Option<&InteractionPattern> {
        self.pattern.as_ref()
    }

    pub fn options(&self) -> &EventOptions {
        &self.options
    }

    pub fn weight_matrix(&self) -> &Array2<f64> {
        &self.weight_matrix
    }

    pub fn vft(&self) -> &Array1<f64> {
        &self.vft
    }

    /// Combined row vector `r = [f, t]`.
    pub fn combined(&self) -> Array1<f64> {
        concatenate![Axis(0), self.f, self.t]
    }

    /// Predicted post-event EPA profile: `Mᵗ·t` with a coefficient matrix,
    /// `t` otherwise.
    pub fn transient_impressions(&self) -> ActResult<Fundamentals> {
        let tau = match &self.options.coefficients {
            Some(m) => m.t().dot(&self.t),
            None => self.t.clone(),
        };
        Fundamentals::from_slice(&tau.to_vec())
    }
}

/// Reject NaN and infinities, reporting the first offending position.
fn validate_finite<'a>(what: &'static str, values: impl Iterator<Item = &'a f64>) -> ActResult<()> {
    for (index, v) in values.enumerate() {
        if !v.is_finite() {
            return Err(ActError::NonFinite { what, index });
        }
    }
    Ok(())
}

/// `r · W · rᵗ + v · rᵗ`.
pub(crate) fn quadratic_form(w: &Array2<f64>, v: &Array1<f64>, r: &Array1<f64>) -> f64 {
    r.dot(&w.dot(r)) + v.dot(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impression::core::{
        deflection::simple_deflection,
        options::{FirstOrderWeights, WeightSpec},
        pattern::PatternName,
    };
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement with the simple evaluator under the default configuration.
    // - First-order weights and the M-augmented quadratic form.
    // - Dimension and spec errors at construction.
    //
    // They intentionally DO NOT cover:
    // - Optimization (see `models::optimize`).
    // -------------------------------------------------------------------------

    fn reference_fundamentals() -> Fundamentals {
        Fundamentals::new(Epa::new(1.0, 1.0, 0.0), Epa::new(-2.0, 0.5, 0.0), Epa::new(0.0, 0.0, 0.0))
    }

    /// Deterministic 31×9 coefficient matrix for the Heise pattern: linear
    /// rows near 0.6·I, small interaction rows.
    fn heise_like_m() -> Array2<f64> {
        Array2::from_shape_fn((31, 9), |(j, k)| {
            if (1..=9).contains(&j) && j - 1 == k {
                0.6
            } else {
                (((j * 7 + k * 3) % 11) as f64) / 50.0 - 0.1
            }
        })
    }

    #[test]
    // Purpose
    // -------
    // Under identity weights, no M, and no first-order weights the matrix
    // form reproduces the simple deflection scenarios.
    //
    // Given
    // -----
    // - Reference fundamentals; explicit transients equal to f, then zero.
    //
    // Expect
    // ------
    // - Deflection 0 and 6.25 respectively.
    fn explicit_transients_match_simple_deflection() {
        // Arrange
        let funds = reference_fundamentals();
        let f = funds.to_vector();
        let same = EventOptions::new().with_transients(TransientSpec::Explicit(f.clone()));
        let zero = EventOptions::new().with_transients(TransientSpec::Explicit(Array1::zeros(9)));

        // Act
        let e_same = Event::new(funds, same).unwrap();
        let e_zero = Event::new(funds, zero).unwrap();

        // Assert
        assert!(e_same.deflection().abs() < 1e-12);
        assert!((e_zero.deflection() - 6.25).abs() < 1e-12);
        let simple = simple_deflection(f.as_slice().unwrap(), &[0.0; 9]).unwrap();
        assert!((e_zero.deflection() - simple).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Uniform first-order weights add `Σf + Σt` when no M is present.
    //
    // Given
    // -----
    // - Reference fundamentals, explicit t = 0.5·1, uniform weights on both
    //   sides.
    //
    // Expect
    // ------
    // - U = Σ(f − t)² + Σf + Σt.
    fn uniform_first_order_weights_add_linear_term() {
        // Arrange
        let funds = reference_fundamentals();
        let f = funds.to_vector();
        let t = Array1::from_elem(9, 0.5);
        let opts = EventOptions::new()
            .with_transients(TransientSpec::Explicit(t.clone()))
            .with_fundamental_weights(FirstOrderWeights::Uniform)
            .with_transient_weights(FirstOrderWeights::Uniform);

        // Act
        let event = Event::new(funds, opts).unwrap();

        // Assert
        let quad: f64 = (&f - &t).mapv(|d| d * d).sum();
        let expected = quad + f.sum() + t.sum();
        assert!((event.deflection() - expected).abs() < 1e-12);
        assert_eq!(event.vft().len(), 18);
    }

    #[test]
    // Purpose
    // -------
    // With a coefficient matrix the quadratic form equals the squared
    // distance between f and the predicted transients `Mᵗt`.
    //
    // Given
    // -----
    // - Reference fundamentals, Heise pattern, a 31×9 M.
    //
    // Expect
    // ------
    // - deflection == ‖f − Mᵗt‖² and the weight matrix is 40×40.
    fn coefficient_matrix_projects_transients() {
        // Arrange
        let funds = reference_fundamentals();
        let m = heise_like_m();
        let opts = EventOptions::new().with_coefficients(m.clone());

        // Act
        let event = Event::new(funds, opts).unwrap();

        // Assert
        let tau = m.t().dot(event.transients());
        let diff = event.fundamental_vector() - &tau;
        assert!((event.deflection() - diff.dot(&diff)).abs() < 1e-10);
        assert_eq!(event.weight_matrix().dim(), (40, 40));
        let impressions = event.transient_impressions().unwrap();
        assert!((impressions.actor.e - tau[0]).abs() < 1e-12);
        assert!((impressions.object.a - tau[8]).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Length mismatches are reported, never silently broadcast.
    //
    // Given
    // -----
    // - The Heise pattern without M (31 ≠ 9).
    // - Explicit first-order weights of the wrong length.
    //
    // Expect
    // ------
    // - DimensionError in both cases.
    fn mismatched_lengths_fail_with_dimension_error() {
        let funds = reference_fundamentals();

        let no_m = Event::new(funds, EventOptions::new());
        let bad_v = Event::new(
            funds,
            EventOptions::new()
                .with_transients(TransientSpec::Explicit(Array1::zeros(9)))
                .with_fundamental_weights(FirstOrderWeights::Explicit(array![1.0, 2.0])),
        );

        assert_eq!(
            no_m.unwrap_err(),
            ActError::DimensionError { what: "transient vector", expected: 9, found: 31 }
        );
        assert!(matches!(bad_v, Err(ActError::DimensionError { expected: 9, found: 2, .. })));
    }

    #[test]
    fn selection_spec_without_matrix_is_invalid() {
        let opts = EventOptions::new().with_transients(TransientSpec::Selection);

        let res = Event::new(reference_fundamentals(), opts);

        assert!(matches!(res, Err(ActError::InvalidTransientSpec { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Substituting an element re-derives pattern transients and leaves the
    // original event untouched.
    fn with_element_rebuilds_pattern_transients() {
        // Arrange
        let opts = EventOptions::new()
            .with_coefficients(heise_like_m())
            .with_transients(TransientSpec::Named(PatternName::Heise))
            .with_weights(WeightSpec::Identity);
        let event = Event::new(reference_fundamentals(), opts).unwrap();

        // Act
        let moved = event.with_element(Role::Actor, Epa::new(2.0, 0.0, -1.0)).unwrap();

        // Assert
        assert_eq!(moved.fundamentals().actor, Epa::new(2.0, 0.0, -1.0));
        assert_eq!(moved.transients()[1], 2.0);
        assert_eq!(event.transients()[1], 1.0);
        assert_ne!(moved.deflection(), event.deflection());
    }

    #[test]
    // Purpose
    // -------
    // Non-finite inputs are rejected at construction, so neither the event
    // nor anything derived from it (such as an optimal element) can carry
    // NaN deflections.
    //
    // Given
    // -----
    // - An Actor with NaN evaluation.
    // - Finite fundamentals with an infinite explicit transient.
    //
    // Expect
    // ------
    // - NonFinite naming the fundamental vector at index 0.
    // - NonFinite naming the transient vector at index 4.
    // - Substituting a NaN element into a valid event fails the same way.
    fn non_finite_inputs_are_rejected() {
        // Arrange
        let mut funds = reference_fundamentals();
        funds.actor.e = f64::NAN;
        let mut t = Array1::zeros(9);
        t[4] = f64::INFINITY;
        let explicit = |t: Array1<f64>| EventOptions::new().with_transients(TransientSpec::Explicit(t));

        // Act
        let nan_actor = Event::new(funds, explicit(Array1::zeros(9)));
        let inf_t = Event::new(reference_fundamentals(), explicit(t));
        let valid = Event::new(reference_fundamentals(), explicit(Array1::zeros(9))).unwrap();
        let swapped = valid.with_element(Role::Object, Epa::new(0.0, f64::NAN, 0.0));

        // Assert
        assert_eq!(nan_actor, Err(ActError::NonFinite { what: "fundamental vector", index: 0 }));
        assert_eq!(inf_t, Err(ActError::NonFinite { what: "transient vector", index: 4 }));
        assert_eq!(swapped, Err(ActError::NonFinite { what: "fundamental vector", index: 7 }));
    }
}

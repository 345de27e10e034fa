//! models::optimize — closed-form optimal Actor, Behavior, Object, or Setting.
//!
//! Purpose
//! -------
//! Solve for the EPA triple of one event element that minimizes deflection
//! while every other element keeps its fundamentals, following Heise's
//! "optimal behavior" / "optimal identity" solutions (Heise 2007, pp. 81–95).
//!
//! Key behaviors
//! -------------
//! - Write the combined vector as an affine function of the target triple
//!   `x`: `r(x) = r₀ + R·x`. The fundamental half selects `x` directly; the
//!   transient half comes from [`InteractionPattern::linearize`], or is
//!   constant for explicit transients.
//! - Differentiate `U(x) = r(x)ᵗ W r(x) + vft·r(x)` and solve the 3×3 normal
//!   system `(Rᵗ Ŵ R) x = −Rᵗ (Ŵ r₀ + vft)` with `Ŵ = W + Wᵗ`.
//! - Report the optimal triple together with the deflection of the original
//!   event and of the event rebuilt around the optimum.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every interaction term references each role at most once (enforced by
//!   the term grammar), so `U` is exactly quadratic in `x`.
//! - The system matrix is symmetric by construction. Eigenvalues at or below
//!   [`SINGULAR_EPS`] times the largest magnitude are treated as zero.
//! - No clamping to culturally observed EPA ranges is applied; the solution
//!   is the unconstrained minimizer.
//!
//! Conventions
//! -----------
//! - `ndarray` carries the assembly; the 3×3 solve runs on
//!   `nalgebra::DMatrix` via an eigen check followed by a Cholesky solve.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the exact recovery of explicit transients, the
//!   non-increase of deflection after optimization, the zero-gradient
//!   condition at the optimum (checked with finite differences), and the
//!   singular and missing-element error paths.
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, s};
use tracing::debug;

use crate::impression::{
    core::epa::{EPA_DIM, Epa, Role},
    errors::{ActError, ActResult},
    models::event::Event,
};

/// Relative eigenvalue threshold below which the system is singular.
pub const SINGULAR_EPS: f64 = 1e-10;

/// Result of optimizing one element of an event.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalElement {
    pub role: Role,
    /// Deflection-minimizing EPA triple.
    pub epa: Epa,
    /// Deflection of the event as given.
    pub deflection_before: f64,
    /// Deflection after substituting `epa`.
    pub deflection_after: f64,
}

/// optimize — closed-form deflection minimizer for one element.
///
/// Parameters
/// ----------
/// - `event`: `&Event`
///   Fully built event; its options (weights, `M`, transient spec,
///   first-order weights) define the objective.
/// - `role`: [`Role`]
///   Element to solve for.
///
/// Returns
/// -------
/// `ActResult<OptimalElement>`
///   Optimal triple with before/after deflection.
///
/// Errors
/// ------
/// - [`ActError::MissingRole`] when the event has no element at `role`.
/// - [`ActError::SingularSystem`] when the normal system is not invertible,
///   e.g. when neither the fundamentals nor the transients depend on `x`
///   under the configured weights.
/// - [`ActError::NonConvex`] when the system has a negative eigenvalue, so
///   the stationary point is not a minimum.
///
/// Notes
/// -----
/// - With explicit transients and identity weights the solution is the
///   element's own slice of `t`.
pub fn optimize(event: &Event, role: Role) -> ActResult<OptimalElement> {
    event.fundamentals().get(role).ok_or(ActError::MissingRole { role })?;
    let (r0, r) = affine_parts(event, role)?;

    let w = event.weight_matrix();
    let w_sym = w + &w.t();
    let w_r = w_sym.dot(&r);
    let a = r.t().dot(&w_r);
    let b = -(r.t().dot(&(w_sym.dot(&r0) + event.vft())));

    let x = solve_symmetric(&a, &b, role)?;
    let epa = Epa::new(x[0], x[1], x[2]);
    let optimized = event.with_element(role, epa)?;
    debug!(
        %role,
        before = event.deflection(),
        after = optimized.deflection(),
        "solved optimal element"
    );

    Ok(OptimalElement {
        role,
        epa,
        deflection_before: event.deflection(),
        deflection_after: optimized.deflection(),
    })
}

/// Split the combined vector into `r₀ + R·x` for the triple of `role`.
fn affine_parts(event: &Event, role: Role) -> ActResult<(Array1<f64>, Array2<f64>)> {
    let f = event.fundamental_vector();
    let n = f.len();
    let t = event.transients();
    let offset = EPA_DIM * role.index();

    let mut r0 = event.combined();
    let mut r = Array2::<f64>::zeros((n + t.len(), EPA_DIM));
    for k in 0..EPA_DIM {
        r0[offset + k] = 0.0;
        r[[offset + k, k]] = 1.0;
    }
    if let Some(pattern) = event.pattern() {
        let (g, h) = pattern.linearize(f.view(), role)?;
        r0.slice_mut(s![n..]).assign(&g);
        r.slice_mut(s![n.., ..]).assign(&h);
    }
    Ok((r0, r))
}

/// Solve `a·x = b` for a symmetric 3×3 `a`, rejecting singular and
/// indefinite systems.
fn solve_symmetric(a: &Array2<f64>, b: &Array1<f64>, role: Role) -> ActResult<Array1<f64>> {
    let dim = a.nrows();
    let mut a_nalg = DMatrix::<f64>::zeros(dim, dim);
    fill_dmatrix(a, &mut a_nalg);
    let b_nalg = DVector::from_iterator(dim, b.iter().copied());

    let eigenvals = a_nalg.clone().symmetric_eigen().eigenvalues;
    let scale = eigenvals.iter().fold(0.0_f64, |acc, l| acc.max(l.abs()));
    let min = eigenvals.iter().copied().fold(f64::INFINITY, f64::min);
    if !scale.is_finite() || scale == 0.0 || min.abs() <= SINGULAR_EPS * scale {
        return Err(ActError::SingularSystem { role });
    }
    if min < 0.0 {
        return Err(ActError::NonConvex { role, min_eigenvalue: min });
    }

    let chol = a_nalg.cholesky().ok_or(ActError::SingularSystem { role })?;
    let x = chol.solve(&b_nalg);
    Ok(Array1::from_iter(x.iter().copied()))
}

/// Copy a square `ndarray` matrix into a preallocated `DMatrix`.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    for j in 0..src.ncols() {
        for i in 0..src.nrows() {
            dst[(i, j)] = src[[i, j]];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impression::core::{
        coefficients::{CoefficientTable, Method},
        epa::Fundamentals,
        options::{EventOptions, FirstOrderWeights, TransientSpec, WeightSpec},
        pattern::PatternName,
    };
    use finitediff::FiniteDiff;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact recovery of explicit transients under identity weights.
    // - Non-increase of deflection for pattern-based events with M.
    // - The zero-gradient condition at the optimum (finite differences).
    // - Settings-aware (ABOS) events, including the Setting as target.
    // - Events driven by the built-in coefficient dataset.
    // - Singular and missing-element error paths.
    // -------------------------------------------------------------------------

    fn funds() -> Fundamentals {
        Fundamentals::new(Epa::new(1.0, 1.0, 0.0), Epa::new(-2.0, 0.5, 0.0), Epa::new(0.0, 0.0, 0.0))
    }

    fn heise_like_m() -> Array2<f64> {
        coefficients_for(31, 9)
    }

    /// Deterministic `terms × n` matrix: 0.6 on the linear rows' own
    /// coordinates, small values elsewhere.
    fn coefficients_for(terms: usize, n: usize) -> Array2<f64> {
        Array2::from_shape_fn((terms, n), |(j, k)| {
            if (1..=n).contains(&j) && j - 1 == k {
                0.6
            } else {
                (((j * 7 + k * 3) % 11) as f64) / 50.0 - 0.1
            }
        })
    }

    fn pattern_event() -> Event {
        let opts = EventOptions::new()
            .with_coefficients(heise_like_m())
            .with_transients(TransientSpec::Named(PatternName::Heise));
        Event::new(funds(), opts).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // With explicit transients and identity weights the optimal element is
    // its own slice of `t`, and deflection drops by that slice's share.
    //
    // Given
    // -----
    // - Reference fundamentals and explicit t = [0.5, -0.5, 1, 0, …, 0].
    //
    // Expect
    // ------
    // - Optimal Actor = (0.5, -0.5, 1.0).
    // - deflection_after = deflection_before − ‖f_A − t_A‖².
    fn explicit_transients_recover_element_slice() {
        // Arrange
        let t = array![0.5, -0.5, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let opts = EventOptions::new().with_transients(TransientSpec::Explicit(t));
        let event = Event::new(funds(), opts).unwrap();

        // Act
        let opt = optimize(&event, Role::Actor).unwrap();

        // Assert
        assert!((opt.epa.e - 0.5).abs() < 1e-10);
        assert!((opt.epa.p + 0.5).abs() < 1e-10);
        assert!((opt.epa.a - 1.0).abs() < 1e-10);
        let actor_share = 0.25 + 2.25 + 1.0;
        assert!((opt.deflection_before - opt.deflection_after - actor_share).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Re-optimizing any element of a pattern-based event never increases
    // deflection.
    //
    // Given
    // -----
    // - Heise pattern, a 31×9 M, identity weights.
    //
    // Expect
    // ------
    // - For Actor, Behavior, and Object: after ≤ before.
    fn optimization_never_increases_deflection() {
        // Arrange
        let event = pattern_event();

        for role in [Role::Actor, Role::Behavior, Role::Object] {
            // Act
            let opt = optimize(&event, role).unwrap();

            // Assert
            assert!(
                opt.deflection_after <= opt.deflection_before + 1e-12,
                "{role}: {} > {}",
                opt.deflection_after,
                opt.deflection_before
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // The closed-form optimum is a stationary point of deflection viewed as
    // a function of the target triple.
    //
    // Given
    // -----
    // - The pattern event with uniform first-order weights on both sides.
    //
    // Expect
    // ------
    // - Central-difference gradient at the optimum is ~0 in every axis.
    fn optimum_has_zero_gradient() {
        // Arrange
        let opts = EventOptions::new()
            .with_coefficients(heise_like_m())
            .with_fundamental_weights(FirstOrderWeights::Uniform)
            .with_transient_weights(FirstOrderWeights::Uniform);
        let event = Event::new(funds(), opts).unwrap();

        // Act
        let opt = optimize(&event, Role::Behavior).unwrap();
        let x = vec![opt.epa.e, opt.epa.p, opt.epa.a];
        let cost = |x: &Vec<f64>| -> f64 {
            event
                .with_element(Role::Behavior, Epa::new(x[0], x[1], x[2]))
                .map(|e| e.deflection())
                .unwrap_or(f64::NAN)
        };
        let grad = x.central_diff(&cost);

        // Assert
        for g in grad {
            assert!(g.abs() < 1e-5, "gradient component {g} is not ~0");
        }
    }

    #[test]
    // Purpose
    // -------
    // A zero base weight removes all dependence on the element, so the
    // system is singular.
    fn zero_weight_is_singular() {
        let opts = EventOptions::new()
            .with_transients(TransientSpec::Explicit(Array1::zeros(9)))
            .with_weights(WeightSpec::Explicit(Array2::zeros((9, 9))));
        let event = Event::new(funds(), opts).unwrap();

        let res = optimize(&event, Role::Object);

        assert_eq!(res, Err(ActError::SingularSystem { role: Role::Object }));
    }

    #[test]
    // Purpose
    // -------
    // A negative-definite base weight has no minimum.
    fn negative_weight_is_non_convex() {
        let opts = EventOptions::new()
            .with_transients(TransientSpec::Explicit(Array1::zeros(9)))
            .with_weights(WeightSpec::Explicit(-Array2::<f64>::eye(9)));
        let event = Event::new(funds(), opts).unwrap();

        let res = optimize(&event, Role::Actor);

        assert!(matches!(res, Err(ActError::NonConvex { role: Role::Actor, .. })));
    }

    #[test]
    fn missing_setting_is_reported() {
        let res = optimize(&pattern_event(), Role::Setting);
        assert_eq!(res, Err(ActError::MissingRole { role: Role::Setting }));
    }

    #[test]
    // Purpose
    // -------
    // A settings-aware event evaluates the projected squared distance and
    // its Setting can be optimized like any other element.
    //
    // Given
    // -----
    // - Reference ABO fundamentals plus Setting (0.5, 1.0, -0.5).
    // - Heise pattern for four participants and a 34×12 M.
    //
    // Expect
    // ------
    // - 34 transient terms and deflection == ‖f − Mᵗt‖².
    // - Optimizing the Setting and the Actor never increases deflection.
    // - The optimal Setting reproduces the reported after-deflection.
    fn settings_event_optimizes_setting() {
        // Arrange
        let funds = funds().with_setting(Epa::new(0.5, 1.0, -0.5));
        let m = coefficients_for(34, 12);
        let opts = EventOptions::new().with_coefficients(m.clone());
        let event = Event::new(funds, opts).unwrap();

        // Act
        let setting = optimize(&event, Role::Setting).unwrap();
        let actor = optimize(&event, Role::Actor).unwrap();

        // Assert
        assert_eq!(event.transients().len(), 34);
        let diff = event.fundamental_vector() - &m.t().dot(event.transients());
        assert!((event.deflection() - diff.dot(&diff)).abs() < 1e-10);
        assert!(setting.deflection_after <= setting.deflection_before + 1e-12);
        assert!(actor.deflection_after <= actor.deflection_before + 1e-12);
        let rebuilt = event.with_element(Role::Setting, setting.epa).unwrap();
        assert!((rebuilt.deflection() - setting.deflection_after).abs() < 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // The built-in coefficient dataset, paired with its predictor terms,
    // drives a full event and its optimization.
    //
    // Given
    // -----
    // - `for_method("Heise")` with `Method::Heise.pattern()` over ABO.
    //
    // Expect
    // ------
    // - 11 transient terms; deflection == ‖f − Mᵗt‖².
    // - Object impressions equal Object fundamentals (carried equations).
    // - Optimizing the Behavior never increases deflection.
    fn builtin_dataset_drives_event() {
        // Arrange
        let table = CoefficientTable::for_method("Heise").unwrap();
        let opts = EventOptions::new()
            .with_equations(&table, Method::Heise.pattern().unwrap(), 3)
            .unwrap();

        // Act
        let event = Event::new(funds(), opts).unwrap();
        let opt = optimize(&event, Role::Behavior).unwrap();

        // Assert
        assert_eq!(event.transients().len(), 11);
        let m = event.options().coefficients.clone().unwrap();
        let tau = m.t().dot(event.transients());
        let diff = event.fundamental_vector() - &tau;
        assert!((event.deflection() - diff.dot(&diff)).abs() < 1e-10);
        let impressions = event.transient_impressions().unwrap();
        assert_eq!(impressions.object, funds().object);
        assert!(opt.deflection_after <= opt.deflection_before + 1e-12);
    }
}

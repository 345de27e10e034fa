//! Simple deflection — the matrix-free evaluator.
//!
//! Given flat fundamental and transient EPA lists in the same layout
//! (`Ae Ap Aa Be Bp Ba Oe Op Oa [Se Sp Sa]`), deflection is
//! `Σ (f_i − t_i)²`. This evaluator is independent of the quadratic form in
//! [`Event`](crate::impression::Event); the two agree only when the event is
//! built with an identity weight, no coefficient matrix, and no first-order
//! weights.
use ndarray::{Array1, ArrayView1};

use crate::impression::errors::{ActError, ActResult};

/// Per-component view of a simple deflection.
#[derive(Debug, Clone, PartialEq)]
pub struct DeflectionBreakdown {
    pub deflection: f64,
    pub fundamentals: Array1<f64>,
    pub transients: Array1<f64>,
    pub squared_differences: Array1<f64>,
}

/// Sum of squared fundamental/transient differences.
///
/// # Errors
/// - [`ActError::LengthMismatch`] if the inputs differ in length.
pub fn simple_deflection(fundamentals: &[f64], transients: &[f64]) -> ActResult<f64> {
    check_lengths(fundamentals, transients)?;
    Ok(fundamentals.iter().zip(transients).map(|(f, t)| (f - t) * (f - t)).sum())
}

/// [`simple_deflection`] plus the inputs and per-component squared
/// differences, for inspecting which elements drive deflection.
pub fn simple_deflection_breakdown(
    fundamentals: &[f64], transients: &[f64],
) -> ActResult<DeflectionBreakdown> {
    check_lengths(fundamentals, transients)?;
    let f = ArrayView1::from(fundamentals);
    let t = ArrayView1::from(transients);
    let squared_differences = (&f - &t).mapv(|d| d * d);
    Ok(DeflectionBreakdown {
        deflection: squared_differences.sum(),
        fundamentals: f.to_owned(),
        transients: t.to_owned(),
        squared_differences,
    })
}

fn check_lengths(fundamentals: &[f64], transients: &[f64]) -> ActResult<()> {
    if fundamentals.len() != transients.len() {
        return Err(ActError::LengthMismatch {
            fundamentals: fundamentals.len(),
            transients: transients.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUNDS: [f64; 9] = [1.0, 1.0, 0.0, -2.0, 0.5, 0.0, 0.0, 0.0, 0.0];

    #[test]
    // Purpose
    // -------
    // Reference scenario: transients equal to fundamentals give zero, all-zero
    // transients give the squared norm.
    //
    // Given
    // -----
    // - Actor (1, 1, 0), Behavior (-2, 0.5, 0), Object (0, 0, 0).
    //
    // Expect
    // ------
    // - simple_deflection(f, f) = 0.
    // - simple_deflection(f, 0) = 1 + 1 + 4 + 0.25 = 6.25.
    fn reference_event_scenarios() {
        // Arrange
        let zeros = [0.0; 9];

        // Act
        let same = simple_deflection(&FUNDS, &FUNDS).unwrap();
        let neutral = simple_deflection(&FUNDS, &zeros).unwrap();

        // Assert
        assert_eq!(same, 0.0);
        assert!((neutral - 6.25).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Deflection is symmetric in its arguments.
    fn simple_deflection_is_symmetric() {
        let t = [0.3, -1.2, 2.0, 0.0, 4.1, -0.7, 1.0, 1.0, -3.3];

        let ft = simple_deflection(&FUNDS, &t).unwrap();
        let tf = simple_deflection(&t, &FUNDS).unwrap();

        assert_eq!(ft, tf);
    }

    #[test]
    fn mismatched_lengths_fail() {
        let res = simple_deflection(&FUNDS, &[0.0; 12]);
        assert_eq!(res, Err(ActError::LengthMismatch { fundamentals: 9, transients: 12 }));
        assert!(simple_deflection_breakdown(&[1.0], &[]).is_err());
    }

    #[test]
    // Purpose
    // -------
    // The breakdown carries the inputs and squared differences that sum to
    // the scalar deflection.
    fn breakdown_components_sum_to_deflection() {
        let zeros = [0.0; 9];

        let b = simple_deflection_breakdown(&FUNDS, &zeros).unwrap();

        assert_eq!(b.fundamentals.to_vec(), FUNDS.to_vec());
        assert_eq!(b.transients.to_vec(), zeros.to_vec());
        assert_eq!(b.squared_differences[3], 4.0);
        assert!((b.deflection - b.squared_differences.sum()).abs() < 1e-15);
        assert!((b.deflection - 6.25).abs() < 1e-12);
    }
}

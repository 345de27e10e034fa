//! Coefficient tables — named weighting series for impression equations.
//!
//! Purpose
//! -------
//! Hold the estimated coefficients of the impression-formation equations as
//! named series keyed by equation (`"Ae"`, `"Ap"`, …, `"Sa"`), and assemble
//! them into the coefficient matrix `M` in a requested column order.
//!
//! Key behaviors
//! -------------
//! - [`CoefficientTable::for_method`] returns the built-in dataset for a
//!   method drawn from the closed [`Method`] enumeration.
//! - [`CoefficientTable::custom`] accepts any caller-supplied table whose keys
//!   are equation names; series lengths are trusted at this point.
//! - [`CoefficientTable::from_ztable`] / [`CoefficientTable::from_matrix`]
//!   turn the `M` half of a parsed Z-table back into named series.
//! - [`CoefficientTable::coefficient_matrix`] stacks series into a
//!   `terms × keys` matrix; [`CoefficientTable::completed_matrix`] fills in
//!   equations the table lacks so a partial dataset (such as the built-in
//!   Actor/Behavior series) can drive a full ABO event.
//! - Each [`Method`] names the predictor terms its rows encode
//!   ([`Method::pattern`]).
//!
//! Conventions
//! -----------
//! - Column order of a full table is `Ae Ap Aa Be Bp Ba Oe Op Oa [Se Sp Sa]`
//!   ([`EQUATION_KEYS`]).
//! - Built-in datasets are stored as data in [`HEISE_DEFAULT`], never as
//!   branches in code.
use std::str::FromStr;

use ndarray::{Array2, ArrayView2};

use crate::impression::{
    core::{matrices::ZTable, pattern::InteractionPattern},
    errors::{ActError, ActResult},
};

/// Equation names in canonical column order.
pub const EQUATION_KEYS: [&str; 12] =
    ["Ae", "Ap", "Aa", "Be", "Bp", "Ba", "Oe", "Op", "Oa", "Se", "Sp", "Sa"];

/// Default Actor/Behavior weighting series.
pub const HEISE_DEFAULT: [(&str, [f64; 11]); 6] = [
    ("Ae", [-0.31, 0.47, 0.00, 0.00, 0.24, 0.00, 0.00, 0.08, -0.06, 0.00, -0.07]),
    ("Ap", [-0.57, 0.00, 0.37, 0.00, 0.16, 0.00, 0.21, 0.00, 0.00, 0.00, 0.00]),
    ("Aa", [-0.19, 0.00, -0.07, 0.57, 0.10, -0.18, 0.37, 0.00, 0.00, 0.02, 0.00]),
    ("Be", [-0.45, 0.31, 0.00, 0.00, 0.29, 0.00, 0.00, 0.07, -0.08, 0.00, 0.00]),
    ("Bp", [-0.53, 0.07, 0.22, 0.00, 0.07, 0.16, 0.13, 0.00, 0.00, 0.00, 0.00]),
    ("Ba", [-0.26, 0.00, -0.06, 0.43, 0.07, -0.14, 0.45, 0.02, 0.00, 0.00, 0.00]),
];

/// Predictor terms of the [`HEISE_DEFAULT`] series, in row order.
pub const HEISE_DEFAULT_TERMS: [&str; 11] =
    ["1", "Ae", "Ap", "Aa", "Be", "Bp", "Ba", "Oe", "Op", "Oa", "BeOe"];

/// Estimation methods with a built-in dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Heise,
}

impl Method {
    pub const VALID: &'static [&'static str] = &["Heise"];

    /// Predictor term labels matching the rows of the method's series.
    pub fn terms(self) -> &'static [&'static str] {
        match self {
            Method::Heise => &HEISE_DEFAULT_TERMS,
        }
    }

    /// The method's predictor terms as a transient-estimation pattern.
    pub fn pattern(self) -> ActResult<InteractionPattern> {
        InteractionPattern::from_terms(self.terms())
    }
}

impl FromStr for Method {
    type Err = ActError;

    fn from_str(s: &str) -> ActResult<Self> {
        match s {
            "Heise" => Ok(Method::Heise),
            other => Err(ActError::UnknownMethod { name: other.to_string(), valid: Method::VALID }),
        }
    }
}

/// Immutable lookup of named coefficient series.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    series: Vec<(String, Vec<f64>)>,
}

impl CoefficientTable {
    /// Built-in dataset for `method`.
    pub fn builtin(method: Method) -> Self {
        match method {
            Method::Heise => CoefficientTable {
                series: HEISE_DEFAULT.iter().map(|(k, v)| (k.to_string(), v.to_vec())).collect(),
            },
        }
    }

    /// Built-in dataset looked up by (case-sensitive) method name.
    ///
    /// # Errors
    /// - [`ActError::UnknownMethod`] naming the value and the valid set.
    pub fn for_method(name: &str) -> ActResult<Self> {
        Ok(CoefficientTable::builtin(name.parse()?))
    }

    /// Caller-supplied table. Keys must be equation names; series lengths
    /// are not checked until [`coefficient_matrix`](Self::coefficient_matrix).
    ///
    /// # Errors
    /// - [`ActError::MissingEquation`] for a key outside [`EQUATION_KEYS`].
    pub fn custom<I, K>(series: I) -> ActResult<Self>
    where
        I: IntoIterator<Item = (K, Vec<f64>)>,
        K: Into<String>,
    {
        let series: Vec<(String, Vec<f64>)> =
            series.into_iter().map(|(k, v)| (k.into(), v)).collect();
        if let Some((k, _)) = series.iter().find(|(k, _)| !EQUATION_KEYS.contains(&k.as_str())) {
            return Err(ActError::MissingEquation { key: k.clone() });
        }
        Ok(CoefficientTable { series })
    }

    /// Named series from the columns of a coefficient matrix `m`, labelled
    /// with the first `m.ncols()` entries of [`EQUATION_KEYS`].
    ///
    /// # Errors
    /// - [`ActError::ShapeMismatch`] if `m` has more than 12 columns.
    pub fn from_matrix(m: ArrayView2<f64>) -> ActResult<Self> {
        if m.ncols() > EQUATION_KEYS.len() {
            return Err(ActError::ShapeMismatch {
                what: "coefficient matrix",
                expected: (m.nrows(), EQUATION_KEYS.len()),
                found: m.dim(),
            });
        }
        let series = m
            .columns()
            .into_iter()
            .zip(EQUATION_KEYS)
            .map(|(col, key)| (key.to_string(), col.to_vec()))
            .collect();
        Ok(CoefficientTable { series })
    }

    /// Named series from the `M` half of a parsed Z-table, labelled with the
    /// table's own column names.
    pub fn from_ztable(table: &ZTable) -> Self {
        let series = table
            .m
            .columns()
            .into_iter()
            .zip(&table.columns)
            .map(|(col, key)| (key.clone(), col.to_vec()))
            .collect();
        CoefficientTable { series }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|(k, _)| k.as_str())
    }

    pub fn series(&self, key: &str) -> Option<&[f64]> {
        self.series.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_slice())
    }

    /// Stack the series named by `keys` into a `terms × keys.len()` matrix.
    ///
    /// # Errors
    /// - [`ActError::MissingEquation`] if a key is absent.
    /// - [`ActError::DimensionError`] if the series differ in length.
    pub fn coefficient_matrix(&self, keys: &[&str]) -> ActResult<Array2<f64>> {
        let cols = keys
            .iter()
            .map(|k| self.series(k).ok_or_else(|| ActError::MissingEquation { key: k.to_string() }))
            .collect::<ActResult<Vec<_>>>()?;
        let rows = cols.first().map_or(0, |c| c.len());
        if let Some(bad) = cols.iter().find(|c| c.len() != rows) {
            return Err(ActError::DimensionError {
                what: "coefficient series",
                expected: rows,
                found: bad.len(),
            });
        }
        Ok(Array2::from_shape_fn((rows, cols.len()), |(i, j)| cols[j][i]))
    }

    /// Coefficient matrix over `keys` for the terms of `pattern`, with every
    /// equation the table lacks completed as a carry-over: its column selects
    /// the pattern's linear term of the same name, so that coordinate's
    /// transient equals its fundamental.
    ///
    /// Parameters
    /// ----------
    /// - `pattern`: [`InteractionPattern`]
    ///   Predictor terms; row `j` of the result pairs with term `j`.
    /// - `keys`: `&[&str]`
    ///   Equation names of the columns, typically `EQUATION_KEYS[..n]`.
    ///
    /// Errors
    /// ------
    /// - [`ActError::DimensionError`] if a present series does not have one
    ///   coefficient per pattern term.
    /// - [`ActError::MissingEquation`] if an absent equation has no linear term
    ///   in `pattern` to carry over.
    pub fn completed_matrix(
        &self, pattern: &InteractionPattern, keys: &[&str],
    ) -> ActResult<Array2<f64>> {
        let names = pattern.term_names();
        let mut m = Array2::<f64>::zeros((names.len(), keys.len()));
        for (col, key) in keys.iter().enumerate() {
            match self.series(key) {
                Some(series) => {
                    if series.len() != names.len() {
                        return Err(ActError::DimensionError {
                            what: "coefficient series",
                            expected: names.len(),
                            found: series.len(),
                        });
                    }
                    for (row, v) in series.iter().enumerate() {
                        m[[row, col]] = *v;
                    }
                }
                None => {
                    let row = names
                        .iter()
                        .position(|name| name == key)
                        .ok_or_else(|| ActError::MissingEquation { key: key.to_string() })?;
                    m[[row, col]] = 1.0;
                }
            }
        }
        Ok(m)
    }

    /// Coefficient matrix over every series in table order.
    pub fn to_matrix(&self) -> ActResult<Array2<f64>> {
        let keys: Vec<&str> = self.keys().collect();
        self.coefficient_matrix(&keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The built-in dataset exposes all six Actor/Behavior series.
    //
    // Given
    // -----
    // - `for_method("Heise")`.
    //
    // Expect
    // ------
    // - Keys Ae, Ap, Aa, Be, Bp, Ba in that order; Ae starts with -0.31.
    fn builtin_table_has_six_named_series() {
        // Act
        let table = CoefficientTable::for_method("Heise").unwrap();

        // Assert
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["Ae", "Ap", "Aa", "Be", "Bp", "Ba"]);
        assert_eq!(table.series("Ae").unwrap()[0], -0.31);
        assert_eq!(table.series("Ba").unwrap().len(), 11);
    }

    #[test]
    // Purpose
    // -------
    // Method names are case-sensitive and outside names are rejected.
    fn unknown_method_is_rejected_case_sensitively() {
        assert!(matches!(
            CoefficientTable::for_method("heise"),
            Err(ActError::UnknownMethod { .. })
        ));
        assert!(matches!(
            CoefficientTable::for_method("Smith-Lovin"),
            Err(ActError::UnknownMethod { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Stacking series follows the requested key order and reports absent
    // keys and ragged series.
    //
    // Given
    // -----
    // - A custom table with Ae = [1, 2] and Ap = [3, 4], and a ragged table.
    //
    // Expect
    // ------
    // - ["Ap", "Ae"] → [[3, 1], [4, 2]].
    // - "Oe" → MissingEquation; ragged → DimensionError.
    fn coefficient_matrix_respects_order_and_validates() {
        // Arrange
        let table = CoefficientTable::custom([("Ae", vec![1.0, 2.0]), ("Ap", vec![3.0, 4.0])])
            .unwrap();
        let ragged =
            CoefficientTable::custom([("Ae", vec![1.0, 2.0]), ("Ap", vec![3.0])]).unwrap();

        // Act + Assert
        assert_eq!(table.coefficient_matrix(&["Ap", "Ae"]).unwrap(), array![[3.0, 1.0], [4.0, 2.0]]);
        assert_eq!(
            table.coefficient_matrix(&["Oe"]),
            Err(ActError::MissingEquation { key: "Oe".to_string() })
        );
        assert!(matches!(ragged.to_matrix(), Err(ActError::DimensionError { .. })));
    }

    #[test]
    fn custom_rejects_non_equation_keys() {
        let res = CoefficientTable::custom([("Xe", vec![0.0])]);
        assert_eq!(res, Err(ActError::MissingEquation { key: "Xe".to_string() }));
    }

    #[test]
    fn from_matrix_round_trips_through_to_matrix() {
        let m = array![[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]];

        let table = CoefficientTable::from_matrix(m.view()).unwrap();

        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["Ae", "Ap", "Aa"]);
        assert_eq!(table.to_matrix().unwrap(), m);
    }

    #[test]
    // Purpose
    // -------
    // Series rebuilt from a parsed Z-table carry the table's column names
    // and reassemble into the same M.
    fn ztable_columns_become_named_series() {
        // Arrange
        let rows = vec![
            vec!["Z00", "0.5", "-0.1"],
            vec!["Z10", "0.6", "0.0"],
            vec!["Z11", "0.0", "0.2"],
        ];
        let table = crate::impression::core::matrices::parse_ztable(&rows, &["Ae", "Ap"]).unwrap();

        // Act
        let coefs = CoefficientTable::from_ztable(&table);

        // Assert
        assert_eq!(coefs.keys().collect::<Vec<_>>(), vec!["Ae", "Ap"]);
        assert_eq!(coefs.series("Ap"), Some(&[-0.1, 0.0, 0.2][..]));
        assert_eq!(coefs.to_matrix().unwrap(), table.m);
    }

    #[test]
    // Purpose
    // -------
    // Completing the built-in series over Ae … Oa yields an 11×9 matrix whose
    // Actor/Behavior columns are the literals and whose Object columns carry
    // the Object fundamentals over unchanged.
    //
    // Given
    // -----
    // - The Heise table with its 11-term predictor pattern.
    //
    // Expect
    // ------
    // - Shape (11, 9); column Ae equals the Ae series.
    // - Column Oe is the unit vector on the "Oe" term (row 7).
    fn completed_matrix_carries_missing_equations() {
        // Arrange
        let table = CoefficientTable::builtin(Method::Heise);
        let pattern = Method::Heise.pattern().unwrap();

        // Act
        let m = table.completed_matrix(&pattern, &EQUATION_KEYS[..9]).unwrap();

        // Assert
        assert_eq!(m.dim(), (11, 9));
        assert_eq!(m.column(0).to_vec(), table.series("Ae").unwrap().to_vec());
        let mut unit = vec![0.0; 11];
        unit[7] = 1.0;
        assert_eq!(m.column(6).to_vec(), unit);
    }

    #[test]
    // Purpose
    // -------
    // Completion fails when a series does not match the pattern or a
    // missing equation has no linear term to carry.
    fn completed_matrix_validates_pattern() {
        let table = CoefficientTable::builtin(Method::Heise);
        let short = InteractionPattern::from_terms(["1", "Ae"]).unwrap();

        let ragged = table.completed_matrix(&short, &["Ae"]);
        let uncarried = table.completed_matrix(&short, &["Op"]);

        assert_eq!(
            ragged,
            Err(ActError::DimensionError { what: "coefficient series", expected: 2, found: 11 })
        );
        assert_eq!(uncarried, Err(ActError::MissingEquation { key: "Op".to_string() }));
    }
}

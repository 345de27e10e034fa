//! Interaction patterns — the term grammar behind transient estimation.
//!
//! Purpose
//! -------
//! Turn declarative lists of term labels (`"1"`, `"Ae"`, `"ApBp"`,
//! `"AeBeOe"`, …) into ordered coordinate products and evaluate them against a
//! fundamental vector. The resulting transient-estimation vector is the
//! right-hand side the coefficient matrix `M` multiplies, so term order must
//! match the row order of `M`.
//!
//! Key behaviors
//! -------------
//! - Parse labels with a closed grammar: each two-character group is a role
//!   letter (`A/B/O/S`) followed by an axis letter (`e/p/a`); the literal
//!   `"1"` is the intercept.
//! - Provide the two built-in estimators, [`PatternName::Heise`] and
//!   [`PatternName::SmithLovin`], each `intercept + linear + interactions`.
//! - Derive a pattern from the digit block of a selection matrix so that a
//!   loaded Z-table lines up with its coefficient rows.
//! - Decompose each term into an affine function of one element's EPA
//!   triple, which the optimizer differentiates.
//!
//! Invariants & assumptions
//! ------------------------
//! - A role appears at most once per term. This keeps every term affine in
//!   any single element, which the closed-form optimizer relies on.
//! - Terms are evaluated against the flat vector layout of
//!   [`Fundamentals::to_vector`](crate::impression::core::epa::Fundamentals::to_vector);
//!   coordinates past its end are reported as
//!   [`ActError::IndexOutOfRange`], never wrapped.
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::impression::{
    core::epa::{Axis, EPA_DIM, Role},
    errors::{ActError, ActResult},
};

/// Label of the constant term.
pub const INTERCEPT_LABEL: &str = "1";

const HEISE_INTERACTIONS: &[&str] = &[
    "AeBe", "AeBp", "AeOe", "ApBe", "ApBp", "ApBa", "ApOe", "ApOp", "ApOa", "AaBp", "AaBa",
    "BeOe", "BeOp", "BpOe", "BpOp", "BpOa", "BaOp", "AeBeOe", "AeBpOp", "ApBpOp", "ApBpOa",
];

const SMITH_LOVIN_INTERACTIONS: &[&str] = &[
    "AeBe", "AeBp", "AeBa", "ApBe", "ApBp", "ApOa", "AaBa", "BeOe", "BeOp", "BpOe", "BpOp",
    "BpOa", "BaOe", "BaOp", "AeBeOe", "AeBpOp", "ApBpOp", "ApBpOa", "AaBaOa",
];

/// One fundamental coordinate: a role and an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub role: Role,
    pub axis: Axis,
}

impl Coord {
    pub fn new(role: Role, axis: Axis) -> Self {
        Coord { role, axis }
    }

    /// Flat index into the fundamental vector.
    pub fn index(&self) -> usize {
        EPA_DIM * self.role.index() + self.axis.index()
    }

    pub fn from_index(i: usize) -> Option<Coord> {
        let role = Role::from_index(i / EPA_DIM)?;
        Some(Coord { role, axis: Axis::ALL[i % EPA_DIM] })
    }
}

/// One term of an interaction pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Constant `1`.
    Intercept,
    /// Product of one or more coordinates with distinct roles.
    Product(Vec<Coord>),
}

impl Term {
    /// Parse a term label such as `"1"`, `"Ae"`, or `"ApBpOa"`.
    ///
    /// # Errors
    /// - [`ActError::InvalidTerm`] for an odd-length or empty label, an
    ///   unknown role/axis letter, or a role that appears twice.
    pub fn parse(label: &str) -> ActResult<Term> {
        if label == INTERCEPT_LABEL {
            return Ok(Term::Intercept);
        }
        let chars: Vec<char> = label.chars().collect();
        if chars.is_empty() || chars.len() % 2 != 0 {
            return Err(ActError::InvalidTerm {
                term: label.to_string(),
                reason: "expected one or more role/axis letter pairs",
            });
        }
        let mut coords = Vec::with_capacity(chars.len() / 2);
        for pair in chars.chunks(2) {
            let role = Role::from_letter(pair[0]).ok_or_else(|| ActError::InvalidTerm {
                term: label.to_string(),
                reason: "role letter must be one of A, B, O, S",
            })?;
            let axis = Axis::from_letter(pair[1]).ok_or_else(|| ActError::InvalidTerm {
                term: label.to_string(),
                reason: "axis letter must be one of e, p, a",
            })?;
            coords.push(Coord::new(role, axis));
        }
        Term::product(coords, label)
    }

    fn product(coords: Vec<Coord>, label: &str) -> ActResult<Term> {
        for (i, c) in coords.iter().enumerate() {
            if coords[..i].iter().any(|prev| prev.role == c.role) {
                return Err(ActError::InvalidTerm {
                    term: label.to_string(),
                    reason: "a role may appear at most once per term",
                });
            }
        }
        Ok(Term::Product(coords))
    }

    /// Render the term back into its label.
    pub fn label(&self) -> String {
        match self {
            Term::Intercept => INTERCEPT_LABEL.to_string(),
            Term::Product(coords) => {
                coords.iter().flat_map(|c| [c.role.letter(), c.axis.letter()]).collect()
            }
        }
    }

    /// Evaluate the term at a fundamental vector.
    pub fn evaluate(&self, f: ArrayView1<f64>) -> ActResult<f64> {
        match self {
            Term::Intercept => Ok(1.0),
            Term::Product(coords) => {
                let mut acc = 1.0;
                for c in coords {
                    acc *= self.lookup(f, *c)?;
                }
                Ok(acc)
            }
        }
    }

    /// Split the term into `g + h·x`, where `x` is the EPA triple of `role`.
    ///
    /// Returns `(g, h)`: `g` is the value of the term when it does not
    /// involve `role` (0 otherwise) and `h[axis]` is the product of the
    /// remaining coordinates for the one axis of `role` the term references.
    pub fn affine_in(&self, f: ArrayView1<f64>, role: Role) -> ActResult<(f64, [f64; EPA_DIM])> {
        let mut h = [0.0; EPA_DIM];
        match self {
            Term::Intercept => Ok((1.0, h)),
            Term::Product(coords) => {
                let mut rest = 1.0;
                let mut hit = None;
                for c in coords {
                    if c.role == role {
                        hit = Some(c.axis);
                    } else {
                        rest *= self.lookup(f, *c)?;
                    }
                }
                match hit {
                    Some(axis) => {
                        h[axis.index()] = rest;
                        Ok((0.0, h))
                    }
                    None => Ok((rest, h)),
                }
            }
        }
    }

    fn lookup(&self, f: ArrayView1<f64>, c: Coord) -> ActResult<f64> {
        f.get(c.index()).copied().ok_or_else(|| ActError::IndexOutOfRange {
            term: self.label(),
            index: c.index(),
            len: f.len(),
        })
    }
}

/// Built-in transient estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternName {
    /// Heise's OLS equations: 21 interaction terms.
    Heise,
    /// Smith-Lovin's equations: 19 interaction terms.
    SmithLovin,
}

impl PatternName {
    pub const VALID: &'static [&'static str] = &["Heise", "Smith-Lovin"];

    pub fn as_str(self) -> &'static str {
        match self {
            PatternName::Heise => "Heise",
            PatternName::SmithLovin => "Smith-Lovin",
        }
    }

    pub fn interactions(self) -> &'static [&'static str] {
        match self {
            PatternName::Heise => HEISE_INTERACTIONS,
            PatternName::SmithLovin => SMITH_LOVIN_INTERACTIONS,
        }
    }
}

impl FromStr for PatternName {
    type Err = ActError;

    fn from_str(s: &str) -> ActResult<Self> {
        match s {
            "Heise" => Ok(PatternName::Heise),
            "Smith-Lovin" => Ok(PatternName::SmithLovin),
            other => Err(ActError::InvalidPattern {
                name: other.to_string(),
                valid: PatternName::VALID,
            }),
        }
    }
}

/// `InteractionPattern` — ordered list of transient-estimation terms.
///
/// Purpose
/// -------
/// Select which nonlinear combinations of fundamentals predict the transient
/// impression and in which order, so that the resolved vector matches the
/// rows of the paired coefficient matrix.
///
/// Invariants
/// ----------
/// - Immutable once built; every term satisfies the one-role-per-term rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionPattern {
    terms: Vec<Term>,
}

impl InteractionPattern {
    /// Build a built-in pattern for an event with `participants` elements
    /// (3, or 4 with a Setting).
    ///
    /// Layout: intercept, then the `3 * participants` linear terms in
    /// canonical order, then the method's interaction terms.
    pub fn named(name: PatternName, participants: usize) -> Self {
        let mut terms = Vec::with_capacity(1 + EPA_DIM * participants + name.interactions().len());
        terms.push(Term::Intercept);
        terms.extend(
            (0..EPA_DIM * participants)
                .filter_map(Coord::from_index)
                .map(|c| Term::Product(vec![c])),
        );
        // Built-in labels are well formed.
        terms.extend(name.interactions().iter().filter_map(|l| Term::parse(l).ok()));
        InteractionPattern { terms }
    }

    /// Parse a pattern name (`"Heise"` or `"Smith-Lovin"`).
    ///
    /// # Errors
    /// - [`ActError::InvalidPattern`] naming the offending value.
    pub fn from_name(name: &str, participants: usize) -> ActResult<Self> {
        Ok(InteractionPattern::named(name.parse()?, participants))
    }

    /// Build a custom pattern from term labels, in the given order.
    pub fn from_terms<I, S>(labels: I) -> ActResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = labels.into_iter().map(|l| Term::parse(l.as_ref())).collect::<ActResult<_>>()?;
        Ok(InteractionPattern { terms })
    }

    /// Derive a pattern from the digit block of a selection matrix.
    ///
    /// `z` is the full selection matrix (identity block of size `k` stacked
    /// over the digit block). Each digit row becomes one term: an all-zero
    /// row is the intercept; otherwise the term multiplies every coordinate
    /// whose column holds a `1`.
    ///
    /// # Errors
    /// - [`ActError::ShapeMismatch`] if `z` has fewer than `k` rows or not
    ///   `k` columns.
    /// - [`ActError::InvalidTerm`] for digits other than 0/1, or rows that
    ///   select two coordinates of the same role.
    pub fn from_selection(z: ArrayView2<u8>, k: usize) -> ActResult<Self> {
        if z.ncols() != k || z.nrows() < k {
            return Err(ActError::ShapeMismatch {
                what: "selection matrix",
                expected: (k, k),
                found: z.dim(),
            });
        }
        let mut terms = Vec::with_capacity(z.nrows() - k);
        for row in z.rows().into_iter().skip(k) {
            let label: String = row.iter().map(|&d| char::from(b'0' + d.min(9))).collect();
            let mut coords = Vec::new();
            for (j, &d) in row.iter().enumerate() {
                match d {
                    0 => {}
                    1 => coords.push(Coord::from_index(j).ok_or_else(|| ActError::InvalidTerm {
                        term: label.clone(),
                        reason: "selection column beyond the Setting",
                    })?),
                    _ => {
                        return Err(ActError::InvalidTerm {
                            term: label,
                            reason: "selection digits must be 0 or 1",
                        });
                    }
                }
            }
            if coords.is_empty() {
                terms.push(Term::Intercept);
            } else {
                terms.push(Term::product(coords, &label)?);
            }
        }
        Ok(InteractionPattern { terms })
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn term_names(&self) -> Vec<String> {
        self.terms.iter().map(Term::label).collect()
    }

    /// Resolve the transient-estimation vector for fundamentals `f`.
    pub fn resolve(&self, f: ArrayView1<f64>) -> ActResult<Array1<f64>> {
        self.terms.iter().map(|t| t.evaluate(f)).collect::<ActResult<Vec<_>>>().map(Array1::from)
    }

    /// Affine decomposition `t(x) = g + H·x` in the EPA triple of `role`,
    /// holding every other coordinate of `f` fixed.
    pub fn linearize(&self, f: ArrayView1<f64>, role: Role) -> ActResult<(Array1<f64>, Array2<f64>)> {
        let mut g = Array1::zeros(self.terms.len());
        let mut h = Array2::zeros((self.terms.len(), EPA_DIM));
        for (j, term) in self.terms.iter().enumerate() {
            let (gj, hj) = term.affine_in(f, role)?;
            g[j] = gj;
            for (k, v) in hj.iter().enumerate() {
                h[[j, k]] = *v;
            }
        }
        Ok((g, h))
    }
}

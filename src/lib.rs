//! rust_act — Affect Control Theory impression formation with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the ACT engine to Python via the `_rust_act` extension module.
//! When the `python-bindings` feature is enabled, this module defines the
//! Python-facing classes and functions used by the `rust_act` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`impression` and `io`) as the public
//!   crate surface.
//! - Define `#[pyclass]` wrappers ([`Event`], [`OptimalElement`]), module
//!   functions (`simple_deflection`, `construct_mats`, `event_from_labels`),
//!   and the `#[pymodule]` initializer for `_rust_act`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in [`impression`]; this file performs
//!   only FFI glue, argument conversion (see [`utils`]), and error mapping.
//! - Python-visible types mirror the invariants of their Rust counterparts:
//!   an `Event` object always holds a successfully built event.
//!
//! Conventions
//! -----------
//! - Vectors cross the boundary as `list[float]`, matrices as row-major
//!   `list[list[float]]`.
//! - [`impression::ActError`] and [`io::IoError`] convert to `ValueError`.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`impression`] and [`io`] directly and
//!   can ignore the items guarded by `python-bindings`.
//!
//! Testing notes
//! -------------
//! - Engine behavior is covered by unit tests in the inner modules and by
//!   the integration test under `tests/`; the bindings are exercised from
//!   Python.

pub mod impression;
pub mod io;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    impression::{Role, models::optimize::optimize},
    io::{Culture, Delimiter, read_ztable_path},
    utils::{build_event_options, extract_fundamentals, extract_vector, matrix_rows},
};

/// Event — Python-facing wrapper for an evaluated ACT event.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `Event(fundamentals, coefficients=None, selection=None, weights=None,
/// transients=None, fundamental_weights=None, transient_weights=None)`:
/// - `fundamentals`: flat array-like of 9 (ABO) or 12 (ABOS) ratings.
/// - `coefficients`: optional `terms × n` matrix `M`.
/// - `selection`: optional selection matrix `Z` (with `transients="selection"`).
/// - `weights`: `"identity"` (default) or an `n × n` matrix.
/// - `transients`: `"Heise"` (default), `"Smith-Lovin"`, `"selection"`, a
///   list of term labels, or an explicit transient vector.
/// - `fundamental_weights`, `transient_weights`: `None`, `"uniform"`, or a
///   vector.
///
/// Fields
/// ------
/// - `inner`: [`impression::Event`]
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_act", frozen)]
pub struct Event {
    inner: impression::Event,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Event {
    #[new]
    #[pyo3(
        signature = (
            fundamentals,
            coefficients = None,
            selection = None,
            weights = None,
            transients = None,
            fundamental_weights = None,
            transient_weights = None,
        ),
        text_signature = "(fundamentals, /, coefficients=None, selection=None, weights=None, \
                          transients=None, fundamental_weights=None, transient_weights=None)"
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn new<'py>(
        py: Python<'py>, fundamentals: &Bound<'py, PyAny>,
        coefficients: Option<&Bound<'py, PyAny>>, selection: Option<&Bound<'py, PyAny>>,
        weights: Option<&Bound<'py, PyAny>>, transients: Option<&Bound<'py, PyAny>>,
        fundamental_weights: Option<&Bound<'py, PyAny>>,
        transient_weights: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<Self> {
        let funds = extract_fundamentals(py, fundamentals)?;
        let opts = build_event_options(
            py,
            coefficients,
            selection,
            weights,
            transients,
            fundamental_weights,
            transient_weights,
        )?;
        let inner = impression::Event::new(funds, opts)?;
        Ok(Event { inner })
    }

    #[getter]
    pub fn deflection(&self) -> f64 {
        self.inner.deflection()
    }

    #[getter]
    pub fn fundamentals(&self) -> Vec<f64> {
        self.inner.fundamental_vector().to_vec()
    }

    #[getter]
    pub fn transients(&self) -> Vec<f64> {
        self.inner.transients().to_vec()
    }

    /// Term labels of the transient vector, empty for explicit transients.
    #[getter]
    pub fn term_names(&self) -> Vec<String> {
        self.inner.pattern().map(|p| p.term_names()).unwrap_or_default()
    }

    #[getter]
    pub fn weight_matrix(&self) -> Vec<Vec<f64>> {
        matrix_rows(self.inner.weight_matrix())
    }

    #[getter]
    pub fn vft(&self) -> Vec<f64> {
        self.inner.vft().to_vec()
    }

    /// Predicted post-event EPA profile (`Mᵗ·t`, or `t` without `M`).
    pub fn transient_impressions(&self) -> PyResult<Vec<f64>> {
        Ok(self.inner.transient_impressions()?.to_vector().to_vec())
    }

    /// Optimal EPA for `element` (`"actor"`, `"behavior"`, `"object"`,
    /// `"setting"`).
    #[pyo3(signature = (element = "behavior"), text_signature = "(self, /, element='behavior')")]
    pub fn optimize(&self, element: &str) -> PyResult<OptimalElement> {
        let role: Role = element.parse()?;
        let inner = optimize(&self.inner, role)?;
        Ok(OptimalElement { inner })
    }
}

/// OptimalElement — result of `Event.optimize`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_act", frozen)]
pub struct OptimalElement {
    inner: impression::OptimalElement,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl OptimalElement {
    #[getter]
    pub fn element(&self) -> String {
        self.inner.role.to_string()
    }

    #[getter]
    pub fn epa(&self) -> (f64, f64, f64) {
        (self.inner.epa.e, self.inner.epa.p, self.inner.epa.a)
    }

    #[getter]
    pub fn deflection_before(&self) -> f64 {
        self.inner.deflection_before
    }

    #[getter]
    pub fn deflection_after(&self) -> f64 {
        self.inner.deflection_after
    }
}

/// Sum of squared differences between fundamentals and transients.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(fundamentals, transients, /)")]
fn simple_deflection<'py>(
    py: Python<'py>, fundamentals: &Bound<'py, PyAny>, transients: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let f = extract_vector(py, fundamentals)?;
    let t = extract_vector(py, transients)?;
    Ok(impression::simple_deflection(&f.to_vec(), &t.to_vec())?)
}

/// Read a Z-table file and return `(Z, M)` as row lists.
///
/// `delim` is `","` (default) or `"whitespace"` (Interact layout; `"\\s+"`
/// is accepted as an alias).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (ztab, delim = ","), text_signature = "(ztab, /, delim=',')")]
fn construct_mats(ztab: &str, delim: &str) -> PyResult<(Vec<Vec<u8>>, Vec<Vec<f64>>)> {
    let delimiter = match delim {
        "," => Delimiter::Comma,
        "whitespace" | "\\s+" => Delimiter::Whitespace,
        other => {
            return Err(pyo3::exceptions::PyValueError::new_err(format!(
                "delim must be ',' or 'whitespace', got {other:?}"
            )));
        }
    };
    let table = read_ztable_path(ztab, delimiter)?;
    Ok((matrix_rows(&table.z), matrix_rows(&table.m)))
}

/// Flat fundamentals (`A B O`) for three labels of a culture CSV.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(culture, a, b, o, /)")]
fn event_from_labels(culture: &str, a: &str, b: &str, o: &str) -> PyResult<Vec<f64>> {
    let culture = Culture::from_path(culture)?;
    Ok(culture.event_from_labels(a, b, o)?.to_vector().to_vec())
}

/// Python module initializer for `_rust_act`.
///
/// Registers the `Event` and `OptimalElement` classes and the module-level
/// functions. Invoked by Python on import; never called directly.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_act<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<Event>()?;
    m.add_class::<OptimalElement>()?;
    m.add_function(wrap_pyfunction!(simple_deflection, m)?)?;
    m.add_function(wrap_pyfunction!(construct_mats, m)?)?;
    m.add_function(wrap_pyfunction!(event_from_labels, m)?)?;
    Ok(())
}

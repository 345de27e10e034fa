//! Python-argument extraction helpers for the `_rust_act` bindings.
//!
//! Every helper turns loosely typed Python input (numpy arrays, pandas
//! objects, nested sequences, sentinel strings) into the typed values the
//! engine consumes, and reports conversion failures as `TypeError` or
//! `ValueError`.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use crate::impression::{
    EventOptions, FirstOrderWeights, Fundamentals, TransientSpec, WeightSpec,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a 1-D array-like into an owned `Array1<f64>`.
#[cfg(feature = "python-bindings")]
pub fn extract_vector<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw)?;
    let slice = arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("expected a contiguous 1-D float64 array"))?;
    Ok(Array1::from(slice.to_vec()))
}

/// Copy a 2-D array-like (numpy matrix, DataFrame, or nested sequence) into
/// an owned row-major `Array2<T>`.
#[cfg(feature = "python-bindings")]
pub fn extract_matrix<'py, T>(raw: &Bound<'py, PyAny>) -> PyResult<Array2<T>>
where
    T: Clone + for<'a> FromPyObject<'a>,
{
    let source = match raw.call_method0("to_numpy") {
        Ok(obj) => obj,
        Err(_) => raw.clone(),
    };
    let source = match source.call_method0("tolist") {
        Ok(obj) => obj,
        Err(_) => source,
    };
    let rows: Vec<Vec<T>> = source
        .extract()
        .map_err(|_| PyTypeError::new_err("expected a 2-D numpy.ndarray or sequence of rows"))?;
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(PyValueError::new_err("matrix rows must all have the same length"));
    }
    let flat: Vec<T> = rows.into_iter().flatten().collect();
    let nrows = if ncols == 0 { 0 } else { flat.len() / ncols };
    Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| PyValueError::new_err(format!("invalid matrix shape: {e}")))
}

/// Row-major `Vec<Vec<T>>` view of a matrix for returning to Python.
#[cfg(feature = "python-bindings")]
pub fn matrix_rows<T: Clone>(m: &Array2<T>) -> Vec<Vec<T>> {
    m.rows().into_iter().map(|r| r.to_vec()).collect()
}

/// Fundamentals from a flat 9- or 12-element array-like.
#[cfg(feature = "python-bindings")]
pub fn extract_fundamentals<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>,
) -> PyResult<Fundamentals> {
    let f = extract_vector(py, raw)?;
    Ok(Fundamentals::from_slice(&f.to_vec())?)
}

/// `"identity"` or an `n × n` matrix.
#[cfg(feature = "python-bindings")]
pub fn extract_weight_spec<'py>(raw: Option<&Bound<'py, PyAny>>) -> PyResult<WeightSpec> {
    match raw {
        None => Ok(WeightSpec::Identity),
        Some(obj) => match obj.extract::<String>() {
            Ok(mode) => Ok(mode.parse::<WeightSpec>()?),
            Err(_) => Ok(WeightSpec::Explicit(extract_matrix::<f64>(obj)?)),
        },
    }
}

/// Pattern name, `"selection"`, a list of term labels, or a transient
/// vector.
#[cfg(feature = "python-bindings")]
pub fn extract_transient_spec<'py>(
    py: Python<'py>, raw: Option<&Bound<'py, PyAny>>,
) -> PyResult<TransientSpec> {
    let Some(obj) = raw else {
        return Ok(TransientSpec::default());
    };
    if let Ok(name) = obj.extract::<String>() {
        return Ok(name.parse::<TransientSpec>()?);
    }
    if let Ok(labels) = obj.extract::<Vec<String>>() {
        let pattern = crate::impression::InteractionPattern::from_terms(labels)?;
        return Ok(TransientSpec::Pattern(pattern));
    }
    Ok(TransientSpec::Explicit(extract_vector(py, obj)?))
}

/// `None`, `"uniform"`, or an explicit weight vector.
#[cfg(feature = "python-bindings")]
pub fn extract_first_order<'py>(
    py: Python<'py>, raw: Option<&Bound<'py, PyAny>>,
) -> PyResult<Option<FirstOrderWeights>> {
    let Some(obj) = raw else {
        return Ok(None);
    };
    if let Ok(mode) = obj.extract::<String>() {
        return match mode.as_str() {
            "uniform" => Ok(Some(FirstOrderWeights::Uniform)),
            other => Err(PyValueError::new_err(format!(
                "first-order weights must be 'uniform' or an array, got {other:?}"
            ))),
        };
    }
    Ok(Some(FirstOrderWeights::Explicit(extract_vector(py, obj)?)))
}

/// Assemble [`EventOptions`] from the keyword arguments of `Event(...)`.
#[cfg(feature = "python-bindings")]
#[allow(clippy::too_many_arguments)]
pub fn build_event_options<'py>(
    py: Python<'py>, coefficients: Option<&Bound<'py, PyAny>>,
    selection: Option<&Bound<'py, PyAny>>, weights: Option<&Bound<'py, PyAny>>,
    transients: Option<&Bound<'py, PyAny>>, fundamental_weights: Option<&Bound<'py, PyAny>>,
    transient_weights: Option<&Bound<'py, PyAny>>,
) -> PyResult<EventOptions> {
    let mut opts = EventOptions::new()
        .with_weights(extract_weight_spec(weights)?)
        .with_transients(extract_transient_spec(py, transients)?);
    if let Some(m) = coefficients {
        opts = opts.with_coefficients(extract_matrix::<f64>(m)?);
    }
    if let Some(z) = selection {
        opts = opts.with_selection(extract_matrix::<u8>(z)?);
    }
    if let Some(v) = extract_first_order(py, fundamental_weights)? {
        opts = opts.with_fundamental_weights(v);
    }
    if let Some(v) = extract_first_order(py, transient_weights)? {
        opts = opts.with_transient_weights(v);
    }
    Ok(opts)
}

//! PyO3 bindings for Python integration

use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::SeriesError;

mod analysis_bindings;
mod series_bindings;

impl From<SeriesError> for PyErr {
    fn from(err: SeriesError) -> Self {
        match err {
            SeriesError::Range { .. } | SeriesError::FrequencyRange { .. } => {
                PyIndexError::new_err(err.to_string())
            }
            SeriesError::Transform(_) => PyRuntimeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Python module definition
#[pymodule]
fn impact_texture(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<series_bindings::PySignal>()?;
    m.add_class::<series_bindings::PySpectrum>()?;
    m.add_class::<series_bindings::PySpectrogram>()?;

    m.add_function(wrap_pyfunction!(analysis_bindings::analyze_impact, m)?)?;
    m.add_function(wrap_pyfunction!(analysis_bindings::render_playback, m)?)?;
    m.add_function(wrap_pyfunction!(analysis_bindings::lifter_mask, m)?)?;

    Ok(())
}

//! Python bindings for impact analysis and playback rendering

use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::series_bindings::PySignal;
use crate::audio::{self, PlaybackRoute};
use crate::features::{self, ImpactAnalysisConfig};
use crate::transform::{self, GwtConfig, LifterMode};

/// Texture features of the impact in `signal`
///
/// Returns:
///     dict with casing_variance, hardness, softness and band_power_db
#[pyfunction]
#[pyo3(signature = (signal, channels=512, window_ms=(80.0, 120.0), impact_ms=(20.0, 23.0)))]
pub fn analyze_impact<'py>(
    py: Python<'py>,
    signal: &PySignal,
    channels: usize,
    window_ms: (f64, f64),
    impact_ms: (f64, f64),
) -> PyResult<&'py PyDict> {
    let config = ImpactAnalysisConfig {
        window_start_ms: window_ms.0,
        window_end_ms: window_ms.1,
        gwt: GwtConfig {
            channels,
            ..GwtConfig::default()
        },
        impact_start_ms: impact_ms.0,
        impact_end_ms: impact_ms.1,
        ..ImpactAnalysisConfig::default()
    };
    let result = features::analyze_impact(&signal.inner, &config)?;

    let dict = PyDict::new(py);
    dict.set_item("casing_variance", result.casing_variance)?;
    dict.set_item("hardness", result.hardness)?;
    dict.set_item("softness", result.softness)?;
    dict.set_item("band_power_db", result.band_power_db)?;
    Ok(dict)
}

/// Gain, route and quantize interleaved samples for playback
///
/// Returns:
///     (int16 numpy array, clipped flag)
#[pyfunction]
#[pyo3(signature = (samples, channels, route="S", boost_db=0.0))]
pub fn render_playback<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<f64>,
    channels: u16,
    route: &str,
    boost_db: f64,
) -> PyResult<(&'py PyArray1<i16>, bool)> {
    let route: PlaybackRoute = route.parse()?;
    let samples = samples.as_array().to_vec();
    let rendered = audio::render_playback(&samples, channels, route, boost_db)?;
    Ok((rendered.samples.into_pyarray(py), rendered.clipped))
}

/// Lifter mask of `width` quefrency bins
#[pyfunction]
pub fn lifter_mask<'py>(
    py: Python<'py>,
    lifter: usize,
    width: usize,
    mode: &str,
) -> PyResult<&'py PyArray1<f64>> {
    let mode: LifterMode = mode.parse()?;
    Ok(transform::lifter_mask(lifter, width, mode)?.into_pyarray(py))
}

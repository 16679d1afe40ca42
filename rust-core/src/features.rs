//! Impact-sound texture features
//!
//! The analysis isolates the impact with a GWT over a short window around
//! the hit, averages a few milliseconds of it into a spectrum and reads
//! texture metrics off cepstrally liftered versions of that spectrum.

use std::fmt;

use crate::error::Result;
use crate::series::{CentroidMode, SignalSeries, SpectrumSeries, Windowed};
use crate::transform::{GwtConfig, LifterMode};

/// Impact analysis configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactAnalysisConfig {
    /// Start of the analysis window in the signal (ms)
    pub window_start_ms: f64,

    /// End of the analysis window in the signal (ms)
    pub window_end_ms: f64,

    /// GWT applied to the analysis window
    pub gwt: GwtConfig,

    /// Start of the averaged impact segment, relative to the window (ms)
    pub impact_start_ms: f64,

    /// End of the averaged impact segment, relative to the window (ms)
    pub impact_end_ms: f64,

    /// Lower edge of the feature band (Hz)
    pub band_low_hz: f64,

    /// Upper edge of the feature band (Hz)
    pub band_high_hz: f64,

    /// Lifter order for the casing ("gawa") envelope
    pub casing_lifter: usize,

    /// Lifter order for the hardness envelope
    pub hardness_lifter: usize,

    /// Lifter order for the softness fine structure
    pub softness_lifter: usize,
}

impl Default for ImpactAnalysisConfig {
    fn default() -> Self {
        Self {
            window_start_ms: 80.0,
            window_end_ms: 120.0,
            gwt: GwtConfig::default(),
            impact_start_ms: 20.0,
            impact_end_ms: 23.0,
            band_low_hz: 1000.0,
            band_high_hz: 4500.0,
            casing_lifter: 5,
            hardness_lifter: 15,
            softness_lifter: 13,
        }
    }
}

/// Scalar texture metrics of one impact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactFeatures {
    /// Amplitude variance of the low-liftered envelope inside the band
    pub casing_variance: f64,

    /// Log-weighted centroid of the low-liftered envelope (Hz)
    pub hardness: f64,

    /// Log-weighted centroid of the high-liftered fine structure (Hz)
    pub softness: f64,

    /// Mean power of the impact spectrum inside the band (dB)
    pub band_power_db: f64,
}

impl fmt::Display for ImpactFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "casing variance {:.4}, hardness {:.1} Hz, softness {:.1} Hz, band power {:.2} dB",
            self.casing_variance, self.hardness, self.softness, self.band_power_db
        )
    }
}

/// Time-averaged GWT spectrum of the impact segment
pub fn impact_spectrum(
    signal: &SignalSeries,
    config: &ImpactAnalysisConfig,
) -> Result<SpectrumSeries> {
    let mut window = signal.clone();
    window.slice_by_time_ms(config.window_start_ms, config.window_end_ms)?;

    let mut spectrogram = window.gwt(&config.gwt)?;
    spectrogram.slice_by_time_ms(config.impact_start_ms, config.impact_end_ms)?;
    spectrogram.time_average()
}

/// Extract the texture features of the impact in `signal`
///
/// The input signal's own view is left untouched.
pub fn analyze_impact(
    signal: &SignalSeries,
    config: &ImpactAnalysisConfig,
) -> Result<ImpactFeatures> {
    let spectrum = impact_spectrum(signal, config)?;
    let (low, high) = (config.band_low_hz, config.band_high_hz);

    let casing_variance = spectrum
        .liftering(config.casing_lifter, LifterMode::Low)?
        .slice_freq_hz(low, high)?
        .variance();

    let hardness = spectrum
        .liftering(config.hardness_lifter, LifterMode::Low)?
        .slice_freq_hz(low, high)?
        .spectral_centroid(CentroidMode::Log);

    let softness = spectrum
        .liftering(config.softness_lifter, LifterMode::High)?
        .slice_freq_hz(low, high)?
        .spectral_centroid(CentroidMode::Log);

    let band_power_db = spectrum.band_power(low, high)?;

    let features = ImpactFeatures {
        casing_variance,
        hardness,
        softness,
        band_power_db,
    };
    log::debug!("impact features: {features}");
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeriesError;

    const FS: f64 = 16000.0;

    /// 150 ms of silence with a unit click at 100 ms
    fn click() -> SignalSeries {
        let mut samples = vec![0.0; 2400];
        samples[1600] = 1.0;
        SignalSeries::from_samples(samples, FS).unwrap()
    }

    fn small_config() -> ImpactAnalysisConfig {
        ImpactAnalysisConfig {
            gwt: GwtConfig {
                channels: 64,
                ..GwtConfig::default()
            },
            ..ImpactAnalysisConfig::default()
        }
    }

    #[test]
    fn test_impact_spectrum_grid() {
        let spectrum = impact_spectrum(&click(), &small_config()).unwrap();
        assert_eq!(spectrum.len(), 64);
        assert!((spectrum.x_axis()[0] - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_click_features() {
        let signal = click();
        let features = analyze_impact(&signal, &small_config()).unwrap();

        assert!(features.casing_variance >= 0.0 && features.casing_variance.is_finite());
        assert!(
            features.hardness > 1000.0 && features.hardness <= 4500.0,
            "hardness {}",
            features.hardness
        );
        assert!(features.softness.is_finite());
        assert!(features.band_power_db.is_finite());

        // The caller's signal keeps its full view
        assert_eq!(signal.len(), 2400);
    }

    #[test]
    fn test_matches_manual_pipeline() {
        let config = small_config();
        let features = analyze_impact(&click(), &config).unwrap();

        let mut signal = click();
        let mut spectrogram = signal
            .slice_by_time_ms(80.0, 120.0)
            .unwrap()
            .gwt(&config.gwt)
            .unwrap();
        let spectrum = spectrogram.slice_by_time_ms(20.0, 23.0).unwrap().time_average().unwrap();
        let hardness = spectrum
            .liftering(15, LifterMode::Low)
            .unwrap()
            .slice_freq_khz(1.0, 4.5)
            .unwrap()
            .spectral_centroid(CentroidMode::Log);

        assert_eq!(features.hardness, hardness);
    }

    #[test]
    fn test_signal_too_short() {
        let short = SignalSeries::from_samples(vec![0.0; 800], FS).unwrap();
        assert!(matches!(
            analyze_impact(&short, &small_config()),
            Err(SeriesError::Range { .. })
        ));
    }
}

//! Windowed series: a numeric buffer, its coordinate axes and a read-view
//!
//! The view is a lazily applied rectangular window over the buffer. Reads
//! return copies of the windowed slice; slicing only moves the window and
//! never touches the buffer.

use ndarray::{s, Array, Array1, Array2, ArrayView, Dimension, Ix1, Ix2};
use num_complex::Complex64;
use std::ops::Range;

use crate::error::{Result, SeriesError};

/// Smallest amplitude reported by [`Windowed::amplitude`] (-160 dB)
pub const AMPLITUDE_FLOOR: f64 = 1e-8;

/// Largest amplitude reported by [`Windowed::amplitude`]
pub const AMPLITUDE_CEILING: f64 = 1e32;

/// Element types whose absolute value can be taken
pub trait Magnitude: Copy {
    fn magnitude(self) -> f64;
}

impl Magnitude for f64 {
    fn magnitude(self) -> f64 {
        self.abs()
    }
}

impl Magnitude for Complex64 {
    fn magnitude(self) -> f64 {
        self.norm()
    }
}

/// Buffer dimensionalities that support a rectangular view window
pub trait WindowDim: Dimension {
    fn window<'a, A>(
        data: &'a Array<A, Self>,
        x: &Range<usize>,
        y: &Range<usize>,
    ) -> ArrayView<'a, A, Self>;
}

impl WindowDim for Ix1 {
    fn window<'a, A>(
        data: &'a Array<A, Ix1>,
        x: &Range<usize>,
        _y: &Range<usize>,
    ) -> ArrayView<'a, A, Ix1> {
        data.slice(s![x.start..x.end])
    }
}

impl WindowDim for Ix2 {
    fn window<'a, A>(
        data: &'a Array<A, Ix2>,
        x: &Range<usize>,
        y: &Range<usize>,
    ) -> ArrayView<'a, A, Ix2> {
        data.slice(s![x.start..x.end, y.start..y.end])
    }
}

/// Buffer plus X (and for 2-D, Y) axis and a view window
///
/// 1-D series carry an empty Y axis and an empty Y window.
///
/// Invariant: `view_x` lies within `0..x_axis.len()` and is non-empty; the
/// same holds for `view_y` on 2-D series.
#[derive(Debug, Clone)]
pub struct WindowedSeries<A, D: Dimension> {
    data: Array<A, D>,
    x_axis: Array1<f64>,
    y_axis: Array1<f64>,
    sample_rate: f64,
    view_x: Range<usize>,
    view_y: Range<usize>,
}

fn check_axis(name: &str, axis: &Array1<f64>, expected_len: usize) -> Result<()> {
    if axis.is_empty() {
        return Err(SeriesError::Shape(format!("{name} axis is empty")));
    }
    if axis.len() != expected_len {
        return Err(SeriesError::Shape(format!(
            "{name} axis has {} points but data has {expected_len}",
            axis.len()
        )));
    }
    if axis.windows(2).into_iter().any(|w| !(w[1] > w[0])) {
        return Err(SeriesError::Shape(format!("{name} axis is not strictly increasing")));
    }
    Ok(())
}

fn check_sample_rate(sample_rate: f64) -> Result<()> {
    if sample_rate > 0.0 && sample_rate.is_finite() {
        Ok(())
    } else {
        Err(SeriesError::InvalidArgument(format!(
            "sample rate must be positive, got {sample_rate}"
        )))
    }
}

fn check_window(start: usize, end: usize, len: usize) -> Result<()> {
    if start >= end || end > len {
        return Err(SeriesError::Range { start, end, len });
    }
    Ok(())
}

/// Index window for the half-open band `(low, high]` of a strictly increasing axis
///
/// Each bound resolves to the first index whose value is greater than the
/// bound, or the axis length when no such index exists. Indices are absolute,
/// independent of any current view.
pub(crate) fn band_window(axis: &Array1<f64>, low: f64, high: f64) -> Result<Range<usize>> {
    if !(low < high) {
        return Err(SeriesError::FrequencyRange { low, high });
    }
    let first_above = |bound: f64| {
        axis.iter()
            .position(|&v| v > bound)
            .unwrap_or(axis.len())
    };
    let (start, end) = (first_above(low), first_above(high));
    if start >= end {
        return Err(SeriesError::FrequencyRange { low, high });
    }
    Ok(start..end)
}

impl<A> WindowedSeries<A, Ix1> {
    /// Create a 1-D series with the view covering the whole buffer
    pub fn new(data: Array1<A>, x_axis: Array1<f64>, sample_rate: f64) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        check_axis("x", &x_axis, data.len())?;

        let len = x_axis.len();
        Ok(Self {
            data,
            x_axis,
            y_axis: Array1::zeros(0),
            sample_rate,
            view_x: 0..len,
            view_y: 0..0,
        })
    }

    /// New series over `data` sharing this series' axis, sample rate and view
    pub fn with_data<B>(&self, data: Array1<B>) -> Result<WindowedSeries<B, Ix1>> {
        if data.len() != self.x_axis.len() {
            return Err(SeriesError::Shape(format!(
                "replacement buffer has {} samples but the axis has {}",
                data.len(),
                self.x_axis.len()
            )));
        }
        Ok(WindowedSeries {
            data,
            x_axis: self.x_axis.clone(),
            y_axis: Array1::zeros(0),
            sample_rate: self.sample_rate,
            view_x: self.view_x.clone(),
            view_y: 0..0,
        })
    }

    /// Full, unwindowed buffer
    pub fn full_data(&self) -> &Array1<A> {
        &self.data
    }
}

impl<A> WindowedSeries<A, Ix2> {
    /// Create a 2-D series `[x, y]` with the view covering the whole buffer
    pub fn new_2d(
        data: Array2<A>,
        x_axis: Array1<f64>,
        y_axis: Array1<f64>,
        sample_rate: f64,
    ) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        let (rows, cols) = data.dim();
        check_axis("x", &x_axis, rows)?;
        check_axis("y", &y_axis, cols)?;

        Ok(Self {
            data,
            x_axis,
            y_axis,
            sample_rate,
            view_x: 0..rows,
            view_y: 0..cols,
        })
    }

    /// Y axis values inside the view
    pub fn y_axis(&self) -> Array1<f64> {
        self.y_axis
            .slice(s![self.view_y.start..self.view_y.end])
            .to_owned()
    }

    /// Full, unwindowed Y axis
    pub fn full_y_axis(&self) -> &Array1<f64> {
        &self.y_axis
    }

    /// Current Y window `[start, end)`
    pub fn view_y(&self) -> Range<usize> {
        self.view_y.clone()
    }

    /// Move the Y window to `[start, end)`
    pub fn set_view_y(&mut self, start: usize, end: usize) -> Result<()> {
        check_window(start, end, self.y_axis.len())?;
        self.view_y = start..end;
        Ok(())
    }
}

impl<A, D: WindowDim> WindowedSeries<A, D> {
    /// Borrowed view of the windowed data
    pub fn view(&self) -> ArrayView<'_, A, D> {
        D::window(&self.data, &self.view_x, &self.view_y)
    }

    /// Full, unwindowed X axis
    pub fn full_x_axis(&self) -> &Array1<f64> {
        &self.x_axis
    }

    /// Current X window `[start, end)`
    pub fn view_x(&self) -> Range<usize> {
        self.view_x.clone()
    }

    /// Move the X window to `[start, end)`
    pub fn set_view_x(&mut self, start: usize, end: usize) -> Result<()> {
        check_window(start, end, self.x_axis.len())?;
        self.view_x = start..end;
        Ok(())
    }

    /// Reset every window to the full axis extent
    pub fn clear_view(&mut self) {
        self.view_x = 0..self.x_axis.len();
        self.view_y = 0..self.y_axis.len();
    }

    /// Sample rate of the underlying signal in Hz
    pub fn fs(&self) -> f64 {
        self.sample_rate
    }

    /// `floor(ms / 1000 * fs)`
    pub fn ms_to_sample(&self, ms: f64) -> Result<usize> {
        if !(ms >= 0.0 && ms.is_finite()) {
            return Err(SeriesError::InvalidArgument(format!(
                "time must be a non-negative number of milliseconds, got {ms}"
            )));
        }
        Ok((ms / 1000.0 * self.sample_rate).floor() as usize)
    }

    /// `n / fs * 1000`
    pub fn sample_to_ms(&self, sample: usize) -> f64 {
        sample as f64 / self.sample_rate * 1000.0
    }
}

/// Read accessors and chainable view mutators shared by every series
///
/// Implementors only provide access to their [`WindowedSeries`]; everything
/// else comes from the provided methods.
pub trait Windowed {
    type Elem: Magnitude;
    type Dim: WindowDim;

    fn series(&self) -> &WindowedSeries<Self::Elem, Self::Dim>;
    fn series_mut(&mut self) -> &mut WindowedSeries<Self::Elem, Self::Dim>;

    /// Copy of the data inside the view
    fn data(&self) -> Array<Self::Elem, Self::Dim> {
        self.series().view().to_owned()
    }

    /// Copy of the X axis inside the view
    fn x_axis(&self) -> Array1<f64> {
        let series = self.series();
        let range = series.view_x();
        series.full_x_axis().slice(s![range.start..range.end]).to_owned()
    }

    fn sample_rate(&self) -> f64 {
        self.series().fs()
    }

    /// Number of X points inside the view
    fn len(&self) -> usize {
        self.series().view_x().len()
    }

    /// `|data|`, clamped to `[1e-8, 1e32]` so that logarithms stay finite
    fn amplitude(&self) -> Array<f64, Self::Dim> {
        self.series()
            .view()
            .mapv(|v| v.magnitude().clamp(AMPLITUDE_FLOOR, AMPLITUDE_CEILING))
    }

    /// `amplitude²`
    fn power(&self) -> Array<f64, Self::Dim> {
        self.amplitude().mapv(|a| a * a)
    }

    /// `20 * log10(amplitude)`
    fn log_power(&self) -> Array<f64, Self::Dim> {
        self.amplitude().mapv(|a| 20.0 * a.log10())
    }

    /// Power relative to a uniform distribution over the view
    ///
    /// `power / sum(power) * count`, so a flat spectrum is 1.0 everywhere.
    fn power_normalized(&self) -> Array<f64, Self::Dim> {
        let power = self.power();
        let total = power.sum();
        let count = power.len() as f64;
        power.mapv(|p| p / total * count)
    }

    /// `20 * log10(power_normalized)`
    fn log_power_normalized(&self) -> Array<f64, Self::Dim> {
        self.power_normalized().mapv(|p| 20.0 * p.log10())
    }

    /// Restrict the X view to samples `[start, end)`
    fn slice_by_sample(&mut self, start: usize, end: usize) -> Result<&mut Self>
    where
        Self: Sized,
    {
        self.series_mut().set_view_x(start, end)?;
        Ok(self)
    }

    /// Restrict the X view to `[start_ms, end_ms)`, converted with `floor(ms/1000*fs)`
    fn slice_by_time_ms(&mut self, start_ms: f64, end_ms: f64) -> Result<&mut Self>
    where
        Self: Sized,
    {
        // Negative times lie before the start of the axis
        if !(start_ms >= 0.0 && end_ms >= 0.0) {
            return Err(SeriesError::FrequencyRange {
                low: start_ms,
                high: end_ms,
            });
        }
        let start = self.series().ms_to_sample(start_ms)?;
        let end = self.series().ms_to_sample(end_ms)?;
        self.slice_by_sample(start, end)
    }

    /// Reset the view to the full extent of every axis
    fn reset_view(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.series_mut().clear_view();
        self
    }
}

impl<A: Magnitude, D: WindowDim> Windowed for WindowedSeries<A, D> {
    type Elem = A;
    type Dim = D;

    fn series(&self) -> &WindowedSeries<A, D> {
        self
    }

    fn series_mut(&mut self) -> &mut WindowedSeries<A, D> {
        self
    }
}

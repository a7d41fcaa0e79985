//! Short-time Fourier transform
//!
//! A power-of-two window slides over the data one sample at a time; each
//! position yields a one-sided mean square amplitude spectrum, normalized the
//! same way as [`crate::spectrum::psd`].

use ndarray::{s, Array2, ArrayView1};

use super::analysis::AnalyzerConfig;
use super::psd::fold_mean_square;
use super::windowing::WindowWeights;
use super::windows::WindowKind;
use crate::error::{FourierError, Result};
use crate::signal::Signal;
use crate::transform::{check_power_of_two, last_power_of_two, Direction, InterleavedBuffer};

/// Largest power of two a window length can take
const MAX_WINDOW_POINTS: usize = 1 << (usize::BITS - 1);

/// Time-frequency matrix of mean square amplitudes
///
/// Shape is `(num_frequencies + 1, num_times + 1)`. Row 0 holds a blank cell
/// followed by the window centre times, column 0 a blank cell followed by the
/// frequencies; `[[k + 1, t + 1]]` is the power at frequency `k`, time `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    matrix: Array2<f64>,
    window_length: usize,
    window: WindowKind,
}

impl Spectrogram {
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Window actually applied
    pub fn window(&self) -> WindowKind {
        self.window
    }

    pub fn num_times(&self) -> usize {
        self.matrix.ncols() - 1
    }

    pub fn num_frequencies(&self) -> usize {
        self.matrix.nrows() - 1
    }

    pub fn times(&self) -> ArrayView1<'_, f64> {
        self.matrix.slice(s![0, 1..])
    }

    pub fn frequencies(&self) -> ArrayView1<'_, f64> {
        self.matrix.slice(s![1.., 0])
    }

    /// Power at frequency index `k` and time index `t`
    pub fn power(&self, k: usize, t: usize) -> f64 {
        self.matrix[[k + 1, t + 1]]
    }

    /// Spectrum at time index `t`
    pub fn spectrum_at(&self, t: usize) -> ArrayView1<'_, f64> {
        self.matrix.slice(s![1.., t + 1])
    }
}

/// Sliding-window power spectra of a signal
///
/// # Arguments
/// * `signal` - Input data; only the original, unpadded samples are used
/// * `window_length` - Points per window, a power of two not above the data length
/// * `config` - Window and Δt; no window selects a Gaussian with α = 2.5
pub fn short_time(
    signal: &Signal,
    window_length: usize,
    config: &AnalyzerConfig,
) -> Result<Spectrogram> {
    if window_length < 2 {
        return Err(FourierError::InvalidParameter {
            name: "moving window length",
            value: window_length as f64,
            reason: "must hold at least two points",
        });
    }
    if !check_power_of_two(window_length) {
        return Err(FourierError::NotPowerOfTwo {
            what: "moving window length",
            value: window_length,
        });
    }
    if signal.is_empty() {
        return Err(FourierError::NoData);
    }
    let data_length = signal.original_length();
    if window_length > data_length {
        return Err(FourierError::WindowTooLong {
            window: window_length,
            data: data_length,
        });
    }

    let kind = match config.window {
        WindowKind::None => WindowKind::default_gaussian(),
        kind => kind,
    };
    let delta_t = config.delta_t;
    let num_times = data_length - window_length + 1;
    let num_frequencies = window_length / 2;

    let mut matrix = Array2::zeros((num_frequencies + 1, num_times + 1));
    let first_time = (window_length - 1) as f64 * delta_t / 2.0;
    for t in 0..num_times {
        matrix[[0, t + 1]] = first_time + t as f64 * delta_t;
    }
    for k in 0..num_frequencies {
        matrix[[k + 1, 0]] = k as f64 / (window_length as f64 * delta_t);
    }

    let window = WindowWeights::new(kind, window_length);
    let samples = signal.original_samples();
    let mut spectrum = vec![0.0; num_frequencies];

    for t in 0..num_times {
        let mut buffer = InterleavedBuffer::from_complex(&samples[t..t + window_length]);
        window.apply_inplace(&mut buffer);
        buffer.transform_in_place(Direction::Forward)?;
        fold_mean_square(&buffer, window.sum_of_squared_weights(), &mut spectrum);

        for (k, &p) in spectrum.iter().enumerate() {
            matrix[[k + 1, t + 1]] = p;
        }
    }

    log::debug!(
        "short time transform: {} window positions, {} frequencies, {} window",
        num_times,
        num_frequencies,
        kind
    );

    Ok(Spectrogram {
        matrix,
        window_length,
        window: kind,
    })
}

/// Window length in points for a window duration
///
/// `round(window_time / Δt)` points, replaced by the nearest power of two when
/// it is not one already; ties go to the lower power.
pub fn window_length_for_duration(window_time: f64, delta_t: f64) -> Result<usize> {
    let points = (window_time / delta_t).round();
    if !points.is_finite() || points < 2.0 {
        return Err(FourierError::InvalidParameter {
            name: "window time",
            value: window_time,
            reason: "must span at least two sampling intervals",
        });
    }
    if points > MAX_WINDOW_POINTS as f64 {
        return Err(FourierError::InvalidParameter {
            name: "window time",
            value: window_time,
            reason: "exceeds the longest transformable window",
        });
    }
    let points = points as usize;
    if check_power_of_two(points) {
        return Ok(points);
    }

    let low = last_power_of_two(points);
    let high = points
        .checked_next_power_of_two()
        .ok_or(FourierError::InvalidParameter {
            name: "window time",
            value: window_time,
            reason: "exceeds the longest transformable window",
        })?;
    let length = if points - low <= high - points {
        low
    } else {
        high
    };
    log::warn!(
        "window length, provided as time, {} did not convert to an integer power of two data points; a value of {} was substituted",
        window_time,
        (length - 1) as f64 * delta_t
    );
    Ok(length)
}

/// Sliding-window power spectra with the window given as a duration
pub fn short_time_duration(
    signal: &Signal,
    window_time: f64,
    config: &AnalyzerConfig,
) -> Result<Spectrogram> {
    let window_length = window_length_for_duration(window_time, config.delta_t)?;
    short_time(signal, window_length, config)
}

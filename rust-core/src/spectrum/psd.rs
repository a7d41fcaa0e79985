//! Power spectral density estimation (Welch's method)
//!
//! Each segment is windowed and transformed; negative frequencies are folded
//! onto positive ones, the mean square amplitudes are normalized by the
//! segment length and the window's sum of squared weights, and the segment
//! periodograms are averaged.

use std::io::BufRead;

use ndarray::Array2;
use num_complex::Complex64;

use super::analysis::AnalyzerConfig;
use super::segments::{resolve_segments, SegmentPlan, SegmentResolution, SegmentWarnings};
use super::windowing::WindowWeights;
use crate::error::{FourierError, Result};
use crate::signal::Signal;
use crate::transform::{Direction, InterleavedBuffer};

/// Estimated one-sided power spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSpectrum {
    /// Frequencies k / (segment_length * Δt)
    pub frequencies: Vec<f64>,
    /// Windowed, segment-averaged mean square amplitudes
    pub power: Vec<f64>,
    /// Segmentation the estimate was computed with
    pub plan: SegmentPlan,
    /// How the plan was resolved; `None` for explicitly planned stream input
    pub resolution: Option<SegmentResolution>,
    pub sum_of_squared_weights: f64,
}

impl PowerSpectrum {
    /// Number of frequency points, half the segment length
    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Soft degradations raised while resolving the plan
    pub fn warnings(&self) -> SegmentWarnings {
        self.resolution
            .as_ref()
            .map(|r| r.warnings)
            .unwrap_or_default()
    }

    /// Index and value of the strongest bin
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.power
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (k, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((k, p)),
            })
    }

    /// Row 0 holds frequencies, row 1 the power estimates
    pub fn to_array(&self) -> Array2<f64> {
        let mut out = Array2::zeros((2, self.len()));
        for k in 0..self.len() {
            out[[0, k]] = self.frequencies[k];
            out[[1, k]] = self.power[k];
        }
        out
    }
}

/// Frequencies of a one-sided spectrum of a `segment_length` point transform
pub fn psd_frequencies(segment_length: usize, delta_t: f64) -> Vec<f64> {
    (0..segment_length / 2)
        .map(|k| k as f64 / (segment_length as f64 * delta_t))
        .collect()
}

/// Fold a transformed segment into normalized one-sided mean square amplitudes
///
/// `out[0] = |X[0]|²` and `out[k] = |X[k]|² + |X[n-k]|²` for `1 ≤ k < n/2`,
/// all scaled by `2 / (n * sum_of_squared_weights)`.
pub(crate) fn fold_mean_square(
    transformed: &InterleavedBuffer,
    sum_of_squared_weights: f64,
    out: &mut [f64],
) {
    let n = transformed.len();
    let scale = 2.0 / (n as f64 * sum_of_squared_weights);

    out[0] = transformed.norm_sqr_at(0) * scale;
    for k in 1..n / 2 {
        out[k] = (transformed.norm_sqr_at(k) + transformed.norm_sqr_at(n - k)) * scale;
    }
}

/// Welch average over the segments of in-memory data
fn welch(data: &[Complex64], plan: &SegmentPlan, window: &WindowWeights) -> Result<Vec<f64>> {
    let points = plan.psd_points();
    let mut average = vec![0.0; points];
    let mut segment_psd = vec![0.0; points];

    for segment in 0..plan.segment_number {
        let start = segment * plan.step();
        let mut buffer =
            InterleavedBuffer::from_complex(&data[start..start + plan.segment_length]);
        window.apply_inplace(&mut buffer);
        buffer.transform_in_place(Direction::Forward)?;

        fold_mean_square(&buffer, window.sum_of_squared_weights(), &mut segment_psd);
        for (acc, p) in average.iter_mut().zip(segment_psd.iter()) {
            *acc += p;
        }
    }

    let segments = plan.segment_number as f64;
    for acc in average.iter_mut() {
        *acc /= segments;
    }
    Ok(average)
}

/// Estimate the power spectrum of a signal
///
/// # Arguments
/// * `signal` - Input data
/// * `config` - Window, segmentation request, overlap, Δt and padding policy
///
/// # Returns
/// Power spectrum of `segment_length / 2` points
pub fn power_spectrum(signal: &Signal, config: &AnalyzerConfig) -> Result<PowerSpectrum> {
    if signal.is_empty() {
        return Err(FourierError::NoData);
    }

    let length = if config.zero_pad {
        signal.padded_length()
    } else {
        signal.original_length()
    };
    let resolution = resolve_segments(
        length,
        config.segments,
        config.overlap,
        config.padding_tolerance,
    )?;
    let plan = resolution.effective_plan();
    let data = &signal.samples()[..resolution.working_length()];

    let window = WindowWeights::new(config.window, plan.segment_length);
    let power = welch(data, &plan, &window)?;

    Ok(PowerSpectrum {
        frequencies: psd_frequencies(plan.segment_length, config.delta_t),
        power,
        plan,
        resolution: Some(resolution),
        sum_of_squared_weights: window.sum_of_squared_weights(),
    })
}

/// Whitespace separated numbers pulled from a reader one at a time
struct ValueReader<R> {
    reader: R,
    line: String,
    tokens: std::vec::IntoIter<String>,
    position: usize,
    expected: usize,
}

impl<R: BufRead> ValueReader<R> {
    fn new(reader: R, expected: usize) -> Self {
        Self {
            reader,
            line: String::new(),
            tokens: Vec::new().into_iter(),
            position: 0,
            expected,
        }
    }

    fn next_value(&mut self) -> Result<f64> {
        loop {
            if let Some(token) = self.tokens.next() {
                self.position += 1;
                return match token.parse::<f64>() {
                    Ok(value) => Ok(value),
                    Err(_) => Err(FourierError::Parse {
                        token,
                        position: self.position,
                    }),
                };
            }

            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Err(FourierError::UnexpectedEndOfStream {
                    expected: self.expected,
                    found: self.position,
                });
            }
            self.tokens = self
                .line
                .split_whitespace()
                .map(str::to_owned)
                .collect::<Vec<_>>()
                .into_iter();
        }
    }

    fn fill(&mut self, out: &mut [f64]) -> Result<()> {
        for v in out.iter_mut() {
            *v = self.next_value()?;
        }
        Ok(())
    }
}

/// Estimate the power spectrum of data read from a text stream
///
/// The stream holds alternating real and imaginary parts separated by
/// whitespace. Only the data the plan covers is read, segment by segment;
/// overlapping segments keep the trailing half of the previous segment.
///
/// # Arguments
/// * `reader` - Source of the interleaved values
/// * `plan` - Explicit segmentation, see [`SegmentPlan::explicit`]
/// * `config` - Window and Δt; its segmentation fields are ignored
pub fn power_spectrum_from_reader<R: BufRead>(
    reader: R,
    plan: SegmentPlan,
    config: &AnalyzerConfig,
) -> Result<PowerSpectrum> {
    let plan = SegmentPlan::explicit(plan.segment_length, plan.segment_number, plan.overlap)?;
    let segment_length = plan.segment_length;
    let mut values = ValueReader::new(reader, 2 * plan.data_length());

    let window = WindowWeights::new(config.window, segment_length);
    let points = plan.psd_points();
    let mut average = vec![0.0; points];
    let mut segment_psd = vec![0.0; points];

    // Raw interleaved segment; an overlap step is half a segment, `segment_length` values
    let mut raw = vec![0.0; 2 * segment_length];
    if plan.overlap {
        values.fill(&mut raw[..segment_length])?;
    }

    for segment in 0..plan.segment_number {
        if plan.overlap {
            if segment > 0 {
                raw.copy_within(segment_length.., 0);
            }
            values.fill(&mut raw[segment_length..])?;
        } else {
            values.fill(&mut raw)?;
        }

        let mut buffer = InterleavedBuffer::from_interleaved(raw.clone())?;
        window.apply_inplace(&mut buffer);
        buffer.transform_in_place(Direction::Forward)?;

        fold_mean_square(&buffer, window.sum_of_squared_weights(), &mut segment_psd);
        for (acc, p) in average.iter_mut().zip(segment_psd.iter()) {
            *acc += p;
        }
    }

    let segments = plan.segment_number as f64;
    for acc in average.iter_mut() {
        *acc /= segments;
    }

    log::debug!(
        "stream power spectrum: {} value/s read for {} segment/s of length {}",
        values.position,
        plan.segment_number,
        segment_length
    );

    Ok(PowerSpectrum {
        frequencies: psd_frequencies(segment_length, config.delta_t),
        power: average,
        plan,
        resolution: None,
        sum_of_squared_weights: window.sum_of_squared_weights(),
    })
}

//! Circular cross-correlation of two real sequences via the FFT

use ndarray::Array2;
use num_complex::Complex64;

use super::windowing::WindowWeights;
use super::windows::WindowKind;
use crate::error::{FourierError, Result};
use crate::transform::{check_power_of_two, Direction, InterleavedBuffer};

/// Correlation coefficients ordered by lag, most negative first
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation {
    /// Lags -(n/2)·Δt, (1 - n/2)·Δt, ..., (n/2 - 1)·Δt
    pub lags: Vec<f64>,
    pub coefficients: Vec<f64>,
    pub sum_of_squared_weights: f64,
}

impl Correlation {
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Lag of the largest coefficient
    pub fn peak_lag(&self) -> Option<f64> {
        self.coefficients
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| self.lags[i])
    }

    /// Row 0 holds lags, row 1 the coefficients
    pub fn to_array(&self) -> Array2<f64> {
        let mut out = Array2::zeros((2, self.len()));
        for i in 0..self.len() {
            out[[0, i]] = self.lags[i];
            out[[1, i]] = self.coefficients[i];
        }
        out
    }
}

fn windowed_transform(data: &[f64], window: &WindowWeights) -> Result<InterleavedBuffer> {
    let samples: Vec<Complex64> = data.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    let mut buffer = InterleavedBuffer::from_complex(&samples);
    window.apply_inplace(&mut buffer);
    buffer.transform_in_place(Direction::Forward)?;
    Ok(buffer)
}

/// Correlate two real sequences of the same power-of-two length
///
/// The coefficient at lag `m` is `(1/n) Σ_j first[j + m]·second[j]`, indices
/// taken modulo `n`, after both sequences have been windowed.
///
/// # Arguments
/// * `first`, `second` - Equal length real data
/// * `window` - Window applied to both sequences
/// * `delta_t` - Sampling interval used to label the lags
pub fn correlate(
    first: &[f64],
    second: &[f64],
    window: WindowKind,
    delta_t: f64,
) -> Result<Correlation> {
    let n = first.len();
    if n != second.len() {
        return Err(FourierError::LengthMismatch {
            first: n,
            second: second.len(),
        });
    }
    if n < 2 || !check_power_of_two(n) {
        return Err(FourierError::NotPowerOfTwo {
            what: "correlation data length",
            value: n,
        });
    }

    let weights = WindowWeights::new(window, n);
    let x1 = windowed_transform(first, &weights)?;
    let x2 = windowed_transform(second, &weights)?;

    let scale = 1.0 / n as f64;
    let product: Vec<Complex64> = (0..n).map(|k| x1.get(k) * x2.get(k).conj() * scale).collect();
    let mut raw = InterleavedBuffer::from_complex(&product);
    raw.transform_in_place(Direction::Inverse)?;

    // Rotate so that lag -n/2 comes first
    let half = n / 2;
    let coefficients = (0..n).map(|i| raw.get((i + half) % n).re * scale).collect();
    let lags = (0..n)
        .map(|i| (i as f64 - half as f64) * delta_t)
        .collect();

    Ok(Correlation {
        lags,
        coefficients,
        sum_of_squared_weights: weights.sum_of_squared_weights(),
    })
}

//! Windowing of interleaved data before transformation
//!
//! Applies windows to time-domain data before the FFT to reduce spectral leakage

use super::windows::{generate_window, sum_of_squared_weights, WindowKind};
use crate::transform::InterleavedBuffer;

/// Window weights of one length, reusable across segments of that length
#[derive(Debug, Clone, PartialEq)]
pub struct WindowWeights {
    kind: WindowKind,
    weights: Vec<f64>,
    sum_of_squared_weights: f64,
}

impl WindowWeights {
    pub fn new(kind: WindowKind, length: usize) -> Self {
        let weights = generate_window(kind, length);
        let sum_of_squared_weights = sum_of_squared_weights(kind, &weights);
        Self {
            kind,
            weights,
            sum_of_squared_weights,
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn sum_of_squared_weights(&self) -> f64 {
        self.sum_of_squared_weights
    }

    /// Multiply real and imaginary parts of `buffer` in place
    pub fn apply_inplace(&self, buffer: &mut InterleavedBuffer) {
        if self.kind.is_tapered() {
            buffer.apply_weights(&self.weights);
        }
    }
}

/// Windowed copy of some data, with the weights that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedData {
    pub data: InterleavedBuffer,
    pub window: WindowWeights,
}

impl WindowedData {
    pub fn weights(&self) -> &[f64] {
        self.window.weights()
    }

    pub fn sum_of_squared_weights(&self) -> f64 {
        self.window.sum_of_squared_weights()
    }
}

/// Apply window to interleaved data
///
/// # Arguments
/// * `data` - Unwindowed data, left untouched
/// * `kind` - Window to apply over the full data length
///
/// # Returns
/// Windowed copy, weights and sum of squared weights
pub fn apply_window(data: &InterleavedBuffer, kind: WindowKind) -> WindowedData {
    let window = WindowWeights::new(kind, data.len());
    let mut windowed = data.clone();
    window.apply_inplace(&mut windowed);

    WindowedData {
        data: windowed,
        window,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_apply_window() {
        let data = InterleavedBuffer::from_complex(&vec![Complex64::new(1.0, -1.0); 65]);
        let windowed = apply_window(&data, WindowKind::Hann);

        assert_eq!(windowed.data.len(), 65);
        assert_eq!(windowed.weights().len(), 65);

        // Center keeps full amplitude, edges go to zero, both parts scaled
        assert!((windowed.data.get(32) - Complex64::new(1.0, -1.0)).norm() < 1e-12);
        assert!(windowed.data.get(0).norm() < 1e-12);

        // Original left alone
        assert_eq!(data.get(0), Complex64::new(1.0, -1.0));
    }

    #[test]
    fn test_no_window_is_identity() {
        let samples: Vec<Complex64> = (0..8).map(|i| Complex64::new(i as f64, 1.0)).collect();
        let data = InterleavedBuffer::from_complex(&samples);
        let windowed = apply_window(&data, WindowKind::None);

        assert_eq!(windowed.data, data);
        assert_eq!(windowed.sum_of_squared_weights(), 8.0);
    }

    #[test]
    fn test_weights_reused_across_segments() {
        let window = WindowWeights::new(WindowKind::Welch, 16);
        let mut a = InterleavedBuffer::from_complex(&vec![Complex64::new(2.0, 0.0); 16]);
        window.apply_inplace(&mut a);

        for (k, &w) in window.weights().iter().enumerate() {
            assert!((a.get(k).re - 2.0 * w).abs() < 1e-12);
        }
        let expected: f64 = window.weights().iter().map(|w| w * w).sum();
        assert!((window.sum_of_squared_weights() - expected).abs() < 1e-12);
    }
}

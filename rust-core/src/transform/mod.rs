//! Radix-2 Fast Fourier Transform
//!
//! `kernel` holds the in-place routine working on interleaved buffers; the
//! functions here are non-mutating wrappers over complex slices.

pub mod kernel;
pub mod power_of_two;

use num_complex::Complex64;

use crate::error::Result;

pub use kernel::{basic_fft, Direction, InterleavedBuffer};
pub use power_of_two::{
    calc_data_length, check_power_of_two, integer_times_power_of_two, last_power_of_two,
    next_power_of_two,
};

/// Output of a forward or inverse transform
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    buffer: InterleavedBuffer,
    direction: Direction,
}

impl TransformResult {
    pub(crate) fn new(buffer: InterleavedBuffer, direction: Direction) -> Self {
        Self { buffer, direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of complex points (the padded data length)
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Transformed data as complex numbers
    pub fn as_complex(&self) -> Vec<Complex64> {
        self.buffer.to_complex()
    }

    /// Transformed data as alternating real and imaginary parts
    pub fn as_alternate(&self) -> &[f64] {
        self.buffer.as_slice()
    }

    /// Complex point `k`
    pub fn get(&self, k: usize) -> Complex64 {
        self.buffer.get(k)
    }
}

/// Forward transform of a power-of-two length sequence
pub fn fft(input: &[Complex64]) -> Result<Vec<Complex64>> {
    let mut buffer = InterleavedBuffer::from_complex(input);
    buffer.transform_in_place(Direction::Forward)?;
    Ok(buffer.to_complex())
}

/// Normalized inverse transform of a power-of-two length sequence
pub fn ifft(input: &[Complex64]) -> Result<Vec<Complex64>> {
    let mut buffer = InterleavedBuffer::from_complex(input);
    buffer.transform_in_place(Direction::Inverse)?;
    buffer.scale(1.0 / input.len() as f64);
    Ok(buffer.to_complex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_pulse() {
        let input: Vec<Complex64> = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]
            .iter()
            .map(|&x| Complex64::new(x, 0.0))
            .collect();
        let output = fft(&input).unwrap();

        assert!((output[0] - Complex64::new(4.0, 0.0)).norm() < 1e-12);
        assert!(output[4].norm() < 1e-12);
        for k in 1..4 {
            assert!((output[k].norm() - output[8 - k].norm()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_ifft_inverts_fft() {
        let input: Vec<Complex64> = (0..32)
            .map(|i| Complex64::new((i as f64).sqrt(), (i % 5) as f64))
            .collect();
        let restored = ifft(&fft(&input).unwrap()).unwrap();

        for (a, b) in input.iter().zip(restored.iter()) {
            assert!((*a - *b).norm() < 1e-9 * a.norm().max(1.0));
        }
    }

    #[test]
    fn test_input_untouched() {
        let input = vec![Complex64::new(1.0, 2.0), Complex64::new(3.0, 4.0)];
        let copy = input.clone();
        let _ = fft(&input).unwrap();
        assert_eq!(input, copy);
    }

    #[test]
    fn test_non_power_of_two_rejected() {
        let input = vec![Complex64::new(0.0, 0.0); 3];
        assert!(fft(&input).is_err());
        assert!(ifft(&input).is_err());
    }
}

//! Input signal ingestion and zero padding
//!
//! A [`Signal`] keeps the caller's samples as complex numbers, zero-padded to
//! the next power of two. Real input gets zero imaginary parts.

use num_complex::Complex64;

use crate::error::{FourierError, Result};
use crate::transform::{next_power_of_two, InterleavedBuffer};

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Padded samples, `len() == padded_length`
    samples: Vec<Complex64>,
    original_length: usize,
}

impl Signal {
    /// Real samples with zero imaginary parts
    pub fn from_real(data: &[f64]) -> Self {
        Self::from_samples(data.iter().map(|&re| Complex64::new(re, 0.0)).collect())
    }

    pub fn from_complex(data: &[Complex64]) -> Self {
        Self::from_samples(data.to_vec())
    }

    /// Alternating real and imaginary parts; the length must be even
    pub fn from_interleaved(data: &[f64]) -> Result<Self> {
        if data.len() % 2 != 0 {
            return Err(FourierError::OddInterleavedLength(data.len()));
        }
        Ok(Self::from_samples(
            data.chunks_exact(2)
                .map(|pair| Complex64::new(pair[0], pair[1]))
                .collect(),
        ))
    }

    fn from_samples(mut samples: Vec<Complex64>) -> Self {
        let original_length = samples.len();
        let padded_length = if original_length == 0 {
            0
        } else {
            next_power_of_two(original_length)
        };
        samples.resize(padded_length, Complex64::new(0.0, 0.0));

        if padded_length != original_length {
            log::debug!(
                "data length {} padded with {} zeros to {}",
                original_length,
                padded_length - original_length,
                padded_length
            );
        }

        Self {
            samples,
            original_length,
        }
    }

    /// Number of points supplied by the caller
    pub fn original_length(&self) -> usize {
        self.original_length
    }

    /// Working length, the smallest power of two not below the original length
    pub fn padded_length(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original_length == 0
    }

    /// Padded samples
    pub fn samples(&self) -> &[Complex64] {
        &self.samples
    }

    /// Samples without the zero padding
    pub fn original_samples(&self) -> &[Complex64] {
        &self.samples[..self.original_length]
    }

    /// Padded samples as alternating real and imaginary parts
    pub fn to_interleaved(&self) -> InterleavedBuffer {
        InterleavedBuffer::from_complex(&self.samples)
    }

    /// Real parts of the original samples
    pub fn real_parts(&self) -> Vec<f64> {
        self.original_samples().iter().map(|c| c.re).collect()
    }
}

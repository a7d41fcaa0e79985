//! In-place radix-2 FFT kernel on interleaved real/imaginary buffers
//!
//! Data is laid out as `re_0, im_0, re_1, im_1, ...`. The kernel is an
//! iterative decimation-in-time Cooley-Tukey transform: a bit-reversal
//! permutation followed by butterfly passes whose twiddle factors come from a
//! trigonometric recurrence, so only one sine pair is evaluated per stage.

use num_complex::Complex64;
use std::f64::consts::TAU;

use super::power_of_two::check_power_of_two;
use crate::error::{FourierError, Result};

/// Transform direction
///
/// The forward transform uses a positive exponent, `X[k] = Σ x[j]·e^(+2πi·jk/n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    /// Exponent sign handed to the kernel
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Inverse => -1.0,
        }
    }
}

/// Replace `data[0..2*nn]` with its discrete Fourier transform (forward) or
/// with `nn` times its inverse discrete Fourier transform (inverse)
///
/// `nn` must be a power of two. This is not checked here; callers pad or
/// validate beforehand.
pub fn basic_fft(data: &mut [f64], nn: usize, direction: Direction) {
    let n = nn << 1;

    // Bit-reversal permutation of the complex pairs (1-based pair offsets)
    let mut j = 1usize;
    let mut i = 1usize;
    while i < n {
        if j > i {
            data.swap(j - 1, i - 1);
            data.swap(j, i);
        }
        let mut m = n >> 1;
        while m >= 2 && j > m {
            j -= m;
            m >>= 1;
        }
        j += m;
        i += 2;
    }

    // Danielson-Lanczos butterflies
    let mut mmax = 2usize;
    while n > mmax {
        let istep = mmax << 1;
        let theta = direction.sign() * (TAU / mmax as f64);
        let wtemp = (0.5 * theta).sin();
        let wpr = -2.0 * wtemp * wtemp;
        let wpi = theta.sin();
        let mut wr = 1.0;
        let mut wi = 0.0;

        let mut m = 1usize;
        while m < mmax {
            let mut i = m;
            while i <= n {
                let ii = i - 1;
                let jj = ii + mmax;
                let tempr = wr * data[jj] - wi * data[jj + 1];
                let tempi = wr * data[jj + 1] + wi * data[jj];
                data[jj] = data[ii] - tempr;
                data[jj + 1] = data[ii + 1] - tempi;
                data[ii] += tempr;
                data[ii + 1] += tempi;
                i += istep;
            }
            let wprev = wr;
            wr = wprev * wpr - wi * wpi + wr;
            wi = wi * wpr + wprev * wpi + wi;
            m += 2;
        }
        mmax = istep;
    }
}

/// Owned interleaved buffer that the kernel mutates in place
#[derive(Debug, Clone, PartialEq)]
pub struct InterleavedBuffer {
    data: Vec<f64>,
}

impl InterleavedBuffer {
    /// Buffer holding `len` complex zeros
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; 2 * len],
        }
    }

    /// Interleave a complex sequence
    pub fn from_complex(samples: &[Complex64]) -> Self {
        let mut data = Vec::with_capacity(2 * samples.len());
        for c in samples {
            data.push(c.re);
            data.push(c.im);
        }
        Self { data }
    }

    /// Wrap an already interleaved array
    pub fn from_interleaved(data: Vec<f64>) -> Result<Self> {
        if data.len() % 2 != 0 {
            return Err(FourierError::OddInterleavedLength(data.len()));
        }
        Ok(Self { data })
    }

    /// Number of complex points
    pub fn len(&self) -> usize {
        self.data.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Complex point `k`
    pub fn get(&self, k: usize) -> Complex64 {
        Complex64::new(self.data[2 * k], self.data[2 * k + 1])
    }

    /// Squared magnitude of complex point `k`
    pub fn norm_sqr_at(&self, k: usize) -> f64 {
        let re = self.data[2 * k];
        let im = self.data[2 * k + 1];
        re * re + im * im
    }

    /// Multiply real and imaginary parts of point `k` by `weights[k]`
    pub fn apply_weights(&mut self, weights: &[f64]) {
        for (pair, &w) in self.data.chunks_exact_mut(2).zip(weights.iter()) {
            pair[0] *= w;
            pair[1] *= w;
        }
    }

    pub fn scale(&mut self, factor: f64) {
        for v in self.data.iter_mut() {
            *v *= factor;
        }
    }

    pub fn to_complex(&self) -> Vec<Complex64> {
        self.data
            .chunks_exact(2)
            .map(|pair| Complex64::new(pair[0], pair[1]))
            .collect()
    }

    /// Run the kernel over the whole buffer
    ///
    /// The inverse direction is left unnormalized (`n` times the true inverse).
    pub fn transform_in_place(&mut self, direction: Direction) -> Result<()> {
        let nn = self.len();
        if !check_power_of_two(nn) {
            return Err(FourierError::NotPowerOfTwo {
                what: "transform length",
                value: nn,
            });
        }
        basic_fft(&mut self.data, nn, direction);
        Ok(())
    }
}

//! Window functions for spectral analysis
//!
//! Weights are indexed `i = 0..=n` with `n = length - 1`.

use std::f64::consts::PI;
use std::fmt;

use crate::error::{FourierError, Result};

pub const DEFAULT_KAISER_ALPHA: f64 = 2.0;
pub const DEFAULT_GAUSSIAN_ALPHA: f64 = 2.5;
pub const MIN_GAUSSIAN_ALPHA: f64 = 2.0;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WindowKind {
    /// No windowing applied; weights are all 1 like [`WindowKind::Rectangular`]
    #[default]
    None,

    /// Rectangular (square, box-car): w[i] = 1
    Rectangular,

    /// Bartlett (triangular): w[i] = 1 - |i - n/2| / (n/2)
    Bartlett,

    /// Welch: w[i] = 1 - ((i - n/2) / (n/2))²
    Welch,

    /// Hann (Hanning): w[i] = (1 - cos(2πi/n)) / 2
    Hann,

    /// Hamming: w[i] = 0.54 + 0.46·cos(2πi/n)
    Hamming,

    /// Kaiser: w[i] = I₀(πα·√(1 - (2i/n - 1)²)) / I₀(πα)
    Kaiser { alpha: f64 },

    /// Gaussian: w[i] = exp(-½·(α(2i - n)/n)²), α ≥ 2
    Gaussian { alpha: f64 },
}

impl WindowKind {
    /// Kaiser window; `alpha` must be finite and non-negative
    pub fn kaiser(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(FourierError::InvalidParameter {
                name: "Kaiser alpha",
                value: alpha,
                reason: "must be a finite, non-negative number",
            });
        }
        Ok(WindowKind::Kaiser { alpha })
    }

    /// Gaussian window; `alpha` below 2 is reset to 2
    pub fn gaussian(alpha: f64) -> Result<Self> {
        if !alpha.is_finite() {
            return Err(FourierError::InvalidParameter {
                name: "Gaussian alpha",
                value: alpha,
                reason: "must be a finite number",
            });
        }
        let alpha = if alpha < MIN_GAUSSIAN_ALPHA {
            log::warn!(
                "Gaussian alpha must be greater than or equal to {}; {} has been reset to {}",
                MIN_GAUSSIAN_ALPHA,
                alpha,
                MIN_GAUSSIAN_ALPHA
            );
            MIN_GAUSSIAN_ALPHA
        } else {
            alpha
        };
        Ok(WindowKind::Gaussian { alpha })
    }

    pub fn default_kaiser() -> Self {
        WindowKind::Kaiser {
            alpha: DEFAULT_KAISER_ALPHA,
        }
    }

    pub fn default_gaussian() -> Self {
        WindowKind::Gaussian {
            alpha: DEFAULT_GAUSSIAN_ALPHA,
        }
    }

    /// Short window name
    pub fn name(&self) -> &'static str {
        match self {
            WindowKind::None => "No windowing applied",
            WindowKind::Rectangular => "Rectangular",
            WindowKind::Bartlett => "Bartlett",
            WindowKind::Welch => "Welch",
            WindowKind::Hann => "Hann",
            WindowKind::Hamming => "Hamming",
            WindowKind::Kaiser { .. } => "Kaiser",
            WindowKind::Gaussian { .. } => "Gaussian",
        }
    }

    /// Whether the weights can differ from 1
    pub fn is_tapered(&self) -> bool {
        !matches!(self, WindowKind::None | WindowKind::Rectangular)
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowKind::Kaiser { alpha } | WindowKind::Gaussian { alpha } => {
                write!(f, "{}, alpha = {}", self.name(), alpha)
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `kind` - Window function
/// * `length` - Number of weights (segment length)
///
/// # Returns
/// Vector of weights w[i] for i = 0..length-1
pub fn generate_window(kind: WindowKind, length: usize) -> Vec<f64> {
    if length < 2 || !kind.is_tapered() {
        return vec![1.0; length];
    }

    let n = (length - 1) as f64;
    let half = n / 2.0;

    (0..length)
        .map(|i| {
            let x = i as f64;
            match kind {
                WindowKind::Bartlett => 1.0 - ((x - half) / half).abs(),
                WindowKind::Welch => {
                    let r = (x - half) / half;
                    1.0 - r * r
                }
                WindowKind::Hann => (1.0 - (2.0 * PI * x / n).cos()) / 2.0,
                WindowKind::Hamming => 0.54 + 0.46 * (2.0 * PI * x / n).cos(),
                WindowKind::Kaiser { alpha } => {
                    let r = 2.0 * x / n - 1.0;
                    let arg = PI * alpha * (1.0 - r * r).max(0.0).sqrt();
                    mod_bessel_i0(arg) / mod_bessel_i0(PI * alpha)
                }
                WindowKind::Gaussian { alpha } => {
                    let r = alpha * (2.0 * x - n) / n;
                    (-0.5 * r * r).exp()
                }
                WindowKind::None | WindowKind::Rectangular => 1.0,
            }
        })
        .collect()
}

/// Sum of squared weights used to normalize power estimates
///
/// Untapered windows contribute exactly the window length.
pub fn sum_of_squared_weights(kind: WindowKind, weights: &[f64]) -> f64 {
    if kind.is_tapered() {
        weights.iter().map(|&w| w * w).sum()
    } else {
        weights.len() as f64
    }
}

/// Modified Bessel function of the first kind, order zero
///
/// Abramowitz and Stegun polynomial approximations 9.8.1 (|x| < 3.75) and
/// 9.8.2 (|x| ≥ 3.75).
pub fn mod_bessel_i0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 3.75 {
        let t = (x / 3.75) * (x / 3.75);
        1.0 + t
            * (3.5156229
                + t * (3.0899424
                    + t * (1.2067492 + t * (0.2659732 + t * (0.0360768 + t * 0.0045813)))))
    } else {
        let t = 3.75 / ax;
        (ax.exp() / ax.sqrt())
            * (0.39894228
                + t * (0.01328592
                    + t * (0.00225319
                        + t * (-0.00157565
                            + t * (0.00916281
                                + t * (-0.02057706
                                    + t * (0.02635537 + t * (-0.01647633 + t * 0.00392377))))))))
    }
}

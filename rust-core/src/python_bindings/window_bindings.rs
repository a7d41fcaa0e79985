//! Python bindings for window selection

use pyo3::prelude::*;

use crate::error::Result;
use crate::spectrum::windows::{WindowKind, DEFAULT_GAUSSIAN_ALPHA, DEFAULT_KAISER_ALPHA};

/// Window type enum exposed to Python
#[pyclass(name = "WindowType")]
#[derive(Clone, Copy, PartialEq)]
pub enum PyWindowType {
    NoWindow,
    Rectangular,
    Bartlett,
    Welch,
    Hann,
    Hamming,
    Kaiser,
    Gaussian,
}

impl PyWindowType {
    /// Build the window, taking α from `alpha` or the window's default
    pub fn to_kind(self, alpha: Option<f64>) -> Result<WindowKind> {
        Ok(match self {
            PyWindowType::NoWindow => WindowKind::None,
            PyWindowType::Rectangular => WindowKind::Rectangular,
            PyWindowType::Bartlett => WindowKind::Bartlett,
            PyWindowType::Welch => WindowKind::Welch,
            PyWindowType::Hann => WindowKind::Hann,
            PyWindowType::Hamming => WindowKind::Hamming,
            PyWindowType::Kaiser => WindowKind::kaiser(alpha.unwrap_or(DEFAULT_KAISER_ALPHA))?,
            PyWindowType::Gaussian => {
                WindowKind::gaussian(alpha.unwrap_or(DEFAULT_GAUSSIAN_ALPHA))?
            }
        })
    }
}

impl From<WindowKind> for PyWindowType {
    fn from(kind: WindowKind) -> Self {
        match kind {
            WindowKind::None => PyWindowType::NoWindow,
            WindowKind::Rectangular => PyWindowType::Rectangular,
            WindowKind::Bartlett => PyWindowType::Bartlett,
            WindowKind::Welch => PyWindowType::Welch,
            WindowKind::Hann => PyWindowType::Hann,
            WindowKind::Hamming => PyWindowType::Hamming,
            WindowKind::Kaiser { .. } => PyWindowType::Kaiser,
            WindowKind::Gaussian { .. } => PyWindowType::Gaussian,
        }
    }
}

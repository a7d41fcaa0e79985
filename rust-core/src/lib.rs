//! Fourier Analysis Core - Radix-2 FFT and Spectral Estimation
//!
//! Forward and inverse transforms, windowing, Welch power spectra,
//! correlation and short-time transforms, with optional Python bindings.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod error;
pub mod signal;
pub mod spectrum;
pub mod transform;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{FourierError, Result};
pub use signal::Signal;
pub use spectrum::{
    AnalyzerConfig, Correlation, FourierTransform, PowerSpectrum, SegmentRequest,
    SegmentWarning, Spectrogram, WindowKind,
};
pub use transform::{fft, ifft, TransformResult};

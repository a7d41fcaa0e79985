//! Spectral analysis: windows, segmentation, power spectra, correlation and
//! short-time transforms

pub mod analysis;
pub mod correlation;
pub mod psd;
pub mod segments;
pub mod short_time;
pub mod windowing;
pub mod windows;

pub use analysis::{AnalyzerConfig, FourierTransform};
pub use correlation::{correlate, Correlation};
pub use psd::{power_spectrum, power_spectrum_from_reader, PowerSpectrum};
pub use segments::{
    resolve_segments, SegmentPlan, SegmentRequest, SegmentResolution, SegmentWarning,
    SegmentWarnings,
};
pub use short_time::{short_time, short_time_duration, window_length_for_duration, Spectrogram};
pub use windowing::{apply_window, WindowWeights, WindowedData};
pub use windows::{generate_window, mod_bessel_i0, WindowKind};

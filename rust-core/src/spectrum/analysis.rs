//! High-level Fourier analyzer
//!
//! Holds one data set together with the analysis settings and caches the most
//! recent transform, power spectrum, correlation and time-frequency results.

use std::io::BufRead;

use num_complex::Complex64;

use super::correlation::{correlate, Correlation};
use super::psd::{power_spectrum, power_spectrum_from_reader, PowerSpectrum};
use super::segments::{SegmentPlan, SegmentRequest, SegmentWarnings};
use super::short_time::{short_time, window_length_for_duration, Spectrogram};
use super::windowing::{apply_window, WindowedData};
use super::windows::WindowKind;
use crate::error::{FourierError, Result};
use crate::signal::Signal;
use crate::transform::{Direction, InterleavedBuffer, TransformResult};

/// Analysis configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Window applied before every transform
    pub window: WindowKind,

    /// Requested segmentation for power spectrum estimation
    pub segments: SegmentRequest,

    /// Overlap power spectrum segments by half a segment
    pub overlap: bool,

    /// Sampling interval
    pub delta_t: f64,

    /// Estimate power spectra from the zero-padded data; otherwise the
    /// segment resolver sees the unpadded length and may segment or pad it
    pub zero_pad: bool,

    /// Extra points of segment shortfall accepted before padding is
    /// preferred over segmenting a length that is not a power of two
    pub padding_tolerance: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window: WindowKind::None,
            segments: SegmentRequest::Unspecified,
            overlap: false,
            delta_t: 1.0,
            zero_pad: true,
            padding_tolerance: 0,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_window(mut self, window: WindowKind) -> Self {
        self.window = window;
        self
    }

    pub fn with_segments(mut self, segments: SegmentRequest) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_overlap(mut self, overlap: bool) -> Self {
        self.overlap = overlap;
        self
    }

    /// Set the sampling interval; it must be finite and positive
    pub fn with_delta_t(mut self, delta_t: f64) -> Result<Self> {
        validate_delta_t(delta_t)?;
        self.delta_t = delta_t;
        Ok(self)
    }

    pub fn with_zero_pad(mut self, zero_pad: bool) -> Self {
        self.zero_pad = zero_pad;
        self
    }

    pub fn with_padding_tolerance(mut self, padding_tolerance: usize) -> Self {
        self.padding_tolerance = padding_tolerance;
        self
    }
}

fn validate_delta_t(delta_t: f64) -> Result<()> {
    if delta_t.is_finite() && delta_t > 0.0 {
        Ok(())
    } else {
        Err(FourierError::InvalidParameter {
            name: "sampling interval",
            value: delta_t,
            reason: "must be a finite, positive number",
        })
    }
}

/// Stateful Fourier analyzer
///
/// Changing the data invalidates every cached result. Changing a setting
/// keeps earlier results until the corresponding operation is run again.
#[derive(Debug, Clone, Default)]
pub struct FourierTransform {
    config: AnalyzerConfig,
    signal: Option<Signal>,
    windowed: Option<WindowedData>,
    transform: Option<TransformResult>,
    power_spectrum: Option<PowerSpectrum>,
    correlation: Option<Correlation>,
    spectrogram: Option<Spectrogram>,
}

impl FourierTransform {
    /// Create new analyzer without data
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create new analyzer holding real data
    pub fn from_real(data: &[f64], config: AnalyzerConfig) -> Self {
        let mut analyzer = Self::new(config);
        analyzer.set_real_data(data);
        analyzer
    }

    // Data

    pub fn set_real_data(&mut self, data: &[f64]) {
        self.set_signal(Signal::from_real(data));
    }

    pub fn set_complex_data(&mut self, data: &[Complex64]) {
        self.set_signal(Signal::from_complex(data));
    }

    /// Alternating real and imaginary parts
    pub fn set_interleaved_data(&mut self, data: &[f64]) -> Result<()> {
        self.set_signal(Signal::from_interleaved(data)?);
        Ok(())
    }

    fn set_signal(&mut self, signal: Signal) {
        self.signal = Some(signal);
        self.windowed = None;
        self.transform = None;
        self.power_spectrum = None;
        self.correlation = None;
        self.spectrogram = None;
    }

    fn signal(&self) -> Result<&Signal> {
        match &self.signal {
            Some(signal) if !signal.is_empty() => Ok(signal),
            _ => Err(FourierError::NoData),
        }
    }

    /// Data as entered, without padding
    pub fn input_data(&self) -> Option<&[Complex64]> {
        self.signal.as_ref().map(|s| s.original_samples())
    }

    pub fn original_length(&self) -> usize {
        self.signal.as_ref().map_or(0, |s| s.original_length())
    }

    /// Zero-padded length the transforms run on
    pub fn used_length(&self) -> usize {
        self.signal.as_ref().map_or(0, |s| s.padded_length())
    }

    /// Zero-padded data as alternating real and imaginary parts
    pub fn interleaved_data(&self) -> Option<InterleavedBuffer> {
        self.signal.as_ref().map(|s| s.to_interleaved())
    }

    // Window

    pub fn set_window(&mut self, window: WindowKind) {
        self.config.window = window;
    }

    pub fn set_rectangular(&mut self) {
        self.set_window(WindowKind::Rectangular);
    }

    pub fn set_bartlett(&mut self) {
        self.set_window(WindowKind::Bartlett);
    }

    pub fn set_welch(&mut self) {
        self.set_window(WindowKind::Welch);
    }

    pub fn set_hann(&mut self) {
        self.set_window(WindowKind::Hann);
    }

    pub fn set_hamming(&mut self) {
        self.set_window(WindowKind::Hamming);
    }

    pub fn set_kaiser(&mut self, alpha: f64) -> Result<()> {
        self.set_window(WindowKind::kaiser(alpha)?);
        Ok(())
    }

    pub fn set_kaiser_default(&mut self) {
        self.set_window(WindowKind::default_kaiser());
    }

    pub fn set_gaussian(&mut self, alpha: f64) -> Result<()> {
        self.set_window(WindowKind::gaussian(alpha)?);
        Ok(())
    }

    pub fn set_gaussian_default(&mut self) {
        self.set_window(WindowKind::default_gaussian());
    }

    pub fn remove_window(&mut self) {
        self.set_window(WindowKind::None);
    }

    pub fn window(&self) -> WindowKind {
        self.config.window
    }

    /// Window name, with α for Kaiser and Gaussian windows
    pub fn window_name(&self) -> String {
        self.config.window.to_string()
    }

    // Segmentation and timing

    pub fn set_segment_number(&mut self, segment_number: usize) {
        self.config.segments = SegmentRequest::Count(segment_number);
    }

    pub fn set_segment_length(&mut self, segment_length: usize) {
        self.config.segments = SegmentRequest::Length(segment_length);
    }

    pub fn set_overlap(&mut self, overlap: bool) {
        self.config.overlap = overlap;
    }

    pub fn overlap(&self) -> bool {
        self.config.overlap
    }

    pub fn segment_request(&self) -> SegmentRequest {
        self.config.segments
    }

    pub fn set_delta_t(&mut self, delta_t: f64) -> Result<()> {
        validate_delta_t(delta_t)?;
        self.config.delta_t = delta_t;
        Ok(())
    }

    /// Set the sampling frequency, the reciprocal of Δt
    pub fn set_sampling_frequency(&mut self, frequency: f64) -> Result<()> {
        self.set_delta_t(1.0 / frequency)
    }

    pub fn delta_t(&self) -> f64 {
        self.config.delta_t
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Replace the whole configuration
    pub fn update_config(&mut self, config: AnalyzerConfig) -> Result<()> {
        validate_delta_t(config.delta_t)?;
        self.config = config;
        Ok(())
    }

    // Transforms

    fn window_signal(&mut self) -> Result<WindowedData> {
        let windowed = apply_window(&self.signal()?.to_interleaved(), self.config.window);
        self.windowed = Some(windowed.clone());
        Ok(windowed)
    }

    /// Forward transform of the windowed, zero-padded data
    pub fn transform(&mut self) -> Result<&TransformResult> {
        let mut buffer = self.window_signal()?.data;
        buffer.transform_in_place(Direction::Forward)?;
        Ok(&*self
            .transform
            .insert(TransformResult::new(buffer, Direction::Forward)))
    }

    /// Inverse transform of the windowed, zero-padded data, divided by its length
    pub fn inverse(&mut self) -> Result<&TransformResult> {
        let mut buffer = self.window_signal()?.data;
        buffer.transform_in_place(Direction::Inverse)?;
        buffer.scale(1.0 / buffer.len() as f64);
        Ok(&*self
            .transform
            .insert(TransformResult::new(buffer, Direction::Inverse)))
    }

    /// Most recent forward or inverse transform
    pub fn transformed(&self) -> Option<&TransformResult> {
        self.transform.as_ref()
    }

    /// Data as windowed for the most recent transform
    pub fn windowed_data(&self) -> Option<&WindowedData> {
        self.windowed.as_ref()
    }

    /// Weights used for the most recent transform
    pub fn weights(&self) -> Option<&[f64]> {
        self.windowed.as_ref().map(|w| w.weights())
    }

    // Power spectrum

    /// Welch power spectrum of the stored data
    pub fn power_spectrum(&mut self) -> Result<&PowerSpectrum> {
        let psd = power_spectrum(self.signal()?, &self.config)?;
        Ok(&*self.power_spectrum.insert(psd))
    }

    /// Welch power spectrum of interleaved values read from a text stream
    ///
    /// The stream replaces neither the stored data nor the segmentation
    /// request; the overlap setting and window apply.
    pub fn power_spectrum_from_reader<R: BufRead>(
        &mut self,
        reader: R,
        segment_length: usize,
        segment_number: usize,
    ) -> Result<&PowerSpectrum> {
        let plan = SegmentPlan::explicit(segment_length, segment_number, self.config.overlap)?;
        let psd = power_spectrum_from_reader(reader, plan, &self.config)?;
        Ok(&*self.power_spectrum.insert(psd))
    }

    pub fn last_power_spectrum(&self) -> Option<&PowerSpectrum> {
        self.power_spectrum.as_ref()
    }

    /// Warnings raised while resolving the most recent power spectrum plan
    pub fn warnings(&self) -> SegmentWarnings {
        self.power_spectrum
            .as_ref()
            .map(|p| p.warnings())
            .unwrap_or_default()
    }

    /// Printable report of [`Self::warnings`]
    pub fn warnings_report(&self) -> String {
        self.power_spectrum
            .as_ref()
            .and_then(|p| p.resolution.as_ref())
            .map(|r| r.report())
            .unwrap_or_default()
    }

    // Correlation

    /// Correlate the stored real data with another real sequence
    ///
    /// Data entered with non-zero imaginary parts is rejected.
    pub fn correlate(&mut self, other: &[f64]) -> Result<&Correlation> {
        let signal = self.signal()?;
        if signal.original_samples().iter().any(|c| c.im != 0.0) {
            return Err(FourierError::ComplexData {
                operation: "correlation",
            });
        }
        if other.len() != signal.original_length() {
            return Err(FourierError::LengthMismatch {
                first: signal.original_length(),
                second: other.len(),
            });
        }
        let result = correlate(
            &signal.real_parts(),
            other,
            self.config.window,
            self.config.delta_t,
        )?;
        Ok(&*self.correlation.insert(result))
    }

    /// Store `first` as the data and correlate it with `second`
    pub fn correlate_pair(&mut self, first: &[f64], second: &[f64]) -> Result<&Correlation> {
        if first.len() != second.len() {
            return Err(FourierError::LengthMismatch {
                first: first.len(),
                second: second.len(),
            });
        }
        self.set_real_data(first);
        self.correlate(second)
    }

    pub fn last_correlation(&self) -> Option<&Correlation> {
        self.correlation.as_ref()
    }

    // Short-time transform

    /// Sliding-window power spectra; no window selects a Gaussian with α = 2.5
    pub fn short_time(&mut self, window_length: usize) -> Result<&Spectrogram> {
        let result = short_time(self.signal()?, window_length, &self.config)?;
        Ok(&*self.spectrogram.insert(result))
    }

    /// Sliding-window power spectra with the window given as a duration
    pub fn short_time_duration(&mut self, window_time: f64) -> Result<&Spectrogram> {
        let window_length = window_length_for_duration(window_time, self.config.delta_t)?;
        self.short_time(window_length)
    }

    pub fn last_spectrogram(&self) -> Option<&Spectrogram> {
        self.spectrogram.as_ref()
    }
}

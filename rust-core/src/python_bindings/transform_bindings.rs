//! Python bindings for the Fourier analyzer

use numpy::{PyArray1, PyArray2, PyReadonlyArray1};
use pyo3::prelude::*;

use super::window_bindings::PyWindowType;
use crate::spectrum::{AnalyzerConfig, FourierTransform};

/// Fourier analyzer exposed to Python
#[pyclass(name = "FourierTransform")]
pub struct PyFourierTransform {
    analyzer: FourierTransform,
}

#[pymethods]
impl PyFourierTransform {
    /// Create a new analyzer
    ///
    /// Args:
    ///     delta_t: Sampling interval
    ///     window_type: Window applied before each transform
    ///     alpha: Kaiser or Gaussian α (window default when omitted)
    #[new]
    #[pyo3(signature = (delta_t=1.0, window_type=PyWindowType::NoWindow, alpha=None))]
    fn new(delta_t: f64, window_type: PyWindowType, alpha: Option<f64>) -> PyResult<Self> {
        let config = AnalyzerConfig::default()
            .with_delta_t(delta_t)?
            .with_window(window_type.to_kind(alpha)?);

        Ok(Self {
            analyzer: FourierTransform::new(config),
        })
    }

    /// Enter real data
    fn set_data(&mut self, data: PyReadonlyArray1<f64>) -> PyResult<()> {
        self.analyzer.set_real_data(data.as_slice()?);
        Ok(())
    }

    /// Enter complex data as alternating real and imaginary parts
    fn set_interleaved_data(&mut self, data: PyReadonlyArray1<f64>) -> PyResult<()> {
        self.analyzer.set_interleaved_data(data.as_slice()?)?;
        Ok(())
    }

    #[pyo3(signature = (window_type, alpha=None))]
    fn set_window(&mut self, window_type: PyWindowType, alpha: Option<f64>) -> PyResult<()> {
        self.analyzer.set_window(window_type.to_kind(alpha)?);
        Ok(())
    }

    fn remove_window(&mut self) {
        self.analyzer.remove_window();
    }

    fn get_window_type(&self) -> PyWindowType {
        self.analyzer.window().into()
    }

    fn window_name(&self) -> String {
        self.analyzer.window_name()
    }

    fn set_segment_number(&mut self, segment_number: usize) {
        self.analyzer.set_segment_number(segment_number);
    }

    fn set_segment_length(&mut self, segment_length: usize) {
        self.analyzer.set_segment_length(segment_length);
    }

    fn set_overlap(&mut self, overlap: bool) {
        self.analyzer.set_overlap(overlap);
    }

    fn set_delta_t(&mut self, delta_t: f64) -> PyResult<()> {
        self.analyzer.set_delta_t(delta_t)?;
        Ok(())
    }

    fn original_length(&self) -> usize {
        self.analyzer.original_length()
    }

    fn used_length(&self) -> usize {
        self.analyzer.used_length()
    }

    /// Forward transform
    ///
    /// Returns:
    ///     Alternating real and imaginary parts as numpy array
    fn transform<'py>(&mut self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        let result = self.analyzer.transform()?;
        Ok(PyArray1::from_slice(py, result.as_alternate()))
    }

    /// Inverse transform, divided by the data length
    ///
    /// Returns:
    ///     Alternating real and imaginary parts as numpy array
    fn inverse<'py>(&mut self, py: Python<'py>) -> PyResult<&'py PyArray1<f64>> {
        let result = self.analyzer.inverse()?;
        Ok(PyArray1::from_slice(py, result.as_alternate()))
    }

    /// Welch power spectrum
    ///
    /// Returns:
    ///     2 x n array, frequencies in row 0 and power in row 1
    fn power_spectrum<'py>(&mut self, py: Python<'py>) -> PyResult<&'py PyArray2<f64>> {
        let psd = self.analyzer.power_spectrum()?;
        Ok(PyArray2::from_owned_array(py, psd.to_array()))
    }

    /// Warnings raised by the last power spectrum
    fn warnings_report(&self) -> String {
        self.analyzer.warnings_report()
    }

    /// Correlate the entered data with another real sequence
    ///
    /// Returns:
    ///     2 x n array, lags in row 0 and coefficients in row 1
    fn correlate<'py>(
        &mut self,
        py: Python<'py>,
        other: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray2<f64>> {
        let result = self.analyzer.correlate(other.as_slice()?)?;
        Ok(PyArray2::from_owned_array(py, result.to_array()))
    }

    /// Short-time Fourier transform
    ///
    /// Returns:
    ///     Time-frequency matrix; row 0 holds times, column 0 frequencies
    fn short_time<'py>(
        &mut self,
        py: Python<'py>,
        window_length: usize,
    ) -> PyResult<&'py PyArray2<f64>> {
        let result = self.analyzer.short_time(window_length)?;
        Ok(PyArray2::from_owned_array(py, result.matrix().clone()))
    }
}

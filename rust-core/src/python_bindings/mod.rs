//! PyO3 bindings for Python integration

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::error::FourierError;

mod transform_bindings;
mod window_bindings;

impl From<FourierError> for PyErr {
    fn from(err: FourierError) -> PyErr {
        match err {
            FourierError::Io(_) => PyIOError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Python module definition
#[pymodule]
fn fourier_analysis(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<transform_bindings::PyFourierTransform>()?;
    m.add_class::<window_bindings::PyWindowType>()?;

    Ok(())
}

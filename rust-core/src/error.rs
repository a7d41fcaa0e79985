//! Error types for the Fourier analysis core
//!
//! Hard failures abort the requested operation. Segmentation problems that can
//! be repaired are reported as [`SegmentWarning`](crate::spectrum::SegmentWarning)s instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FourierError {
    #[error("No data has been entered for the Fast Fourier Transform")]
    NoData,

    #[error("Interleaved data length must be an even number (found: {0})")]
    OddInterleavedLength(usize),

    #[error("More than one point, many more, are needed for spectral estimation (found: {length})")]
    InsufficientData { length: usize },

    #[error("The two data sets to be correlated are of different length ({first} and {second})")]
    LengthMismatch { first: usize, second: usize },

    #[error("The {what}, {value}, is not an integer power of two")]
    NotPowerOfTwo { what: &'static str, value: usize },

    #[error("The {operation} requires real data; the stored data has non-zero imaginary parts")]
    ComplexData { operation: &'static str },

    #[error("The window length, {window}, is greater than the data length, {data}")]
    WindowTooLong { window: usize, data: usize },

    #[error("Invalid {name} ({value}): {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Failed to read segment data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse token {position} ('{token}') as a number")]
    Parse { token: String, position: usize },

    #[error("Segment data ended early: expected {expected} values, found {found}")]
    UnexpectedEndOfStream { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, FourierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_constraint() {
        let err = FourierError::NotPowerOfTwo {
            what: "correlation data length",
            value: 12,
        };
        assert_eq!(
            err.to_string(),
            "The correlation data length, 12, is not an integer power of two"
        );

        let err = FourierError::WindowTooLong { window: 64, data: 40 };
        assert!(err.to_string().contains("64"));
        assert!(err.to_string().contains("40"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err: FourierError = io.into();
        assert!(matches!(err, FourierError::Io(_)));
    }
}

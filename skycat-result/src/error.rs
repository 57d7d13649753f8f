use std::{fmt, io};
use thiserror::Error;

/// Unified error type for all skycat operations.
///
/// This enum encompasses every failure mode across the skycat stack, from
/// catalog bookkeeping errors to failures inside the deferred-array engine.
/// Structural variants (`NotFound`, `LengthMismatch`, `InvalidIndex`,
/// `ShapeMismatch`, `IncompatibleSources`) are raised at the call that
/// violates the contract, never at materialization time.
///
/// # Thread Safety
///
/// `Error` implements `Send` and `Sync`, allowing errors to cross thread
/// boundaries during parallel materialization.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations (e.g. reading a CSV catalog).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Arrow library error during columnar data operations.
    ///
    /// Arrow is the concrete in-memory format produced by materialization,
    /// so these errors surface from the compute kernels and array builders
    /// the lazy engine delegates to.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A referenced column name is neither explicitly stored nor one of the
    /// declared default columns.
    #[error("column not found: {0}")]
    NotFound(String),

    /// An assigned sequence's length differs from the container's row
    /// count, or a boolean selection mask's length differs from the row
    /// count.
    ///
    /// This is enforced eagerly at assignment/selection time since it
    /// determines the container's declared structure.
    #[error("length mismatch: expected {expected} rows, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Attempted single-integer row selection, or an index sequence
    /// containing out-of-range values.
    ///
    /// Selecting exactly one row as a scalar is unsupported; callers
    /// needing one row must use a length-one index sequence.
    #[error("invalid index: {0}")]
    InvalidIndex(String),

    /// Combinator inputs have incompatible rank or length (e.g. stacking
    /// columns of different lengths, or projecting a non-vector column).
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Concatenation of catalog sources that share no columns.
    #[error("incompatible sources: {0}")]
    IncompatibleSources(String),

    /// Invalid user input or API parameter outside the structural
    /// categories above (e.g. a zero-length projection axis).
    #[error("invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// This should never occur during normal operation. The message
    /// includes details about what invariant was violated.
    #[error("an internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a [`Error::NotFound`] for a column name.
    #[inline]
    pub fn not_found(name: impl Into<String>) -> Self {
        Error::NotFound(name.into())
    }

    /// Create a [`Error::LengthMismatch`] from expected/got row counts.
    #[inline]
    pub fn length_mismatch(expected: usize, got: usize) -> Self {
        Error::LengthMismatch { expected, got }
    }

    /// Create an internal error from any displayable error.
    ///
    /// This is a convenience method for converting other error types into
    /// [`Error::Internal`] while preserving the original error message.
    #[inline]
    pub fn internal<E: fmt::Display>(err: E) -> Self {
        Error::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = Error::not_found("Position");
        assert_eq!(err.to_string(), "column not found: Position");

        let err = Error::length_mismatch(10, 7);
        assert_eq!(err.to_string(), "length mismatch: expected 10 rows, got 7");
    }

    #[test]
    fn io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing file");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

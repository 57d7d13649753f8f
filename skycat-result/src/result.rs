use crate::error::Error;

/// Result type alias used throughout skycat.
///
/// All skycat operations that can fail should return this type.
pub type Result<T> = std::result::Result<T, Error>;

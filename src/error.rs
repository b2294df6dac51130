use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum KdIndexError {
    /// A query was handed a radius that is negative or not a number.
    #[error("Invalid query radius: {0}")]
    InvalidRadius(String),
}

/// Alias for `std::result::Result` with this crate's error type.
pub type Result<T> = std::result::Result<T, KdIndexError>;

//! Error types for point-set analysis
//!
//! Provides a unified error type for all pointset crates.

use thiserror::Error;

/// Core error type for grid, histogram and estimator operations
#[derive(Error, Debug)]
pub enum Error {
    /// Grid or histogram configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Point, cell or window dimensions disagree
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A histogram carries no mass and cannot be turned into a distribution
    #[error("Degenerate distribution: {0}")]
    DegenerateDistribution(String),

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} points, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Raster rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors raised by samplers and point processes
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for an empty point set
    pub fn empty_input() -> Self {
        Self::InsufficientData {
            expected: 1,
            actual: 0,
        }
    }

    /// Create an error for a dimension mismatch
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an error for a window with a non-positive extent
    pub fn degenerate_window(axis: usize, extent: f64) -> Self {
        Self::InvalidConfiguration(format!(
            "window extent along axis {axis} must be positive, got {extent}"
        ))
    }
}

//! Spatial statistics for point-process samples
//!
//! This crate re-exports the workspace crates behind a single dependency:
//!
//! - [`base`]: points, windows, errors and point-set statistics
//! - [`grid`]: sparse grids, histograms and KL divergence
//! - [`entropy`]: Monte-Carlo entropy estimation over grid signatures
//!
//! # Example
//!
//! ```rust
//! use pointset_stats::prelude::*;
//!
//! let window = Window::from_bounds([0.0, 0.0], [1.0, 1.0]);
//! let a = vec![Point::from([0.1, 0.1]), Point::from([0.8, 0.9])];
//! let b = vec![Point::from([0.1, 0.2]), Point::from([0.6, 0.9])];
//!
//! let p: Histogram = create_histogram_in(window.clone(), 2, &a).unwrap();
//! let q: Histogram = create_histogram_in(window, 2, &b).unwrap();
//! assert!(kl_divergence(&p, &q).unwrap().abs() < 1e-12);
//! ```

pub use pointset_core as base;
pub use pointset_entropy as entropy;
pub use pointset_grid as grid;

pub use pointset_core::{Error, Result};

/// Commonly used types and functions
pub mod prelude {
    pub use pointset_core::stats::{mean, variance};
    pub use pointset_core::{BinCount, Error, Point, Result, Window};
    pub use pointset_entropy::{
        estimate_entropy_from_process, estimate_entropy_from_sampler, EntropyEstimate,
        EntropyEstimator, EntropyEstimatorParameters, McmcPointProcess, PointSource,
    };
    pub use pointset_grid::{
        create_histogram, create_histogram_in, evaluate_at_cell_centers, kl_divergence,
        normalize_histogram, Cell, DivergenceEstimator, Histogram, HistogramOps, SparseGrid,
    };
}

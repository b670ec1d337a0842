//! Sparse spatial binning and distribution comparison for point sets
//!
//! This crate turns point sets into histograms over n-dimensional grids and
//! compares them as distributions.
//!
//! # Key Features
//!
//! - **Sparse grids**: [`SparseGrid`] stores marks only for touched cells and
//!   enumerates the dense cell range of its window on demand
//! - **Histograms**: [`Histogram`] counts points per cell, with
//!   [`create_histogram`] and [`normalize_histogram`] helpers
//! - **KL divergence**: [`DivergenceEstimator`] smooths mismatched supports
//!   by absolute discounting before comparing
//! - **Raster export** (feature `raster`): grayscale images of 2-D histograms
//!
//! # Examples
//!
//! ## Binning Points
//!
//! ```rust
//! use pointset_core::{Point, Window};
//! use pointset_grid::{Cell, SparseGrid};
//!
//! let window = Window::from_bounds([0.0, 0.0], [10.0, 10.0]);
//! let mut grid: SparseGrid<i32> = SparseGrid::uniform(window, 1.0).unwrap();
//!
//! grid.set_at(&Point::from([3.5, 3.5]), 1);
//! assert_eq!(grid.cell(&Point::from([3.5, 3.5])), Cell::from([3, 3]));
//! assert_eq!(grid.len(), 1);
//! ```
//!
//! ## Comparing Histograms
//!
//! ```rust
//! use pointset_core::{Point, Window};
//! use pointset_grid::{create_histogram_in, kl_divergence, Histogram};
//!
//! let window = Window::from_bounds([0.0], [1.0]);
//! let a: Vec<Point> = [0.1, 0.2, 0.7].iter().map(|&x| Point::from([x])).collect();
//! let b: Vec<Point> = [0.1, 0.6, 0.7].iter().map(|&x| Point::from([x])).collect();
//!
//! let p: Histogram = create_histogram_in(window.clone(), 4, &a).unwrap();
//! let q: Histogram = create_histogram_in(window, 4, &b).unwrap();
//!
//! let kl = kl_divergence(&p, &q).unwrap();
//! assert!(kl > 0.0);
//! assert!(kl_divergence(&p, &p).unwrap().abs() < 1e-12);
//! ```

pub mod divergence;
pub mod evaluate;
pub mod grid;
pub mod histogram;
#[cfg(feature = "raster")]
pub mod raster;

// Re-export main types and functions
pub use divergence::{
    kl_divergence, DivergenceEstimator, DivergenceReport, HistogramOps, DEFAULT_EPSILON,
};
pub use evaluate::evaluate_at_cell_centers;
pub use grid::{Cell, DenseCells, SparseGrid};
pub use histogram::{create_histogram, create_histogram_in, normalize_histogram, Histogram};

#[cfg(feature = "raster")]
pub use raster::{render_histogram, save_histogram_image, RasterImage};

pub use pointset_core::{Error, Result};

//! Core types for point-set analysis
//!
//! This crate provides the foundation shared by the grid, histogram and
//! entropy crates:
//!
//! - [`Error`] and the crate-wide [`Result`] alias
//! - [`Point`] and [`Window`] geometry primitives
//! - point-set summary statistics ([`stats::mean`], [`stats::variance`])
//! - the [`BinCount`] bound for histogram marks
//!
//! # Example
//!
//! ```rust
//! use pointset_core::{Point, Window};
//!
//! let samples = vec![Point::from([0.5, 1.0]), Point::from([2.0, -1.0])];
//! let window = Window::smallest_enclosing(&samples).unwrap();
//!
//! assert_eq!(window.extent(0), 1.5);
//! assert!(samples.iter().all(|p| window.contains(p)));
//! ```

pub mod error;
pub mod geometry;
pub mod numeric;
pub mod stats;

pub use error::{Error, Result};
pub use geometry::{Point, Window};
pub use numeric::BinCount;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

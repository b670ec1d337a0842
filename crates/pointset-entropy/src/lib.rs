//! Monte-Carlo entropy of point processes
//!
//! Point sets are drawn repeatedly from a sampler or an MCMC chain, binned
//! into a fixed grid, and the distribution of the resulting grid signatures
//! is used to estimate entropy in nats.
//!
//! # Examples
//!
//! ```rust
//! use pointset_core::{Point, Window};
//! use pointset_entropy::{estimate_entropy_from_sampler, EntropyEstimatorParameters};
//!
//! let window = Window::from_bounds([0.0, 0.0], [4.0, 4.0]);
//! let params = EntropyEstimatorParameters::default().with_num_samples(20);
//!
//! // A sampler that always returns the same configuration
//! let mut state = vec![Point::from([1.5, 2.5])];
//! let entropy = estimate_entropy_from_sampler(
//!     &params,
//!     &window,
//!     |points: &mut Vec<Point>| Ok(points.clone()),
//!     &mut state,
//! )
//! .unwrap();
//!
//! assert_eq!(entropy, 0.0);
//! ```

pub mod estimator;
pub mod process;
pub mod source;

pub use estimator::{
    estimate_entropy_from_process, estimate_entropy_from_sampler, EntropyEstimate,
    EntropyEstimator, EntropyEstimatorParameters,
};
pub use process::McmcPointProcess;
pub use source::{McmcSource, PointSource, StatelessSampler};

pub use pointset_core::{Error, Result};

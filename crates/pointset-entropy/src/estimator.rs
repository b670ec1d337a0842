//! Entropy estimation by counting grid signatures
//!
//! Each sampled point set is binned into a fresh count grid; the grid is
//! the sample's signature. The entropy of the empirical distribution over
//! distinct signatures estimates the entropy of the point process at the
//! chosen grid resolution.

use crate::process::McmcPointProcess;
use crate::source::{McmcSource, PointSource, StatelessSampler};
use pointset_core::{Error, Point, Result, Window};
use pointset_grid::SparseGrid;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument, trace};

/// Configuration for [`EntropyEstimator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntropyEstimatorParameters {
    /// Number of point sets binned into signatures
    pub num_samples: usize,
    /// Point sets discarded between consecutive kept samples
    pub num_samples_to_skip: usize,
    /// Side length of the signature grid cells
    pub histogram_grid_cell_size: f64,
}

impl Default for EntropyEstimatorParameters {
    fn default() -> Self {
        Self {
            num_samples: 100,
            num_samples_to_skip: 0,
            histogram_grid_cell_size: 1.0,
        }
    }
}

impl EntropyEstimatorParameters {
    pub fn with_num_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = num_samples;
        self
    }

    pub fn with_num_samples_to_skip(mut self, num_samples_to_skip: usize) -> Self {
        self.num_samples_to_skip = num_samples_to_skip;
        self
    }

    pub fn with_cell_size(mut self, histogram_grid_cell_size: f64) -> Self {
        self.histogram_grid_cell_size = histogram_grid_cell_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_samples == 0 {
            return Err(Error::InvalidParameter(
                "num_samples must be at least 1".to_string(),
            ));
        }
        if !(self.histogram_grid_cell_size.is_finite() && self.histogram_grid_cell_size > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "histogram_grid_cell_size must be positive and finite, got {}",
                self.histogram_grid_cell_size
            )));
        }
        Ok(())
    }
}

/// Result of an entropy estimate
#[derive(Debug, Clone, PartialEq)]
pub struct EntropyEstimate {
    /// Estimated entropy in nats
    pub entropy: f64,
    /// Number of point sets binned
    pub num_samples: usize,
    /// Occurrence count of each distinct signature, in first-seen order
    pub signature_counts: Vec<usize>,
}

impl EntropyEstimate {
    pub fn distinct_signatures(&self) -> usize {
        self.signature_counts.len()
    }

    /// Entropy when every sample has its own signature, `ln(num_samples)`
    pub fn max_entropy(&self) -> f64 {
        (self.num_samples as f64).ln()
    }
}

/// Distinct signatures seen so far, with occurrence counts
///
/// Lookups go through a hash bucket and are confirmed by full grid
/// equality.
#[derive(Default)]
struct SignatureTally {
    signatures: Vec<SparseGrid<usize>>,
    counts: Vec<usize>,
    buckets: HashMap<u64, Vec<usize>>,
}

impl SignatureTally {
    /// Count one occurrence; true if the signature was new
    fn record(&mut self, signature: SparseGrid<usize>) -> bool {
        let bucket = self.buckets.entry(signature.signature_hash()).or_default();
        if let Some(&index) = bucket.iter().find(|&&i| self.signatures[i] == signature) {
            self.counts[index] += 1;
            return false;
        }
        bucket.push(self.signatures.len());
        self.signatures.push(signature);
        self.counts.push(1);
        true
    }

    fn into_estimate(self, num_samples: usize) -> EntropyEstimate {
        let n = num_samples as f64;
        let entropy = self
            .counts
            .iter()
            .map(|&count| {
                let p = count as f64 / n;
                -p * p.ln()
            })
            .sum::<f64>();
        EntropyEstimate {
            entropy,
            num_samples,
            signature_counts: self.counts,
        }
    }
}

/// Monte-Carlo entropy estimator over grid signatures
#[derive(Debug, Clone, Default)]
pub struct EntropyEstimator {
    params: EntropyEstimatorParameters,
}

impl EntropyEstimator {
    pub fn new(params: EntropyEstimatorParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &EntropyEstimatorParameters {
        &self.params
    }

    /// Estimate entropy from point sets drawn from `source`
    ///
    /// Every point is binned, including points outside `window`; the window
    /// only anchors the grid. After each kept sample, `num_samples_to_skip`
    /// samples are discarded.
    #[instrument(
        skip(self, window, source),
        fields(
            num_samples = self.params.num_samples,
            skip = self.params.num_samples_to_skip,
            cell_size = self.params.histogram_grid_cell_size,
        )
    )]
    pub fn estimate<S>(&self, window: &Window, source: &mut S) -> Result<EntropyEstimate>
    where
        S: PointSource + ?Sized,
    {
        let template: SparseGrid<usize> =
            SparseGrid::uniform(window.clone(), self.params.histogram_grid_cell_size)?;
        let mut tally = SignatureTally::default();

        for sample_index in 0..self.params.num_samples {
            let points = source.draw()?;
            let signature = bin_points(&template, &points)?;
            let is_new = tally.record(signature);
            trace!(sample_index, points = points.len(), is_new, "binned sample");
            source.skip_many(self.params.num_samples_to_skip)?;
        }

        let estimate = tally.into_estimate(self.params.num_samples);
        debug!(
            entropy = estimate.entropy,
            distinct_signatures = estimate.distinct_signatures(),
            "entropy estimated"
        );
        Ok(estimate)
    }

    /// Estimate entropy from a sampling function over caller-owned state
    pub fn estimate_from_sampler<St, F>(
        &self,
        window: &Window,
        state: &mut St,
        sampler: F,
    ) -> Result<EntropyEstimate>
    where
        St: ?Sized,
        F: FnMut(&mut St) -> Result<Vec<Point>>,
    {
        let mut source = StatelessSampler::new(state, sampler);
        self.estimate(window, &mut source)
    }

    /// Estimate entropy from a running MCMC chain over the process window
    ///
    /// The chain is advanced once per kept or skipped sample and is left in
    /// its final state.
    pub fn estimate_from_process<P, R>(
        &self,
        process: &mut P,
        rng: &mut R,
    ) -> Result<EntropyEstimate>
    where
        P: McmcPointProcess + ?Sized,
        R: RngCore,
    {
        let window = process.window().clone();
        let mut source = McmcSource::new(process, rng);
        self.estimate(&window, &mut source)
    }
}

fn bin_points(template: &SparseGrid<usize>, points: &[Point]) -> Result<SparseGrid<usize>> {
    let mut grid = template.copy_structure::<usize>();
    for point in points {
        let cell = grid.try_cell(point)?;
        match grid.mark_mut(&cell) {
            Some(count) => *count += 1,
            None => {
                grid.set(cell, 1);
            }
        }
    }
    Ok(grid)
}

/// Entropy of the point sets produced by `sampler` applied to `state`
pub fn estimate_entropy_from_sampler<St, F>(
    params: &EntropyEstimatorParameters,
    window: &Window,
    sampler: F,
    state: &mut St,
) -> Result<f64>
where
    St: ?Sized,
    F: FnMut(&mut St) -> Result<Vec<Point>>,
{
    let estimator = EntropyEstimator::new(params.clone())?;
    Ok(estimator.estimate_from_sampler(window, state, sampler)?.entropy)
}

/// Entropy of the point sets visited by the MCMC chain of `process`
pub fn estimate_entropy_from_process<P, R>(
    params: &EntropyEstimatorParameters,
    process: &mut P,
    rng: &mut R,
) -> Result<f64>
where
    P: McmcPointProcess + ?Sized,
    R: RngCore,
{
    let estimator = EntropyEstimator::new(params.clone())?;
    Ok(estimator.estimate_from_process(process, rng)?.entropy)
}

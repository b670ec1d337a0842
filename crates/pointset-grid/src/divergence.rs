//! KL divergence between histograms with absolute-discounting smoothing
//!
//! Two sparse histograms rarely share their support. Before comparing them,
//! cells holding no positive mass are dropped, then every cell present in
//! one but not the other receives a small mass `epsilon`
//! in the histogram where it is missing, and the same total mass is removed
//! evenly from that histogram's originally marked cells so it still sums to
//! one. The divergence is then evaluated over the union of both supports.
//!
//! `epsilon` must be small relative to the smallest existing mass: the
//! rebalancing step does not clamp, so an oversized `epsilon` can drive a
//! mass negative and the logarithm with it.

use crate::grid::Cell;
use crate::histogram::{normalize_histogram, Histogram};
use pointset_core::{BinCount, Error, Result};
use tracing::{debug, instrument};

/// Default smoothing mass for cells missing from one histogram
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// Smoothing bookkeeping and result of one divergence computation
#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceReport {
    /// `KL(P || Q)` in nats
    pub divergence: f64,
    /// Cells with positive mass in P or Q
    pub support_size: usize,
    /// Cells with positive mass in P before smoothing
    pub p_support: usize,
    /// Cells with positive mass in Q before smoothing
    pub q_support: usize,
    /// Cells that received `epsilon` in P
    pub p_eps_count: usize,
    /// Cells that received `epsilon` in Q
    pub q_eps_count: usize,
}

/// KL divergence estimator with absolute discounting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DivergenceEstimator {
    epsilon: f64,
}

impl Default for DivergenceEstimator {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl DivergenceEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom smoothing mass, which must be positive and finite
    pub fn with_epsilon(epsilon: f64) -> Result<Self> {
        if !(epsilon > 0.0 && epsilon.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "smoothing epsilon must be positive and finite, got {epsilon}"
            )));
        }
        Ok(Self { epsilon })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// `KL(P || Q)` of the two histograms treated as distributions
    pub fn kl_divergence<TP: BinCount, TQ: BinCount>(
        &self,
        p: &Histogram<TP>,
        q: &Histogram<TQ>,
    ) -> Result<f64> {
        Ok(self.divergence_report(p, q)?.divergence)
    }

    /// `KL(P || Q)` together with the smoothing bookkeeping
    ///
    /// Both histograms must share window, origin and resolution, and both
    /// must carry non-zero total mass.
    #[instrument(
        skip(self, p, q),
        fields(epsilon = self.epsilon, p_cells = p.len(), q_cells = q.len())
    )]
    pub fn divergence_report<TP: BinCount, TQ: BinCount>(
        &self,
        p: &Histogram<TP>,
        q: &Histogram<TQ>,
    ) -> Result<DivergenceReport> {
        if !p.same_structure(q.grid()) {
            return Err(Error::InvalidInput(
                "histograms do not share cell geometry".to_string(),
            ));
        }

        let mut p_dist = normalize_histogram(p)?;
        let mut q_dist = normalize_histogram(q)?;
        drop_massless_cells(&mut p_dist)?;
        drop_massless_cells(&mut q_dist)?;

        let mut support: Vec<Cell> = p_dist
            .marked_cells()
            .chain(q_dist.marked_cells())
            .cloned()
            .collect();
        support.sort_unstable();
        support.dedup();

        let p_presmooth = p_dist.all_marked_cells();
        let q_presmooth = q_dist.all_marked_cells();

        let mut p_eps_count = 0usize;
        let mut q_eps_count = 0usize;
        for cell in &support {
            let in_p = p_dist.mark(cell).is_some();
            let in_q = q_dist.mark(cell).is_some();
            assert!(in_p || in_q, "{cell} entered the support but is in neither histogram");

            if !in_p {
                p_eps_count += 1;
                p_dist.set(cell.clone(), self.epsilon);
            }
            if !in_q {
                q_eps_count += 1;
                q_dist.set(cell.clone(), self.epsilon);
            }
        }

        let p_discount = p_eps_count as f64 * self.epsilon / p_presmooth.len() as f64;
        let q_discount = q_eps_count as f64 * self.epsilon / q_presmooth.len() as f64;
        for cell in p_presmooth.iter() {
            p_dist.decrement_bin(cell.clone(), p_discount);
        }
        for cell in q_presmooth.iter() {
            q_dist.decrement_bin(cell.clone(), q_discount);
        }

        debug!(
            support = support.len(),
            p_eps_count, q_eps_count, p_discount, q_discount, "smoothed supports"
        );

        let mut divergence = 0.0;
        for cell in &support {
            match (p_dist.mark(cell), q_dist.mark(cell)) {
                (Some(&pm), Some(&qm)) => {
                    if pm != 0.0 {
                        divergence += pm * (pm / qm).ln();
                    }
                }
                _ => unreachable!("smoothing leaves every support cell marked in both"),
            }
        }

        Ok(DivergenceReport {
            divergence,
            support_size: support.len(),
            p_support: p_presmooth.len(),
            q_support: q_presmooth.len(),
            p_eps_count,
            q_eps_count,
        })
    }
}

/// Clear cells without positive mass so they are smoothed like absent ones
fn drop_massless_cells(dist: &mut Histogram<f64>) -> Result<()> {
    let massless: Vec<Cell> = dist
        .iter()
        .filter(|(_, mass)| **mass <= 0.0)
        .map(|(cell, _)| cell.clone())
        .collect();
    for cell in &massless {
        dist.clear(cell);
    }
    if dist.is_empty() {
        return Err(Error::DegenerateDistribution(
            "histogram has no cell with positive mass".to_string(),
        ));
    }
    Ok(())
}

/// `KL(P || Q)` with the default smoothing mass
pub fn kl_divergence<TP: BinCount, TQ: BinCount>(
    p: &Histogram<TP>,
    q: &Histogram<TQ>,
) -> Result<f64> {
    DivergenceEstimator::default().kl_divergence(p, q)
}

/// Operations comparing one histogram against another
pub trait HistogramOps {
    /// KL divergence from this histogram to another, default smoothing
    fn kl_divergence_to<U: BinCount>(&self, other: &Histogram<U>) -> Result<f64>;
}

impl<T: BinCount> HistogramOps for Histogram<T> {
    fn kl_divergence_to<U: BinCount>(&self, other: &Histogram<U>) -> Result<f64> {
        kl_divergence(self, other)
    }
}

//! Histograms over sparse n-dimensional grids
//!
//! A [`Histogram`] is a [`SparseGrid`] with numeric marks that are
//! incremented as points are binned. Bins are uniform along each axis, with
//! `bins_per_dimension` bins spanning the window extent.

use crate::grid::{Cell, SparseGrid};
use pointset_core::{BinCount, Error, Point, Result, Window};
use std::collections::hash_map::Entry;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// A count (or mass) per grid cell over a window
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram<T: BinCount = usize> {
    grid: SparseGrid<T>,
    bins_per_dim: usize,
}

impl<T: BinCount> Histogram<T> {
    /// Create an empty histogram with `bins_per_dim` bins along every axis
    /// of `window`
    pub fn new(window: Window, bins_per_dim: usize) -> Result<Self> {
        if bins_per_dim == 0 {
            return Err(Error::InvalidConfiguration(
                "histogram needs at least one bin per dimension".to_string(),
            ));
        }
        let resolutions = (0..window.dim())
            .map(|axis| window.extent(axis) / bins_per_dim as f64)
            .collect();
        let origin = window.start().clone();
        let grid = SparseGrid::new(window, origin, resolutions)?;
        Ok(Self { grid, bins_per_dim })
    }

    /// An empty histogram with the same bins, holding another mark type
    pub fn copy_structure<U: BinCount>(&self) -> Histogram<U> {
        Histogram {
            grid: self.grid.copy_structure(),
            bins_per_dim: self.bins_per_dim,
        }
    }

    /// Number of bins along each axis
    pub fn bins_per_dimension(&self) -> usize {
        self.bins_per_dim
    }

    pub fn grid(&self) -> &SparseGrid<T> {
        &self.grid
    }

    pub fn into_grid(self) -> SparseGrid<T> {
        self.grid
    }

    /// Add `amount` to a bin, initializing it if unmarked
    pub fn increment_bin(&mut self, cell: Cell, amount: T) {
        match self.grid.entry(cell) {
            Entry::Occupied(mut e) => {
                let v = e.get_mut();
                *v = *v + amount;
            }
            Entry::Vacant(e) => {
                e.insert(amount);
            }
        }
    }

    /// Add `amount` to the bin containing `point`
    pub fn increment_at(&mut self, point: &Point, amount: T) {
        let cell = self.grid.cell(point);
        self.increment_bin(cell, amount);
    }

    /// Count one point
    pub fn increment(&mut self, point: &Point) {
        self.increment_at(point, T::one());
    }

    /// Subtract `amount` from a bin; an unmarked bin starts from zero
    ///
    /// Unsigned counts overflow when driven below zero.
    pub fn decrement_bin(&mut self, cell: Cell, amount: T) {
        match self.grid.entry(cell) {
            Entry::Occupied(mut e) => {
                let v = e.get_mut();
                *v = *v - amount;
            }
            Entry::Vacant(e) => {
                e.insert(T::zero() - amount);
            }
        }
    }

    pub fn decrement_at(&mut self, point: &Point, amount: T) {
        let cell = self.grid.cell(point);
        self.decrement_bin(cell, amount);
    }

    /// Sum of all marks
    pub fn total_count(&self) -> T {
        self.grid.iter().fold(T::zero(), |acc, (_, &m)| acc + m)
    }

    /// Largest mark, if any bin is marked
    pub fn max_count(&self) -> Option<T> {
        self.grid.iter().map(|(_, &m)| m).fold(None, |acc, m| match acc {
            Some(best) if best >= m => Some(best),
            _ => Some(m),
        })
    }

    /// Probability histogram with every mark divided by the total count
    pub fn normalized(&self) -> Result<Histogram<f64>> {
        normalize_histogram(self)
    }
}

impl<T: BinCount> Deref for Histogram<T> {
    type Target = SparseGrid<T>;

    fn deref(&self) -> &SparseGrid<T> {
        &self.grid
    }
}

impl<T: BinCount> DerefMut for Histogram<T> {
    fn deref_mut(&mut self) -> &mut SparseGrid<T> {
        &mut self.grid
    }
}

impl<T: BinCount + fmt::Display> fmt::Display for Histogram<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Histogram({} bins/dim over {}, {} marked, total={})",
            self.bins_per_dim,
            self.grid.window(),
            self.grid.len(),
            self.total_count()
        )
    }
}

/// Build a histogram over the smallest window enclosing `points`
///
/// Each point increments its bin by one; points sharing a bin accumulate.
/// The maximal corner of the window falls into an extra bin just past the
/// last interior one, so every point is counted.
pub fn create_histogram<T: BinCount>(
    bins_per_dim: usize,
    points: &[Point],
) -> Result<Histogram<T>> {
    let window = Window::smallest_enclosing(points)?;
    let mut hist = Histogram::new(window, bins_per_dim)?;
    for p in points {
        hist.increment(p);
    }
    Ok(hist)
}

/// Build a histogram over a given window
///
/// Points outside the window are still counted, in cells beyond its range.
pub fn create_histogram_in<T: BinCount>(
    window: Window,
    bins_per_dim: usize,
    points: &[Point],
) -> Result<Histogram<T>> {
    let mut hist = Histogram::new(window, bins_per_dim)?;
    for p in points {
        let cell = hist.try_cell(p)?;
        hist.increment_bin(cell, T::one());
    }
    Ok(hist)
}

/// Turn counts into probability masses
///
/// Fails with [`Error::DegenerateDistribution`] when the total count is
/// zero (or not finite) instead of producing NaN masses.
pub fn normalize_histogram<T: BinCount>(hist: &Histogram<T>) -> Result<Histogram<f64>> {
    let total = hist.total_count().as_f64();
    if total == 0.0 || !total.is_finite() {
        return Err(Error::DegenerateDistribution(format!(
            "cannot normalize a histogram with total count {total}"
        )));
    }

    let mut norm = hist.copy_structure::<f64>();
    for (cell, &mark) in hist.iter() {
        norm.set(cell.clone(), mark.as_f64() / total);
    }
    Ok(norm)
}

//! Adapters that feed point sets to the entropy estimator

use crate::process::McmcPointProcess;
use pointset_core::{Point, Result};
use rand::RngCore;

/// Anything that yields a sequence of point sets
pub trait PointSource {
    /// Produce the next point set
    fn draw(&mut self) -> Result<Vec<Point>>;

    /// Advance past one point set without keeping it
    fn skip(&mut self) -> Result<()>;

    fn skip_many(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.skip()?;
        }
        Ok(())
    }
}

/// A sampling function applied to caller-owned state
///
/// Skipping calls the function and discards the result, so the state sees
/// exactly one call per draw or skip.
pub struct StatelessSampler<'s, S: ?Sized, F> {
    state: &'s mut S,
    sampler: F,
}

impl<'s, S: ?Sized, F> StatelessSampler<'s, S, F>
where
    F: FnMut(&mut S) -> Result<Vec<Point>>,
{
    pub fn new(state: &'s mut S, sampler: F) -> Self {
        Self { state, sampler }
    }

    pub fn state(&self) -> &S {
        &*self.state
    }
}

impl<S: ?Sized, F> PointSource for StatelessSampler<'_, S, F>
where
    F: FnMut(&mut S) -> Result<Vec<Point>>,
{
    fn draw(&mut self) -> Result<Vec<Point>> {
        (self.sampler)(&mut *self.state)
    }

    fn skip(&mut self) -> Result<()> {
        (self.sampler)(&mut *self.state).map(drop)
    }
}

/// Draws from a running MCMC chain
///
/// Each draw reads the current state and then steps the chain; each skip
/// steps the chain only.
pub struct McmcSource<'a, P: ?Sized, R> {
    process: &'a mut P,
    rng: &'a mut R,
}

impl<'a, P, R> McmcSource<'a, P, R>
where
    P: McmcPointProcess + ?Sized,
    R: RngCore,
{
    pub fn new(process: &'a mut P, rng: &'a mut R) -> Self {
        Self { process, rng }
    }

    pub fn process(&self) -> &P {
        &*self.process
    }
}

impl<P, R> PointSource for McmcSource<'_, P, R>
where
    P: McmcPointProcess + ?Sized,
    R: RngCore,
{
    fn draw(&mut self) -> Result<Vec<Point>> {
        self.process.sample_and_step(&mut *self.rng)
    }

    fn skip(&mut self) -> Result<()> {
        self.process.single_mcmc_step(&mut *self.rng)
    }
}

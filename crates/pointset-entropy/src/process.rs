//! The MCMC point-process contract
//!
//! A point process owns its chain state and advances it in place, one
//! transition per [`McmcPointProcess::single_mcmc_step`]. Randomness is
//! always supplied by the caller, so a step is `state' = step(state, rng)`
//! and speculative exploration is an explicit [`McmcPointProcess::clone_process`]
//! plus an explicit RNG.

use pointset_core::{Point, Result, Window};
use rand::RngCore;
use std::path::Path;
use tracing::trace;

/// A point process sampled by Markov chain Monte Carlo
///
/// Instances are not meant for concurrent stepping; clone the process for
/// independent chains.
pub trait McmcPointProcess {
    /// The sampling domain
    fn window(&self) -> &Window;

    /// Observations the process has been conditioned on
    fn observations(&self) -> &[Point];

    /// Read one point set from the current chain state without advancing it
    fn sample(&self, rng: &mut dyn RngCore) -> Result<Vec<Point>>;

    /// Advance the chain by one transition
    fn single_mcmc_step(&mut self, rng: &mut dyn RngCore) -> Result<()>;

    /// Read a point set, then advance the chain by one transition
    fn sample_and_step(&mut self, rng: &mut dyn RngCore) -> Result<Vec<Point>> {
        let sample = self.sample(rng)?;
        self.single_mcmc_step(rng)?;
        Ok(sample)
    }

    /// Run `iterations` transitions
    fn mcmc(&mut self, iterations: usize, rng: &mut dyn RngCore) -> Result<()> {
        for iteration in 0..iterations {
            self.single_mcmc_step(rng)?;
            trace!(iteration, "mcmc step");
        }
        Ok(())
    }

    /// Condition on newly observed points
    fn add_observations(&mut self, observations: &[Point]) -> Result<()>;

    /// Condition on a region known to contain no points
    fn add_negative_observation(&mut self, region: &Window) -> Result<()>;

    /// An independent deep copy of the process and its chain state
    fn clone_process(&self) -> Box<dyn McmcPointProcess>;

    /// Start recording chain diagnostics under `trace_dir`
    fn trace_mcmc(&mut self, _trace_dir: &Path) -> Result<()> {
        Ok(())
    }

    /// Stop recording chain diagnostics
    fn trace_mcmc_off(&mut self) {}
}

impl Clone for Box<dyn McmcPointProcess> {
    fn clone(&self) -> Self {
        self.clone_process()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Points doing independent uniform jumps, clamped to the window
    #[derive(Debug, Clone)]
    struct JitterProcess {
        window: Window,
        points: Vec<Point>,
        observations: Vec<Point>,
        steps: usize,
    }

    impl JitterProcess {
        fn new() -> Self {
            Self {
                window: Window::from_bounds([0.0, 0.0], [1.0, 1.0]),
                points: vec![Point::from([0.5, 0.5]), Point::from([0.25, 0.75])],
                observations: Vec::new(),
                steps: 0,
            }
        }
    }

    impl McmcPointProcess for JitterProcess {
        fn window(&self) -> &Window {
            &self.window
        }

        fn observations(&self) -> &[Point] {
            &self.observations
        }

        fn sample(&self, _rng: &mut dyn RngCore) -> Result<Vec<Point>> {
            Ok(self.points.clone())
        }

        fn single_mcmc_step(&mut self, rng: &mut dyn RngCore) -> Result<()> {
            for p in &mut self.points {
                let moved: Vec<f64> = p
                    .coordinates()
                    .iter()
                    .map(|x| (x + rng.gen_range(-0.1..0.1)).clamp(0.0, 1.0))
                    .collect();
                *p = Point::new(moved);
            }
            self.steps += 1;
            Ok(())
        }

        fn add_observations(&mut self, observations: &[Point]) -> Result<()> {
            self.observations.extend_from_slice(observations);
            Ok(())
        }

        fn add_negative_observation(&mut self, _region: &Window) -> Result<()> {
            Ok(())
        }

        fn clone_process(&self) -> Box<dyn McmcPointProcess> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn test_sample_does_not_advance() {
        let process = JitterProcess::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let a = process.sample(&mut rng).unwrap();
        let b = process.sample(&mut rng).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_and_step_returns_pre_step_state() {
        let mut process = JitterProcess::new();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let before = process.points.clone();
        let drawn = process.sample_and_step(&mut rng).unwrap();
        assert_eq!(drawn, before);
        assert_ne!(process.points, before);
        assert_eq!(process.steps, 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = JitterProcess::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut fork: Box<dyn McmcPointProcess> = original.clone_process();

        fork.mcmc(5, &mut rng).unwrap();
        let mut fork_rng = ChaCha8Rng::seed_from_u64(4);
        assert_ne!(
            fork.sample(&mut fork_rng).unwrap(),
            original.sample(&mut fork_rng).unwrap()
        );

        original.add_observations(&[Point::from([0.1, 0.1])]).unwrap();
        assert_eq!(original.observations().len(), 1);
        assert!(fork.observations().is_empty());

        let boxed_copy = fork.clone();
        assert_eq!(
            boxed_copy.sample(&mut fork_rng).unwrap(),
            fork.sample(&mut fork_rng).unwrap()
        );
    }

    #[test]
    fn test_same_seed_same_chain() {
        let mut a = JitterProcess::new();
        let mut b = JitterProcess::new();
        a.mcmc(10, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..10 {
            b.single_mcmc_step(&mut rng).unwrap();
        }
        assert_eq!(a.points, b.points);
    }

    #[test]
    fn test_tracing_defaults_are_no_ops() {
        let mut process = JitterProcess::new();
        process.trace_mcmc(Path::new("/nonexistent/trace")).unwrap();
        process.trace_mcmc_off();
        assert!(process.window().contains(&process.points[0]));
    }
}

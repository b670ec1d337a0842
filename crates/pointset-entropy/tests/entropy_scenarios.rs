//! End-to-end entropy estimates over samplers and MCMC chains

use approx::assert_relative_eq;
use pointset_core::{Error, Point, Result, Window};
use pointset_entropy::{
    estimate_entropy_from_process, estimate_entropy_from_sampler, EntropyEstimator,
    EntropyEstimatorParameters, McmcPointProcess,
};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Uniform};

fn square(side: f64) -> Window {
    Window::from_bounds([0.0, 0.0], [side, side])
}

/// Sampler state that counts its calls
struct CountingState {
    rng: ChaCha8Rng,
    calls: usize,
}

impl CountingState {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            calls: 0,
        }
    }
}

fn uniform_points(state: &mut CountingState, count: usize, side: f64) -> Vec<Point> {
    let coord = Uniform::new(0.0, side);
    (0..count)
        .map(|_| Point::from([coord.sample(&mut state.rng), coord.sample(&mut state.rng)]))
        .collect()
}

/// A chain whose single point hops between two cells
#[derive(Debug, Clone)]
struct HoppingProcess {
    window: Window,
    position: Point,
    observations: Vec<Point>,
    empty_regions: Vec<Window>,
    steps: usize,
    samples: usize,
}

impl HoppingProcess {
    fn new() -> Self {
        Self {
            window: square(2.0),
            position: Point::from([0.5, 0.5]),
            observations: Vec::new(),
            empty_regions: Vec::new(),
            steps: 0,
            samples: 0,
        }
    }
}

impl McmcPointProcess for HoppingProcess {
    fn window(&self) -> &Window {
        &self.window
    }

    fn observations(&self) -> &[Point] {
        &self.observations
    }

    fn sample(&self, _rng: &mut dyn RngCore) -> Result<Vec<Point>> {
        Ok(vec![self.position.clone()])
    }

    fn sample_and_step(&mut self, rng: &mut dyn RngCore) -> Result<Vec<Point>> {
        self.samples += 1;
        let drawn = self.sample(rng)?;
        self.single_mcmc_step(rng)?;
        Ok(drawn)
    }

    fn single_mcmc_step(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        let x = if rng.gen_bool(0.5) { 0.5 } else { 1.5 };
        self.position = Point::from([x, 0.5]);
        self.steps += 1;
        Ok(())
    }

    fn add_observations(&mut self, observations: &[Point]) -> Result<()> {
        self.observations.extend_from_slice(observations);
        Ok(())
    }

    fn add_negative_observation(&mut self, region: &Window) -> Result<()> {
        self.empty_regions.push(region.clone());
        Ok(())
    }

    fn clone_process(&self) -> Box<dyn McmcPointProcess> {
        Box::new(self.clone())
    }
}

#[test]
fn test_fixed_point_set_has_zero_entropy() {
    let fixed = vec![
        Point::from([1.5, 1.5]),
        Point::from([7.25, 3.0]),
        Point::from([7.75, 3.5]),
    ];
    let params = EntropyEstimatorParameters::default();
    let mut state = fixed;

    let estimate = EntropyEstimator::new(params)
        .unwrap()
        .estimate_from_sampler(&square(10.0), &mut state, |points: &mut Vec<Point>| {
            Ok(points.clone())
        })
        .unwrap();

    assert_eq!(estimate.entropy, 0.0);
    assert_eq!(estimate.num_samples, 100);
    assert_eq!(estimate.signature_counts, vec![100]);
}

#[test]
fn test_distinct_draws_reach_maximum_entropy() {
    let params = EntropyEstimatorParameters::default()
        .with_num_samples(50)
        .with_cell_size(1e-6);
    let mut state = CountingState::new(42);

    let estimate = EntropyEstimator::new(params)
        .unwrap()
        .estimate_from_sampler(&square(1.0), &mut state, |s: &mut CountingState| {
            s.calls += 1;
            Ok(uniform_points(s, 5, 1.0))
        })
        .unwrap();

    assert_eq!(estimate.distinct_signatures(), 50);
    assert_relative_eq!(estimate.entropy, 50f64.ln(), epsilon = 1e-12);
    assert_relative_eq!(estimate.entropy, estimate.max_entropy(), epsilon = 1e-12);
}

#[test]
fn test_skipped_samples_still_call_sampler() {
    let params = EntropyEstimatorParameters::default()
        .with_num_samples(10)
        .with_num_samples_to_skip(3);
    let mut state = CountingState::new(1);

    estimate_entropy_from_sampler(
        &params,
        &square(4.0),
        |s: &mut CountingState| {
            s.calls += 1;
            Ok(uniform_points(s, 2, 4.0))
        },
        &mut state,
    )
    .unwrap();

    assert_eq!(state.calls, 10 * (1 + 3));
}

#[test]
fn test_sampler_errors_propagate() {
    let params = EntropyEstimatorParameters::default().with_num_samples(10);
    let mut state = CountingState::new(5);

    let result = estimate_entropy_from_sampler(
        &params,
        &square(4.0),
        |s: &mut CountingState| {
            s.calls += 1;
            if s.calls == 5 {
                return Err(anyhow::anyhow!("sensor offline").into());
            }
            Ok(uniform_points(s, 1, 4.0))
        },
        &mut state,
    );

    match result {
        Err(Error::Other(e)) => assert_eq!(e.to_string(), "sensor offline"),
        other => panic!("expected sampler error, got {other:?}"),
    }
    assert_eq!(state.calls, 5);
}

#[test]
fn test_process_chain_is_stepped_once_per_draw_or_skip() {
    let params = EntropyEstimatorParameters::default()
        .with_num_samples(200)
        .with_num_samples_to_skip(2);
    let mut process = HoppingProcess::new();
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    let estimate = EntropyEstimator::new(params)
        .unwrap()
        .estimate_from_process(&mut process, &mut rng)
        .unwrap();

    assert_eq!(process.samples, 200);
    assert_eq!(process.steps, 200 * 3);

    // two equally likely cells: entropy close to ln 2
    assert_eq!(estimate.distinct_signatures(), 2);
    assert!((estimate.entropy - 2f64.ln()).abs() < 0.05);
}

#[test]
fn test_process_behind_trait_object() {
    let params = EntropyEstimatorParameters::default().with_num_samples(64);
    let mut boxed: Box<dyn McmcPointProcess> = Box::new(HoppingProcess::new());
    boxed.add_observations(&[Point::from([0.2, 0.2])]).unwrap();
    boxed.add_negative_observation(&Window::from_bounds([1.0, 1.0], [2.0, 2.0])).unwrap();

    let mut fork = boxed.clone();
    let a = estimate_entropy_from_process(
        &params,
        boxed.as_mut(),
        &mut ChaCha8Rng::seed_from_u64(8),
    )
    .unwrap();
    let b = estimate_entropy_from_process(
        &params,
        fork.as_mut(),
        &mut ChaCha8Rng::seed_from_u64(8),
    )
    .unwrap();

    assert_eq!(a, b);
    assert!(a > 0.0 && a <= 2f64.ln() + 1e-12);
    assert_eq!(fork.observations().len(), 1);
}

#[test]
fn test_parameters_round_trip_through_json() {
    let params = EntropyEstimatorParameters::default()
        .with_num_samples(250)
        .with_num_samples_to_skip(4)
        .with_cell_size(0.5);
    let json = serde_json::to_string(&params).unwrap();
    let back: EntropyEstimatorParameters = serde_json::from_str(&json).unwrap();
    assert_eq!(back, params);

    // missing fields fall back to defaults
    let partial: EntropyEstimatorParameters =
        serde_json::from_str(r#"{ "num_samples": 7 }"#).unwrap();
    assert_eq!(partial.num_samples, 7);
    assert_eq!(partial.histogram_grid_cell_size, 1.0);
}

//! Continuously-relaxed ±1 random walk.
//!
//! Purpose
//! -------
//! Toy simulator for exercising the calibration loop: a walk whose drift is
//! controlled by a single probability parameter `p`. Each step replaces the
//! hard Bernoulli draw with a temperature-smoothed relaxation,
//! `step_t = tanh((p − u_t)/τ)` with `u_t ~ U(0, 1)`, so the trajectory is a
//! smooth function of `p` for a fixed draw of `u` and finite-difference
//! Jacobians under common random numbers are well defined.
//!
//! Conventions
//! -----------
//! - `p` is clamped into `[0, 1]` before use; values outside that range
//!   behave like the nearest endpoint.
//! - As τ → 0 the relaxation approaches the hard walk with
//!   `E[X_t] = t·(2p − 1)`.
use crate::models::{
    errors::{ModelError, ModelResult},
    SimulatorModel,
};
use ndarray::{Array1, ArrayView1};
use rand::{rngs::StdRng, Rng};

/// Default relaxation temperature.
pub const DEFAULT_TAU: f64 = 0.1;

/// Random walk of `n_timesteps` smoothed steps driven by one drift
/// probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomWalk {
    n_timesteps: usize,
    tau: f64,
}

impl RandomWalk {
    /// Build a walk of `n_timesteps` steps at the default temperature.
    pub fn new(n_timesteps: usize) -> ModelResult<Self> {
        if n_timesteps == 0 {
            return Err(ModelError::InvalidConfiguration {
                reason: "Random walk needs at least one timestep.",
            });
        }
        Ok(RandomWalk { n_timesteps, tau: DEFAULT_TAU })
    }

    /// Replace the relaxation temperature.
    pub fn with_tau(mut self, tau: f64) -> ModelResult<Self> {
        if !tau.is_finite() || tau <= 0.0 {
            return Err(ModelError::InvalidConfiguration {
                reason: "Relaxation temperature must be finite and strictly positive.",
            });
        }
        self.tau = tau;
        Ok(self)
    }

    pub fn n_timesteps(&self) -> usize {
        self.n_timesteps
    }
}

impl SimulatorModel for RandomWalk {
    fn n_params(&self) -> usize {
        1
    }

    fn simulate(
        &self, theta: ArrayView1<'_, f64>, rng: &mut StdRng,
    ) -> ModelResult<Vec<Array1<f64>>> {
        if theta.len() != 1 {
            return Err(ModelError::ParamDimMismatch { expected: 1, actual: theta.len() });
        }
        if !theta[0].is_finite() {
            return Err(ModelError::NonFiniteParam { index: 0, value: theta[0] });
        }
        let p = theta[0].clamp(0.0, 1.0);
        let mut trajectory = Array1::zeros(self.n_timesteps);
        let mut position = 0.0;
        for t in 0..self.n_timesteps {
            let u: f64 = rng.gen();
            position += ((p - u) / self.tau).tanh();
            trajectory[t] = position;
        }
        Ok(vec![trajectory])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    fn run(walk: &RandomWalk, p: f64, seed: u64) -> Array1<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        walk.simulate(array![p].view(), &mut rng)
            .expect("valid parameter vector")
            .remove(0)
    }

    #[test]
    fn constructor_rejects_degenerate_configurations() {
        assert!(matches!(RandomWalk::new(0), Err(ModelError::InvalidConfiguration { .. })));
        let walk = RandomWalk::new(10).expect("positive timesteps");
        assert!(matches!(walk.with_tau(0.0), Err(ModelError::InvalidConfiguration { .. })));
    }

    #[test]
    fn simulate_rejects_bad_parameters() {
        let walk = RandomWalk::new(5).expect("positive timesteps");
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            walk.simulate(array![0.5, 0.5].view(), &mut rng),
            Err(ModelError::ParamDimMismatch { expected: 1, actual: 2 })
        ));
        assert!(matches!(
            walk.simulate(array![f64::NAN].view(), &mut rng),
            Err(ModelError::NonFiniteParam { index: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Under common random numbers the final position is monotone in the
    // drift probability: a larger p can only push each step upward.
    fn trajectory_is_monotone_in_p_under_common_random_numbers() {
        let walk = RandomWalk::new(100).expect("positive timesteps");
        let low = run(&walk, 0.2, 42);
        let high = run(&walk, 0.8, 42);
        let n = walk.n_timesteps() - 1;
        assert!(high[n] > low[n], "high-drift walk should end above low-drift walk");
    }

    #[test]
    // Purpose
    // -------
    // Drift values outside [0, 1] behave like the nearest endpoint, and at
    // p = 1 every relaxed step is strictly positive.
    fn drift_is_clamped_into_the_unit_interval() {
        let walk = RandomWalk::new(50).expect("positive timesteps");
        let clamped = run(&walk, 2.0, 7);
        let endpoint = run(&walk, 1.0, 7);
        assert_eq!(clamped, endpoint);
        let mut previous = 0.0;
        for &x in endpoint.iter() {
            assert!(x > previous, "steps at p = 1 should all move upward");
            previous = x;
        }
    }

    #[test]
    fn identical_seeds_give_identical_trajectories() {
        let walk = RandomWalk::new(30).expect("positive timesteps");
        assert_eq!(run(&walk, 0.25, 11), run(&walk, 0.25, 11));
    }
}

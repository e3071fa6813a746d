//! Simulator models consumed by the calibration loop.
//!
//! A simulator is a function from a parameter vector to a list of output
//! series matching the observed data. Simulators may be stochastic; they
//! draw all randomness from the RNG handed to them, so callers can obtain
//! common-random-number reruns by reseeding.

pub mod errors;
pub mod random_walk;

pub use errors::{ModelError, ModelResult};
pub use random_walk::RandomWalk;

use ndarray::{Array1, ArrayView1};
use rand::rngs::StdRng;

/// Capability set required of a simulator model.
pub trait SimulatorModel {
    /// Dimension of the parameter vector the simulator accepts.
    fn n_params(&self) -> usize;

    /// Run one forward simulation at `theta`, drawing all randomness from
    /// `rng`. The output is a list of series whose shapes match the observed
    /// data the model is calibrated against.
    fn simulate(
        &self, theta: ArrayView1<'_, f64>, rng: &mut StdRng,
    ) -> ModelResult<Vec<Array1<f64>>>;
}

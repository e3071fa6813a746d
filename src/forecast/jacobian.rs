//! Forecast loss and per-sample simulator Jacobians.
//!
//! Purpose
//! -------
//! Given a loss function, a simulator, a parameter-sampling closure, and the
//! observed data, draw a batch of parameter samples, score each through the
//! simulator, and compute the Jacobian of each sample's scalar loss with
//! respect to its parameters by central finite differences.
//!
//! Key behaviors
//! -------------
//! - Every loss evaluation for a given sample reseeds the simulator RNG with
//!   the same per-sample seed, so finite differences see a deterministic
//!   function of the parameters (common random numbers).
//! - Errors raised by the simulator or the loss inside a finite-difference
//!   probe are captured in a shared cell and re-surfaced after the probe
//!   returns, since the differencing routine itself only handles plain
//!   scalars.
//! - Samples whose loss is non-finite are masked: they are excluded from the
//!   mean loss and contribute a zero Jacobian. If every sample is masked the
//!   engine fails with `ForecastError::NoFiniteSamples`.
//! - Returned Jacobians are pre-scaled by `1/n_valid`, so summing the dot
//!   products `⟨J_i, θ_i⟩` reproduces the gradient of the reported mean
//!   loss.
//!
//! Edge cases
//! ----------
//! - A zero-sample request yields a loss of `0.0`, an empty batch, and no
//!   Jacobians; the forecast path then contributes nothing to the gradient.
use crate::forecast::{
    errors::{ForecastError, ForecastResult},
    loss::ForecastLoss,
};
use crate::models::SimulatorModel;
use crate::posterior::traits::SampleBatch;
use finitediff::FiniteDiff;
use ndarray::Array1;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::cell::RefCell;

/// Output of one forecast evaluation: the sampled parameters (with their
/// tape), the mean forecast loss over unmasked samples, and one pre-scaled
/// loss Jacobian per sample (zero rows for masked samples).
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutcome {
    pub parameters: SampleBatch,
    pub loss: f64,
    pub jacobians: Vec<Array1<f64>>,
}

/// Draw `n_samples` parameters via `parameter_generator`, score them through
/// `model` against `observed`, and return the mean loss with per-sample loss
/// Jacobians.
///
/// # Errors
/// - Simulator or loss failures (shape mismatches, invalid parameters)
///   propagate unmodified, including failures raised at finite-difference
///   probe points.
/// - `ForecastError::NoFiniteSamples` when every sample's loss is
///   non-finite.
pub fn compute_forecast_loss_and_jacobian<M, L, G>(
    loss_fn: &L, model: &M, mut parameter_generator: G, observed: &[Array1<f64>],
    n_samples: usize, rng: &mut StdRng,
) -> ForecastResult<ForecastOutcome>
where
    M: SimulatorModel,
    L: ForecastLoss + ?Sized,
    G: FnMut(usize, &mut StdRng) -> SampleBatch,
{
    let batch = parameter_generator(n_samples, rng);
    if batch.is_empty() {
        return Ok(ForecastOutcome { parameters: batch, loss: 0.0, jacobians: Vec::new() });
    }
    let dim = batch.dim();
    let mut jacobians = vec![Array1::zeros(dim); batch.len()];
    let mut loss_sum = 0.0;
    let mut n_valid = 0usize;
    let closure_err: RefCell<Option<ForecastError>> = RefCell::new(None);

    for i in 0..batch.len() {
        let seed: u64 = rng.gen();
        let theta = batch.values().row(i).to_owned();
        let eval = |point: &Array1<f64>| -> f64 {
            // common random numbers: every probe reruns the simulator with
            // the same per-sample seed
            let mut sim_rng = StdRng::seed_from_u64(seed);
            let run = model
                .simulate(point.view(), &mut sim_rng)
                .map_err(ForecastError::from)
                .and_then(|out| loss_fn.loss(&out, observed));
            match run {
                Ok(value) => value,
                Err(err) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(err);
                    }
                    f64::NAN
                }
            }
        };

        let value = eval(&theta);
        if let Some(err) = closure_err.borrow_mut().take() {
            return Err(err);
        }
        if !value.is_finite() {
            continue;
        }
        let mut jac = theta.central_diff(&eval);
        if let Some(err) = closure_err.borrow_mut().take() {
            return Err(err);
        }
        jac.mapv_inplace(|g| if g.is_finite() { g } else { 0.0 });
        jacobians[i] = jac;
        loss_sum += value;
        n_valid += 1;
    }

    if n_valid == 0 {
        return Err(ForecastError::NoFiniteSamples { n_samples: batch.len() });
    }
    let scale = 1.0 / n_valid as f64;
    for jac in jacobians.iter_mut() {
        jac.mapv_inplace(|g| g * scale);
    }
    Ok(ForecastOutcome { parameters: batch, loss: loss_sum * scale, jacobians })
}

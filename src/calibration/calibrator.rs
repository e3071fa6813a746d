//! Variational calibration of simulator parameters.
//!
//! Purpose
//! -------
//! `Calibrator` trains a variational posterior over simulator parameters by
//! minimising a generalised objective: the mean forecast loss of simulated
//! output against observed data, plus a weighted divergence from a prior.
//!
//! Key behaviors
//! -------------
//! - Each epoch runs one gradient step. The gradient buffer is zeroed once
//!   at the start of the step, then both loss components accumulate into it
//!   additively: the divergence engine backpropagates its score and pathwise
//!   terms, and the forecast path backpropagates per-sample simulator
//!   Jacobians through the sampling tape. Neither pass zeroes the buffer.
//! - The forecast path treats the simulator as a black box: gradients reach
//!   the variational parameters as `Σ_i ⟨J_i, θ_i⟩` routed through the
//!   reparameterised sampling path only, with `J_i` held fixed.
//! - After accumulation the gradient is clipped to the configured global
//!   norm, then handed to the optimizer.
//! - `run` repeats steps for up to `n_epochs` epochs, tracks the best total
//!   loss, and stops early once the patience (the configured one, or a
//!   per-call override via `run_with_patience`) is exhausted by consecutive
//!   non-improving epochs.
//!
//! Invariants
//! ----------
//! - An improvement is a strict decrease of the total loss. Non-finite
//!   totals never count as improvements.
//! - With `snapshot_best` enabled, the variational parameters at the end of
//!   `run` are the best-seen ones, not the last-seen ones.
//!
//! Downstream usage
//! ----------------
//! Construct with a simulator, a forecast loss, a prior, a posterior
//! estimator, and an optimizer; call `run`; read the calibrated posterior
//! back through `posterior()`.
use crate::calibration::errors::{CalibrationError, CalibrationResult};
use crate::calibration::options::CalibratorOptions;
use crate::calibration::patience::Patience;
use crate::calibration::report;
use crate::forecast::jacobian::compute_forecast_loss_and_jacobian;
use crate::forecast::loss::ForecastLoss;
use crate::models::SimulatorModel;
use crate::optim::clip::clip_global_norm;
use crate::optim::Optimizer;
use crate::posterior::traits::PosteriorEstimator;
use crate::prior::PriorDistribution;
use crate::regularisation::{accumulate_gradient, monte_carlo_kl};
use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, SeedableRng};

/// Loss components of one epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossTriple {
    /// `forecast + regularisation`.
    pub total: f64,
    /// Mean forecast loss over unmasked samples.
    pub forecast: f64,
    /// Weighted divergence estimate.
    pub regularisation: f64,
}

/// Summary of a completed `run`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Epochs actually executed, early stop included.
    pub epochs_run: usize,
    /// Whether patience ended the run before `n_epochs`.
    pub stopped_early: bool,
    /// Best total loss seen, `None` when no epoch ran.
    pub best_loss: Option<f64>,
    /// Zero-based epoch of the best total loss.
    pub best_epoch: Option<usize>,
    /// Loss components of every executed epoch.
    pub loss_history: Vec<LossTriple>,
}

/// Trains a variational posterior against a black-box simulator.
#[derive(Debug)]
pub struct Calibrator<M, L, P, Q, O>
where
    M: SimulatorModel,
    L: ForecastLoss,
    P: PriorDistribution,
    Q: PosteriorEstimator,
    O: Optimizer,
{
    model: M,
    loss: L,
    prior: P,
    posterior_estimator: Q,
    optimizer: O,
    observed: Vec<Array1<f64>>,
    options: CalibratorOptions,
    rng: StdRng,
    best_params: Option<Array1<f64>>,
}

impl<M, L, P, Q, O> Calibrator<M, L, P, Q, O>
where
    M: SimulatorModel,
    L: ForecastLoss,
    P: PriorDistribution,
    Q: PosteriorEstimator,
    O: Optimizer,
{
    /// Build a calibrator, checking that simulator, prior, and posterior
    /// agree on the parameter dimension.
    pub fn new(
        model: M, loss: L, prior: P, posterior_estimator: Q, optimizer: O,
        observed: Vec<Array1<f64>>, options: CalibratorOptions,
    ) -> CalibrationResult<Self> {
        if model.n_params() != posterior_estimator.dim() {
            return Err(CalibrationError::ModelDimMismatch {
                model: model.n_params(),
                posterior: posterior_estimator.dim(),
            });
        }
        if prior.dim() != posterior_estimator.dim() {
            return Err(CalibrationError::PriorDimMismatch {
                prior: prior.dim(),
                posterior: posterior_estimator.dim(),
            });
        }
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Calibrator {
            model,
            loss,
            prior,
            posterior_estimator,
            optimizer,
            observed,
            options,
            rng,
            best_params: None,
        })
    }

    /// The posterior estimator in its current state.
    pub fn posterior(&self) -> &Q {
        &self.posterior_estimator
    }

    pub fn options(&self) -> &CalibratorOptions {
        &self.options
    }

    /// Run one epoch: zero the gradient, accumulate both loss paths, clip,
    /// and step the optimizer. Returns the epoch's loss components.
    pub fn step(&mut self) -> CalibrationResult<LossTriple> {
        self.posterior_estimator.zero_grad();

        let outcome = compute_forecast_loss_and_jacobian(
            &self.loss,
            &self.model,
            |n, rng| self.posterior_estimator.rsample(n, rng),
            &self.observed,
            self.options.n_samples_per_epoch,
            &mut self.rng,
        )?;
        if !outcome.parameters.is_empty() {
            let mut cotangents =
                Array2::zeros((outcome.parameters.len(), outcome.parameters.dim()));
            for (i, jac) in outcome.jacobians.iter().enumerate() {
                cotangents.row_mut(i).assign(jac);
            }
            self.posterior_estimator
                .backward_rsample(&outcome.parameters, cotangents.view())?;
        }

        let regularisation = if self.options.w == 0.0 {
            0.0
        } else {
            let batch = self
                .posterior_estimator
                .rsample(self.options.n_samples_regularisation, &mut self.rng);
            let divergence = monte_carlo_kl(&self.posterior_estimator, &self.prior, &batch)?;
            let scale = self.options.w / batch.len() as f64;
            accumulate_gradient(&mut self.posterior_estimator, &self.prior, &batch, scale)?;
            self.options.w * divergence
        };

        clip_global_norm(
            self.posterior_estimator.grad_mut(),
            self.options.gradient_clipping_norm,
        );
        let grads = self.posterior_estimator.grad().to_owned();
        self.optimizer
            .step(self.posterior_estimator.params_mut(), grads.view());

        Ok(LossTriple {
            total: outcome.loss + regularisation,
            forecast: outcome.loss,
            regularisation,
        })
    }

    /// Train for up to `n_epochs` epochs with the configured patience.
    pub fn run(&mut self, n_epochs: usize) -> CalibrationResult<RunOutcome> {
        let patience = self.options.patience;
        self.run_with_patience(n_epochs, patience)
    }

    /// Train for up to `n_epochs` epochs, overriding the configured patience
    /// for this call only. Lets successive runs over the same calibrator use
    /// different early-stopping budgets.
    pub fn run_with_patience(
        &mut self, n_epochs: usize, patience: Patience,
    ) -> CalibrationResult<RunOutcome> {
        if patience == Patience::Epochs(0) {
            return Err(CalibrationError::InvalidPatience);
        }
        let mut best_loss: Option<f64> = None;
        let mut best_epoch: Option<usize> = None;
        let mut stale_epochs = 0usize;
        let mut stopped_early = false;
        let mut loss_history = Vec::with_capacity(n_epochs);

        for epoch in 0..n_epochs {
            let losses = self.step()?;
            // a non-finite total can never become the best loss
            let improved = losses.total.is_finite()
                && match best_loss {
                    None => true,
                    Some(best) => losses.total < best,
                };
            if improved {
                best_loss = Some(losses.total);
                best_epoch = Some(epoch);
                stale_epochs = 0;
                if self.options.snapshot_best {
                    self.best_params = Some(self.posterior_estimator.params().to_owned());
                }
            } else {
                stale_epochs += 1;
            }
            loss_history.push(losses);
            if self.reporting() {
                report::emit_epoch_progress(
                    epoch,
                    n_epochs,
                    &losses,
                    best_loss.unwrap_or(losses.total),
                    stale_epochs,
                );
            }
            if patience.exhausted(stale_epochs) {
                if self.reporting() {
                    report::emit_early_stop(epoch, stale_epochs);
                }
                stopped_early = true;
                break;
            }
        }

        if self.options.snapshot_best {
            if let Some(params) = self.best_params.take() {
                self.posterior_estimator.set_params(params.view())?;
            }
        }
        if self.reporting() {
            if let (Some(best), Some(epoch)) = (best_loss, best_epoch) {
                report::emit_run_complete(loss_history.len(), best, epoch);
            }
        }

        Ok(RunOutcome {
            epochs_run: loss_history.len(),
            stopped_early,
            best_loss,
            best_epoch,
            loss_history,
        })
    }

    fn reporting(&self) -> bool {
        self.options.progress && self.options.reporting_process
    }
}

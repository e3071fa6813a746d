//! Structured progress events for the training loop.
//!
//! Events carry an `event` field naming the record type plus the numeric
//! payload, so downstream subscribers can filter or aggregate without
//! parsing message text. The calibrator gates these calls on its reporting
//! switches; emitters themselves are unconditional.
use crate::calibration::calibrator::LossTriple;
use tracing::info;

pub(crate) fn emit_epoch_progress(
    epoch: usize, n_epochs: usize, losses: &LossTriple, best_loss: f64, stale_epochs: usize,
) {
    info!(
        event = "epoch_progress",
        epoch,
        n_epochs,
        total_loss = losses.total,
        forecast_loss = losses.forecast,
        regularisation_loss = losses.regularisation,
        best_loss,
        stale_epochs,
    );
}

pub(crate) fn emit_early_stop(epoch: usize, stale_epochs: usize) {
    info!(event = "early_stop", epoch, stale_epochs);
}

pub(crate) fn emit_run_complete(epochs_run: usize, best_loss: f64, best_epoch: usize) {
    info!(event = "run_complete", epochs_run, best_loss, best_epoch);
}

//! Calibrator configuration.
//!
//! Purpose
//! -------
//! Collect the tunables of the training loop behind validated builders so a
//! constructed `CalibratorOptions` is always internally consistent. Fields
//! that can be invalid (weights, norms, patience, sample counts) are only
//! settable through fallible builders; plain switches are infallible.
//!
//! Conventions
//! -----------
//! - Defaults mirror common practice for variational calibration: no
//!   regularisation (`w = 0`), no clipping, five forecast samples per
//!   epoch, ten thousand divergence samples, patience of twenty epochs.
//! - `gradient_clipping_norm = f64::INFINITY` means clipping is disabled.
use crate::calibration::errors::{CalibrationError, CalibrationResult};
use crate::calibration::patience::Patience;

/// Default regularisation weight: the divergence term is switched off.
pub const DEFAULT_WEIGHT: f64 = 0.0;
/// Default forecast samples drawn per epoch.
pub const DEFAULT_FORECAST_SAMPLES: usize = 5;
/// Default Monte-Carlo samples for the divergence estimate.
pub const DEFAULT_REGULARISATION_SAMPLES: usize = 10_000;

/// Validated configuration of a [`Calibrator`](crate::calibration::Calibrator).
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratorOptions {
    /// Weight of the divergence term in the total loss.
    pub w: f64,

    /// Global-norm threshold for gradient clipping. Infinite disables it.
    pub gradient_clipping_norm: f64,

    /// Parameter samples scored through the simulator each epoch. Zero is
    /// allowed and makes the forecast path a no-op.
    pub n_samples_per_epoch: usize,

    /// Monte-Carlo samples for the divergence estimate. At least 1.
    pub n_samples_regularisation: usize,

    /// Early-stopping patience.
    pub patience: Patience,

    /// Master switch for progress reporting.
    pub progress: bool,

    /// Whether this process is the one that reports. In multi-process runs
    /// only one rank should log; single-process runs leave this `true`.
    pub reporting_process: bool,

    /// Snapshot the best-seen variational parameters during the run and
    /// restore them when it ends.
    pub snapshot_best: bool,

    /// Seed for the calibrator's RNG. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl CalibratorOptions {
    pub fn new() -> Self {
        CalibratorOptions {
            w: DEFAULT_WEIGHT,
            gradient_clipping_norm: f64::INFINITY,
            n_samples_per_epoch: DEFAULT_FORECAST_SAMPLES,
            n_samples_regularisation: DEFAULT_REGULARISATION_SAMPLES,
            patience: Patience::default(),
            progress: true,
            reporting_process: true,
            snapshot_best: false,
            seed: None,
        }
    }

    /// Set the divergence weight. Must be finite and non-negative.
    pub fn with_w(mut self, w: f64) -> CalibrationResult<Self> {
        if !w.is_finite() || w < 0.0 {
            return Err(CalibrationError::InvalidWeight { value: w });
        }
        self.w = w;
        Ok(self)
    }

    /// Set the clipping threshold. Must be positive; `f64::INFINITY`
    /// disables clipping.
    pub fn with_gradient_clipping_norm(mut self, norm: f64) -> CalibrationResult<Self> {
        if norm.is_nan() || norm <= 0.0 {
            return Err(CalibrationError::InvalidClippingNorm { value: norm });
        }
        self.gradient_clipping_norm = norm;
        Ok(self)
    }

    pub fn with_n_samples_per_epoch(mut self, n: usize) -> Self {
        self.n_samples_per_epoch = n;
        self
    }

    /// Set the divergence sample count. Must be at least 1.
    pub fn with_n_samples_regularisation(mut self, n: usize) -> CalibrationResult<Self> {
        if n == 0 {
            return Err(CalibrationError::InvalidRegularisationSamples);
        }
        self.n_samples_regularisation = n;
        Ok(self)
    }

    /// Set the patience. A bounded patience of zero epochs is rejected.
    pub fn with_patience(mut self, patience: Patience) -> CalibrationResult<Self> {
        if patience == Patience::Epochs(0) {
            return Err(CalibrationError::InvalidPatience);
        }
        self.patience = patience;
        Ok(self)
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_reporting_process(mut self, reporting: bool) -> Self {
        self.reporting_process = reporting;
        self
    }

    pub fn with_snapshot_best(mut self, snapshot: bool) -> Self {
        self.snapshot_best = snapshot;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for CalibratorOptions {
    fn default() -> Self {
        CalibratorOptions::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_regularisation_and_clipping() {
        let options = CalibratorOptions::new();
        assert_eq!(options.w, 0.0);
        assert!(options.gradient_clipping_norm.is_infinite());
        assert_eq!(options.n_samples_per_epoch, 5);
        assert_eq!(options.n_samples_regularisation, 10_000);
        assert_eq!(options.patience, Patience::Epochs(20));
        assert!(!options.snapshot_best);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        assert!(matches!(
            CalibratorOptions::new().with_w(-1.0),
            Err(CalibrationError::InvalidWeight { .. })
        ));
        assert!(matches!(
            CalibratorOptions::new().with_w(f64::INFINITY),
            Err(CalibrationError::InvalidWeight { .. })
        ));
        assert!(matches!(
            CalibratorOptions::new().with_gradient_clipping_norm(0.0),
            Err(CalibrationError::InvalidClippingNorm { .. })
        ));
        assert!(matches!(
            CalibratorOptions::new().with_n_samples_regularisation(0),
            Err(CalibrationError::InvalidRegularisationSamples)
        ));
        assert!(matches!(
            CalibratorOptions::new().with_patience(Patience::Epochs(0)),
            Err(CalibrationError::InvalidPatience)
        ));
    }

    #[test]
    fn builders_compose() {
        let options = CalibratorOptions::new()
            .with_w(2.5)
            .expect("valid weight")
            .with_gradient_clipping_norm(1.0)
            .expect("valid norm")
            .with_patience(Patience::Unbounded)
            .expect("valid patience")
            .with_n_samples_per_epoch(0)
            .with_seed(42);
        assert_eq!(options.w, 2.5);
        assert_eq!(options.gradient_clipping_norm, 1.0);
        assert_eq!(options.patience, Patience::Unbounded);
        assert_eq!(options.n_samples_per_epoch, 0);
        assert_eq!(options.seed, Some(42));
    }
}

//! Adaptive first/second-moment optimizer with bias correction.
//!
//! The default optimizer for calibration runs. Moment buffers are sized
//! lazily on the first step so one `Adam` value can be constructed before
//! the estimator it will drive. Non-finite gradient coordinates are skipped
//! rather than poisoning the moment estimates.
use crate::optim::{
    errors::{OptimError, OptimResult},
    Optimizer,
};
use crate::posterior::traits::Theta;
use ndarray::{Array1, ArrayView1};

/// Default learning rate used when the caller does not supply an optimizer.
pub const DEFAULT_LEARNING_RATE: f64 = 1e-3;

/// Adam update rule (Kingma & Ba) over a flat parameter vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Adam {
    lr: f64,
    beta1: f64,
    beta2: f64,
    eps: f64,
    m: Array1<f64>,
    v: Array1<f64>,
    t: usize,
}

impl Adam {
    /// Build an Adam optimizer with the given learning rate and standard
    /// moment decays (β₁ = 0.9, β₂ = 0.999, ε = 1e-8).
    pub fn new(lr: f64) -> OptimResult<Self> {
        Adam::with_config(lr, 0.9, 0.999, 1e-8)
    }

    /// Build an Adam optimizer with fully explicit hyperparameters.
    pub fn with_config(lr: f64, beta1: f64, beta2: f64, eps: f64) -> OptimResult<Self> {
        if !lr.is_finite() || lr <= 0.0 {
            return Err(OptimError::InvalidLearningRate { value: lr });
        }
        for beta in [beta1, beta2] {
            if !beta.is_finite() || !(0.0..1.0).contains(&beta) {
                return Err(OptimError::InvalidBeta { value: beta });
            }
        }
        if !eps.is_finite() || eps <= 0.0 {
            return Err(OptimError::InvalidEpsilon { value: eps });
        }
        Ok(Adam { lr, beta1, beta2, eps, m: Array1::zeros(0), v: Array1::zeros(0), t: 0 })
    }

    /// Optimizer with the crate-default learning rate.
    pub fn with_defaults() -> Self {
        // the default configuration is statically valid
        Adam::new(DEFAULT_LEARNING_RATE).expect("default Adam hyperparameters are valid")
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut Theta, grads: ArrayView1<'_, f64>) {
        if self.m.len() != params.len() {
            self.m = Array1::zeros(params.len());
            self.v = Array1::zeros(params.len());
            self.t = 0;
        }
        self.t += 1;
        let bc1 = 1.0 - self.beta1.powi(self.t as i32);
        let bc2 = 1.0 - self.beta2.powi(self.t as i32);
        for i in 0..params.len() {
            let g = grads[i];
            if !g.is_finite() {
                continue;
            }
            self.m[i] = self.beta1 * self.m[i] + (1.0 - self.beta1) * g;
            self.v[i] = self.beta2 * self.v[i] + (1.0 - self.beta2) * g * g;
            let m_hat = self.m[i] / bc1;
            let v_hat = self.v[i] / bc2;
            params[i] -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
        }
    }
}

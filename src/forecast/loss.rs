//! Forecast loss functions.
//!
//! A forecast loss reduces a simulated output (list of series) and the
//! observed data (matching list) to one scalar. Mean squared error is the
//! default used by the calibrator when no loss is supplied.
use crate::forecast::errors::{ForecastError, ForecastResult};
use ndarray::Array1;

/// Scalar loss between simulated and observed output series.
pub trait ForecastLoss {
    /// Score `simulated` against `observed`. Shapes must match exactly;
    /// mismatches surface as typed errors rather than silent truncation.
    fn loss(
        &self, simulated: &[Array1<f64>], observed: &[Array1<f64>],
    ) -> ForecastResult<f64>;
}

/// Mean squared error over every element of every series.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl ForecastLoss for MeanSquaredError {
    fn loss(
        &self, simulated: &[Array1<f64>], observed: &[Array1<f64>],
    ) -> ForecastResult<f64> {
        if simulated.len() != observed.len() {
            return Err(ForecastError::SeriesCountMismatch {
                expected: observed.len(),
                actual: simulated.len(),
            });
        }
        let mut sum = 0.0;
        let mut count = 0usize;
        for (series, (sim, obs)) in simulated.iter().zip(observed.iter()).enumerate() {
            if sim.len() != obs.len() {
                return Err(ForecastError::SeriesLengthMismatch {
                    series,
                    expected: obs.len(),
                    actual: sim.len(),
                });
            }
            for (s, o) in sim.iter().zip(obs.iter()) {
                let d = s - o;
                sum += d * d;
            }
            count += sim.len();
        }
        if count == 0 {
            return Ok(0.0);
        }
        Ok(sum / count as f64)
    }
}

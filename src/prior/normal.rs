//! Fixed independent-normal prior.
//!
//! The component densities are validated and cached at construction, so
//! log-density evaluation never has to re-check scale positivity.
use crate::prior::{
    errors::{PriorError, PriorResult},
    PriorDistribution,
};
use ndarray::{Array1, ArrayView1};
use statrs::distribution::{Continuous, Normal};

/// Diagonal normal prior with fixed means and scales.
#[derive(Debug, Clone)]
pub struct IndependentNormal {
    means: Array1<f64>,
    sigmas: Array1<f64>,
    components: Vec<Normal>,
}

impl IndependentNormal {
    /// Build a prior from per-dimension means and scales.
    ///
    /// # Errors
    /// - `PriorError::Empty` for zero-length inputs.
    /// - `PriorError::LengthMismatch` when the vectors disagree in length.
    /// - `PriorError::InvalidMean` / `PriorError::InvalidScale` for
    ///   non-finite means or non-positive scales.
    pub fn new(means: Array1<f64>, sigmas: Array1<f64>) -> PriorResult<Self> {
        if means.is_empty() {
            return Err(PriorError::Empty);
        }
        if means.len() != sigmas.len() {
            return Err(PriorError::LengthMismatch { means: means.len(), sigmas: sigmas.len() });
        }
        if let Some((index, &value)) = means.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(PriorError::InvalidMean { index, value });
        }
        if let Some((index, &value)) =
            sigmas.iter().enumerate().find(|(_, v)| !v.is_finite() || **v <= 0.0)
        {
            return Err(PriorError::InvalidScale { index, value });
        }
        let components = means
            .iter()
            .zip(sigmas.iter())
            .map(|(&m, &s)| {
                Normal::new(m, s)
                    .map_err(|_| PriorError::InvalidScale { index: 0, value: s })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IndependentNormal { means, sigmas, components })
    }

    /// Convenience constructor for a one-dimensional prior.
    pub fn scalar(mean: f64, sigma: f64) -> PriorResult<Self> {
        IndependentNormal::new(Array1::from_elem(1, mean), Array1::from_elem(1, sigma))
    }
}

impl PriorDistribution for IndependentNormal {
    fn dim(&self) -> usize {
        self.means.len()
    }

    fn log_prob(&self, x: ArrayView1<'_, f64>) -> f64 {
        self.components.iter().zip(x.iter()).map(|(c, &v)| c.ln_pdf(v)).sum()
    }

    fn grad_log_prob(&self, x: ArrayView1<'_, f64>) -> Array1<f64> {
        Array1::from_iter(
            x.iter()
                .zip(self.means.iter().zip(self.sigmas.iter()))
                .map(|(&v, (&m, &s))| -(v - m) / (s * s)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn constructor_rejects_bad_inputs() {
        assert!(matches!(
            IndependentNormal::new(Array1::zeros(0), Array1::zeros(0)),
            Err(PriorError::Empty)
        ));
        assert!(matches!(
            IndependentNormal::new(array![0.0], array![1.0, 1.0]),
            Err(PriorError::LengthMismatch { .. })
        ));
        assert!(matches!(
            IndependentNormal::new(array![0.0], array![-1.0]),
            Err(PriorError::InvalidScale { index: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The standard-normal log-density at zero is −0.5·ln(2π) and the score
    // at x is −x.
    fn log_prob_and_score_match_closed_forms() {
        let prior = IndependentNormal::scalar(0.0, 1.0).expect("valid scalar prior");
        let expected = -0.5 * (2.0 * std::f64::consts::PI).ln();
        assert!((prior.log_prob(array![0.0].view()) - expected).abs() < 1e-12);
        let g = prior.grad_log_prob(array![1.5].view());
        assert!((g[0] + 1.5).abs() < 1e-12);
    }
}

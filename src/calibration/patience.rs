//! Early-stopping patience.
//!
//! Patience is either a bounded number of consecutive epochs without
//! improvement or unbounded. Representing "never stop early" as its own
//! variant keeps the run loop free of sentinel comparisons against
//! floating-point infinity.
use std::fmt;

/// How many consecutive non-improving epochs the run loop tolerates before
/// stopping early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patience {
    /// Stop after this many consecutive epochs without improvement. Must be
    /// at least 1; `CalibratorOptions::with_patience` enforces this.
    Epochs(usize),

    /// Never stop early.
    Unbounded,
}

impl Patience {
    /// Whether `stale_epochs` consecutive non-improving epochs exhaust this
    /// patience.
    pub fn exhausted(&self, stale_epochs: usize) -> bool {
        match self {
            Patience::Epochs(limit) => stale_epochs >= *limit,
            Patience::Unbounded => false,
        }
    }
}

impl Default for Patience {
    fn default() -> Self {
        Patience::Epochs(20)
    }
}

impl fmt::Display for Patience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Patience::Epochs(limit) => write!(f, "{limit} epochs"),
            Patience::Unbounded => write!(f, "unbounded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_patience_exhausts_at_its_limit() {
        let patience = Patience::Epochs(3);
        assert!(!patience.exhausted(0));
        assert!(!patience.exhausted(2));
        assert!(patience.exhausted(3));
        assert!(patience.exhausted(10));
    }

    #[test]
    fn unbounded_patience_never_exhausts() {
        assert!(!Patience::Unbounded.exhausted(usize::MAX));
    }
}

//! Per-generation timings for one worker.
//!
//! [`StepMetrics`] captures how long each phase of a generation took. The
//! worker logs every generation's metrics at `trace` level and keeps a
//! running total that ends up in its [`WorkerReport`](crate::WorkerReport).

use std::ops::AddAssign;
use std::time::Duration;

/// Phase timings for one generation (or a sum over several).
///
/// All durations are in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Halo exchange, including time blocked on neighbours.
    pub exchange_us: u64,
    /// Stencil update of the owned rows.
    pub compute_us: u64,
    /// Live-cell count and reduction.
    pub diagnose_us: u64,
    /// Writing the snapshot artifact.
    pub snapshot_us: u64,
    /// Wall-clock time for the whole generation.
    pub total_us: u64,
}

impl StepMetrics {
    /// Time spent outside the exchange.
    pub fn local_us(&self) -> u64 {
        self.total_us.saturating_sub(self.exchange_us)
    }
}

/// Saturating conversion to whole microseconds.
pub(crate) fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

impl AddAssign for StepMetrics {
    fn add_assign(&mut self, rhs: Self) {
        self.exchange_us = self.exchange_us.saturating_add(rhs.exchange_us);
        self.compute_us = self.compute_us.saturating_add(rhs.compute_us);
        self.diagnose_us = self.diagnose_us.saturating_add(rhs.diagnose_us);
        self.snapshot_us = self.snapshot_us.saturating_add(rhs.snapshot_us);
        self.total_us = self.total_us.saturating_add(rhs.total_us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.exchange_us, 0);
        assert_eq!(m.compute_us, 0);
        assert_eq!(m.diagnose_us, 0);
        assert_eq!(m.snapshot_us, 0);
        assert_eq!(m.total_us, 0);
    }

    #[test]
    fn totals_accumulate() {
        let step = StepMetrics {
            exchange_us: 5,
            compute_us: 20,
            diagnose_us: 2,
            snapshot_us: 30,
            total_us: 60,
        };
        let mut sum = StepMetrics::default();
        sum += step;
        sum += step;
        assert_eq!(sum.compute_us, 40);
        assert_eq!(sum.total_us, 120);
        assert_eq!(sum.local_us(), 110);
    }

    #[test]
    fn micros_saturates() {
        assert_eq!(micros(Duration::from_millis(3)), 3_000);
        assert_eq!(micros(Duration::MAX), u64::MAX);
    }
}

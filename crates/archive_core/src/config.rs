use std::path::PathBuf;

use crate::period::{PeriodBounds, PeriodFilter};

/// Parameters of the randomized pacing delay inserted between remote calls.
///
/// Delays are Erlang-distributed: the sum of `shape` exponential draws with
/// mean `scale_secs`, giving a mean total wait of `shape * scale_secs`
/// seconds. A fixed `seed` makes the delay sequence reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct PacingParams {
    pub shape: u32,
    pub scale_secs: f64,
    pub seed: Option<u64>,
}

impl Default for PacingParams {
    fn default() -> Self {
        // Mean 3 seconds between groups.
        Self {
            shape: 3,
            scale_secs: 1.0,
            seed: None,
        }
    }
}

/// Configuration surface of one harvesting run.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    /// Inclusive lower bound on period tokens; `None` is unbounded.
    pub period_start: Option<String>,
    /// Inclusive upper bound on period tokens; `None` is unbounded.
    pub period_stop: Option<String>,
    /// Maximum number of periods to process; `None` or 0 is unlimited.
    pub period_limit: Option<u32>,
    /// How deep into the ranking table to request, ranking mode only.
    pub ranking_depth: u32,
    /// Directory receiving the per-period CSV files and the run log.
    pub output_root: PathBuf,
    pub pacing: PacingParams,
}

impl HistoryConfig {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            period_start: None,
            period_stop: None,
            period_limit: None,
            ranking_depth: 500,
            output_root: output_root.into(),
            pacing: PacingParams::default(),
        }
    }

    /// Fresh period filter for this configuration. Filters are stateful and
    /// consumed by a single enumeration.
    pub fn period_filter(&self) -> PeriodFilter {
        PeriodFilter::new(
            PeriodBounds::new(self.period_start.clone(), self.period_stop.clone()),
            self.period_limit,
        )
    }
}

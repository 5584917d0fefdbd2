use chrono::{DateTime, Utc};

/// Aggregate statistics of one harvesting run. Written to the run log on
/// every exit path: success, recovered errors, fatal errors and cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub timestamp: DateTime<Utc>,
    /// Total number of document fetches issued against the source.
    pub fetch_count: u64,
    /// Periods fully processed before the run ended.
    pub periods_processed: u32,
}

impl RunSummary {
    pub fn new(fetch_count: u64, periods_processed: u32) -> Self {
        Self {
            timestamp: Utc::now(),
            fetch_count,
            periods_processed,
        }
    }

    /// Single-line run log body.
    pub fn render(&self) -> String {
        format!(
            "run at {} with {} get requests, {} periods processed\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.fetch_count,
            self.periods_processed,
        )
    }
}

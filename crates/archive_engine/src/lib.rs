//! Archive engine: fetch, extract and persist pipeline.
mod csv;
mod fetch;
mod groups;
mod history;
mod matches;
mod pacing;
mod periods;
mod persist;
mod rankings;

pub use csv::CsvSink;
pub use fetch::{FetchCounter, FetchError, FetchSettings, FetchedPage, Fetcher, ReqwestFetcher};
pub use groups::{extract_tourneys, GroupParseError, TourneyRows};
pub use history::{HistoryBuilder, HistoryError};
pub use matches::{extract_match_records, MatchRows, RecordParseError};
pub use pacing::Pacing;
pub use periods::{enumerate_periods, EnumerateError, PeriodKind, PeriodParseError, Periods};
pub use persist::{ensure_output_dir, write_run_log, StorageError};
pub use rankings::{extract_ranked_players, RankingRows};

// Re-exported so callers can wire cancellation without a direct tokio-util dep.
pub use tokio_util::sync::CancellationToken;

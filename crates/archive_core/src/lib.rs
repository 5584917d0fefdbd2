//! Archive core: pure data model and filtering policy for the harvester.
mod config;
mod period;
mod record;
mod summary;
mod text;
mod tourney;

pub use config::{HistoryConfig, PacingParams};
pub use period::{Period, PeriodBounds, PeriodDecision, PeriodFilter};
pub use record::{MatchRecord, RankedPlayer, MATCH_COLUMNS, RANKING_COLUMNS};
pub use summary::RunSummary;
pub use text::normalize_ws;
pub use tourney::Tourney;

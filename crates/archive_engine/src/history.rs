use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

use archive_core::{HistoryConfig, RunSummary, Tourney, MATCH_COLUMNS, RANKING_COLUMNS};

use crate::csv::CsvSink;
use crate::fetch::{FetchCounter, FetchError, Fetcher};
use crate::groups;
use crate::matches::{self, MatchRows};
use crate::pacing::Pacing;
use crate::periods::{enumerate_periods, EnumerateError, PeriodKind, PeriodParseError};
use crate::persist::{self, StorageError};
use crate::rankings;

const MATCHES_LOG: &str = "matches_results.log";
const RANKINGS_LOG: &str = "rankings.log";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Layout(#[from] PeriodParseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("run cancelled")]
    Cancelled,
}

impl From<EnumerateError> for HistoryError {
    fn from(err: EnumerateError) -> Self {
        match err {
            EnumerateError::Fetch(err) => HistoryError::Fetch(err),
            EnumerateError::Parse(err) => HistoryError::Layout(err),
        }
    }
}

/// Drives the whole pipeline: periods, then groups within each period, then
/// records within each group, streamed to one CSV file per period with
/// pacing delays between remote calls.
///
/// Error policy: anything below group granularity is recovered locally with
/// a log line; period enumeration and storage failures are fatal. The run
/// log is written on every exit path, including cancellation.
pub struct HistoryBuilder {
    fetcher: Arc<dyn Fetcher>,
    counter: FetchCounter,
    cancel: CancellationToken,
}

impl HistoryBuilder {
    /// `counter` must be the same handle the fetcher increments.
    pub fn new(fetcher: Arc<dyn Fetcher>, counter: FetchCounter) -> Self {
        Self {
            fetcher,
            counter,
            cancel: CancellationToken::new(),
        }
    }

    /// External cancellation, checked at period and group boundaries.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Harvest yearly match results from the results archive at
    /// `archive_url` into one `matches_results_<year>.csv` per accepted
    /// year.
    pub async fn build_matches_history(
        &self,
        archive_url: &str,
        config: &HistoryConfig,
    ) -> Result<RunSummary, HistoryError> {
        let mut periods_processed = 0;
        let outcome = self
            .run_matches(archive_url, config, &mut periods_processed)
            .await;
        self.flush_summary(&config.output_root, MATCHES_LOG, periods_processed, outcome)
    }

    /// Harvest weekly singles rankings from the listing at `rankings_url`
    /// into `<year>/<week>.csv` files under the output root.
    pub async fn build_rankings_history(
        &self,
        rankings_url: &str,
        config: &HistoryConfig,
    ) -> Result<RunSummary, HistoryError> {
        let mut periods_processed = 0;
        let outcome = self
            .run_rankings(rankings_url, config, &mut periods_processed)
            .await;
        self.flush_summary(&config.output_root, RANKINGS_LOG, periods_processed, outcome)
    }

    async fn run_matches(
        &self,
        archive_url: &str,
        config: &HistoryConfig,
        periods_processed: &mut u32,
    ) -> Result<(), HistoryError> {
        persist::ensure_output_dir(&config.output_root)?;
        let mut pacing = Pacing::from_params(&config.pacing);

        let periods = enumerate_periods(
            self.fetcher.as_ref(),
            archive_url,
            PeriodKind::Years,
            config.period_filter(),
        )
        .await?;

        for period in periods {
            self.check_cancelled()?;
            info!("processing year {}", period.token);

            let listing = self.fetcher.fetch(&period.listing_url).await?;
            let path = config
                .output_root
                .join(format!("matches_results_{}.csv", period.token));
            let mut sink = CsvSink::create(&path, &MATCH_COLUMNS)?;

            let today = Utc::now().date_naive();
            for tourney in groups::extract_tourneys(&listing.html, today) {
                self.check_cancelled()?;
                let tourney = match tourney {
                    Ok(tourney) => tourney,
                    Err(err) => {
                        warn!("skipping tournament row: {err}");
                        continue;
                    }
                };
                match self.fetch_tourney_records(&listing.url, &tourney).await {
                    Ok(records) => {
                        let written = write_records(records, &tourney, &mut sink)?;
                        if written == 0 {
                            info!("no valid results for {}", tourney.name);
                        }
                    }
                    // Fetch failure below group granularity drops the group,
                    // never the period.
                    Err(err) => warn!("dropping {}: {err}", tourney.name),
                }
                tokio::time::sleep(pacing.sample()).await;
            }

            sink.finish()?;
            *periods_processed += 1;
        }
        Ok(())
    }

    async fn fetch_tourney_records(
        &self,
        listing_url: &str,
        tourney: &Tourney,
    ) -> Result<MatchRows, FetchError> {
        let detail_url = join_url(listing_url, &tourney.results_url)?;
        let page = self.fetcher.fetch(&detail_url).await?;
        Ok(matches::extract_match_records(&page, tourney))
    }

    async fn run_rankings(
        &self,
        rankings_url: &str,
        config: &HistoryConfig,
        periods_processed: &mut u32,
    ) -> Result<(), HistoryError> {
        persist::ensure_output_dir(&config.output_root)?;
        let mut pacing = Pacing::from_params(&config.pacing);

        let periods = enumerate_periods(
            self.fetcher.as_ref(),
            rankings_url,
            PeriodKind::RankingWeeks {
                depth: config.ranking_depth,
            },
            config.period_filter(),
        )
        .await?;

        for period in periods {
            self.check_cancelled()?;
            info!("processing ranking week {}", period.token);

            // In ranking mode the week itself is the group: a failed week is
            // dropped and the run moves on.
            let page = match self.fetcher.fetch(&period.listing_url).await {
                Ok(page) => page,
                Err(err) => {
                    warn!("dropping week {}: {err}", period.token);
                    continue;
                }
            };

            let year_dir = config.output_root.join(week_year(&period.token));
            persist::ensure_output_dir(&year_dir)?;
            let path = year_dir.join(format!("{}.csv", period.token));
            let mut sink = CsvSink::create(&path, &RANKING_COLUMNS)?;

            let mut written = 0usize;
            for player in rankings::extract_ranked_players(&page.html) {
                match player {
                    Ok(player) => {
                        sink.write_row(&player.csv_row())?;
                        written += 1;
                    }
                    Err(err) => debug!("dropping a player in week {}: {err}", period.token),
                }
            }
            sink.finish()?;
            info!("week {}: {written} players", period.token);
            *periods_processed += 1;
            tokio::time::sleep(pacing.sample()).await;
        }
        Ok(())
    }

    /// Guaranteed-cleanup step: build the summary from the shared fetch
    /// counter and write the run log no matter how the run ended.
    fn flush_summary(
        &self,
        output_root: &Path,
        log_name: &str,
        periods_processed: u32,
        outcome: Result<(), HistoryError>,
    ) -> Result<RunSummary, HistoryError> {
        let summary = RunSummary::new(self.counter.value(), periods_processed);
        let log_result = persist::write_run_log(&output_root.join(log_name), &summary);
        match outcome {
            Ok(()) => {
                log_result?;
                info!("run complete: {}", summary.render().trim_end());
                Ok(summary)
            }
            Err(err) => {
                // The original failure wins; a failed log write on the way
                // out is only worth a warning.
                if let Err(log_err) = log_result {
                    warn!("failed to write run log: {log_err}");
                }
                Err(err)
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), HistoryError> {
        if self.cancel.is_cancelled() {
            warn!("cancellation requested, stopping run");
            return Err(HistoryError::Cancelled);
        }
        Ok(())
    }
}

fn write_records(
    records: MatchRows,
    tourney: &Tourney,
    sink: &mut CsvSink,
) -> Result<usize, StorageError> {
    let mut written = 0usize;
    for record in records {
        match record {
            Ok(record) => {
                sink.write_row(&record.csv_row())?;
                written += 1;
            }
            Err(err) => debug!("dropping a match in {}: {err}", tourney.name),
        }
    }
    Ok(written)
}

fn join_url(base: &str, href: &str) -> Result<String, FetchError> {
    let base = Url::parse(base).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;
    let joined = base
        .join(href)
        .map_err(|err| FetchError::InvalidUrl(err.to_string()))?;
    Ok(joined.to_string())
}

/// Ranking weeks are grouped into one directory per year, keyed by the
/// leading `YYYY` of the week token.
fn week_year(token: &str) -> &str {
    token.get(..4).unwrap_or(token)
}

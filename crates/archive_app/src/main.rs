//! Batch entry point: harvest the ATP results and rankings archives into
//! per-period CSV files, as configured by a RON file.

mod config;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info};

use archive_engine::{
    CancellationToken, FetchCounter, FetchSettings, HistoryBuilder, ReqwestFetcher,
};

use crate::config::{AppConfig, Mode};

fn main() -> ExitCode {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "archive.ron".to_string());
    let config = match AppConfig::load(Path::new(&config_path)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{config_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    archive_logging::initialize(config.log.into(), Path::new("harvest.log"));

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("cannot start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(run(config))
}

async fn run(config: AppConfig) -> ExitCode {
    let counter = FetchCounter::new();
    let fetcher = match ReqwestFetcher::new(FetchSettings::default(), counter.clone()) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            error!("cannot build fetcher: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Ctrl-C requests a clean stop; the run summary is still written.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let builder = HistoryBuilder::new(Arc::new(fetcher), counter).with_cancellation(cancel);
    let history = config.history_config();

    let mut failed = false;
    if matches!(config.mode, Mode::Matches | Mode::Both) {
        match builder
            .build_matches_history(&config.matches_url, &history)
            .await
        {
            Ok(summary) => info!("matches history: {}", summary.render().trim_end()),
            Err(err) => {
                error!("matches history failed: {err}");
                failed = true;
            }
        }
    }
    if matches!(config.mode, Mode::Rankings | Mode::Both) {
        match builder
            .build_rankings_history(&config.rankings_url, &history)
            .await
        {
            Ok(summary) => info!("rankings history: {}", summary.render().trim_end()),
            Err(err) => {
                error!("rankings history failed: {err}");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

use scraper::{Html, Selector};
use thiserror::Error;

use archive_core::{Period, PeriodDecision, PeriodFilter};

use crate::fetch::{FetchError, Fetcher};

/// Which archive listing is being enumerated, and how its sub-pages are
/// addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    /// Yearly tournament results, `?year=<token>`.
    Years,
    /// Weekly singles rankings, `?rankDate=<token>&rankRange=0-<depth>`.
    RankingWeeks { depth: u32 },
}

impl PeriodKind {
    fn list_selector(&self) -> &'static str {
        match self {
            PeriodKind::Years => "ul[data-value=\"year\"]",
            PeriodKind::RankingWeeks { .. } => "ul[data-value=\"rankDate\"]",
        }
    }

    /// The year dropdown carries styled placeholder entries ("all years")
    /// that are not real periods.
    fn skips_styled_entries(&self) -> bool {
        matches!(self, PeriodKind::Years)
    }

    fn sub_page_url(&self, listing_url: &str, token: &str) -> String {
        match self {
            PeriodKind::Years => format!("{listing_url}?year={token}"),
            PeriodKind::RankingWeeks { depth } => {
                format!("{listing_url}?rankDate={token}&rankRange=0-{depth}")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum PeriodParseError {
    #[error("period list not found in listing page")]
    ListMissing,
}

#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] PeriodParseError),
}

/// Forward-only sequence of accepted periods, in source document order.
/// The listing page is fetched exactly once, up front; bounds and limit are
/// applied lazily while iterating.
#[derive(Debug)]
pub struct Periods {
    tokens: std::vec::IntoIter<String>,
    filter: PeriodFilter,
    listing_url: String,
    kind: PeriodKind,
    done: bool,
}

impl Iterator for Periods {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        if self.done {
            return None;
        }
        loop {
            let token = self.tokens.next()?;
            match self.filter.check(&token) {
                PeriodDecision::Accept => {
                    let listing_url = self.kind.sub_page_url(&self.listing_url, &token);
                    return Some(Period { token, listing_url });
                }
                PeriodDecision::Skip => {
                    log::debug!("period {token} out of bounds, skipped");
                }
                PeriodDecision::Stop => {
                    log::info!("period limit reached at {token}");
                    self.done = true;
                    return None;
                }
            }
        }
    }
}

/// Fetch the archive listing once and enumerate its periods through
/// `filter`. A listing without the expected dropdown structure is fatal:
/// nothing below it can be addressed.
pub async fn enumerate_periods(
    fetcher: &dyn Fetcher,
    listing_url: &str,
    kind: PeriodKind,
    filter: PeriodFilter,
) -> Result<Periods, EnumerateError> {
    let page = fetcher.fetch(listing_url).await?;
    let tokens = parse_period_tokens(&page.html, kind)?;
    log::debug!("listing {listing_url}: {} period tokens", tokens.len());
    Ok(Periods {
        tokens: tokens.into_iter(),
        filter,
        listing_url: listing_url.to_string(),
        kind,
        done: false,
    })
}

fn parse_period_tokens(html: &str, kind: PeriodKind) -> Result<Vec<String>, PeriodParseError> {
    let doc = Html::parse_document(html);
    let list_sel =
        Selector::parse(kind.list_selector()).map_err(|_| PeriodParseError::ListMissing)?;
    let item_sel =
        Selector::parse("li[data-value]").map_err(|_| PeriodParseError::ListMissing)?;

    let list = doc
        .select(&list_sel)
        .next()
        .ok_or(PeriodParseError::ListMissing)?;

    let mut tokens = Vec::new();
    for item in list.select(&item_sel) {
        if kind.skips_styled_entries() && item.value().attr("style").is_some() {
            continue;
        }
        if let Some(token) = item.value().attr("data-value") {
            let token = token.trim();
            if !token.is_empty() {
                tokens.push(token.to_string());
            }
        }
    }
    Ok(tokens)
}

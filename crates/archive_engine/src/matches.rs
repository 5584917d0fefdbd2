use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

use archive_core::{normalize_ws, MatchRecord, Tourney};

use crate::fetch::FetchedPage;

#[derive(Debug, Error)]
pub enum RecordParseError {
    #[error("row missing field `{0}`")]
    MissingField(&'static str),
}

/// Forward-only sequence of match results for one tournament, in document
/// order. Rows that fail field extraction yield an `Err` and do not abort
/// the tournament.
#[derive(Debug)]
pub struct MatchRows(std::vec::IntoIter<Result<MatchRecord, RecordParseError>>);

impl Iterator for MatchRows {
    type Item = Result<MatchRecord, RecordParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

/// Extract the match results of a tournament detail page, merging the
/// tournament metadata into every record.
///
/// The day table interleaves section headers (round names) with row bodies;
/// each `thead` updates the current round label, applied to every row until
/// the next header. Optional stats links are resolved absolute against the
/// page URL.
pub fn extract_match_records(page: &FetchedPage, tourney: &Tourney) -> MatchRows {
    let doc = Html::parse_document(&page.html);
    let base_url = Url::parse(&page.url).ok();

    let sel = match selectors() {
        Some(sel) => sel,
        None => return MatchRows(Vec::new().into_iter()),
    };
    let table = match doc.select(&sel.table).next() {
        Some(table) => table,
        None => {
            log::warn!("day table not found for {}", tourney.name);
            return MatchRows(Vec::new().into_iter());
        }
    };

    let mut records = Vec::new();
    let mut round: Option<String> = None;

    // Walk the table's direct children in document order so round headers
    // apply to exactly the rows that follow them.
    for section in table.children().filter_map(ElementRef::wrap) {
        match section.value().name() {
            "thead" => {
                round = section
                    .select(&sel.header)
                    .next()
                    .map(|th| normalize_ws(&th.text().collect::<String>()))
                    .filter(|t| !t.is_empty());
            }
            "tbody" => {
                for row in section.select(&sel.row) {
                    records.push(parse_row(row, &sel, tourney, round.as_deref(), &base_url));
                }
            }
            _ => {}
        }
    }
    MatchRows(records.into_iter())
}

struct MatchSelectors {
    table: Selector,
    header: Selector,
    row: Selector,
    name: Selector,
    score: Selector,
    anchor: Selector,
}

fn selectors() -> Option<MatchSelectors> {
    Some(MatchSelectors {
        table: Selector::parse("table.day-table").ok()?,
        header: Selector::parse("tr th").ok()?,
        row: Selector::parse("tr").ok()?,
        name: Selector::parse("td.day-table-name").ok()?,
        score: Selector::parse("td.day-table-score").ok()?,
        anchor: Selector::parse("a").ok()?,
    })
}

fn parse_row(
    row: ElementRef<'_>,
    sel: &MatchSelectors,
    tourney: &Tourney,
    round: Option<&str>,
    base_url: &Option<Url>,
) -> Result<MatchRecord, RecordParseError> {
    let round = round.ok_or(RecordParseError::MissingField("round"))?;

    let mut names = row.select(&sel.name);
    let winner = anchor_text(names.next(), sel).ok_or(RecordParseError::MissingField("winner"))?;
    let loser = anchor_text(names.next(), sel).ok_or(RecordParseError::MissingField("loser"))?;

    let score_anchor = row
        .select(&sel.score)
        .next()
        .and_then(|td| td.select(&sel.anchor).next())
        .ok_or(RecordParseError::MissingField("score"))?;
    let score = normalize_ws(&score_anchor.text().collect::<String>());

    // Walkovers have a score cell without a stats link.
    let stats_url = score_anchor
        .value()
        .attr("href")
        .and_then(|href| resolve(base_url, href));

    Ok(MatchRecord {
        tourney: tourney.clone(),
        round: round.to_string(),
        winner,
        loser,
        score,
        stats_url,
    })
}

fn anchor_text(cell: Option<ElementRef<'_>>, sel: &MatchSelectors) -> Option<String> {
    cell.and_then(|td| td.select(&sel.anchor).next())
        .map(|a| normalize_ws(&a.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

fn resolve(base_url: &Option<Url>, href: &str) -> Option<String> {
    match base_url {
        Some(base) => base.join(href).ok().map(|url| url.to_string()),
        None => Some(href.to_string()),
    }
}

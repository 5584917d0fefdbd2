use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use archive_core::{normalize_ws, Tourney};

#[derive(Debug, Error)]
pub enum GroupParseError {
    #[error("tournament row missing field `{0}`")]
    MissingField(&'static str),
    #[error("unparseable tournament date `{0}`")]
    BadDate(String),
}

/// Raw cell texts of one listing row, before validation. Collected eagerly
/// so the sequence owns its data; validation and the future-date cutoff run
/// lazily per row.
#[derive(Debug, Default)]
struct RawTourneyRow {
    date: Option<String>,
    name: Option<String>,
    location: Option<String>,
    surface: Option<String>,
    indoor_outdoor: Option<String>,
    results_url: Option<String>,
}

/// Forward-only sequence of tournaments in document order.
///
/// The source lists a year newest-first with future events at the top once
/// the current year is reached, so the first row dated on or after `today`
/// ends the whole period: everything past it is not-yet-played. A row that
/// fails structural validation yields an `Err` for that row only.
#[derive(Debug)]
pub struct TourneyRows {
    rows: std::vec::IntoIter<RawTourneyRow>,
    today: NaiveDate,
    stopped: bool,
}

impl Iterator for TourneyRows {
    type Item = Result<Tourney, GroupParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped {
            return None;
        }
        let raw = self.rows.next()?;

        let date_text = match raw.date {
            Some(text) if !text.is_empty() => text,
            _ => return Some(Err(GroupParseError::MissingField("start_date"))),
        };
        let start_date = match NaiveDate::parse_from_str(&date_text, "%Y.%m.%d") {
            Ok(date) => date,
            Err(_) => return Some(Err(GroupParseError::BadDate(date_text))),
        };
        if start_date >= self.today {
            log::debug!("stopping at future tournament dated {date_text}");
            self.stopped = true;
            return None;
        }

        let tourney = (|| {
            Ok(Tourney {
                name: require(raw.name, "name")?,
                location: require(raw.location, "location")?,
                start_date,
                surface: require(raw.surface, "surface")?,
                indoor_outdoor: require(raw.indoor_outdoor, "indoor_outdoor")?,
                results_url: require(raw.results_url, "results_url")?,
            })
        })();
        Some(tourney)
    }
}

fn require(field: Option<String>, name: &'static str) -> Result<String, GroupParseError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(GroupParseError::MissingField(name)),
    }
}

/// Extract the tournaments of one yearly listing page.
///
/// A page without the results table yields an empty sequence: the period
/// degrades to an empty output file instead of taking the run down.
pub fn extract_tourneys(html: &str, today: NaiveDate) -> TourneyRows {
    let doc = Html::parse_document(html);
    let rows = match selectors() {
        Some(sel) => match doc.select(&sel.table).next() {
            Some(table) => table.select(&sel.row).map(|row| raw_row(row, &sel)).collect(),
            None => {
                log::warn!("results table not found in listing page");
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    TourneyRows {
        rows: rows.into_iter(),
        today,
        stopped: false,
    }
}

struct RowSelectors {
    table: Selector,
    row: Selector,
    dates: Selector,
    title: Selector,
    location: Selector,
    details: Selector,
    inner: Selector,
    surface: Selector,
    link: Selector,
}

fn selectors() -> Option<RowSelectors> {
    Some(RowSelectors {
        table: Selector::parse("table.results-archive-table").ok()?,
        row: Selector::parse("tr.tourney-result").ok()?,
        dates: Selector::parse("span.tourney-dates").ok()?,
        title: Selector::parse("span.tourney-title").ok()?,
        location: Selector::parse("span.tourney-location").ok()?,
        details: Selector::parse("td.tourney-details").ok()?,
        inner: Selector::parse("div div").ok()?,
        surface: Selector::parse("span").ok()?,
        link: Selector::parse("a.button-border").ok()?,
    })
}

fn raw_row(row: ElementRef<'_>, sel: &RowSelectors) -> RawTourneyRow {
    let mut raw = RawTourneyRow {
        date: first_text(row, &sel.dates),
        name: first_text(row, &sel.title),
        location: first_text(row, &sel.location),
        results_url: row
            .select(&sel.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string),
        ..RawTourneyRow::default()
    };

    // Surface and the indoor/outdoor flag live in the cell following the
    // first details cell: a nested div whose leading text node is the flag
    // and whose span is the surface.
    if let Some(details) = row.select(&sel.details).next() {
        let next_td = details
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "td");
        if let Some(cell) = next_td {
            if let Some(inner) = cell.select(&sel.inner).next() {
                raw.indoor_outdoor = inner.children().find_map(|node| {
                    node.value()
                        .as_text()
                        .map(|t| normalize_ws(t))
                        .filter(|t| !t.is_empty())
                });
                raw.surface = inner
                    .select(&sel.surface)
                    .next()
                    .map(|span| normalize_ws(&span.text().collect::<String>()))
                    .filter(|t| !t.is_empty());
            }
        }
    }
    raw
}

fn first_text(row: ElementRef<'_>, sel: &Selector) -> Option<String> {
    row.select(sel)
        .next()
        .map(|el| normalize_ws(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

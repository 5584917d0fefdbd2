use scraper::{ElementRef, Html, Selector};

use archive_core::{normalize_ws, RankedPlayer};

use crate::matches::RecordParseError;

/// Forward-only sequence of ranked players for one week, in table order.
/// Malformed rows yield an `Err` and do not abort the week.
#[derive(Debug)]
pub struct RankingRows(std::vec::IntoIter<Result<RankedPlayer, RecordParseError>>);

impl Iterator for RankingRows {
    type Item = Result<RankedPlayer, RecordParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

/// Extract the ranked players of one weekly rankings page.
pub fn extract_ranked_players(html: &str) -> RankingRows {
    let doc = Html::parse_document(html);
    let sel = match selectors() {
        Some(sel) => sel,
        None => return RankingRows(Vec::new().into_iter()),
    };

    let rows: Vec<_> = doc
        .select(&sel.row)
        .map(|row| parse_row(row, &sel))
        .collect();
    if rows.is_empty() {
        log::warn!("no ranking rows found in page");
    }
    RankingRows(rows.into_iter())
}

struct RankingSelectors {
    row: Selector,
    name: Selector,
    rank: Selector,
    age: Selector,
    points: Selector,
    anchor: Selector,
}

fn selectors() -> Option<RankingSelectors> {
    Some(RankingSelectors {
        row: Selector::parse("tbody tr").ok()?,
        name: Selector::parse("td.player-cell").ok()?,
        rank: Selector::parse("td.rank-cell").ok()?,
        age: Selector::parse("td.age-cell").ok()?,
        points: Selector::parse("td.points-cell").ok()?,
        anchor: Selector::parse("a").ok()?,
    })
}

fn parse_row(
    row: ElementRef<'_>,
    sel: &RankingSelectors,
) -> Result<RankedPlayer, RecordParseError> {
    let name = anchor_text(row, &sel.name, &sel.anchor)
        .ok_or(RecordParseError::MissingField("name"))?;
    let ranking =
        cell_text(row, &sel.rank).ok_or(RecordParseError::MissingField("ranking"))?;
    let age = cell_text(row, &sel.age).ok_or(RecordParseError::MissingField("age"))?;
    let points = anchor_text(row, &sel.points, &sel.anchor)
        .ok_or(RecordParseError::MissingField("points"))?;

    Ok(RankedPlayer {
        name,
        ranking,
        age,
        points,
    })
}

fn cell_text(row: ElementRef<'_>, sel: &Selector) -> Option<String> {
    row.select(sel)
        .next()
        .map(|td| normalize_ws(&td.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

fn anchor_text(row: ElementRef<'_>, cell: &Selector, anchor: &Selector) -> Option<String> {
    row.select(cell)
        .next()
        .and_then(|td| td.select(anchor).next())
        .map(|a| normalize_ws(&a.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

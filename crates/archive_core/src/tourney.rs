use chrono::NaiveDate;

/// One tournament row from a yearly results listing.
///
/// Invariant: `start_date` is strictly in the past relative to the run date.
/// The group extractor never yields a future-dated tournament.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tourney {
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub surface: String,
    pub indoor_outdoor: String,
    /// Relative href of the tournament's results page, as listed.
    pub results_url: String,
}

impl Tourney {
    /// Start date in the source's own notation (`YYYY.MM.DD`), used for the
    /// CSV output so files match what the site displays.
    pub fn start_date_token(&self) -> String {
        self.start_date.format("%Y.%m.%d").to_string()
    }
}

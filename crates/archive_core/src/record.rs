use crate::tourney::Tourney;

/// Column order of the per-year match results files.
pub const MATCH_COLUMNS: [&str; 11] = [
    "name",
    "winner",
    "surface",
    "round",
    "loser",
    "indoor_outdoor",
    "score",
    "location",
    "stats_url",
    "results_url",
    "start_date",
];

/// Column order of the per-week ranking files.
pub const RANKING_COLUMNS: [&str; 4] = ["name", "ranking", "age", "points"];

/// One match result, merged with the metadata of its enclosing tournament.
/// Either fully populated or never emitted; the extractor drops rows with
/// missing required fields instead of producing partial records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub tourney: Tourney,
    /// Round label inherited from the preceding section header.
    pub round: String,
    pub winner: String,
    pub loser: String,
    pub score: String,
    /// Absolute link to detailed match stats; absent for walkovers.
    pub stats_url: Option<String>,
}

impl MatchRecord {
    /// Field values in [`MATCH_COLUMNS`] order.
    pub fn csv_row(&self) -> [String; 11] {
        [
            self.tourney.name.clone(),
            self.winner.clone(),
            self.tourney.surface.clone(),
            self.round.clone(),
            self.loser.clone(),
            self.tourney.indoor_outdoor.clone(),
            self.score.clone(),
            self.tourney.location.clone(),
            self.stats_url.clone().unwrap_or_default(),
            self.tourney.results_url.clone(),
            self.tourney.start_date_token(),
        ]
    }
}

/// One row of a weekly singles ranking table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPlayer {
    pub name: String,
    pub ranking: String,
    pub age: String,
    pub points: String,
}

impl RankedPlayer {
    /// Field values in [`RANKING_COLUMNS`] order.
    pub fn csv_row(&self) -> [String; 4] {
        [
            self.name.clone(),
            self.ranking.clone(),
            self.age.clone(),
            self.points.clone(),
        ]
    }
}

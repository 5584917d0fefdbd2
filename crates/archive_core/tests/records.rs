use archive_core::{
    normalize_ws, MatchRecord, RankedPlayer, RunSummary, Tourney, MATCH_COLUMNS, RANKING_COLUMNS,
};
use chrono::NaiveDate;

fn sample_tourney() -> Tourney {
    Tourney {
        name: "Brisbane International".to_string(),
        location: "Brisbane, Australia".to_string(),
        start_date: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
        surface: "Hard".to_string(),
        indoor_outdoor: "Outdoor".to_string(),
        results_url: "/en/scores/archive/brisbane/339/2017/results".to_string(),
    }
}

#[test]
fn normalize_ws_trims_and_collapses() {
    assert_eq!(normalize_ws("  Roger\n   Federer "), "Roger Federer");
    assert_eq!(normalize_ws("\t\n "), "");
    assert_eq!(normalize_ws("one"), "one");
}

#[test]
fn match_row_follows_column_order() {
    let record = MatchRecord {
        tourney: sample_tourney(),
        round: "Finals".to_string(),
        winner: "G. Dimitrov".to_string(),
        loser: "K. Nishikori".to_string(),
        score: "62 26 63".to_string(),
        stats_url: None,
    };

    let row = record.csv_row();
    assert_eq!(row.len(), MATCH_COLUMNS.len());
    assert_eq!(row[0], "Brisbane International");
    assert_eq!(row[1], "G. Dimitrov");
    assert_eq!(row[2], "Hard");
    assert_eq!(row[3], "Finals");
    assert_eq!(row[4], "K. Nishikori");
    assert_eq!(row[5], "Outdoor");
    assert_eq!(row[6], "62 26 63");
    assert_eq!(row[7], "Brisbane, Australia");
    // Walkover-style record: no stats link, empty cell.
    assert_eq!(row[8], "");
    assert_eq!(row[9], "/en/scores/archive/brisbane/339/2017/results");
    assert_eq!(row[10], "2017.01.01");
}

#[test]
fn ranking_row_follows_column_order() {
    let player = RankedPlayer {
        name: "Rafael Nadal".to_string(),
        ranking: "1".to_string(),
        age: "31".to_string(),
        points: "10,645".to_string(),
    };
    assert_eq!(player.csv_row(), ["Rafael Nadal", "1", "31", "10,645"]);
    assert_eq!(RANKING_COLUMNS, ["name", "ranking", "age", "points"]);
}

#[test]
fn summary_renders_counts_on_one_line() {
    let summary = RunSummary::new(42, 3);
    let line = summary.render();
    assert!(line.ends_with('\n'));
    assert!(line.contains("42 get requests"));
    assert!(line.contains("3 periods processed"));
}

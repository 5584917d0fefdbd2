use archive_core::{PeriodBounds, PeriodFilter};
use archive_engine::{
    enumerate_periods, extract_match_records, extract_ranked_players, extract_tourneys,
    EnumerateError, FetchError, FetchedPage, Fetcher, GroupParseError, PeriodKind,
    RecordParseError,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

/// Serves one canned page for every URL, like a frozen copy of the site.
struct StubFetcher {
    html: String,
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        Ok(FetchedPage {
            url: url.to_string(),
            html: self.html.clone(),
        })
    }
}

const YEAR_LISTING: &str = r#"<html><body>
  <div class="dropdown-wrapper">
    <ul data-value="year">
      <li data-value="all" style="display: none;">All years</li>
      <li data-value="2018">2018</li>
      <li data-value="2017">2017</li>
      <li data-value="2016">2016</li>
    </ul>
  </div>
</body></html>"#;

const WEEK_LISTING: &str = r#"<html><body>
  <ul data-value="rankDate">
    <li data-value="2017-08-28">2017.08.28</li>
    <li data-value="2017-08-21">2017.08.21</li>
  </ul>
</body></html>"#;

fn filter(start: Option<&str>, stop: Option<&str>, limit: Option<u32>) -> PeriodFilter {
    PeriodFilter::new(
        PeriodBounds::new(start.map(String::from), stop.map(String::from)),
        limit,
    )
}

#[tokio::test]
async fn year_enumeration_applies_bounds_and_skips_placeholders() {
    let fetcher = StubFetcher {
        html: YEAR_LISTING.to_string(),
    };
    let periods: Vec<_> = enumerate_periods(
        &fetcher,
        "http://test.local/en/scores/results-archive",
        PeriodKind::Years,
        filter(Some("2016"), Some("2017"), None),
    )
    .await
    .expect("listing parses")
    .collect();

    let tokens: Vec<_> = periods.iter().map(|p| p.token.as_str()).collect();
    // The styled "all" placeholder is not a period; 2018 is out of bounds.
    assert_eq!(tokens, ["2017", "2016"]);
    assert_eq!(
        periods[0].listing_url,
        "http://test.local/en/scores/results-archive?year=2017"
    );
}

#[tokio::test]
async fn week_enumeration_addresses_rank_range() {
    let fetcher = StubFetcher {
        html: WEEK_LISTING.to_string(),
    };
    let periods: Vec<_> = enumerate_periods(
        &fetcher,
        "http://test.local/en/rankings/singles",
        PeriodKind::RankingWeeks { depth: 25 },
        filter(None, None, Some(1)),
    )
    .await
    .expect("listing parses")
    .collect();

    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].token, "2017-08-28");
    assert_eq!(
        periods[0].listing_url,
        "http://test.local/en/rankings/singles?rankDate=2017-08-28&rankRange=0-25"
    );
}

#[tokio::test]
async fn missing_period_list_is_fatal() {
    let fetcher = StubFetcher {
        html: "<html><body><p>maintenance</p></body></html>".to_string(),
    };
    let err = enumerate_periods(
        &fetcher,
        "http://test.local/archive",
        PeriodKind::Years,
        filter(None, None, None),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EnumerateError::Parse(_)));
}

fn tourney_row(dates: &str, title: &str, href: &str) -> String {
    format!(
        r#"<tr class="tourney-result">
  <td class="title-content">
    {title}
    <span class="tourney-location"> Brisbane,
      Australia </span>
    <span class="tourney-dates">{dates}</span>
  </td>
  <td class="tourney-details"><div class="icon-stub"></div></td>
  <td>
    <div class="cell-wrapper"><div>
      Outdoor
      <span>Hard</span>
    </div></div>
  </td>
  <td class="tourney-details">
    <a class="button-border" href="{href}">Results</a>
  </td>
</tr>"#
    )
}

fn year_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table class="results-archive-table mega-table"><tbody>{}</tbody></table></body></html>"#,
        rows.join("\n")
    )
}

#[test]
fn tourneys_stop_at_first_future_date() {
    let today = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap();
    let rows = vec![
        tourney_row(
            "2017.01.01",
            r#"<span class="tourney-title"> Brisbane  International </span>"#,
            "/en/scores/archive/brisbane/339/2017/results",
        ),
        // No title span at all: structurally broken row.
        tourney_row("2017.02.06", "", "/en/scores/archive/broken/0/2017/results"),
        tourney_row(
            "2017.02.27",
            r#"<span class="tourney-title">Dubai Duty Free Championships</span>"#,
            "/en/scores/archive/dubai/495/2017/results",
        ),
        // First row on or after `today` ends the period.
        tourney_row(
            "2017.10.02",
            r#"<span class="tourney-title">Future Open</span>"#,
            "/en/scores/archive/future/1/2017/results",
        ),
        tourney_row(
            "2017.03.06",
            r#"<span class="tourney-title">Never Reached</span>"#,
            "/en/scores/archive/never/2/2017/results",
        ),
    ];

    let mut tourneys = extract_tourneys(&year_page(&rows), today);

    let first = tourneys.next().unwrap().expect("valid row");
    assert_eq!(first.name, "Brisbane International");
    assert_eq!(first.location, "Brisbane, Australia");
    assert_eq!(first.surface, "Hard");
    assert_eq!(first.indoor_outdoor, "Outdoor");
    assert_eq!(first.start_date, NaiveDate::from_ymd_opt(2017, 1, 1).unwrap());
    assert_eq!(
        first.results_url,
        "/en/scores/archive/brisbane/339/2017/results"
    );

    let second = tourneys.next().unwrap();
    assert!(matches!(second, Err(GroupParseError::MissingField("name"))));

    let third = tourneys.next().unwrap().expect("valid row");
    assert_eq!(third.name, "Dubai Duty Free Championships");

    // Future row stops the whole period; the row behind it is unreachable.
    assert!(tourneys.next().is_none());
    assert!(tourneys.next().is_none());
}

#[test]
fn page_without_results_table_yields_nothing() {
    let today = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap();
    let mut tourneys = extract_tourneys("<html><body></body></html>", today);
    assert!(tourneys.next().is_none());
}

fn sample_tourney() -> archive_core::Tourney {
    archive_core::Tourney {
        name: "Brisbane International".to_string(),
        location: "Brisbane, Australia".to_string(),
        start_date: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
        surface: "Hard".to_string(),
        indoor_outdoor: "Outdoor".to_string(),
        results_url: "/en/scores/archive/brisbane/339/2017/results".to_string(),
    }
}

const DAY_TABLE: &str = r#"<html><body><table class="day-table">
<thead><tr><th>Finals</th></tr></thead>
<tbody>
  <tr>
    <td class="day-table-name"><a href="/en/players/a">G. Dimitrov</a></td>
    <td class="day-table-name"><a href="/en/players/b">K. Nishikori</a></td>
    <td class="day-table-score"><a href="/en/match-stats/1">62
      26 63</a></td>
  </tr>
</tbody>
<thead><tr><th>Semi-Finals</th></tr></thead>
<tbody>
  <tr>
    <td class="day-table-name"><a href="/en/players/a">G. Dimitrov</a></td>
    <td class="day-table-name"><a href="/en/players/c">M. Raonic</a></td>
    <td class="day-table-score"><a href="/en/match-stats/2">76(7) 62</a></td>
  </tr>
  <tr>
    <td class="day-table-name"></td>
    <td class="day-table-name"><a href="/en/players/d">S. Wawrinka</a></td>
    <td class="day-table-score"><a href="/en/match-stats/3">64 64</a></td>
  </tr>
  <tr>
    <td class="day-table-name"><a href="/en/players/b">K. Nishikori</a></td>
    <td class="day-table-name"><a href="/en/players/e">J. Thompson</a></td>
    <td class="day-table-score"><a>W/O</a></td>
  </tr>
</tbody>
</table></body></html>"#;

#[test]
fn match_rows_inherit_round_labels_and_drop_broken_rows() {
    let page = FetchedPage {
        url: "http://test.local/en/scores/archive/brisbane/339/2017/results".to_string(),
        html: DAY_TABLE.to_string(),
    };
    let tourney = sample_tourney();

    let rows: Vec<_> = extract_match_records(&page, &tourney).collect();
    assert_eq!(rows.len(), 4);

    let finals = rows[0].as_ref().expect("valid row");
    assert_eq!(finals.round, "Finals");
    assert_eq!(finals.winner, "G. Dimitrov");
    assert_eq!(finals.loser, "K. Nishikori");
    assert_eq!(finals.score, "62 26 63");
    assert_eq!(
        finals.stats_url.as_deref(),
        Some("http://test.local/en/match-stats/1")
    );
    assert_eq!(finals.tourney, tourney);

    let semi = rows[1].as_ref().expect("valid row");
    assert_eq!(semi.round, "Semi-Finals");
    assert_eq!(semi.loser, "M. Raonic");

    // Row with an empty winner cell drops, the rest of the group survives.
    assert!(matches!(
        rows[2],
        Err(RecordParseError::MissingField("winner"))
    ));

    // Walkover: score anchor without an href.
    let walkover = rows[3].as_ref().expect("valid row");
    assert_eq!(walkover.round, "Semi-Finals");
    assert_eq!(walkover.score, "W/O");
    assert_eq!(walkover.stats_url, None);
}

#[test]
fn rows_before_any_round_header_are_dropped() {
    let html = r#"<html><body><table class="day-table">
<tbody>
  <tr>
    <td class="day-table-name"><a>A</a></td>
    <td class="day-table-name"><a>B</a></td>
    <td class="day-table-score"><a>60 60</a></td>
  </tr>
</tbody>
</table></body></html>"#;
    let page = FetchedPage {
        url: "http://test.local/x".to_string(),
        html: html.to_string(),
    };
    let rows: Vec<_> = extract_match_records(&page, &sample_tourney()).collect();
    assert_eq!(rows.len(), 1);
    assert!(matches!(
        rows[0],
        Err(RecordParseError::MissingField("round"))
    ));
}

const RANKING_TABLE: &str = r#"<html><body><table class="mega-table"><tbody>
  <tr>
    <td class="rank-cell">1</td>
    <td class="player-cell"><a href="/en/players/rafael-nadal"> Rafael
      Nadal </a></td>
    <td class="age-cell"> 31 </td>
    <td class="points-cell"><a href="/en/players/rafael-nadal/rankings">10,645</a></td>
  </tr>
  <tr>
    <td class="rank-cell">2</td>
    <td class="player-cell"><a href="/en/players/roger-federer">Roger Federer</a></td>
    <td class="age-cell">36</td>
    <td class="points-cell"></td>
  </tr>
  <tr>
    <td class="rank-cell">3</td>
    <td class="player-cell"><a href="/en/players/andy-murray">Andy Murray</a></td>
    <td class="age-cell">30</td>
    <td class="points-cell"><a href="/en/players/andy-murray/rankings">6,790</a></td>
  </tr>
</tbody></table></body></html>"#;

#[test]
fn ranking_rows_normalize_fields_and_drop_broken_rows() {
    let rows: Vec<_> = extract_ranked_players(RANKING_TABLE).collect();
    assert_eq!(rows.len(), 3);

    let first = rows[0].as_ref().expect("valid row");
    assert_eq!(first.name, "Rafael Nadal");
    assert_eq!(first.ranking, "1");
    assert_eq!(first.age, "31");
    assert_eq!(first.points, "10,645");

    assert!(matches!(
        rows[1],
        Err(RecordParseError::MissingField("points"))
    ));

    let third = rows[2].as_ref().expect("valid row");
    assert_eq!(third.name, "Andy Murray");
}

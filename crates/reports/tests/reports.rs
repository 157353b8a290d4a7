use std::collections::HashSet;
use std::fs;
use std::path::Path;

use ipl_charts::ChartBody;
use ipl_core::{ErrorKind, Record, Result};
use ipl_reports::{build_chart, deliveries, matches, umpires, AnalysisConfig, Datasets, ReportId};
use ipl_runtime::{CsvFileSource, MetricsRegistry, RecordSource};
use ipl_views::{Order, RankConfig};

const MATCHES: &str = "\
id,season,city,team1,team2,winner
1,2015,Mumbai,Mumbai Indians,Chennai Super Kings,Chennai Super Kings
2,2015,Chennai,Chennai Super Kings,Royal Challengers Bangalore,Royal Challengers Bangalore
3,2016,Bangalore,Royal Challengers Bangalore,Mumbai Indians,
4,2016,Mumbai,Mumbai Indians,Chennai Super Kings,Mumbai Indians
";

const DELIVERIES: &str = "\
match_id,batting_team,bowling_team,batsman,bowler,\
wide_runs,noball_runs,batsman_runs,extra_runs,total_runs
1,Mumbai Indians,Chennai Super Kings,RG Sharma,R Ashwin,0,0,4,0,4
1,Mumbai Indians,Chennai Super Kings,RG Sharma,R Ashwin,1,0,0,1,1
2,Royal Challengers Bangalore,Chennai Super Kings,V Kohli,DJ Bravo,0,0,6,0,6
2,Royal Challengers Bangalore,Chennai Super Kings,AB de Villiers,DJ Bravo,0,1,2,1,3
3,Royal Challengers Bangalore,Mumbai Indians,V Kohli,JJ Bumrah,0,0,1,0,1
3,Royal Challengers Bangalore,Mumbai Indians,CH Gayle,JJ Bumrah,0,0,4,2,6
4,Chennai Super Kings,Mumbai Indians,MS Dhoni,JJ Bumrah,0,1,0,1,1
";

/// Runs `csv` through the file source, as a real dataset would be read.
fn parse(csv: &str) -> Vec<Result<Record>> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.csv");
    fs::write(&path, csv).unwrap();
    let records: Vec<_> = CsvFileSource::new(&path).records().unwrap().collect();
    records
}

fn write_dataset(dir: &Path) -> AnalysisConfig {
    fs::write(dir.join("matches.csv"), MATCHES).unwrap();
    fs::write(dir.join("deliveries.csv"), DELIVERIES).unwrap();
    let umpires = "umpire,country\nAleem Dar,Pakistan\nS Ravi,India\n";
    fs::write(dir.join("umpires.csv"), umpires).unwrap();
    AnalysisConfig {
        matches: dir.join("matches.csv"),
        deliveries: dir.join("deliveries.csv"),
        umpires: dir.join("umpires.csv"),
        output_dir: dir.join("out"),
        ..AnalysisConfig::default()
    }
}

#[test]
fn team_runs_follow_encounter_order() {
    let runs = deliveries::team_runs(parse(DELIVERIES)).unwrap();
    let entries = runs.into_entries();
    assert_eq!(
        entries,
        vec![
            ("Mumbai Indians".to_string(), 5),
            ("Royal Challengers Bangalore".to_string(), 16),
            ("Chennai Super Kings".to_string(), 1),
        ]
    );
}

#[test]
fn top_batsmen_are_limited_to_one_team() {
    let rank = RankConfig { order: Order::Descending, limit: 2 };
    let team = "Royal Challengers Bangalore";
    let top = deliveries::top_batsmen(parse(DELIVERIES), team, rank).unwrap();
    assert_eq!(top, vec![("V Kohli".to_string(), 7), ("CH Gayle".to_string(), 4)]);
}

#[test]
fn extras_only_count_the_chosen_season() {
    let ids = matches::match_ids_for_season(parse(MATCHES), 2016).unwrap();
    assert_eq!(ids.len(), 2);
    let extras = deliveries::extra_runs(parse(DELIVERIES), &ids).unwrap();
    assert_eq!(extras.into_entries(), vec![("Mumbai Indians".to_string(), 3)]);
}

#[test]
fn economy_skips_illegal_balls_and_light_workloads() {
    let ids = matches::match_ids_for_season(parse(MATCHES), 2015).unwrap();
    let figures = deliveries::bowling_figures(parse(DELIVERIES), &ids).unwrap();
    let ashwin = figures.get(&"R Ashwin".to_string()).unwrap();
    assert_eq!((ashwin.numerator, ashwin.denominator), (5, 1));

    // Bravo bowled one legal ball for 9 runs: 9 / (1/6) = 54.
    let all = deliveries::economical_bowlers(parse(DELIVERIES), &ids, 0, 10).unwrap();
    assert_eq!(all, vec![("R Ashwin".to_string(), 30.0), ("DJ Bravo".to_string(), 54.0)]);

    let none = deliveries::economical_bowlers(parse(DELIVERIES), &ids, 12, 10).unwrap();
    assert!(none.is_empty());
}

#[test]
fn economy_of_eighteen_balls_for_twenty_runs() {
    let mut rows = String::from("match_id,bowler,wide_runs,noball_runs,total_runs\n");
    for ball in 0..18 {
        let runs = if ball < 2 { 2 } else { 1 };
        rows.push_str(&format!("9,Z Khan,0,0,{runs}\n"));
    }
    let ids: HashSet<String> = ["9".to_string()].into_iter().collect();
    let top = deliveries::economical_bowlers(parse(&rows), &ids, 12, 10).unwrap();
    assert_eq!(top, vec![("Z Khan".to_string(), 6.67)]);
}

#[test]
fn matches_played_counts_both_sides() {
    let played = matches::matches_played(parse(MATCHES)).unwrap();
    assert_eq!(played.total(), 8);
    assert_eq!(played.value_or_default(&2015, &"Chennai Super Kings".to_string()), 2);
    assert_eq!(played.value_or_default(&2015, &"Mumbai Indians".to_string()), 1);
    assert_eq!(played.value_or_default(&2016, &"Royal Challengers Bangalore".to_string()), 1);
    assert_eq!(played.outer_keys_sorted(), vec![2015, 2016]);
}

#[test]
fn padded_team_names_match_across_reports() {
    let rows = "id,season,team1,team2,winner\n1,2015,A , B, B\n";
    let played = matches::matches_played(parse(rows)).unwrap();
    let won = matches::matches_won(parse(rows)).unwrap();
    assert_eq!(played.inner_keys_sorted(), vec!["A", "B"]);
    assert_eq!(won.inner_keys_sorted(), vec!["B"]);
    assert_eq!(played.value_or_default(&2015, &"B".to_string()), 1);
}

#[test]
fn quoted_fixture_fields_keep_their_commas() {
    let rows = "umpire,country\n\"Dar, Aleem\",Pakistan\n";
    let counts = umpires::foreign_umpires(parse(rows), "India").unwrap();
    assert_eq!(counts.into_entries(), vec![("Pakistan".to_string(), 1)]);
}

#[test]
fn matches_won_skips_no_results() {
    let won = matches::matches_won(parse(MATCHES)).unwrap();
    assert_eq!(won.total(), 3);
    assert_eq!(won.value_or_default(&2016, &"Mumbai Indians".to_string()), 1);

    let chart = matches::stacked_chart("t", "x", "y", &won);
    match chart.body {
        ChartBody::Stacked { categories, series } => {
            assert_eq!(categories, vec!["2015", "2016"]);
            let labels: Vec<_> = series.iter().map(|s| s.label.as_str()).collect();
            assert_eq!(
                labels,
                vec!["Chennai Super Kings", "Mumbai Indians", "Royal Challengers Bangalore"]
            );
            assert_eq!(series[1].values, vec![0.0, 1.0]);
        }
        other => panic!("expected stacked chart, got {other:?}"),
    }
}

#[test]
fn matches_per_season_chart_is_sorted() {
    let counts = matches::matches_per_season(parse(MATCHES)).unwrap();
    let chart = matches::matches_per_season_chart(&counts);
    match chart.body {
        ChartBody::Bars { bars, .. } => {
            let labels: Vec<_> = bars.iter().map(|b| (b.label.as_str(), b.value)).collect();
            assert_eq!(labels, vec![("2015", 2.0), ("2016", 2.0)]);
        }
        other => panic!("expected bars, got {other:?}"),
    }
}

#[test]
fn umpires_exclude_home_country_and_blanks() {
    let rows = "umpire,country\n\
        Aleem Dar,Pakistan\n\
        S Ravi,india\n\
        ,England\n\
        SJ Davis,\n\
        Marais Erasmus,South Africa\n\
        RE Koertzen,South Africa\n";
    let counts = umpires::foreign_umpires(parse(rows), "India").unwrap();
    assert_eq!(
        counts.into_entries(),
        vec![("Pakistan".to_string(), 1), ("South Africa".to_string(), 2)]
    );
}

#[test]
fn all_home_umpires_is_an_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_dataset(dir.path());
    fs::write(&cfg.umpires, "umpire,country\nS Ravi,India\nAnil Chaudhary,India\n").unwrap();

    let data = Datasets::from_config(&cfg, MetricsRegistry::default());
    let err = build_chart(ReportId::UmpireCountries, &cfg, &data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert!(err.to_string().contains("no foreign umpire"));
}

#[test]
fn every_report_builds_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = write_dataset(dir.path());
    cfg.economy_season = 2015;
    cfg.min_legal_balls = 1;
    let metrics = MetricsRegistry::default();
    let data = Datasets::from_config(&cfg, metrics.clone());

    for id in ReportId::ALL {
        let chart = build_chart(id, &cfg, &data).unwrap();
        assert!(!chart.is_empty(), "{id} produced an empty chart");
    }
    assert!(metrics.snapshot().records_read > 0);
}

#[test]
fn fragment_directories_match_single_files() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_dataset(dir.path());

    let sliced = dir.path().join("sliced_matches");
    fs::create_dir_all(&sliced).unwrap();
    let mut lines = MATCHES.lines();
    let header = lines.next().unwrap();
    for (i, line) in lines.enumerate() {
        fs::write(sliced.join(format!("match{i}.csv")), format!("{header}\n{line}\n")).unwrap();
    }
    let sliced_cfg = AnalysisConfig { matches: sliced, ..cfg.clone() };

    let from_file = build_chart(
        ReportId::MatchesPlayed,
        &cfg,
        &Datasets::from_config(&cfg, MetricsRegistry::default()),
    )
    .unwrap();
    let from_dir = build_chart(
        ReportId::MatchesPlayed,
        &sliced_cfg,
        &Datasets::from_config(&sliced_cfg, MetricsRegistry::default()),
    )
    .unwrap();
    assert_eq!(from_file, from_dir);
}

#[test]
fn non_numeric_runs_are_reported() {
    let rows = "match_id,batting_team,total_runs\n1,Mumbai Indians,four\n";
    let err = deliveries::team_runs(parse(rows)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Value);
}

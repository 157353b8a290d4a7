//! Reports over ball-by-ball delivery records.

use std::collections::HashSet;

use ipl_charts::{Bar, ChartBody, ChartSpec};
use ipl_core::deliveries::{
    is_legal, BALLS_PER_OVER, BATSMAN, BATSMAN_RUNS, BATTING_TEAM, BOWLER, BOWLING_TEAM, EXTRA_RUNS,
    MATCH_ID, TOTAL_RUNS,
};
use ipl_core::{Record, Result, Season};
use ipl_views::{accumulate, rank, ratio, select_all, Grouped, Order, RankConfig, RatioPair};

use crate::colors::{ORANGE, SKY_BLUE};

fn text_of(record: &Record, field: &str) -> Result<String> {
    Ok(record.text(field)?.trim().to_string())
}

fn in_matches(record: &Record, match_ids: &HashSet<String>) -> Result<bool> {
    Ok(match_ids.contains(record.text(MATCH_ID)?.trim()))
}

/// Total runs (including extras) scored by each batting side.
pub fn team_runs<I>(deliveries: I) -> Result<Grouped<String, i64>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    accumulate(
        deliveries,
        select_all,
        |d: &Record| text_of(d, BATTING_TEAM),
        |d: &Record| d.int(TOTAL_RUNS),
    )
}

pub fn team_runs_chart(runs: &Grouped<String, i64>) -> ChartSpec {
    ChartSpec {
        title: "Total Runs Scored by Teams".to_string(),
        x_label: "Team".to_string(),
        y_label: "Runs".to_string(),
        body: ChartBody::Bars {
            bars: runs.iter().map(|(team, r)| Bar::new(team.as_str(), *r as f64)).collect(),
            color: Some(SKY_BLUE.to_string()),
        },
    }
}

/// Leading run scorers for one batting side, highest first.
pub fn top_batsmen<I>(deliveries: I, team: &str, cfg: RankConfig) -> Result<Vec<(String, i64)>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    let runs = accumulate(
        deliveries,
        |d: &Record| Ok(d.text(BATTING_TEAM)?.trim() == team),
        |d: &Record| text_of(d, BATSMAN),
        |d: &Record| d.int(BATSMAN_RUNS),
    )?;
    cfg.apply(&runs)
}

pub fn top_batsmen_chart(team: &str, top: &[(String, i64)]) -> ChartSpec {
    ChartSpec {
        title: format!("Top {} Run Scorers for {} (All Seasons)", top.len(), team),
        x_label: "Batsman".to_string(),
        y_label: "Runs".to_string(),
        body: ChartBody::Bars {
            bars: top.iter().map(|(name, r)| Bar::new(name.as_str(), *r as f64)).collect(),
            color: Some(SKY_BLUE.to_string()),
        },
    }
}

/// Extras conceded by each bowling side across the given matches.
pub fn extra_runs<I>(deliveries: I, match_ids: &HashSet<String>) -> Result<Grouped<String, i64>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    accumulate(
        deliveries,
        |d: &Record| in_matches(d, match_ids),
        |d: &Record| text_of(d, BOWLING_TEAM),
        |d: &Record| d.int(EXTRA_RUNS),
    )
}

pub fn extra_runs_chart(season: Season, extras: &Grouped<String, i64>) -> ChartSpec {
    ChartSpec {
        title: format!("Extra Runs Conceded per Team (IPL {season})"),
        x_label: "Teams".to_string(),
        y_label: "Extra Runs".to_string(),
        body: ChartBody::Bars {
            bars: extras.iter().map(|(team, r)| Bar::new(team.as_str(), *r as f64)).collect(),
            color: Some(ORANGE.to_string()),
        },
    }
}

/// Runs conceded and legal balls bowled per bowler across the given matches.
pub fn bowling_figures<I>(
    deliveries: I,
    match_ids: &HashSet<String>,
) -> Result<Grouped<String, RatioPair>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    accumulate(
        deliveries,
        |d: &Record| in_matches(d, match_ids),
        |d: &Record| text_of(d, BOWLER),
        |d: &Record| Ok(RatioPair::new(d.int(TOTAL_RUNS)?, i64::from(is_legal(d)?))),
    )
}

/// Economy rate (runs per six legal balls, two decimals) of bowlers with at
/// least `min_legal_balls` legal deliveries, best first.
pub fn economical_bowlers<I>(
    deliveries: I,
    match_ids: &HashSet<String>,
    min_legal_balls: i64,
    limit: i64,
) -> Result<Vec<(String, f64)>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    let mut figures = bowling_figures(deliveries, match_ids)?;
    figures.retain(|_, f| f.denominator >= min_legal_balls);
    let (runs, balls) = figures.split();
    let overs = balls.map_values(|b| *b as f64 / BALLS_PER_OVER as f64);
    rank(&ratio(&runs, &overs, 2), Order::Ascending, limit)
}

pub fn economical_bowlers_chart(
    season: Season,
    min_legal_balls: i64,
    top: &[(String, f64)],
) -> ChartSpec {
    ChartSpec {
        title: format!(
            "Top {} Economical Bowlers in IPL {season} (Min {min_legal_balls} Balls)",
            top.len()
        ),
        x_label: "Bowler".to_string(),
        y_label: "Economy Rate".to_string(),
        body: ChartBody::Bars {
            bars: top.iter().map(|(name, e)| Bar::new(name.as_str(), *e)).collect(),
            color: Some(ORANGE.to_string()),
        },
    }
}

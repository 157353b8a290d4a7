//! Reports over match records.

use std::collections::HashSet;

use ipl_charts::{Bar, ChartBody, ChartSpec, Series};
use ipl_core::matches::{season, teams, winner, ID};
use ipl_core::{Record, Result, Season};
use ipl_views::{accumulate, count_one, partition, select_all, Grouped, Partitioned};

use crate::colors::VIOLET;

pub type SeasonTeamCounts = Partitioned<Season, String, u64>;

/// Ids of every match played in `target`.
pub fn match_ids_for_season<I>(matches: I, target: Season) -> Result<HashSet<String>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    let ids = accumulate(
        matches,
        |m: &Record| Ok(season(m)? == target),
        |m: &Record| Ok(m.text(ID)?.trim().to_string()),
        count_one,
    )?;
    Ok(ids.keys().cloned().collect())
}

pub fn matches_per_season<I>(matches: I) -> Result<Grouped<Season, u64>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    accumulate(matches, select_all, season, count_one)
}

pub fn matches_per_season_chart(counts: &Grouped<Season, u64>) -> ChartSpec {
    ChartSpec {
        title: "Total Matches Played Per Season".to_string(),
        x_label: "Season".to_string(),
        y_label: "Matches".to_string(),
        body: ChartBody::Bars {
            bars: counts
                .sorted_by_key()
                .into_iter()
                .map(|(s, n)| Bar::new(s.to_string(), n as f64))
                .collect(),
            color: Some(VIOLET.to_string()),
        },
    }
}

/// Wins per team per season. Matches without a winner are skipped.
pub fn matches_won<I>(matches: I) -> Result<SeasonTeamCounts>
where
    I: IntoIterator<Item = Result<Record>>,
{
    partition(
        matches,
        |m: &Record| Ok(winner(m)?.is_some()),
        season,
        |m: &Record| Ok(winner(m)?.unwrap_or_default()),
        count_one,
    )
}

/// One side's participation in one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appearance {
    pub season: Season,
    pub team: String,
}

/// Expands each match into one appearance for `team1` and one for `team2`.
pub fn appearances<I>(matches: I) -> impl Iterator<Item = Result<Appearance>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    matches.into_iter().flat_map(|m| {
        let sides = m.and_then(|m| Ok((season(&m)?, teams(&m)?)));
        match sides {
            Ok((season, [team1, team2])) => vec![
                Ok(Appearance { season, team: team1 }),
                Ok(Appearance { season, team: team2 }),
            ],
            Err(e) => vec![Err(e)],
        }
    })
}

/// Matches played per team per season, counting both sides of every match.
pub fn matches_played<I>(matches: I) -> Result<SeasonTeamCounts>
where
    I: IntoIterator<Item = Result<Record>>,
{
    partition(
        appearances(matches),
        select_all,
        |a: &Appearance| Ok(a.season),
        |a: &Appearance| Ok(a.team.clone()),
        count_one,
    )
}

pub fn stacked_chart(
    title: &str,
    x_label: &str,
    y_label: &str,
    counts: &SeasonTeamCounts,
) -> ChartSpec {
    let seasons = counts.outer_keys_sorted();
    let series = counts
        .inner_keys_sorted()
        .into_iter()
        .map(|team| Series {
            values: seasons
                .iter()
                .map(|s| counts.value_or_default(s, &team) as f64)
                .collect(),
            label: team,
            color: None,
        })
        .collect();
    ChartSpec {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        body: ChartBody::Stacked {
            categories: seasons.iter().map(ToString::to_string).collect(),
            series,
        },
    }
}

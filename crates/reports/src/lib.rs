//! League reports: each one reads a dataset, aggregates it and describes the
//! chart to draw.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use ipl_charts::{ChartSpec, ChartStyle};
use ipl_core::umpires::HOME_COUNTRY;
use ipl_core::{CoreError, Result, Season};
use ipl_runtime::{open_source, MetricsRegistry, Records, SourceSpec};
use ipl_views::{Order, RankConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

mod colors;
pub mod deliveries;
pub mod matches;
pub mod umpires;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportId {
    TeamRuns,
    TopBatsmen,
    ExtraRuns,
    EconomicalBowlers,
    MatchesPerSeason,
    MatchesWon,
    MatchesPlayed,
    UmpireCountries,
}

impl ReportId {
    pub const ALL: [ReportId; 8] = [
        ReportId::TeamRuns,
        ReportId::TopBatsmen,
        ReportId::ExtraRuns,
        ReportId::EconomicalBowlers,
        ReportId::MatchesPerSeason,
        ReportId::MatchesWon,
        ReportId::MatchesPlayed,
        ReportId::UmpireCountries,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportId::TeamRuns => "team-runs",
            ReportId::TopBatsmen => "top-batsmen",
            ReportId::ExtraRuns => "extra-runs",
            ReportId::EconomicalBowlers => "economical-bowlers",
            ReportId::MatchesPerSeason => "matches-per-season",
            ReportId::MatchesWon => "matches-won",
            ReportId::MatchesPlayed => "matches-played",
            ReportId::UmpireCountries => "umpire-countries",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ReportId::TeamRuns => "total runs scored by each team",
            ReportId::TopBatsmen => "top run scorers for one team across all seasons",
            ReportId::ExtraRuns => "extra runs conceded per team in one season",
            ReportId::EconomicalBowlers => "most economical bowlers in one season",
            ReportId::MatchesPerSeason => "number of matches played per season",
            ReportId::MatchesWon => "matches won by each team per season (stacked)",
            ReportId::MatchesPlayed => "matches played by each team per season (stacked)",
            ReportId::UmpireCountries => "umpires per country, excluding the home country",
        }
    }

    pub fn output_file(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.svg", self.as_str()))
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ReportId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown report `{s}`"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Match records: a CSV file or a directory of per-season fragments.
    pub matches: PathBuf,
    /// Delivery records: a CSV file or a directory of per-match fragments.
    pub deliveries: PathBuf,
    pub umpires: PathBuf,
    pub output_dir: PathBuf,
    pub extras_season: Season,
    pub economy_season: Season,
    pub min_legal_balls: i64,
    pub top_n: i64,
    pub batting_team: String,
    pub home_country: String,
    pub style: ChartStyle,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            matches: PathBuf::from("data/matches.csv"),
            deliveries: PathBuf::from("data/deliveries.csv"),
            umpires: PathBuf::from("data/umpire_countries.csv"),
            output_dir: PathBuf::from("plotting-images"),
            extras_season: 2016,
            economy_season: 2015,
            min_legal_balls: 12,
            top_n: 10,
            batting_team: "Royal Challengers Bangalore".to_string(),
            home_country: HOME_COUNTRY.to_string(),
            style: ChartStyle::default(),
        }
    }
}

impl AnalysisConfig {
    /// Reads a JSON config; fields left out keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// The record sources one run reads from.
pub struct Datasets {
    pub matches: SourceSpec,
    pub deliveries: SourceSpec,
    pub umpires: SourceSpec,
    metrics: MetricsRegistry,
}

impl Datasets {
    pub fn from_config(cfg: &AnalysisConfig, metrics: MetricsRegistry) -> Self {
        Self {
            matches: SourceSpec::detect(&cfg.matches),
            deliveries: SourceSpec::detect(&cfg.deliveries),
            umpires: SourceSpec::detect(&cfg.umpires),
            metrics,
        }
    }

    fn read(&self, spec: &SourceSpec) -> Result<Records> {
        let source = open_source(spec, &self.metrics);
        debug!(source = %source.describe(), "reading records");
        source.records()
    }
}

/// Runs one report end to end, short of drawing it.
///
/// An aggregate with no keys comes back as [`CoreError::EmptyResult`].
pub fn build_chart(id: ReportId, cfg: &AnalysisConfig, data: &Datasets) -> Result<ChartSpec> {
    let spec = match id {
        ReportId::TeamRuns => {
            let runs = deliveries::team_runs(data.read(&data.deliveries)?)?;
            deliveries::team_runs_chart(&runs)
        }
        ReportId::TopBatsmen => {
            let rank = RankConfig { order: Order::Descending, limit: cfg.top_n };
            let records = data.read(&data.deliveries)?;
            let top = deliveries::top_batsmen(records, &cfg.batting_team, rank)?;
            deliveries::top_batsmen_chart(&cfg.batting_team, &top)
        }
        ReportId::ExtraRuns => {
            let ids = matches::match_ids_for_season(data.read(&data.matches)?, cfg.extras_season)?;
            let extras = deliveries::extra_runs(data.read(&data.deliveries)?, &ids)?;
            deliveries::extra_runs_chart(cfg.extras_season, &extras)
        }
        ReportId::EconomicalBowlers => {
            let ids = matches::match_ids_for_season(data.read(&data.matches)?, cfg.economy_season)?;
            let top = deliveries::economical_bowlers(
                data.read(&data.deliveries)?,
                &ids,
                cfg.min_legal_balls,
                cfg.top_n,
            )?;
            deliveries::economical_bowlers_chart(cfg.economy_season, cfg.min_legal_balls, &top)
        }
        ReportId::MatchesPerSeason => {
            let counts = matches::matches_per_season(data.read(&data.matches)?)?;
            matches::matches_per_season_chart(&counts)
        }
        ReportId::MatchesWon => {
            let won = matches::matches_won(data.read(&data.matches)?)?;
            matches::stacked_chart(
                "Matches Won by IPL Teams per Season",
                "Seasons",
                "Matches Won",
                &won,
            )
        }
        ReportId::MatchesPlayed => {
            let played = matches::matches_played(data.read(&data.matches)?)?;
            matches::stacked_chart(
                "Number of Matches Played by Each Team (By Season)",
                "Season",
                "Matches Played",
                &played,
            )
        }
        ReportId::UmpireCountries => {
            let counts = umpires::foreign_umpires(data.read(&data.umpires)?, &cfg.home_country)?;
            info!(countries = counts.len(), "foreign umpire countries");
            for (country, n) in counts.iter() {
                debug!(%country, umpires = n, "umpire country");
            }
            umpires::foreign_umpires_chart(&cfg.home_country, &counts)
        }
    };

    if spec.is_empty() {
        return Err(CoreError::EmptyResult(empty_notice(id, cfg)));
    }
    Ok(spec)
}

fn empty_notice(id: ReportId, cfg: &AnalysisConfig) -> String {
    match id {
        ReportId::UmpireCountries => "no foreign umpire data available to plot".to_string(),
        ReportId::TopBatsmen => format!("no deliveries found for {}", cfg.batting_team),
        ReportId::ExtraRuns => format!("no deliveries found for season {}", cfg.extras_season),
        ReportId::EconomicalBowlers => format!(
            "no bowler reached {} legal balls in season {}",
            cfg.min_legal_balls, cfg.economy_season
        ),
        other => format!("{other} produced no data"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_ids_round_trip_through_names() {
        for id in ReportId::ALL {
            assert_eq!(id.as_str().parse::<ReportId>().unwrap(), id);
        }
        assert!("wagon-wheel".parse::<ReportId>().is_err());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let raw = r##"{ "top_n": 5, "style": { "width": 800, "bar_color": "#123456" } }"##;
        let cfg: AnalysisConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.style.width, 800);
        assert_eq!(cfg.style.height, ChartStyle::default().height);
        assert_eq!(cfg.style.bar_color.as_deref(), Some("#123456"));
        assert_eq!(cfg.economy_season, 2015);
        assert_eq!(cfg.home_country, "India");
    }

    #[test]
    fn output_files_are_named_after_reports() {
        let path = ReportId::MatchesWon.output_file(Path::new("out"));
        assert_eq!(path, Path::new("out/matches-won.svg"));
    }
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use ipl_charts::ChartSpec;
use ipl_core::ErrorKind;
use ipl_reports::{build_chart, AnalysisConfig, Datasets, ReportId};
use ipl_runtime::slicer::{slice_csv, SliceConfig};
use ipl_runtime::{init_tracing, MetricsRegistry, RunTimer};

#[derive(Parser)]
#[command(name = "ipl_plots", version, about = "Charts from IPL match and delivery records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build one report (or `all`) and write it as SVG
    Plot {
        /// Report id, or `all`
        #[arg(value_parser = parse_target)]
        report: Target,
        /// Match records: CSV file or directory of fragments
        #[arg(long, value_name = "PATH")]
        matches: Option<PathBuf>,
        /// Delivery records: CSV file or directory of fragments
        #[arg(long, value_name = "PATH")]
        deliveries: Option<PathBuf>,
        #[arg(long, value_name = "PATH")]
        umpires: Option<PathBuf>,
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// JSON file with analysis settings
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        #[arg(long)]
        top_n: Option<i64>,
        /// Also print the chart data as JSON on stdout
        #[arg(long)]
        json: bool,
    },
    /// Split a CSV file into one fragment per value of a column
    Slice {
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        #[arg(long)]
        column: String,
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// List the available reports
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    All,
    One(ReportId),
}

impl Target {
    fn reports(self) -> Vec<ReportId> {
        match self {
            Target::All => ReportId::ALL.to_vec(),
            Target::One(id) => vec![id],
        }
    }
}

fn parse_target(s: &str) -> Result<Target, String> {
    if s == "all" {
        return Ok(Target::All);
    }
    s.parse().map(Target::One)
}

struct Overrides {
    matches: Option<PathBuf>,
    deliveries: Option<PathBuf>,
    umpires: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    top_n: Option<i64>,
}

fn load_config(path: Option<&PathBuf>, overrides: Overrides) -> Result<AnalysisConfig> {
    let mut cfg = match path {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(p) = overrides.matches {
        cfg.matches = p;
    }
    if let Some(p) = overrides.deliveries {
        cfg.deliveries = p;
    }
    if let Some(p) = overrides.umpires {
        cfg.umpires = p;
    }
    if let Some(p) = overrides.output_dir {
        cfg.output_dir = p;
    }
    if let Some(n) = overrides.top_n {
        cfg.top_n = n;
    }
    Ok(cfg)
}

/// Build and draw each report. Reports with nothing to plot are skipped
/// with a notice; any other failure stops the run.
fn plot(
    reports: &[ReportId],
    cfg: &AnalysisConfig,
    json: bool,
    metrics: &MetricsRegistry,
) -> Result<Vec<PathBuf>> {
    let data = Datasets::from_config(cfg, metrics.clone());
    let mut written = Vec::with_capacity(reports.len());
    for &id in reports {
        let spec = match build_chart(id, cfg, &data) {
            Ok(spec) => spec,
            Err(e) if e.kind() == ErrorKind::EmptyResult => {
                warn!(report = %id, "{e}");
                metrics.inc_reports_skipped(1);
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("building report {id}")),
        };
        if json {
            println!("{}", chart_json(&spec)?);
        }
        let path = id.output_file(&cfg.output_dir);
        ipl_charts::render(&spec, &path, &cfg.style)
            .with_context(|| format!("drawing report {id}"))?;
        metrics.inc_reports_rendered(1);
        info!(report = %id, path = %path.display(), "chart written");
        written.push(path);
    }
    Ok(written)
}

/// The chart data printed for `--json`: one compact JSON object per report.
fn chart_json(spec: &ChartSpec) -> Result<String> {
    serde_json::to_string(spec).context("serializing chart data")
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let metrics = MetricsRegistry::default();
    let timer = RunTimer::start();

    let label = match cli.command {
        Command::Plot { report, matches, deliveries, umpires, output_dir, config, top_n, json } => {
            let overrides = Overrides { matches, deliveries, umpires, output_dir, top_n };
            let cfg = load_config(config.as_ref(), overrides)?;
            info!(output_dir = %cfg.output_dir.display(), "ipl_plots starting");
            plot(&report.reports(), &cfg, json, &metrics)?;
            "plot"
        }
        Command::Slice { input, column, out_dir, prefix } => {
            let cfg = SliceConfig { column, out_dir, prefix };
            let fragments = slice_csv(&input, &cfg, &metrics)
                .with_context(|| format!("slicing {}", input.display()))?;
            info!(fragments = fragments.len(), out_dir = %cfg.out_dir.display(), "slice complete");
            "slice"
        }
        Command::List => {
            for id in ReportId::ALL {
                println!("{:<20} {}", id.as_str(), id.describe());
            }
            "list"
        }
    };

    info!("{}", metrics.snapshot().to_json_line(label, Some(timer.elapsed())));
    Ok(())
}

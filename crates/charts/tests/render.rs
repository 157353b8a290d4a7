use std::fs;

use ipl_charts::{render, Bar, ChartBody, ChartError, ChartSpec, ChartStyle, Series};

fn bars(values: &[(&str, f64)]) -> ChartSpec {
    ChartSpec {
        title: "Total Runs Scored by Teams".to_string(),
        x_label: "Team".to_string(),
        y_label: "Runs".to_string(),
        body: ChartBody::Bars {
            bars: values.iter().map(|(l, v)| Bar::new(*l, *v)).collect(),
            color: Some("#FFA500".to_string()),
        },
    }
}

#[test]
fn writes_bar_chart_svg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plots/team-runs.svg");
    let spec = bars(&[("Mumbai Indians", 120.0), ("Chennai Super Kings", 95.0)]);

    render(&spec, &path, &ChartStyle::default()).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Total Runs Scored by Teams"));
}

#[test]
fn configured_bar_color_replaces_chart_color() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("team-runs.svg");
    let spec = bars(&[("Mumbai Indians", 120.0)]);
    let style = ChartStyle { bar_color: Some("#123456".to_string()), ..ChartStyle::default() };

    render(&spec, &path, &style).unwrap();

    let svg = fs::read_to_string(&path).unwrap().to_ascii_uppercase();
    assert!(svg.contains("#123456"));
    assert!(!svg.contains("#FFA500"));
}

#[test]
fn chart_color_is_used_without_configured_color() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("extra-runs.svg");

    render(&bars(&[("Mumbai Indians", 12.0)]), &path, &ChartStyle::default()).unwrap();

    let svg = fs::read_to_string(&path).unwrap().to_ascii_uppercase();
    assert!(svg.contains("#FFA500"));
}

#[test]
fn writes_stacked_chart_svg_with_legend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("matches-won.svg");
    let spec = ChartSpec {
        title: "Matches Won by IPL Teams per Season".to_string(),
        x_label: "Seasons".to_string(),
        y_label: "Matches Won".to_string(),
        body: ChartBody::Stacked {
            categories: vec!["2008".to_string(), "2009".to_string()],
            series: vec![
                Series { label: "Mumbai Indians".to_string(), values: vec![7.0, 5.0], color: None },
                Series { label: "Expansion XI".to_string(), values: vec![0.0, 3.0], color: None },
            ],
        },
    };

    render(&spec, &path, &ChartStyle::default()).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("Expansion XI"));
}

#[test]
fn empty_chart_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.svg");
    let err = render(&bars(&[]), &path, &ChartStyle::default()).unwrap_err();
    assert!(matches!(err, ChartError::Empty(_)));
    assert!(!path.exists());
}

//! Chart model and SVG rendering for report output.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod palette;
mod render;

pub use render::render;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value }
    }
}

/// One layer of a stacked chart; `values[i]` belongs to `categories[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartBody {
    Bars { bars: Vec<Bar>, color: Option<String> },
    Stacked { categories: Vec<String>, series: Vec<Series> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: ChartBody,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        match &self.body {
            ChartBody::Bars { bars, .. } => bars.is_empty(),
            ChartBody::Stacked { categories, series } => categories.is_empty() || series.is_empty(),
        }
    }

    /// Height of the tallest column (bar, or stack of series).
    pub fn max_value(&self) -> f64 {
        match &self.body {
            ChartBody::Bars { bars, .. } => bars.iter().map(|b| b.value).fold(0.0, f64::max),
            ChartBody::Stacked { categories, series } => (0..categories.len())
                .map(|i| series.iter().filter_map(|s| s.values.get(i)).sum::<f64>())
                .fold(0.0, f64::max),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    /// `#RRGGBB` fill for every plain bar chart. Unset, each report keeps its
    /// own colour.
    pub bar_color: Option<String>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 720,
            font_family: "sans-serif".to_string(),
            bar_color: None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    #[error("nothing to draw for chart {0:?}")]
    Empty(String),
    #[error("failed to draw {}: {message}", path.display())]
    Draw { path: PathBuf, message: String },
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

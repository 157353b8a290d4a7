use std::fmt::Display;
use std::fs;
use std::path::Path;

use plotters::prelude::*;
use tracing::debug;

use crate::palette::{fallback_color, parse_hex, team_color};
use crate::{Bar, ChartBody, ChartError, ChartSpec, ChartStyle, Series};

const BAR_MARGIN: u32 = 6;

/// Draw `spec` as an SVG at `path`, creating parent directories as needed.
pub fn render(spec: &ChartSpec, path: &Path, style: &ChartStyle) -> Result<(), ChartError> {
    if spec.is_empty() {
        return Err(ChartError::Empty(spec.title.clone()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ChartError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let fail = |e: &dyn Display| ChartError::Draw {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| fail(&e))?;

    let labels: Vec<String> = match &spec.body {
        ChartBody::Bars { bars, .. } => bars.iter().map(|b| b.label.clone()).collect(),
        ChartBody::Stacked { categories, .. } => categories.clone(),
    };
    let columns = labels.len();
    let y_max = (spec.max_value() * 1.1).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, (style.font_family.as_str(), 24))
        .margin(20)
        .x_label_area_size(160)
        .y_label_area_size(70)
        .build_cartesian_2d((0..columns).into_segmented(), 0f64..y_max)
        .map_err(|e| fail(&e))?;

    let label_for = |x: &SegmentValue<usize>| match x {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(columns)
        .x_label_formatter(&label_for)
        .x_label_style(
            (style.font_family.as_str(), 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()
        .map_err(|e| fail(&e))?;

    match &spec.body {
        ChartBody::Bars { bars, color } => {
            let fill = style
                .bar_color
                .as_deref()
                .and_then(parse_hex)
                .or_else(|| color.as_deref().and_then(parse_hex))
                .unwrap_or_else(|| fallback_color(0));
            chart
                .draw_series(bar_rects(bars, fill))
                .map_err(|e| fail(&e))?;
        }
        ChartBody::Stacked { series, .. } => {
            let mut bottoms = vec![0f64; columns];
            for (idx, layer) in series.iter().enumerate() {
                let fill = layer_color(layer, idx);
                let rects = stacked_rects(layer, &mut bottoms, fill);
                chart
                    .draw_series(rects)
                    .map_err(|e| fail(&e))?
                    .label(layer.label.clone())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], fill.filled())
                    });
            }
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.85))
                .border_style(&BLACK)
                .label_font((style.font_family.as_str(), 12))
                .draw()
                .map_err(|e| fail(&e))?;
        }
    }

    root.present().map_err(|e| fail(&e))?;
    debug!(path = %path.display(), columns, "rendered chart");
    Ok(())
}

fn layer_color(layer: &Series, idx: usize) -> RGBColor {
    layer
        .color
        .as_deref()
        .or_else(|| team_color(&layer.label))
        .and_then(parse_hex)
        .unwrap_or_else(|| fallback_color(idx))
}

fn bar_rects(bars: &[Bar], fill: RGBColor) -> Vec<Rectangle<(SegmentValue<usize>, f64)>> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), bar.value)],
                fill.filled(),
            );
            rect.set_margin(0, 0, BAR_MARGIN, BAR_MARGIN);
            rect
        })
        .collect()
}

/// Rectangles for one layer, raising `bottoms` by the layer's values.
fn stacked_rects(
    layer: &Series,
    bottoms: &mut [f64],
    fill: RGBColor,
) -> Vec<Rectangle<(SegmentValue<usize>, f64)>> {
    let mut rects = Vec::with_capacity(bottoms.len());
    for (i, bottom) in bottoms.iter_mut().enumerate() {
        let value = layer.values.get(i).copied().unwrap_or(0.0);
        if value <= 0.0 {
            continue;
        }
        let base = *bottom;
        *bottom += value;
        let mut rect = Rectangle::new(
            [(SegmentValue::Exact(i), base), (SegmentValue::Exact(i + 1), *bottom)],
            fill.filled(),
        );
        rect.set_margin(0, 0, BAR_MARGIN, BAR_MARGIN);
        rects.push(rect);
    }
    rects
}

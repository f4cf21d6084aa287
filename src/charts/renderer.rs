//! Static Chart Renderer
//! Writes the chart currently on screen to a PNG file with plotters.
//!
//! Layout:
//! 1. Title centered above the plot
//! 2. Grouped vertical bars (impact, recovery) or horizontal ratio bars
//! 3. Legend in the upper right for grouped charts

use crate::charts::plotter::ChartPlotter;
use crate::charts::view::{
    format_thousands, ChartView, DashboardView, GroupedBarChart, RatioChart, RatioView,
};
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Default export size in pixels
pub const EXPORT_SIZE: (u32, u32) = (1600, 1000);

// Same order as the interactive palette
const SERIES_COLORS: [RGBColor; 6] = [
    RGBColor(99, 110, 250),
    RGBColor(239, 85, 59),
    RGBColor(0, 204, 150),
    RGBColor(171, 99, 250),
    RGBColor(255, 161, 90),
    RGBColor(25, 211, 243),
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot write export to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Nothing to export: {0}")]
    Empty(&'static str),
}

fn draw_err<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Draw(e.to_string())
}

/// Drawable part of a view.
enum Target<'a> {
    Grouped(&'a GroupedBarChart),
    Ratio(&'a RatioChart),
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Output file for `view` inside `dir`.
    pub fn export_path(view: &DashboardView, dir: &Path) -> PathBuf {
        dir.join(format!("{}.png", view.indicator.slug()))
    }

    /// Render `view` to `<dir>/<indicator>.png` and return the file path.
    pub fn export(
        view: &DashboardView,
        dir: &Path,
        size: (u32, u32),
    ) -> Result<PathBuf, ExportError> {
        let target = match &view.chart {
            ChartView::EconomicImpact(chart) | ChartView::RecoveryNeeds(chart) => {
                Target::Grouped(chart)
            }
            ChartView::LossRatio(RatioView::Chart(chart)) => Target::Ratio(chart),
            ChartView::LossRatio(RatioView::NoData { message }) => {
                return Err(ExportError::Empty(message))
            }
        };

        fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = Self::export_path(view, dir);
        match target {
            Target::Grouped(chart) => Self::draw_grouped(&path, chart, size)?,
            Target::Ratio(chart) => Self::draw_ratio(&path, chart, size)?,
        }

        info!(path = %path.display(), "exported chart");
        Ok(path)
    }

    fn series_color(index: usize) -> RGBColor {
        SERIES_COLORS[index % SERIES_COLORS.len()]
    }

    fn draw_grouped(
        path: &Path,
        chart: &GroupedBarChart,
        size: (u32, u32),
    ) -> Result<(), ExportError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let n = chart.categories.len().max(1);
        let (lo, hi) = chart.value_range();
        let top = if hi > 0.0 { hi * 1.1 } else { 1.0 };
        let bottom = if lo < 0.0 { lo * 1.1 } else { 0.0 };
        let labels = chart.categories.clone();

        let mut ctx = ChartBuilder::on(&root)
            .caption(chart.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(160)
            .y_label_area_size(100)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), bottom..top)
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x: &f64| ChartPlotter::category_label(&labels, *x))
            .x_label_style(
                ("sans-serif", 14)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_label_formatter(&|y: &f64| format_thousands(*y))
            .y_desc(chart.y_label)
            .draw()
            .map_err(draw_err)?;

        let series_count = chart.series.len();
        for (s, series) in chart.series.iter().enumerate() {
            let (offset, width) = ChartPlotter::cluster_offset(s, series_count);
            let color = Self::series_color(s);

            ctx.draw_series(series.values.iter().enumerate().filter_map(|(i, value)| {
                let value = (*value)?;
                let x0 = i as f64 + offset - width / 2.0;
                Some(Rectangle::new([(x0, 0.0), (x0 + width, value)], color.filled()))
            }))
            .map_err(draw_err)?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_ratio(path: &Path, chart: &RatioChart, size: (u32, u32)) -> Result<(), ExportError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let n = chart.bars.len().max(1);
        let max = chart.bars.iter().map(|b| b.ratio).fold(0.0, f64::max);
        let min = chart.bars.iter().map(|b| b.ratio).fold(0.0, f64::min);
        let right = (max * 1.15).max(0.5);
        let labels: Vec<String> = chart.bars.iter().map(|b| b.sector.clone()).collect();

        let mut ctx = ChartBuilder::on(&root)
            .caption(chart.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(260)
            .build_cartesian_2d(min..right, -0.5f64..(n as f64 - 0.5))
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&|y: &f64| ChartPlotter::category_label(&labels, *y))
            .x_desc(chart.axis_label)
            .draw()
            .map_err(draw_err)?;

        let color = Self::series_color(0);
        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            let y = i as f64;
            Rectangle::new([(0.0, y - 0.35), (bar.ratio, y + 0.35)], color.filled())
        }))
        .map_err(draw_err)?;

        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            Text::new(
                format!(" {}", bar.label),
                (bar.ratio, i as f64 + 0.15),
                ("sans-serif", 16).into_font(),
            )
        }))
        .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

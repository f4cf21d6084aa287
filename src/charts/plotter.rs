//! Chart Plotter Module
//! Draws the dashboard charts interactively using egui_plot.

use crate::charts::view::{format_thousands, GroupedBarChart, RatioChart};
use egui::{Align2, Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Text};

/// Color palette for bar series
pub const PALETTE: [Color32; 6] = [
    Color32::from_rgb(99, 110, 250),  // Blue
    Color32::from_rgb(239, 85, 59),   // Red
    Color32::from_rgb(0, 204, 150),   // Green
    Color32::from_rgb(171, 99, 250),  // Purple
    Color32::from_rgb(255, 161, 90),  // Orange
    Color32::from_rgb(25, 211, 243),  // Cyan
];

const CHART_HEIGHT: f32 = 480.0;
/// Share of a category slot taken by its bar cluster
const CLUSTER_WIDTH: f64 = 0.8;

/// Creates the interactive bar charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn get_series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Horizontal offset of series `index` within a cluster of `count` bars.
    pub fn cluster_offset(index: usize, count: usize) -> (f64, f64) {
        let width = CLUSTER_WIDTH / count.max(1) as f64;
        let offset = (index as f64 - (count as f64 - 1.0) / 2.0) * width;
        (offset, width)
    }

    /// Category label for an axis mark, blank between categories.
    pub fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if (value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Grouped vertical bars: x = sector, one colored bar per series.
    pub fn draw_grouped_chart(ui: &mut egui::Ui, id: &str, chart: &GroupedBarChart) {
        ui.label(RichText::new(chart.title).size(16.0).strong());
        ui.label(
            RichText::new(format!("{}:", chart.legend_title))
                .size(12.0)
                .color(Color32::GRAY),
        );

        let labels = chart.categories.clone();
        let series_count = chart.series.len();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Sector")
            .y_axis_label(chart.y_label)
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .y_axis_formatter(|mark, _range| format_thousands(mark.value))
            .show(ui, |plot_ui| {
                for (s, series) in chart.series.iter().enumerate() {
                    let (offset, width) = Self::cluster_offset(s, series_count);
                    let color = Self::get_series_color(s);

                    let bars: Vec<Bar> = series
                        .values
                        .iter()
                        .enumerate()
                        .filter_map(|(i, value)| {
                            let value = (*value)?;
                            let mut name = chart.categories[i].clone();
                            for (field, detail) in chart.details.get(i).into_iter().flatten() {
                                let text = detail.map(format_thousands).unwrap_or_default();
                                name.push_str(&format!("\n{field}: {text}"));
                            }
                            Some(Bar::new(i as f64 + offset, value).width(width).name(name))
                        })
                        .collect();

                    let series_name = series.name.clone();
                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .name(&series.name)
                            .color(color)
                            .element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
                                format!(
                                    "{}\n{}: {}",
                                    bar.name,
                                    series_name,
                                    format_thousands(bar.value)
                                )
                            })),
                    );
                }
            });
    }

    /// Horizontal ratio bars sorted ascending, each labeled with its ratio.
    pub fn draw_ratio_chart(ui: &mut egui::Ui, chart: &RatioChart) {
        ui.label(RichText::new(chart.title).size(16.0).strong());

        let labels: Vec<String> = chart.bars.iter().map(|b| b.sector.clone()).collect();
        let color = Self::get_series_color(0);

        Plot::new("ratio_chart")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .include_x(0.0)
            .x_axis_label(chart.axis_label)
            .y_axis_label("Sector")
            .y_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = chart
                    .bars
                    .iter()
                    .enumerate()
                    .map(|(i, bar)| {
                        Bar::new(i as f64, bar.ratio).width(0.7).name(format!(
                            "{}\nDamage (VT millions): {}\nLosses (VT millions): {}",
                            bar.sector,
                            format_thousands(bar.damage),
                            format_thousands(bar.losses)
                        ))
                    })
                    .collect();

                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .horizontal()
                        .color(color)
                        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
                            format!("{}\nRasio: {:.2}", bar.name, bar.value)
                        })),
                );

                for (i, bar) in chart.bars.iter().enumerate() {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(bar.ratio, i as f64),
                            RichText::new(format!(" {}", bar.label)).size(12.0),
                        )
                        .anchor(Align2::LEFT_CENTER),
                    );
                }
            });
    }
}

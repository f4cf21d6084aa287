//! Chart Viewer Widget
//! Main area: page title, indicator subheader, the chart or a warning, footer.

use crate::charts::{ChartPlotter, ChartView, DashboardView, RatioView, PAGE_TITLE};
use egui::{Color32, RichText, ScrollArea};

const DATA_SOURCE_URL: &str = "https://data.gouv.nc";
const NOTEBOOK_URL: &str = "https://colab.research.google.com/";

/// Scrollable main area showing the chart for the selected indicator.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the main area for `view`.
    pub fn show(&mut self, ui: &mut egui::Ui, view: &DashboardView) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(8.0);
                ui.label(RichText::new(PAGE_TITLE).size(26.0).strong());
                ui.add_space(10.0);
                ui.label(RichText::new(view.subheader).size(18.0));
                ui.add_space(10.0);

                match &view.chart {
                    ChartView::EconomicImpact(chart) => {
                        ChartPlotter::draw_grouped_chart(ui, "economic_impact", chart)
                    }
                    ChartView::RecoveryNeeds(chart) => {
                        ChartPlotter::draw_grouped_chart(ui, "recovery_needs", chart)
                    }
                    ChartView::LossRatio(RatioView::Chart(chart)) => {
                        ChartPlotter::draw_ratio_chart(ui, chart)
                    }
                    ChartView::LossRatio(RatioView::NoData { message }) => {
                        Self::draw_warning(ui, message)
                    }
                }

                ui.add_space(15.0);
                Self::draw_footer(ui);
            });
    }

    fn draw_warning(ui: &mut egui::Ui, message: &str) {
        egui::Frame::none()
            .fill(Color32::from_rgb(255, 243, 205))
            .rounding(5.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(format!("⚠ {}", message))
                        .size(14.0)
                        .color(Color32::from_rgb(133, 100, 4)),
                );
            });
    }

    fn draw_footer(ui: &mut egui::Ui) {
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("📊 Data bersumber dari");
            ui.hyperlink_to("Pacific Data Hub", DATA_SOURCE_URL);
        });
        ui.horizontal(|ui| {
            ui.label("🔗 Lihat versi analisis di Google Colab:");
            ui.hyperlink_to("tautan", NOTEBOOK_URL);
        });
    }
}

//! Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{
    render, DashboardData, DashboardView, StaticChartRenderer, ViewSettings, EXPORT_SIZE,
};
use crate::config::DashboardConfig;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Main application window.
pub struct DashboardApp {
    data: DashboardData,
    settings: ViewSettings,
    export_dir: PathBuf,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        data: DashboardData,
        config: &DashboardConfig,
    ) -> Self {
        let control_panel = ControlPanel::new(data.sectors.clone());
        Self {
            data,
            settings: ViewSettings {
                ratio_cap: config.ratio_slider_cap,
                ratio_step: config.ratio_slider_step,
            },
            export_dir: config.export_dir.clone(),
            control_panel,
            chart_viewer: ChartViewer::new(),
        }
    }

    fn current_view(&self) -> DashboardView {
        render(&self.control_panel.state, &self.data, &self.settings)
    }

    /// Write the chart on screen to a PNG and open it.
    fn handle_export_png(&mut self, view: &DashboardView) {
        match StaticChartRenderer::export(view, &self.export_dir, EXPORT_SIZE) {
            Ok(path) => {
                self.control_panel
                    .set_status(&format!("Exported {}", path.display()));
                if let Err(e) = open::that(&path) {
                    warn!(path = %path.display(), error = %e, "could not open exported chart");
                }
            }
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let before = self.control_panel.state.clone();
        let view = self.current_view();

        // Left panel - Control Panel
        let action = SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| self.control_panel.show(ui, &view))
                    .inner
            })
            .inner;

        // Any control change re-renders before the main area is drawn.
        let view = if self.control_panel.state != before {
            debug!(
                indicator = self.control_panel.state.indicator.label(),
                sectors = self.control_panel.state.selected_sectors.len(),
                "selection changed"
            );
            self.current_view()
        } else {
            view
        };

        if action == ControlPanelAction::ExportPng {
            self.handle_export_png(&view);
        }

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &view);
        });
    }
}

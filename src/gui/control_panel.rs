//! Control Panel Widget
//! Left side panel: indicator selector, sector filter, ratio range and export.

use crate::charts::{ChartView, DashboardView, Indicator, RatioSelection, RatioView, ViewState};
use egui::{Color32, ComboBox, RichText, ScrollArea};

/// Left side control panel holding the current view selections.
pub struct ControlPanel {
    pub state: ViewState,
    pub sectors: Vec<String>,
    pub status: String,
}

impl ControlPanel {
    pub fn new(sectors: Vec<String>) -> Self {
        Self {
            state: ViewState::new(&sectors),
            sectors,
            status: "Ready".to_string(),
        }
    }

    /// Draw the control panel for the view currently on screen.
    pub fn show(&mut self, ui: &mut egui::Ui, view: &DashboardView) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Pilih Indikator")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Indicator Section =====
        ui.label(RichText::new("📊 Indikator Utama").size(14.0).strong());
        ui.add_space(5.0);

        ComboBox::from_id_salt("indicator")
            .width(220.0)
            .selected_text(self.state.indicator.label())
            .show_ui(ui, |ui| {
                for indicator in Indicator::ALL {
                    let selected = self.state.indicator == indicator;
                    if ui.selectable_label(selected, indicator.label()).clicked() {
                        self.state.select_indicator(indicator);
                    }
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Sector Filter Section =====
        ui.label(RichText::new("🔧 Filter Sektor").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                    for sector in &self.sectors {
                        let mut checked = self.state.selected_sectors.contains(sector);
                        if ui.checkbox(&mut checked, sector).changed() {
                            if checked {
                                self.state.selected_sectors.insert(sector.clone());
                            } else {
                                self.state.selected_sectors.remove(sector);
                            }
                        }
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.state.selected_sectors = self.sectors.iter().cloned().collect();
            }
            if ui.small_button("Clear All").clicked() {
                self.state.selected_sectors.clear();
            }
        });

        // ===== Ratio Range Section =====
        if let ChartView::LossRatio(RatioView::Chart(chart)) = &view.chart {
            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.label(RichText::new(chart.slider_label).size(14.0).strong());
            ui.add_space(5.0);

            let slider = chart.slider;
            let (mut lo, mut hi) = slider.selection.value;
            let lo_changed = ui
                .add(
                    egui::Slider::new(&mut lo, slider.min..=slider.max)
                        .step_by(slider.step)
                        .text("min"),
                )
                .changed();
            let hi_changed = ui
                .add(
                    egui::Slider::new(&mut hi, slider.min..=slider.max)
                        .step_by(slider.step)
                        .text("max"),
                )
                .changed();

            if lo_changed || hi_changed {
                self.state.ratio = Some(RatioSelection {
                    default: slider.selection.default,
                    value: (lo.min(hi), hi.max(lo)),
                });
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(view.chart.has_chart(), |ui| {
                let button = egui::Button::new(RichText::new("📄 Export PNG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportPng;
                }
            });
        });

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    ExportPng,
}

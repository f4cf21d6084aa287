//! Dashboard View Model
//! Turns the cleaned tables and the current UI selections into a description
//! of what the main area shows. Drawing lives in `plotter` and `renderer`.

use crate::data::{DataProcessor, RecoveryNeedRecord, SectorEffectRecord};
use std::collections::HashSet;

pub const PAGE_TITLE: &str = "Dashboard Visualisasi Dampak Bencana Vanuatu 2015";
pub const RATIO_WARNING: &str = "Tidak ada data rasio yang valid untuk ditampilkan.";

/// Both cleaned tables plus the sector list offered in the sidebar.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub effects: Vec<SectorEffectRecord>,
    pub needs: Vec<RecoveryNeedRecord>,
    /// Distinct sectors of `effects`, first-seen order.
    pub sectors: Vec<String>,
}

impl DashboardData {
    pub fn new(effects: Vec<SectorEffectRecord>, needs: Vec<RecoveryNeedRecord>) -> Self {
        let sectors = DataProcessor::unique_sectors(&effects);
        Self {
            effects,
            needs,
            sectors,
        }
    }
}

/// Main indicator chosen in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Indicator {
    #[default]
    TotalImpact,
    LossDamageRatio,
    RecoveryNeeds,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [
        Indicator::TotalImpact,
        Indicator::LossDamageRatio,
        Indicator::RecoveryNeeds,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Indicator::TotalImpact => "Total Dampak Ekonomi",
            Indicator::LossDamageRatio => "Rasio Losses/Damage",
            Indicator::RecoveryNeeds => "Kebutuhan Recovery",
        }
    }

    pub fn subheader(self) -> &'static str {
        match self {
            Indicator::TotalImpact => "Visualisasi Total Kerusakan dan Kerugian per Sektor",
            Indicator::LossDamageRatio => "Visualisasi Rasio Kerugian terhadap Kerusakan",
            Indicator::RecoveryNeeds => "Visualisasi Kebutuhan Recovery dan Reconstruction",
        }
    }

    /// File-name friendly identifier.
    pub fn slug(self) -> &'static str {
        match self {
            Indicator::TotalImpact => "total-dampak-ekonomi",
            Indicator::LossDamageRatio => "rasio-losses-damage",
            Indicator::RecoveryNeeds => "kebutuhan-recovery",
        }
    }
}

/// Ratio slider selection, remembered together with the default it was
/// derived from so it can be reset when the bounds move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioSelection {
    pub default: (f64, f64),
    pub value: (f64, f64),
}

/// Every user selection that affects the main area.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub indicator: Indicator,
    pub selected_sectors: HashSet<String>,
    pub ratio: Option<RatioSelection>,
}

impl ViewState {
    /// Default state: first indicator, every sector selected.
    pub fn new(sectors: &[String]) -> Self {
        Self {
            indicator: Indicator::default(),
            selected_sectors: sectors.iter().cloned().collect(),
            ratio: None,
        }
    }

    /// Switch indicator. Leaving the ratio chart forgets the slider range.
    pub fn select_indicator(&mut self, indicator: Indicator) {
        if indicator != Indicator::LossDamageRatio {
            self.ratio = None;
        }
        self.indicator = indicator;
    }
}

/// Rendering parameters that come from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub ratio_cap: f64,
    pub ratio_step: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            ratio_cap: 5.0,
            ratio_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Bar clusters, one per sector, one bar per series.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarChart {
    pub title: &'static str,
    pub y_label: &'static str,
    pub legend_title: &'static str,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    /// Extra hover fields per category.
    pub details: Vec<Vec<(&'static str, Option<f64>)>>,
}

impl GroupedBarChart {
    /// Smallest and largest bar value, always including zero.
    pub fn value_range(&self) -> (f64, f64) {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().flatten())
            .fold((0.0, 0.0), |(lo, hi): (f64, f64), &v| (lo.min(v), hi.max(v)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioSlider {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub selection: RatioSelection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatioBar {
    pub sector: String,
    pub ratio: f64,
    /// Ratio to two decimals, drawn next to the bar.
    pub label: String,
    pub damage: f64,
    pub losses: f64,
}

/// Horizontal ratio bars, ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioChart {
    pub title: &'static str,
    pub axis_label: &'static str,
    pub slider_label: &'static str,
    pub slider: RatioSlider,
    pub bars: Vec<RatioBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RatioView {
    /// Nothing valid to show; only the warning is displayed.
    NoData { message: &'static str },
    Chart(RatioChart),
}

/// Chart for one indicator, carrying only what that mode needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    EconomicImpact(GroupedBarChart),
    LossRatio(RatioView),
    RecoveryNeeds(GroupedBarChart),
}

impl ChartView {
    /// Whether there is a chart (as opposed to a warning) to draw or export.
    pub fn has_chart(&self) -> bool {
        !matches!(self, ChartView::LossRatio(RatioView::NoData { .. }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub indicator: Indicator,
    pub subheader: &'static str,
    pub chart: ChartView,
}

/// Build the main-area view for `state`. Pure: same inputs, same view.
pub fn render(state: &ViewState, data: &DashboardData, settings: &ViewSettings) -> DashboardView {
    let effects = DataProcessor::filter_by_sectors(&data.effects, &state.selected_sectors);
    let needs = DataProcessor::filter_by_sectors(&data.needs, &state.selected_sectors);

    let chart = match state.indicator {
        Indicator::TotalImpact => ChartView::EconomicImpact(economic_impact_chart(&effects)),
        Indicator::LossDamageRatio => {
            ChartView::LossRatio(ratio_view(&effects, state.ratio, settings))
        }
        Indicator::RecoveryNeeds => ChartView::RecoveryNeeds(recovery_chart(&needs)),
    };

    DashboardView {
        indicator: state.indicator,
        subheader: state.indicator.subheader(),
        chart,
    }
}

fn economic_impact_chart(effects: &[&SectorEffectRecord]) -> GroupedBarChart {
    GroupedBarChart {
        title: "Perbandingan Dampak Ekonomi Bencana per Sektor",
        y_label: "Kerugian (juta VT)",
        legend_title: "Jenis Dampak",
        categories: effects.iter().map(|r| r.sector.clone()).collect(),
        series: vec![
            BarSeries {
                name: "Damage (VT millions)".to_string(),
                values: effects.iter().map(|r| Some(r.damage)).collect(),
            },
            BarSeries {
                name: "Losses (VT millions)".to_string(),
                values: effects.iter().map(|r| Some(r.losses)).collect(),
            },
            BarSeries {
                name: "Total (VT millions)".to_string(),
                values: effects.iter().map(|r| r.total).collect(),
            },
        ],
        details: vec![Vec::new(); effects.len()],
    }
}

fn recovery_chart(needs: &[&RecoveryNeedRecord]) -> GroupedBarChart {
    GroupedBarChart {
        title: "Perbandingan Kebutuhan Recovery dan Reconstruction per Sektor",
        y_label: "Nilai (juta VT)",
        legend_title: "Jenis Kebutuhan",
        categories: needs.iter().map(|r| r.sector.clone()).collect(),
        series: vec![
            BarSeries {
                name: "Recovery Needs (VT millions)".to_string(),
                values: needs.iter().map(|r| r.recovery_needs).collect(),
            },
            BarSeries {
                name: "Reconstruction Needs (VT millions)".to_string(),
                values: needs.iter().map(|r| r.reconstruction_needs).collect(),
            },
        ],
        details: needs
            .iter()
            .map(|r| {
                vec![
                    ("Public Share (%)", r.public_share_pct),
                    ("Private Share (%)", r.private_share_pct),
                ]
            })
            .collect(),
    }
}

fn ratio_view(
    effects: &[&SectorEffectRecord],
    previous: Option<RatioSelection>,
    settings: &ViewSettings,
) -> RatioView {
    let effects = DataProcessor::finite_ratios(effects);
    let Some(bounds) = DataProcessor::ratio_bounds(&effects, settings.ratio_cap) else {
        return RatioView::NoData {
            message: RATIO_WARNING,
        };
    };

    let slider_min = bounds.min.min(0.0);
    let default = bounds.default_range();
    let value = match previous {
        Some(sel) if sel.default == default => {
            let lo = sel.value.0.clamp(slider_min, bounds.upper);
            let hi = sel.value.1.clamp(slider_min, bounds.upper);
            (lo.min(hi), hi.max(lo))
        }
        _ => default,
    };

    let bars = DataProcessor::filter_by_ratio_range(&effects, value)
        .into_iter()
        .map(|r| RatioBar {
            sector: r.sector.clone(),
            ratio: r.losses_to_damage_ratio,
            label: format!("{:.2}", r.losses_to_damage_ratio),
            damage: r.damage,
            losses: r.losses,
        })
        .collect();

    RatioView::Chart(RatioChart {
        title: "Rasio Kerugian Ekonomi dibanding Kerusakan Fisik per Sektor",
        axis_label: "Rasio Losses ÷ Damage",
        slider_label: "Filter Rasio Losses ÷ Damage",
        slider: RatioSlider {
            min: slider_min,
            max: bounds.upper,
            step: settings.ratio_step,
            selection: RatioSelection { default, value },
        },
        bars,
    })
}

/// Axis tick text with thousands separators, e.g. `12,500`.
pub fn format_thousands(value: f64) -> String {
    if value.fract().abs() > 1e-9 && value.abs() < 1000.0 {
        return format!("{value:.1}");
    }

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::effect;

    fn need(sector: &str, recovery: f64, reconstruction: f64) -> RecoveryNeedRecord {
        RecoveryNeedRecord {
            sector: sector.to_string(),
            recovery_needs: Some(recovery),
            reconstruction_needs: Some(reconstruction),
            total_needs: Some(recovery + reconstruction),
            private_share_pct: Some(25.0),
            public_share_pct: Some(75.0),
        }
    }

    fn sample() -> DashboardData {
        DashboardData::new(
            vec![
                effect("Agriculture", 100.0, 50.0),
                effect("Housing", 400.0, 100.0),
                effect("Tourism", 10.0, 80.0),
            ],
            vec![
                need("Agriculture", 30.0, 70.0),
                need("Housing", 200.0, 900.0),
                need("Transport", 5.0, 5.0),
            ],
        )
    }

    fn only(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_state() {
        let data = sample();
        let state = ViewState::new(&data.sectors);
        assert_eq!(state.indicator, Indicator::TotalImpact);
        assert_eq!(state.indicator.label(), "Total Dampak Ekonomi");
        assert_eq!(state.selected_sectors.len(), 3);
    }

    #[test]
    fn test_economic_impact_three_series() {
        let data = sample();
        let view = render(&ViewState::new(&data.sectors), &data, &ViewSettings::default());
        let ChartView::EconomicImpact(chart) = view.chart else {
            panic!("expected economic impact chart");
        };
        assert_eq!(chart.categories, vec!["Agriculture", "Housing", "Tourism"]);
        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.series[0].values[1], Some(400.0));
        assert_eq!(chart.series[2].values[0], Some(150.0));
        assert_eq!(chart.value_range(), (0.0, 500.0));
    }

    #[test]
    fn test_sector_subset_filters_both_tables() {
        let data = sample();
        let mut state = ViewState::new(&data.sectors);
        state.selected_sectors = only(&["Agriculture"]);

        let view = render(&state, &data, &ViewSettings::default());
        let ChartView::EconomicImpact(effects) = view.chart else {
            panic!("expected economic impact chart");
        };
        assert_eq!(effects.categories, vec!["Agriculture"]);

        state.indicator = Indicator::RecoveryNeeds;
        let view = render(&state, &data, &ViewSettings::default());
        let ChartView::RecoveryNeeds(needs) = view.chart else {
            panic!("expected recovery chart");
        };
        assert_eq!(needs.categories, vec!["Agriculture"]);
        assert_eq!(needs.series.len(), 2);
        assert_eq!(needs.details[0][0], ("Public Share (%)", Some(75.0)));
    }

    #[test]
    fn test_recovery_sectors_outside_effects_are_never_selected() {
        let data = sample();
        let mut state = ViewState::new(&data.sectors);
        state.indicator = Indicator::RecoveryNeeds;
        let view = render(&state, &data, &ViewSettings::default());
        let ChartView::RecoveryNeeds(needs) = view.chart else {
            panic!("expected recovery chart");
        };
        assert_eq!(needs.categories, vec!["Agriculture", "Housing"]);
    }

    #[test]
    fn test_ratio_view_sorted_with_labels() {
        let data = sample();
        let mut state = ViewState::new(&data.sectors);
        state.indicator = Indicator::LossDamageRatio;

        let view = render(&state, &data, &ViewSettings::default());
        let ChartView::LossRatio(RatioView::Chart(chart)) = view.chart else {
            panic!("expected ratio chart");
        };
        // Tourism (8.0) lies above the 5.0 cap and is outside the default range.
        assert_eq!(chart.slider.max, 5.0);
        assert_eq!(chart.slider.min, 0.0);
        assert_eq!(chart.slider.selection.value, (0.25, 5.0));
        let sectors: Vec<&str> = chart.bars.iter().map(|b| b.sector.as_str()).collect();
        assert_eq!(sectors, vec!["Housing", "Agriculture"]);
        assert_eq!(chart.bars[0].label, "0.25");
        assert_eq!(chart.bars[1].label, "0.50");
    }

    #[test]
    fn test_ratio_cap_applies_when_all_ratios_exceed_it() {
        let data = DashboardData::new(
            vec![effect("A", 1.0, 6.0), effect("B", 1.0, 12.0)],
            Vec::new(),
        );
        let mut state = ViewState::new(&data.sectors);
        state.indicator = Indicator::LossDamageRatio;
        let view = render(&state, &data, &ViewSettings::default());
        let ChartView::LossRatio(RatioView::Chart(chart)) = view.chart else {
            panic!("expected ratio chart");
        };
        assert_eq!(chart.slider.max, 5.0);
        assert_eq!(chart.slider.selection.default, (5.0, 5.0));
    }

    #[test]
    fn test_empty_selection_shows_warning() {
        let data = sample();
        let mut state = ViewState::new(&data.sectors);
        state.indicator = Indicator::LossDamageRatio;
        state.selected_sectors.clear();

        let view = render(&state, &data, &ViewSettings::default());
        assert_eq!(
            view.chart,
            ChartView::LossRatio(RatioView::NoData {
                message: RATIO_WARNING
            })
        );
        assert!(!view.chart.has_chart());
    }

    #[test]
    fn test_user_range_kept_until_bounds_change() {
        let data = sample();
        let mut state = ViewState::new(&data.sectors);
        state.indicator = Indicator::LossDamageRatio;
        state.ratio = Some(RatioSelection {
            default: (0.25, 5.0),
            value: (0.3, 9.0),
        });

        let view = render(&state, &data, &ViewSettings::default());
        let ChartView::LossRatio(RatioView::Chart(chart)) = view.chart else {
            panic!("expected ratio chart");
        };
        assert_eq!(chart.slider.selection.value, (0.3, 5.0));
        assert_eq!(chart.bars.len(), 1);
        assert_eq!(chart.bars[0].sector, "Agriculture");

        // Narrowing the sectors moves the bounds, so the range resets.
        state.selected_sectors = only(&["Agriculture", "Tourism"]);
        let view = render(&state, &data, &ViewSettings::default());
        let ChartView::LossRatio(RatioView::Chart(chart)) = view.chart else {
            panic!("expected ratio chart");
        };
        assert_eq!(chart.slider.selection.value, (0.5, 5.0));
    }

    #[test]
    fn test_leaving_ratio_indicator_resets_range() {
        let data = sample();
        let mut state = ViewState::new(&data.sectors);
        state.select_indicator(Indicator::LossDamageRatio);
        state.ratio = Some(RatioSelection {
            default: (0.25, 5.0),
            value: (0.3, 1.0),
        });

        state.select_indicator(Indicator::TotalImpact);
        assert_eq!(state.ratio, None);
        state.select_indicator(Indicator::LossDamageRatio);

        let view = render(&state, &data, &ViewSettings::default());
        let ChartView::LossRatio(RatioView::Chart(chart)) = view.chart else {
            panic!("expected ratio chart");
        };
        assert_eq!(chart.slider.selection.value, (0.25, 5.0));
    }

    #[test]
    fn test_render_is_pure() {
        let data = sample();
        let state = ViewState::new(&data.sectors);
        let settings = ViewSettings::default();
        assert_eq!(
            render(&state, &data, &settings),
            render(&state, &data, &settings)
        );
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(950.0), "950");
        assert_eq!(format_thousands(12500.0), "12,500");
        assert_eq!(format_thousands(-1234567.0), "-1,234,567");
        assert_eq!(format_thousands(2.5), "2.5");
    }
}

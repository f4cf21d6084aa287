//! Charts module - view model, interactive plots and PNG export

mod plotter;
mod renderer;
mod view;

pub use plotter::ChartPlotter;
pub use renderer::{StaticChartRenderer, EXPORT_SIZE};
pub use view::{
    render, ChartView, DashboardData, DashboardView, Indicator, RatioSelection, RatioView,
    ViewSettings, ViewState, PAGE_TITLE,
};

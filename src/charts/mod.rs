//! Charts module - visual models, interactive plotting and static SVG rendering

mod model;
mod plotter;
mod renderer;
mod scale;

pub use model::{
    BarChartModel, ChartKind, DashboardModels, HistogramModel, LineModel, ScatterModel,
};
#[cfg(test)]
pub use model::LinePoint;
pub use plotter::{ChartInteraction, ChartPlotter};
pub use renderer::StaticChartRenderer;

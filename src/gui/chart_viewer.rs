//! Chart Viewer Widget
//! Central scrollable area holding the four chart cards.
//! Two columns on wide surfaces, a single column otherwise.

use crate::charts::{ChartInteraction, ChartKind, ChartPlotter, DashboardModels};
use crate::state::{Dashboard, SelectionSource};
use egui::{Color32, RichText, ScrollArea};

/// Card configuration
const CHART_SPACING: f32 = 15.0;
const CARD_MARGIN: f32 = 12.0;
/// Title row plus caption row
const HEADER_HEIGHT: f32 = 56.0;

const BORDER_COLOR: Color32 = Color32::from_rgb(100, 149, 237);

/// A chart click that should become a selection change.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartClick {
    pub country: String,
    pub source: SelectionSource,
}

pub struct ChartViewer;

impl ChartViewer {
    /// Draw all four charts in render order. Returns the clicked country,
    /// if any, tagged with the chart it came from.
    pub fn show(ui: &mut egui::Ui, dashboard: &Dashboard) -> Option<ChartClick> {
        if !dashboard.is_ready() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return None;
        }

        let surface = dashboard.surface();
        let columns = surface.columns();
        let (card_width, card_height) = surface.card_size();
        let models = dashboard.models();
        let mut click = None;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in ChartKind::RENDER_ORDER.chunks(columns) {
                    ui.horizontal(|ui| {
                        for kind in row {
                            let interaction =
                                Self::draw_card(ui, models, *kind, card_width, card_height);
                            if let Some(country) = interaction.clicked_country {
                                let source = match kind {
                                    ChartKind::Scatter => SelectionSource::ScatterClick,
                                    _ => SelectionSource::BarClick,
                                };
                                click = Some(ChartClick { country, source });
                            }
                            ui.add_space(CHART_SPACING);
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });

        click
    }

    fn draw_card(
        ui: &mut egui::Ui,
        models: &DashboardModels,
        kind: ChartKind,
        width: f32,
        height: f32,
    ) -> ChartInteraction {
        let inner_width = width - 2.0 * CARD_MARGIN;
        let plot_height = (height - 2.0 * CARD_MARGIN - HEADER_HEIGHT).max(120.0);
        let mut interaction = ChartInteraction::default();

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, BORDER_COLOR))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(CARD_MARGIN)
            .show(ui, |ui| {
                ui.set_width(inner_width);
                ui.vertical(|ui| {
                    ui.label(RichText::new(Self::card_title(models, kind)).size(16.0).strong());

                    let caption = models
                        .histogram
                        .as_ref()
                        .filter(|_| kind == ChartKind::Histogram)
                        .map(|h| h.caption())
                        .unwrap_or_default();
                    ui.label(RichText::new(caption).size(11.0).color(Color32::GRAY));
                    ui.add_space(4.0);

                    interaction = match kind {
                        ChartKind::Bar => models
                            .bar
                            .as_ref()
                            .map(|m| ChartPlotter::draw_bar_chart(ui, m, plot_height)),
                        ChartKind::Histogram => models
                            .histogram
                            .as_ref()
                            .map(|m| ChartPlotter::draw_histogram(ui, m, plot_height)),
                        ChartKind::Scatter => models
                            .scatter
                            .as_ref()
                            .map(|m| ChartPlotter::draw_scatter(ui, m, plot_height)),
                        ChartKind::Line => models
                            .line
                            .as_ref()
                            .map(|m| ChartPlotter::draw_line_chart(ui, m, plot_height)),
                    }
                    .unwrap_or_else(|| {
                        ChartPlotter::draw_empty(ui, plot_height);
                        ChartInteraction::default()
                    });
                });
            });

        interaction
    }

    fn card_title(models: &DashboardModels, kind: ChartKind) -> String {
        match kind {
            ChartKind::Bar => models
                .bar
                .as_ref()
                .map(|m| format!("{} ({})", kind.title(), m.year)),
            ChartKind::Histogram => models
                .histogram
                .as_ref()
                .map(|m| format!("{} ({})", kind.title(), m.year)),
            ChartKind::Scatter => models
                .scatter
                .as_ref()
                .map(|m| format!("{} ({})", kind.title(), m.year)),
            ChartKind::Line => models
                .line
                .as_ref()
                .map(|m| format!("{}: {}", kind.title(), m.country)),
        }
        .unwrap_or_else(|| kind.title().to_string())
    }
}

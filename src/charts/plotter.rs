//! Chart Plotter Module
//! Draws the visual models interactively using egui_plot and reports hover/click hits.

use crate::charts::{BarChartModel, HistogramModel, LineModel, ScatterModel};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

/// Selected country / selected year
pub const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red
pub const NEUTRAL_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(26, 188, 156); // Teal
pub const LINE_COLOR: Color32 = Color32::from_rgb(96, 125, 139); // Blue Grey

/// What the user did on a chart during this frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartInteraction {
    pub clicked_country: Option<String>,
}

/// Draws chart models with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn fill(highlighted: bool) -> Color32 {
        if highlighted {
            HIGHLIGHT_COLOR
        } else {
            NEUTRAL_COLOR
        }
    }

    /// Placeholder for a chart whose filtered data is empty.
    pub fn draw_empty(ui: &mut egui::Ui, height: f32) {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No data for this selection").color(Color32::GRAY));
            });
        });
    }

    /// Top-10 bar chart. Clicking a bar selects its country.
    pub fn draw_bar_chart(ui: &mut egui::Ui, model: &BarChartModel, height: f32) -> ChartInteraction {
        let x_labels: Vec<String> = model.bars.iter().map(|b| b.country.clone()).collect();

        let bars: Vec<Bar> = model
            .bars
            .iter()
            .enumerate()
            .map(|(i, b)| {
                Bar::new(i as f64, b.life_expectancy)
                    .width(0.8)
                    .fill(Self::fill(b.highlighted))
                    .name(&b.country)
            })
            .collect();

        let response = Plot::new("bar_chart")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_x(false)
            .show_y(false)
            .include_y(model.y_domain.0)
            .include_y(model.y_domain.1 * 1.05)
            .y_axis_label("Life expectancy")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (mark.value - idx).abs() < f64::EPSILON {
                    x_labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(NEUTRAL_COLOR));
                plot_ui
                    .pointer_coordinate()
                    .and_then(|p| model.hit_test(p.x))
                    .cloned()
            });

        let hovered = response.inner;
        let clicked = response.response.clicked();
        if let Some(tip) = hovered.as_ref().map(|b| model.tooltip(b)) {
            response.response.on_hover_text_at_pointer(tip.text());
        }

        ChartInteraction {
            clicked_country: hovered.filter(|_| clicked).map(|b| b.country),
        }
    }

    /// Life expectancy distribution. Read-only.
    pub fn draw_histogram(ui: &mut egui::Ui, model: &HistogramModel, height: f32) -> ChartInteraction {
        let bars: Vec<Bar> = model
            .buckets
            .iter()
            .map(|b| {
                Bar::new((b.x0 + b.x1) / 2.0, b.count as f64)
                    .width(b.x1 - b.x0)
                    .fill(HISTOGRAM_COLOR.gamma_multiply(0.8))
            })
            .collect();

        let response = Plot::new("histogram_chart")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_x(false)
            .show_y(false)
            .include_x(model.x_domain.0)
            .include_x(model.x_domain.1)
            .include_y(0.0)
            .include_y(model.max_count as f64 + 1.0)
            .x_axis_label("Life expectancy (years)")
            .y_axis_label("Records")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(HISTOGRAM_COLOR));
                plot_ui
                    .pointer_coordinate()
                    .and_then(|p| model.hit_test(p.x))
                    .map(|b| model.tooltip(b))
            });

        if let Some(tip) = response.inner {
            response.response.on_hover_text_at_pointer(tip.text());
        }

        ChartInteraction::default()
    }

    /// GDP vs life expectancy. Clicking a point selects its country.
    pub fn draw_scatter(ui: &mut egui::Ui, model: &ScatterModel, height: f32) -> ChartInteraction {
        let neutral: PlotPoints = model
            .points
            .iter()
            .filter(|p| !p.highlighted)
            .map(|p| [p.gdp, p.life_expectancy])
            .collect();
        let highlighted: PlotPoints = model
            .highlighted()
            .map(|p| [p.gdp, p.life_expectancy])
            .collect();
        let neutral_radius = model
            .points
            .iter()
            .find(|p| !p.highlighted)
            .map(|p| p.radius())
            .unwrap_or(4.0);
        let highlight_radius = model
            .highlighted()
            .next()
            .map(|p| p.radius())
            .unwrap_or(7.0);

        let response = Plot::new("scatter_chart")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_x(false)
            .show_y(false)
            .include_x(model.x_domain.0)
            .include_x(model.x_domain.1)
            .include_y(model.y_domain.0)
            .include_y(model.y_domain.1)
            .x_axis_label("GDP per capita")
            .y_axis_label("Life expectancy")
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(neutral)
                        .radius(neutral_radius)
                        .color(NEUTRAL_COLOR.gamma_multiply(0.7))
                        .filled(true),
                );
                // drawn last so it sits on top
                plot_ui.points(
                    Points::new(highlighted)
                        .radius(highlight_radius)
                        .color(HIGHLIGHT_COLOR)
                        .filled(true),
                );
                plot_ui
                    .pointer_coordinate()
                    .and_then(|p| model.hit_test(p.x, p.y))
                    .cloned()
            });

        let hovered = response.inner;
        let clicked = response.response.clicked();
        if let Some(tip) = hovered.as_ref().map(|p| model.tooltip(p)) {
            response.response.on_hover_text_at_pointer(tip.text());
        }

        ChartInteraction {
            clicked_country: hovered.filter(|_| clicked).map(|p| p.country),
        }
    }

    /// Life expectancy trend for the selected country, with the selected
    /// year marked separately.
    pub fn draw_line_chart(ui: &mut egui::Ui, model: &LineModel, height: f32) -> ChartInteraction {
        let path: Vec<[f64; 2]> = model
            .points
            .iter()
            .map(|p| [p.year as f64, p.life_expectancy])
            .collect();

        let response = Plot::new("line_chart")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_x(false)
            .show_y(false)
            .include_x(model.x_domain.0)
            .include_x(model.x_domain.1)
            .include_y(model.y_domain.0)
            .include_y(model.y_domain.1)
            .x_axis_label("Year")
            .y_axis_label("Life expectancy")
            .x_axis_formatter(|mark, _range| {
                if mark.value.fract() == 0.0 {
                    format!("{:.0}", mark.value)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(path.iter().copied()))
                        .color(LINE_COLOR)
                        .width(2.0)
                        .name(&model.country),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(path.iter().copied()))
                        .radius(2.5)
                        .color(LINE_COLOR),
                );
                if let Some(marker) = model.marker {
                    plot_ui.points(
                        Points::new(PlotPoints::from(vec![[
                            marker.year as f64,
                            marker.life_expectancy,
                        ]]))
                        .radius(7.0)
                        .color(HIGHLIGHT_COLOR)
                        .filled(true),
                    );
                }

                let hovered = plot_ui.pointer_coordinate().and_then(|p| model.hit_test(p.x))?;
                if model.marker.map(|m| m.year) == Some(hovered.year) {
                    model.marker_tooltip()
                } else {
                    Some(model.tooltip(hovered))
                }
            });

        if let Some(tip) = response.inner {
            response.response.on_hover_text_at_pointer(tip.text());
        }

        ChartInteraction::default()
    }
}

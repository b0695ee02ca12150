//! Control Panel Widget
//! Left side panel with the data source, the year slider, the country dropdown and exports.

use crate::state::Dashboard;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Left side control panel. Widget values come from the dashboard's
/// control state; the panel only reports what changed.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub progress: f32,
    pub status: String,
    pub export_dir: PathBuf,
}

impl ControlPanel {
    pub fn new(csv_path: Option<PathBuf>, export_dir: PathBuf) -> Self {
        Self {
            csv_path,
            progress: 0.0,
            status: "Ready".to_string(),
            export_dir,
        }
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, dashboard: &Dashboard) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Life Expectancy")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("WHO country data").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Selection Section =====
        ui.label(RichText::new("🔧 Selection").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 70.0;
        let controls = dashboard.controls();

        ui.add_enabled_ui(dashboard.is_ready(), |ui| {
            if let Some((min_year, max_year)) = dashboard.year_range() {
                let mut year = controls.slider_year;
                ui.horizontal(|ui| {
                    ui.add_sized([label_width, 20.0], egui::Label::new("Year:"));
                    let slider = egui::Slider::new(&mut year, min_year..=max_year)
                        .step_by(1.0)
                        .show_value(false);
                    if ui.add(slider).changed() && year != controls.slider_year {
                        action = ControlPanelAction::YearChanged(year);
                    }
                    ui.label(RichText::new(year.to_string()).size(14.0).strong());
                });
            } else {
                ui.label(RichText::new("Year: -").color(Color32::GRAY));
            }

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.add_sized([label_width, 20.0], egui::Label::new("Country:"));
                ComboBox::from_id_salt("country")
                    .width(170.0)
                    .selected_text(&controls.dropdown_country)
                    .show_ui(ui, |ui| {
                        for country in dashboard.countries() {
                            if ui
                                .selectable_label(controls.dropdown_country == *country, country)
                                .clicked()
                            {
                                if let Some(picked) = country_pick(dashboard, country) {
                                    action = picked;
                                }
                            }
                        }
                    });
                if !dashboard.selection().is_country_explicit() {
                    ui.label(RichText::new("(top)").size(10.0).color(Color32::GRAY));
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(dashboard.selection().is_initialized(), |ui| {
                let svg_button = egui::Button::new(RichText::new("🖼 Export SVG").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(svg_button).clicked() {
                    action = ControlPanelAction::ExportSvg;
                }

                ui.add_space(5.0);

                let json_button = egui::Button::new(RichText::new("📄 Export JSON").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(json_button).clicked() {
                    action = ControlPanelAction::ExportJson;
                }
            });
            ui.label(
                RichText::new(self.export_dir.display().to_string())
                    .size(10.0)
                    .color(Color32::GRAY),
            );
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        if self.progress > 0.0 && self.progress < 100.0 {
            ui.add(
                egui::ProgressBar::new(self.progress / 100.0)
                    .show_percentage()
                    .animate(true),
            );
            ui.add_space(5.0);
        }

        let status_color = if self.status.contains("Error") || self.status.contains("unavailable")
        {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") || self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        if dashboard.is_ready() {
            ui.add_space(5.0);
            ui.label(RichText::new(dashboard.status()).size(11.0));
        }

        action
    }
}

/// Action for a dropdown pick. Re-picking the default country still pins it,
/// so only a pick of the already pinned country is a no-op.
fn country_pick(dashboard: &Dashboard, country: &str) -> Option<ControlPanelAction> {
    let selection = dashboard.selection();
    if selection.is_country_explicit() && selection.country() == Some(country) {
        None
    } else {
        Some(ControlPanelAction::CountryChanged(country.to_string()))
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    YearChanged(i32),
    CountryChanged(String),
    ExportSvg,
    ExportJson,
}

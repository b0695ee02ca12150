//! Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{DataLoader, LoadOptions, LoadedData};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::state::{Dashboard, SelectionSource, SelectionUpdate, Surface};
use egui::SidePanel;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete {
        loaded: LoadedData,
        path: Option<PathBuf>,
    },
    Error(String),
}

/// What the load channel delivered this frame.
enum LoadEvent {
    Result(LoadResult),
    /// The loader thread ended without a result, e.g. after a panic.
    Disconnected,
}

#[derive(Debug, PartialEq)]
enum LoadState {
    Loading,
    Done,
}

fn apply_load_event(
    dashboard: &mut Dashboard,
    control_panel: &mut ControlPanel,
    event: LoadEvent,
) -> LoadState {
    match event {
        LoadEvent::Result(LoadResult::Progress(status)) => {
            control_panel.set_progress(30.0, &status);
            LoadState::Loading
        }
        LoadEvent::Result(LoadResult::Complete { loaded, path }) => {
            let report = loaded.report;
            tracing::info!(
                path = ?path,
                kept = report.kept,
                dropped = report.dropped(),
                "dataset ready"
            );
            dashboard.install(loaded);
            control_panel.set_progress(
                100.0,
                &format!(
                    "Complete! {} of {} rows loaded",
                    report.kept, report.total_rows
                ),
            );
            LoadState::Done
        }
        LoadEvent::Result(LoadResult::Error(error)) => {
            tracing::error!(%error, "load failed");
            control_panel.set_progress(0.0, &format!("Data unavailable: {}", error));
            LoadState::Done
        }
        LoadEvent::Disconnected => {
            tracing::error!("loader thread exited without a result");
            control_panel.set_progress(0.0, "Data unavailable: loader stopped unexpectedly");
            LoadState::Done
        }
    }
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    dashboard: Dashboard,
    control_panel: ControlPanel,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let size = cc.egui_ctx.screen_rect().size();
        let csv_path = PathBuf::from(&config.data.csv_path);
        let mut app = Self {
            dashboard: Dashboard::new(Surface::new(size.x, size.y)),
            control_panel: ControlPanel::new(
                Some(csv_path.clone()),
                config.export.output_dir.clone(),
            ),
            config,
            load_rx: None,
            is_loading: false,
        };
        app.start_load(csv_path);
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Clear the charts and load `path` on a background thread.
    fn start_load(&mut self, path: PathBuf) {
        self.dashboard.clear();
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel.set_progress(1.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let options = LoadOptions {
            require_life_expectancy: self.config.data.require_life_expectancy,
        };
        let path_str = path.to_string_lossy().to_string();

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

            let mut loader = DataLoader::new(options);
            match loader.load_csv(&path_str) {
                Ok(loaded) => {
                    let _ = tx.send(LoadResult::Complete {
                        loaded,
                        path: loader.get_file_path().cloned(),
                    });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        let mut finished = false;
        loop {
            let event = match rx.try_recv() {
                Ok(result) => LoadEvent::Result(result),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => LoadEvent::Disconnected,
            };
            match apply_load_event(&mut self.dashboard, &mut self.control_panel, event) {
                LoadState::Loading => {}
                LoadState::Done => {
                    finished = true;
                    break;
                }
            }
        }

        if finished {
            self.is_loading = false;
        } else {
            self.load_rx = Some(rx);
        }
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        let result = match action {
            ControlPanelAction::None => Ok(()),
            ControlPanelAction::BrowseCsv => {
                self.handle_browse_csv();
                Ok(())
            }
            ControlPanelAction::YearChanged(year) => self
                .dashboard
                .set_selection(SelectionUpdate::year(year), SelectionSource::Slider),
            ControlPanelAction::CountryChanged(country) => self
                .dashboard
                .set_selection(SelectionUpdate::country(country), SelectionSource::Dropdown),
            ControlPanelAction::ExportSvg => {
                self.handle_export_svg();
                Ok(())
            }
            ControlPanelAction::ExportJson => {
                self.handle_export_json();
                Ok(())
            }
        };

        if let Err(e) = result {
            self.control_panel.set_progress(0.0, &format!("Error: {}", e));
        }
    }

    /// Write the four charts as SVG into the export directory
    fn handle_export_svg(&mut self) {
        let dir = self.config.export.output_dir.clone();
        match StaticChartRenderer::export_all(
            self.dashboard.models(),
            &dir,
            self.config.export.width,
            self.config.export.height,
        ) {
            Ok(paths) => {
                tracing::info!(count = paths.len(), dir = %dir.display(), "exported SVG charts");
                self.control_panel.set_progress(
                    100.0,
                    &format!("Exported {} charts to {}", paths.len(), dir.display()),
                );
                self.open_export_dir(&dir);
            }
            Err(e) => {
                tracing::error!(error = %e, "SVG export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Export error: {}", e));
            }
        }
    }

    /// Write the selection and chart models as JSON into the export directory
    fn handle_export_json(&mut self) {
        let dir = self.config.export.output_dir.clone();
        match StaticChartRenderer::export_snapshot(&self.dashboard.snapshot(), &dir) {
            Ok(path) => {
                let selection = self.dashboard.selection();
                tracing::info!(
                    path = %path.display(),
                    year = ?selection.year(),
                    country = ?selection.country(),
                    "exported dashboard snapshot"
                );
                self.control_panel
                    .set_progress(100.0, &format!("Exported {}", path.display()));
                self.open_export_dir(&dir);
            }
            Err(e) => {
                tracing::error!(error = %e, "JSON export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Export error: {}", e));
            }
        }
    }

    fn open_export_dir(&self, dir: &Path) {
        if !self.config.export.open_after_export {
            return;
        }
        if let Err(e) = open::that(dir) {
            tracing::warn!(error = %e, dir = %dir.display(), "could not open export directory");
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &self.dashboard);
                    self.handle_action(action);
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            let size = ui.available_size();
            self.dashboard.resize(Surface::new(size.x, size.y));

            if let Some(click) = ChartViewer::show(ui, &self.dashboard) {
                let update = SelectionUpdate::country(click.country);
                if let Err(e) = self.dashboard.set_selection(update, click.source) {
                    self.control_panel.set_progress(0.0, &format!("Error: {}", e));
                }
            }
        });
    }
}

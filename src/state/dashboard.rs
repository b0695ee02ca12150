//! Dashboard Context
//! Owns the dataset, the selection and the chart models, and is the only
//! place the selection changes.

use crate::charts::{
    BarChartModel, ChartKind, DashboardModels, HistogramModel, LineModel, ScatterModel,
};
use crate::data::{Dataset, LoadReport, LoadedData};
use crate::state::selection::{Selection, SelectionError, SelectionSource, SelectionUpdate};
use serde::Serialize;
use std::sync::Arc;

/// Drawing-surface size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

/// Gap between chart cards
const CARD_SPACING: f32 = 15.0;
/// Below this width the charts stack in a single column
const TWO_COLUMN_MIN_WIDTH: f32 = 900.0;
const MIN_CARD_WIDTH: f32 = 280.0;
const MIN_CARD_HEIGHT: f32 = 220.0;

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn columns(&self) -> usize {
        if self.width >= TWO_COLUMN_MIN_WIDTH {
            2
        } else {
            1
        }
    }

    /// Size of one chart card: a 2x2 grid on wide surfaces, stacked otherwise.
    pub fn card_size(&self) -> (f32, f32) {
        let columns = self.columns() as f32;
        let rows = 4.0 / columns;
        let width = (self.width - CARD_SPACING * (columns + 1.0)) / columns;
        let height = (self.height - CARD_SPACING * (rows + 1.0)) / rows;
        (width.max(MIN_CARD_WIDTH), height.max(MIN_CARD_HEIGHT))
    }

    fn differs(&self, other: &Surface) -> bool {
        (self.width - other.width).abs() > 0.5 || (self.height - other.height).abs() > 0.5
    }
}

/// Values shown by the input widgets, kept in step with the selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlState {
    pub slider_year: i32,
    pub dropdown_country: String,
}

/// Serializable view of the dashboard for JSON export.
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot<'a> {
    pub selection: &'a Selection,
    pub status: &'a str,
    pub models: &'a DashboardModels,
}

/// Application context passed to the GUI: dataset, selection, controls,
/// visual models and status readout.
pub struct Dashboard {
    dataset: Option<Arc<Dataset>>,
    report: LoadReport,
    selection: Selection,
    controls: ControlState,
    models: DashboardModels,
    status: String,
    surface: Surface,
    last_render_order: Vec<ChartKind>,
    render_passes: u64,
}

impl Dashboard {
    /// Empty dashboard; the selection stays unset until [`Dashboard::install`].
    pub fn new(surface: Surface) -> Self {
        Self {
            dataset: None,
            report: LoadReport::default(),
            selection: Selection::default(),
            controls: ControlState::default(),
            models: DashboardModels::default(),
            status: "Waiting for data".to_string(),
            surface,
            last_render_order: Vec::new(),
            render_passes: 0,
        }
    }

    /// Install a freshly loaded dataset and run the first render pass at
    /// `(max_year, default country)`.
    pub fn install(&mut self, loaded: LoadedData) {
        let LoadedData { dataset, report } = loaded;
        self.selection = Selection {
            year: Some(dataset.max_year()),
            country: None,
            country_explicit: false,
        };
        self.dataset = Some(Arc::new(dataset));
        self.report = report;
        self.sync_controls();
        self.render_all();
    }

    /// Drop the dataset and all models.
    pub fn clear(&mut self) {
        *self = Self::new(self.surface);
    }

    /// The single selection mutator shared by the slider, the dropdown and
    /// chart clicks.
    ///
    /// Validates the update, stores it, syncs the widget values, re-renders
    /// every chart in [`ChartKind::RENDER_ORDER`] and refreshes the status
    /// readout. On error nothing changes.
    pub fn set_selection(
        &mut self,
        update: SelectionUpdate,
        source: SelectionSource,
    ) -> Result<(), SelectionError> {
        if let Err(err) = self.validate(&update) {
            tracing::warn!(?source, %err, "selection rejected");
            return Err(err);
        }

        if let Some(year) = update.year {
            self.selection.year = Some(year);
        }
        if let Some(country) = update.country {
            self.selection.country = Some(country);
            self.selection.country_explicit = true;
        }
        tracing::debug!(
            ?source,
            year = ?self.selection.year,
            country = ?self.selection.country,
            "selection changed"
        );

        self.sync_controls();
        self.render_all();
        Ok(())
    }

    fn validate(&self, update: &SelectionUpdate) -> Result<(), SelectionError> {
        let dataset = self.dataset.as_ref().ok_or(SelectionError::NotReady)?;
        if let Some(year) = update.year {
            if !dataset.contains_year(year) {
                return Err(SelectionError::YearOutOfRange {
                    year,
                    min: dataset.min_year(),
                    max: dataset.max_year(),
                });
            }
        }
        if let Some(country) = &update.country {
            if !dataset.contains_country(country) {
                return Err(SelectionError::UnknownCountry(country.clone()));
            }
        }
        Ok(())
    }

    /// Recompute the surface size. Any change triggers a full rebuild of all
    /// charts rather than a rescale.
    pub fn resize(&mut self, surface: Surface) -> bool {
        if !self.surface.differs(&surface) {
            return false;
        }
        tracing::debug!(width = surface.width, height = surface.height, "surface resized");
        self.surface = surface;
        if self.dataset.is_some() {
            self.models = DashboardModels::default();
            self.render_all();
        }
        true
    }

    /// One render pass: bar, histogram, scatter, line.
    fn render_all(&mut self) {
        let Some(dataset) = self.dataset.clone() else {
            return;
        };
        let Some(year) = self.selection.year else {
            return;
        };
        self.last_render_order.clear();

        for kind in ChartKind::RENDER_ORDER {
            let country = self.selection.country.as_deref();
            match kind {
                ChartKind::Bar => {
                    let mut bar = BarChartModel::compute(&dataset, year, country);
                    if !self.selection.country_explicit {
                        let default = bar
                            .as_ref()
                            .and_then(|b| b.top_country())
                            .or_else(|| dataset.first_country())
                            .map(str::to_string);
                        if default != self.selection.country {
                            if let Some(bar) = bar.as_mut() {
                                bar.highlight(default.as_deref());
                            }
                            self.selection.country = default;
                            self.sync_controls();
                        }
                    }
                    self.models.bar = bar;
                }
                ChartKind::Histogram => {
                    self.models.histogram = HistogramModel::compute(&dataset, year);
                }
                ChartKind::Scatter => {
                    self.models.scatter = ScatterModel::compute(&dataset, year, country);
                }
                ChartKind::Line => {
                    self.models.line = LineModel::compute(&dataset, year, country);
                }
            }
            self.last_render_order.push(kind);
        }

        self.render_passes += 1;
        tracing::trace!(
            pass = self.render_passes,
            order = ?self.last_render_order,
            highlighted = ?self.models.highlighted_countries(),
            "render pass complete"
        );
        self.update_status();
    }

    fn sync_controls(&mut self) {
        if let Some(year) = self.selection.year {
            self.controls.slider_year = year;
        }
        self.controls.dropdown_country = self.selection.country.clone().unwrap_or_default();
    }

    fn update_status(&mut self) {
        let (Some(dataset), Some(year)) = (self.dataset.as_ref(), self.selection.year) else {
            return;
        };
        let country = self.selection.country.as_deref().unwrap_or("none");
        let year_rows = self.models.histogram.as_ref().map(|h| h.total).unwrap_or(0);
        self.status = format!(
            "Year {} | {} | {} records | {} rows loaded ({} dropped) | {} countries",
            year,
            country,
            year_rows,
            self.report.kept,
            self.report.dropped(),
            dataset.countries().len()
        );
    }

    pub fn is_ready(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        self.dataset
            .as_ref()
            .map(|d| (d.min_year(), d.max_year()))
    }

    /// Sorted distinct countries for the dropdown.
    pub fn countries(&self) -> &[String] {
        self.dataset
            .as_deref()
            .map(|d| d.countries())
            .unwrap_or(&[])
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn models(&self) -> &DashboardModels {
        &self.models
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn snapshot(&self) -> DashboardSnapshot<'_> {
        DashboardSnapshot {
            selection: &self.selection,
            status: &self.status,
            models: &self.models,
        }
    }
}

#[cfg(test)]
impl Dashboard {
    fn last_render_order(&self) -> &[ChartKind] {
        &self.last_render_order
    }

    fn render_passes(&self) -> u64 {
        self.render_passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::LinePoint;
    use crate::data::Record;

    fn surface() -> Surface {
        Surface::new(1200.0, 800.0)
    }

    fn loaded(records: Vec<Record>) -> LoadedData {
        let kept = records.len();
        LoadedData {
            dataset: Dataset::new(records).unwrap(),
            report: LoadReport {
                total_rows: kept,
                kept,
                ..LoadReport::default()
            },
        }
    }

    fn scenario() -> Dashboard {
        let mut dash = Dashboard::new(surface());
        dash.install(loaded(vec![
            Record::new("Afghanistan", 2010, Some(58.8)).with_gdp(1400.0),
            Record::new("Albania", 2010, Some(76.0)).with_gdp(4200.0),
            Record::new("Afghanistan", 2011, Some(59.2)).with_gdp(1500.0),
        ]));
        dash
    }

    fn wide() -> Dashboard {
        let mut records = Vec::new();
        for (i, name) in ["Chad", "Fiji", "Oman", "Peru", "Togo"].iter().enumerate() {
            for year in 2000..2003 {
                records.push(
                    Record::new(*name, year, Some(50.0 + i as f64 * 5.0 + (year - 2000) as f64))
                        .with_gdp(500.0 * (i + 1) as f64),
                );
            }
        }
        let mut dash = Dashboard::new(surface());
        dash.install(loaded(records));
        dash
    }

    #[test]
    fn test_selection_empty_before_load() {
        let mut dash = Dashboard::new(surface());
        assert!(!dash.selection().is_initialized());
        assert_eq!(
            dash.set_selection(SelectionUpdate::year(2010), SelectionSource::Slider),
            Err(SelectionError::NotReady)
        );
        assert_eq!(dash.render_passes(), 0);
    }

    #[test]
    fn test_example_scenario() {
        let mut dash = scenario();

        assert_eq!(dash.year_range(), Some((2010, 2011)));
        assert_eq!(dash.selection().year(), Some(2011));

        let bar = dash.models().bar.as_ref().unwrap();
        assert_eq!(bar.bars.len(), 1);
        assert_eq!(bar.bars[0].country, "Afghanistan");
        assert_eq!(bar.bars[0].life_expectancy, 59.2);

        dash.set_selection(SelectionUpdate::country("Afghanistan"), SelectionSource::Dropdown)
            .unwrap();
        dash.set_selection(SelectionUpdate::year(2010), SelectionSource::Slider)
            .unwrap();

        let line = dash.models().line.as_ref().unwrap();
        assert_eq!(
            line.marker,
            Some(LinePoint {
                year: 2010,
                life_expectancy: 58.8
            })
        );
        let bar = dash.models().bar.as_ref().unwrap();
        assert_eq!(bar.bars[0].country, "Albania");
        assert!(!bar.bars[0].highlighted);
        assert!(bar.bars[1].highlighted);
        assert_eq!(bar.highlighted().map(|b| b.country.as_str()), Some("Afghanistan"));
    }

    #[test]
    fn test_default_country_is_top_bar() {
        let dash = wide();
        assert_eq!(dash.selection().year(), Some(2002));
        assert_eq!(dash.selection().country(), Some("Togo"));
        assert!(!dash.selection().is_country_explicit());
        assert_eq!(dash.controls().dropdown_country, "Togo");
        assert_eq!(
            dash.models()
                .bar
                .as_ref()
                .and_then(|b| b.highlighted())
                .map(|b| b.country.as_str()),
            Some("Togo")
        );
        assert_eq!(dash.models().line.as_ref().map(|l| l.country.as_str()), Some("Togo"));
    }

    #[test]
    fn test_render_order_and_pass_per_call() {
        let mut dash = wide();
        let before = dash.render_passes();

        dash.set_selection(SelectionUpdate::year(2001), SelectionSource::Slider)
            .unwrap();
        dash.set_selection(SelectionUpdate::year(2000), SelectionSource::Slider)
            .unwrap();

        assert_eq!(dash.render_passes(), before + 2);
        assert_eq!(dash.last_render_order(), &ChartKind::RENDER_ORDER);
        assert_eq!(dash.controls().slider_year, 2000);
        assert!(dash.status().starts_with("Year 2000"));
    }

    #[test]
    fn test_sources_converge() {
        let sources = [
            SelectionSource::Dropdown,
            SelectionSource::BarClick,
            SelectionSource::ScatterClick,
        ];
        let results: Vec<Dashboard> = sources
            .iter()
            .map(|source| {
                let mut dash = wide();
                dash.set_selection(SelectionUpdate::country("Fiji"), *source)
                    .unwrap();
                dash
            })
            .collect();

        for dash in &results {
            assert_eq!(dash.selection(), results[0].selection());
            assert_eq!(dash.models(), results[0].models());
            assert_eq!(dash.controls(), results[0].controls());
            assert_eq!(dash.selection().country(), Some("Fiji"));
        }

        let highlights = results[0].models().highlighted_countries();
        assert_eq!(highlights[0].as_deref(), Some("Fiji"));
        assert_eq!(highlights[2].as_deref(), Some("Fiji"));
        assert_eq!(highlights[3].as_deref(), Some("Fiji"));
    }

    #[test]
    fn test_explicit_country_survives_year_change() {
        let mut dash = wide();
        dash.set_selection(SelectionUpdate::country("Chad"), SelectionSource::BarClick)
            .unwrap();
        dash.set_selection(SelectionUpdate::year(2000), SelectionSource::Slider)
            .unwrap();
        assert_eq!(dash.selection().country(), Some("Chad"));
        assert_eq!(dash.controls().dropdown_country, "Chad");
    }

    #[test]
    fn test_invalid_updates_change_nothing() {
        let mut dash = wide();
        let before = dash.selection().clone();
        let passes = dash.render_passes();

        assert_eq!(
            dash.set_selection(SelectionUpdate::year(1999), SelectionSource::Slider),
            Err(SelectionError::YearOutOfRange {
                year: 1999,
                min: 2000,
                max: 2002
            })
        );
        assert_eq!(
            dash.set_selection(SelectionUpdate::country("Atlantis"), SelectionSource::Dropdown),
            Err(SelectionError::UnknownCountry("Atlantis".into()))
        );
        assert_eq!(dash.selection(), &before);
        assert_eq!(dash.render_passes(), passes);
    }

    #[test]
    fn test_default_falls_back_to_first_record() {
        let mut dash = Dashboard::new(surface());
        dash.install(loaded(vec![
            Record::new("Tonga", 2000, None),
            Record::new("Samoa", 2001, None),
        ]));

        assert_eq!(dash.selection().year(), Some(2001));
        assert_eq!(dash.selection().country(), Some("Tonga"));
        assert!(dash.models().bar.is_none());
        assert!(dash.models().histogram.is_none());
        assert!(dash.models().scatter.is_none());
        assert!(dash.models().line.is_none());
    }

    #[test]
    fn test_resize_rebuilds() {
        let mut dash = wide();
        let passes = dash.render_passes();

        assert!(!dash.resize(surface()));
        assert_eq!(dash.render_passes(), passes);

        assert!(dash.resize(Surface::new(700.0, 900.0)));
        assert_eq!(dash.render_passes(), passes + 1);
        assert!(dash.models().bar.is_some());
        assert_eq!(dash.surface().columns(), 1);
    }

    #[test]
    fn test_card_size() {
        let (w, h) = Surface::new(1215.0, 815.0).card_size();
        assert_eq!((w, h), (585.0, 385.0));
        let (w, _) = Surface::new(300.0, 800.0).card_size();
        assert_eq!(w, MIN_CARD_WIDTH);
    }

    #[test]
    fn test_status_counts_records_and_countries() {
        let mut dash = Dashboard::new(surface());
        dash.install(loaded(vec![
            Record::new("Chad", 2000, Some(50.0)),
            Record::new("Chad", 2000, Some(51.0)),
            Record::new("Peru", 2000, Some(70.0)),
        ]));

        assert!(dash.status().contains("| 3 records |"));
        assert!(dash.status().ends_with("| 2 countries"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let dash = scenario();
        let json = serde_json::to_value(dash.snapshot()).unwrap();
        assert_eq!(json["selection"]["year"], 2011);
        assert_eq!(json["models"]["bar"]["bars"][0]["country"], "Afghanistan");
    }
}

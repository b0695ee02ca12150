//! Static Chart Renderer
//! Draws the visual models as SVG with plotters, for export.
//!
//! Layout of every chart:
//! 1. Title (and optional caption) at the top left
//! 2. Plot area with a left y axis and bottom x axis, nice ticks on both
//! 3. Marks: bars, points or a path, highlighted marks in red

use crate::charts::scale::LinearScale;
use crate::charts::{
    BarChartModel, ChartKind, DashboardModels, HistogramModel, LineModel, ScatterModel,
};
use crate::state::DashboardSnapshot;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Colors (RGB), matching the interactive palette
const HIGHLIGHT: RGBColor = RGBColor(231, 76, 60);
const NEUTRAL: RGBColor = RGBColor(52, 152, 219);
const TEAL: RGBColor = RGBColor(26, 188, 156);
const SLATE: RGBColor = RGBColor(96, 125, 139);
const GRID: RGBColor = RGBColor(220, 220, 220);

/// Smallest surface the layout supports
const MIN_SIZE: u32 = 200;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Nothing to render for the {0:?} chart")]
    Empty(ChartKind),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Plot area inside the surface, in pixels.
struct Frame {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Frame {
    fn new(width: u32, height: u32) -> Self {
        Self {
            left: 60,
            top: 50,
            right: width as i32 - 20,
            bottom: height as i32 - 50,
        }
    }

    fn x_scale(&self, domain: (f64, f64)) -> LinearScale {
        LinearScale::new(domain, (self.left as f64, self.right as f64))
    }

    fn y_scale(&self, domain: (f64, f64)) -> LinearScale {
        LinearScale::new(domain, (self.bottom as f64, self.top as f64))
    }
}

fn text_style(size: u32, color: &'static RGBColor) -> TextStyle<'static> {
    TextStyle::from(("sans-serif", size).into_font()).color(color)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one chart to an SVG document.
    pub fn render_svg(
        models: &DashboardModels,
        kind: ChartKind,
        width: u32,
        height: u32,
    ) -> Result<String, RenderError> {
        let (width, height) = (width.max(MIN_SIZE), height.max(MIN_SIZE));
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            let frame = Frame::new(width, height);

            match kind {
                ChartKind::Bar => {
                    let model = models.bar.as_ref().ok_or(RenderError::Empty(kind))?;
                    Self::draw_bar(&root, &frame, model)?;
                }
                ChartKind::Histogram => {
                    let model = models.histogram.as_ref().ok_or(RenderError::Empty(kind))?;
                    Self::draw_histogram(&root, &frame, model)?;
                }
                ChartKind::Scatter => {
                    let model = models.scatter.as_ref().ok_or(RenderError::Empty(kind))?;
                    Self::draw_scatter(&root, &frame, model)?;
                }
                ChartKind::Line => {
                    let model = models.line.as_ref().ok_or(RenderError::Empty(kind))?;
                    Self::draw_line(&root, &frame, model)?;
                }
            }

            root.present().map_err(draw_err)?;
        }
        Ok(svg)
    }

    /// Write every non-empty chart as `<kind>.svg` into `dir`.
    pub fn export_all(
        models: &DashboardModels,
        dir: &Path,
        width: u32,
        height: u32,
    ) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for kind in ChartKind::RENDER_ORDER {
            if !models.is_drawn(kind) {
                tracing::debug!(?kind, "skipping empty chart");
                continue;
            }
            let svg = Self::render_svg(models, kind, width, height)?;
            let path = dir.join(format!("{}.svg", kind.file_stem()));
            fs::write(&path, svg)?;
            written.push(path);
        }
        Ok(written)
    }

    /// Write the selection and all chart models as `dashboard.json`.
    pub fn export_snapshot(
        snapshot: &DashboardSnapshot<'_>,
        dir: &Path,
    ) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(dir)?;
        let path = dir.join("dashboard.json");
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    fn draw_bar<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        frame: &Frame,
        model: &BarChartModel,
    ) -> Result<(), RenderError> {
        let title = format!("{} ({})", ChartKind::Bar.title(), model.year);
        let y = frame.y_scale((model.y_domain.0, model.y_domain.1 * 1.05));
        Self::draw_title(root, &title, None)?;
        Self::draw_y_axis(root, frame, &y, "Life expectancy")?;

        let n = model.bars.len().max(1);
        let band = (frame.right - frame.left) as f64 / n as f64;
        for (i, bar) in model.bars.iter().enumerate() {
            let x0 = frame.left as f64 + band * (i as f64 + 0.1);
            let x1 = frame.left as f64 + band * (i as f64 + 0.9);
            let top = y.map(bar.life_expectancy);
            let color = if bar.highlighted { HIGHLIGHT } else { NEUTRAL };
            root.draw(&Rectangle::new(
                [(x0 as i32, top as i32), (x1 as i32, frame.bottom)],
                color.filled(),
            ))
            .map_err(draw_err)?;
            root.draw(&Text::new(
                bar.country.clone(),
                (x0 as i32, frame.bottom + 6),
                text_style(10, &BLACK),
            ))
            .map_err(draw_err)?;
        }

        Self::draw_x_axis(root, frame, None, "Country")
    }

    fn draw_histogram<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        frame: &Frame,
        model: &HistogramModel,
    ) -> Result<(), RenderError> {
        let title = format!("{} ({})", ChartKind::Histogram.title(), model.year);
        let x = frame.x_scale(model.x_domain);
        let y = frame.y_scale((0.0, model.max_count as f64 + 1.0));
        Self::draw_title(root, &title, Some(&model.caption()))?;
        Self::draw_y_axis(root, frame, &y, "Records")?;

        for bucket in &model.buckets {
            let x0 = x.map(bucket.x0) as i32;
            let x1 = x.map(bucket.x1) as i32;
            let top = y.map(bucket.count as f64) as i32;
            root.draw(&Rectangle::new([(x0 + 1, top), (x1 - 1, frame.bottom)], TEAL.filled()))
                .map_err(draw_err)?;
        }

        Self::draw_x_axis(root, frame, Some(&x), "Life expectancy (years)")
    }

    fn draw_scatter<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        frame: &Frame,
        model: &ScatterModel,
    ) -> Result<(), RenderError> {
        let title = format!("{} ({})", ChartKind::Scatter.title(), model.year);
        let x = frame.x_scale(model.x_domain);
        let y = frame.y_scale(model.y_domain);
        Self::draw_title(root, &title, None)?;
        Self::draw_y_axis(root, frame, &y, "Life expectancy")?;

        // highlighted points last so they sit on top
        let ordered = model
            .points
            .iter()
            .filter(|p| !p.highlighted)
            .chain(model.highlighted());
        for point in ordered {
            let color = if point.highlighted { HIGHLIGHT } else { NEUTRAL };
            root.draw(&Circle::new(
                (x.map(point.gdp) as i32, y.map(point.life_expectancy) as i32),
                point.radius() as i32,
                color.filled(),
            ))
            .map_err(draw_err)?;
        }

        Self::draw_x_axis(root, frame, Some(&x), "GDP per capita")
    }

    fn draw_line<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        frame: &Frame,
        model: &LineModel,
    ) -> Result<(), RenderError> {
        let title = format!("{}: {}", ChartKind::Line.title(), model.country);
        let x = frame.x_scale(model.x_domain);
        let y = frame.y_scale(model.y_domain);
        Self::draw_title(root, &title, None)?;
        Self::draw_y_axis(root, frame, &y, "Life expectancy")?;

        let path: Vec<(i32, i32)> = model
            .points
            .iter()
            .map(|p| (x.map(p.year as f64) as i32, y.map(p.life_expectancy) as i32))
            .collect();
        root.draw(&PathElement::new(path.clone(), SLATE.stroke_width(2)))
            .map_err(draw_err)?;
        for point in path {
            root.draw(&Circle::new(point, 3, SLATE.filled()))
                .map_err(draw_err)?;
        }

        if let Some(marker) = model.marker {
            root.draw(&Circle::new(
                (
                    x.map(marker.year as f64) as i32,
                    y.map(marker.life_expectancy) as i32,
                ),
                7,
                HIGHLIGHT.filled(),
            ))
            .map_err(draw_err)?;
        }

        Self::draw_x_axis(root, frame, Some(&x), "Year")
    }

    fn draw_title<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        title: &str,
        caption: Option<&str>,
    ) -> Result<(), RenderError> {
        root.draw(&Text::new(title.to_string(), (12, 10), text_style(16, &BLACK)))
            .map_err(draw_err)?;
        if let Some(caption) = caption {
            root.draw(&Text::new(caption.to_string(), (12, 30), text_style(11, &SLATE)))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_y_axis<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        frame: &Frame,
        y: &LinearScale,
        label: &str,
    ) -> Result<(), RenderError> {
        for tick in y.ticks(6) {
            let py = y.map(tick) as i32;
            root.draw(&PathElement::new(
                vec![(frame.left, py), (frame.right, py)],
                GRID.stroke_width(1),
            ))
            .map_err(draw_err)?;
            root.draw(&Text::new(
                format!("{}", tick),
                (frame.left - 40, py - 5),
                text_style(10, &BLACK),
            ))
            .map_err(draw_err)?;
        }
        root.draw(&PathElement::new(
            vec![(frame.left, frame.top), (frame.left, frame.bottom)],
            BLACK.stroke_width(1),
        ))
        .map_err(draw_err)?;
        root.draw(&Text::new(
            label.to_string(),
            (4, frame.top - 14),
            text_style(10, &SLATE),
        ))
        .map_err(draw_err)?;
        Ok(())
    }

    fn draw_x_axis<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        frame: &Frame,
        x: Option<&LinearScale>,
        label: &str,
    ) -> Result<(), RenderError> {
        root.draw(&PathElement::new(
            vec![(frame.left, frame.bottom), (frame.right, frame.bottom)],
            BLACK.stroke_width(1),
        ))
        .map_err(draw_err)?;

        if let Some(x) = x {
            for tick in x.ticks(6) {
                let px = x.map(tick) as i32;
                root.draw(&Text::new(
                    format!("{}", tick),
                    (px - 10, frame.bottom + 6),
                    text_style(10, &BLACK),
                ))
                .map_err(draw_err)?;
            }
        }

        root.draw(&Text::new(
            label.to_string(),
            ((frame.left + frame.right) / 2 - 30, frame.bottom + 28),
            text_style(11, &SLATE),
        ))
        .map_err(draw_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, LoadReport, LoadedData, Record};
    use crate::state::{Dashboard, SelectionSource, SelectionUpdate, Surface};

    fn dashboard() -> Dashboard {
        let records = vec![
            Record::new("Chad", 2000, Some(50.0)).with_gdp(800.0),
            Record::new("Chad", 2001, Some(51.0)).with_gdp(820.0),
            Record::new("Peru", 2000, Some(72.0)).with_gdp(4000.0),
            Record::new("Peru", 2001, Some(72.5)).with_gdp(4100.0),
            Record::new("Fiji", 2001, Some(68.0)).with_gdp(3500.0),
        ];
        let mut dash = Dashboard::new(Surface::new(1200.0, 800.0));
        dash.install(LoadedData {
            dataset: Dataset::new(records).unwrap(),
            report: LoadReport::default(),
        });
        dash
    }

    #[test]
    fn test_bar_svg_has_one_rect_per_bar() {
        let dash = dashboard();
        let svg = StaticChartRenderer::render_svg(dash.models(), ChartKind::Bar, 600, 400).unwrap();

        assert!(svg.contains("<svg"));
        // background + 3 bars
        assert_eq!(svg.matches("<rect").count(), 4);
    }

    #[test]
    fn test_scatter_and_line_svg() {
        let mut dash = dashboard();
        dash.set_selection(SelectionUpdate::country("Chad"), SelectionSource::ScatterClick)
            .unwrap();

        let scatter =
            StaticChartRenderer::render_svg(dash.models(), ChartKind::Scatter, 600, 400).unwrap();
        assert_eq!(scatter.matches("<circle").count(), 3);

        // two path points + the selected-year marker
        let line = StaticChartRenderer::render_svg(dash.models(), ChartKind::Line, 600, 400).unwrap();
        assert_eq!(line.matches("<circle").count(), 3);
        assert!(line.contains("<polyline"));
    }

    #[test]
    fn test_empty_chart_is_an_error() {
        let models = DashboardModels::default();
        let err = StaticChartRenderer::render_svg(&models, ChartKind::Histogram, 600, 400)
            .unwrap_err();
        assert!(matches!(err, RenderError::Empty(ChartKind::Histogram)));
    }

    #[test]
    fn test_export_all_and_snapshot() {
        let dash = dashboard();
        let dir = tempfile::tempdir().unwrap();

        let written =
            StaticChartRenderer::export_all(dash.models(), dir.path(), 500, 300).unwrap();
        let names: Vec<_> = written
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["bar.svg", "histogram.svg", "scatter.svg", "line.svg"]);

        let json_path = StaticChartRenderer::export_snapshot(&dash.snapshot(), dir.path()).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(json["selection"]["country"], "Peru");
    }
}

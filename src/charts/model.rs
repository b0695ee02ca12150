//! Chart Visual Models
//! Pure projections from (dataset, selected year, selected country) to drawable chart data.
//!
//! Every model is rebuilt from scratch on each render pass: scale domains come
//! from the currently filtered subset, never from a previous pass. A model is
//! `None` when its filtered data is empty and the chart skips drawing.

use crate::charts::scale::LinearScale;
use crate::data::{DataProcessor, Dataset};
use crate::stats::{Bucket, StatsCalculator, SummaryStats, HISTOGRAM_BUCKETS};
use serde::Serialize;

/// Number of bars in the bar chart.
pub const TOP_N: usize = 10;

/// Scatter hit radius, as a fraction of each normalized axis.
pub const SCATTER_HIT_TOLERANCE: f64 = 0.03;

/// Domain padding applied to scatter and line axes.
const AXIS_PAD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartKind {
    Bar,
    Histogram,
    Scatter,
    Line,
}

impl ChartKind {
    /// Fixed re-render order: later charts may rely on earlier ones.
    pub const RENDER_ORDER: [ChartKind; 4] = [
        ChartKind::Bar,
        ChartKind::Histogram,
        ChartKind::Scatter,
        ChartKind::Line,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Top 10 Countries by Life Expectancy",
            ChartKind::Histogram => "Life Expectancy Distribution",
            ChartKind::Scatter => "GDP vs Life Expectancy",
            ChartKind::Line => "Life Expectancy Over Time",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Histogram => "histogram",
            ChartKind::Scatter => "scatter",
            ChartKind::Line => "line",
        }
    }
}

/// Hover tooltip content shared by all charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub lines: Vec<String>,
}

impl Tooltip {
    pub fn text(&self) -> String {
        let mut text = self.title.clone();
        for line in &self.lines {
            text.push('\n');
            text.push_str(line);
        }
        text
    }
}

// ===== Bar =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarDatum {
    pub country: String,
    pub life_expectancy: f64,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartModel {
    pub year: i32,
    /// Descending by life expectancy, at most [`TOP_N`], unique countries.
    pub bars: Vec<BarDatum>,
    pub y_domain: (f64, f64),
}

impl BarChartModel {
    pub fn compute(dataset: &Dataset, year: i32, country: Option<&str>) -> Option<Self> {
        let top = DataProcessor::top_countries(dataset, year, TOP_N);
        if top.is_empty() {
            return None;
        }

        let y_max = top.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let bars = top
            .into_iter()
            .map(|(name, value)| BarDatum {
                highlighted: country == Some(name.as_str()),
                country: name,
                life_expectancy: value,
            })
            .collect();

        Some(Self {
            year,
            bars,
            y_domain: (0.0, y_max),
        })
    }

    /// Highest-ranked country for the year.
    pub fn top_country(&self) -> Option<&str> {
        self.bars.first().map(|b| b.country.as_str())
    }

    pub fn highlighted(&self) -> Option<&BarDatum> {
        self.bars.iter().find(|b| b.highlighted)
    }

    /// Re-mark the highlighted bar after the selected country changed.
    pub fn highlight(&mut self, country: Option<&str>) {
        for bar in &mut self.bars {
            bar.highlighted = country == Some(bar.country.as_str());
        }
    }

    /// Bars sit at integer x positions `0..bars.len()`, each 0.8 wide.
    pub fn hit_test(&self, x: f64) -> Option<&BarDatum> {
        let idx = x.round();
        if idx < 0.0 || (x - idx).abs() > 0.4 {
            return None;
        }
        self.bars.get(idx as usize)
    }

    pub fn tooltip(&self, bar: &BarDatum) -> Tooltip {
        Tooltip {
            title: bar.country.clone(),
            lines: vec![
                format!("Year: {}", self.year),
                format!("Life expectancy: {:.1}", bar.life_expectancy),
            ],
        }
    }
}

// ===== Histogram =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramModel {
    pub year: i32,
    pub buckets: Vec<Bucket>,
    /// Number of contributing records; equals the sum of bucket counts.
    pub total: usize,
    pub summary: SummaryStats,
    pub x_domain: (f64, f64),
    pub max_count: usize,
}

impl HistogramModel {
    pub fn compute(dataset: &Dataset, year: i32) -> Option<Self> {
        let values = DataProcessor::life_expectancy_for_year(dataset, year);
        let summary = StatsCalculator::summary(&values)?;
        let buckets = StatsCalculator::histogram(&values, HISTOGRAM_BUCKETS);
        let x_domain = (buckets.first()?.x0, buckets.last()?.x1);
        let max_count = buckets.iter().map(|b| b.count).max().unwrap_or(0);

        Some(Self {
            year,
            total: values.len(),
            buckets,
            summary,
            x_domain,
            max_count,
        })
    }

    pub fn hit_test(&self, x: f64) -> Option<&Bucket> {
        let last = self.buckets.len().checked_sub(1)?;
        self.buckets
            .iter()
            .enumerate()
            .find(|(i, b)| x >= b.x0 && (x < b.x1 || (*i == last && x <= b.x1)))
            .map(|(_, b)| b)
    }

    pub fn tooltip(&self, bucket: &Bucket) -> Tooltip {
        Tooltip {
            title: format!("{:.1} - {:.1} years", bucket.x0, bucket.x1),
            lines: vec![
                format!("Records: {}", bucket.count),
                format!("Year: {}", self.year),
            ],
        }
    }

    /// One-line description used as the chart subtitle.
    pub fn caption(&self) -> String {
        match self.summary.std_dev {
            Some(sd) => format!(
                "n = {}, mean {:.1}, sd {:.1}",
                self.total, self.summary.mean, sd
            ),
            None => format!("n = {}, mean {:.1}", self.total, self.summary.mean),
        }
    }
}

// ===== Scatter =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub country: String,
    pub status: Option<String>,
    pub gdp: f64,
    pub life_expectancy: f64,
    pub population: Option<f64>,
    pub highlighted: bool,
}

impl ScatterPoint {
    pub fn radius(&self) -> f32 {
        if self.highlighted {
            7.0
        } else {
            4.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterModel {
    pub year: i32,
    pub points: Vec<ScatterPoint>,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
}

impl ScatterModel {
    pub fn compute(dataset: &Dataset, year: i32, country: Option<&str>) -> Option<Self> {
        let points: Vec<ScatterPoint> = DataProcessor::records_for_year(dataset, year)
            .into_iter()
            .filter_map(|r| {
                Some(ScatterPoint {
                    country: r.country.clone(),
                    status: r.status.clone(),
                    gdp: r.gdp?,
                    life_expectancy: r.life_expectancy?,
                    population: r.population,
                    highlighted: country == Some(r.country.as_str()),
                })
            })
            .collect();

        let x_domain = padded_domain(points.iter().map(|p| p.gdp))?;
        let y_domain = padded_domain(points.iter().map(|p| p.life_expectancy))?;

        Some(Self {
            year,
            points,
            x_domain,
            y_domain,
        })
    }

    /// Nearest point within [`SCATTER_HIT_TOLERANCE`] in domain-normalized space.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&ScatterPoint> {
        let x_scale = LinearScale::new(self.x_domain, (0.0, 1.0));
        let y_scale = LinearScale::new(self.y_domain, (0.0, 1.0));
        let (nx, ny) = (x_scale.normalize(x), y_scale.normalize(y));

        self.points
            .iter()
            .map(|p| {
                let dx = x_scale.normalize(p.gdp) - nx;
                let dy = y_scale.normalize(p.life_expectancy) - ny;
                (p, (dx * dx + dy * dy).sqrt())
            })
            .filter(|(_, d)| *d <= SCATTER_HIT_TOLERANCE)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(p, _)| p)
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.points.iter().filter(|p| p.highlighted)
    }

    pub fn tooltip(&self, point: &ScatterPoint) -> Tooltip {
        let mut lines = vec![
            format!("GDP: {:.0}", point.gdp),
            format!("Life expectancy: {:.1}", point.life_expectancy),
        ];
        if let Some(pop) = point.population {
            lines.push(format!("Population: {:.0}", pop));
        }
        if let Some(status) = &point.status {
            lines.push(status.clone());
        }
        Tooltip {
            title: format!("{} ({})", point.country, self.year),
            lines,
        }
    }
}

// ===== Line =====

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinePoint {
    pub year: i32,
    pub life_expectancy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineModel {
    pub country: String,
    /// Ascending by year, one point per year.
    pub points: Vec<LinePoint>,
    /// The point at the selected year, if the country has one.
    pub marker: Option<LinePoint>,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
}

impl LineModel {
    pub fn compute(dataset: &Dataset, year: i32, country: Option<&str>) -> Option<Self> {
        let country = country?;
        let points: Vec<LinePoint> = DataProcessor::country_series(dataset, country)
            .into_iter()
            .map(|(year, life_expectancy)| LinePoint {
                year,
                life_expectancy,
            })
            .collect();

        let first = points.first()?;
        let last = points.last()?;
        let x_domain = (first.year as f64, last.year as f64);
        let y_domain = padded_domain(points.iter().map(|p| p.life_expectancy))?;
        let marker = points.iter().copied().find(|p| p.year == year);

        Some(Self {
            country: country.to_string(),
            points,
            marker,
            x_domain,
            y_domain,
        })
    }

    /// Point whose year is nearest to `x`, within half a year.
    pub fn hit_test(&self, x: f64) -> Option<&LinePoint> {
        self.points
            .iter()
            .find(|p| (p.year as f64 - x).abs() <= 0.5)
    }

    pub fn tooltip(&self, point: &LinePoint) -> Tooltip {
        Tooltip {
            title: format!("{} ({})", self.country, point.year),
            lines: vec![format!("Life expectancy: {:.1}", point.life_expectancy)],
        }
    }

    /// Tooltip for the selected-year marker.
    pub fn marker_tooltip(&self) -> Option<Tooltip> {
        let marker = self.marker?;
        Some(Tooltip {
            title: format!("{}, selected year {}", self.country, marker.year),
            lines: vec![format!("Life expectancy: {:.1}", marker.life_expectancy)],
        })
    }
}

fn padded_domain(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    LinearScale::from_extent(values, AXIS_PAD)
}

/// The four chart models produced by one render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardModels {
    pub bar: Option<BarChartModel>,
    pub histogram: Option<HistogramModel>,
    pub scatter: Option<ScatterModel>,
    pub line: Option<LineModel>,
}

impl DashboardModels {
    pub fn is_drawn(&self, kind: ChartKind) -> bool {
        match kind {
            ChartKind::Bar => self.bar.is_some(),
            ChartKind::Histogram => self.histogram.is_some(),
            ChartKind::Scatter => self.scatter.is_some(),
            ChartKind::Line => self.line.is_some(),
        }
    }

    /// Country highlighted in each chart, in render order.
    pub fn highlighted_countries(&self) -> [Option<String>; 4] {
        [
            self.bar
                .as_ref()
                .and_then(|m| m.highlighted())
                .map(|b| b.country.clone()),
            None,
            self.scatter
                .as_ref()
                .and_then(|m| m.highlighted().next())
                .map(|p| p.country.clone()),
            self.line.as_ref().map(|m| m.country.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn dataset() -> Dataset {
        let mut records = Vec::new();
        for i in 0..14 {
            records.push(
                Record::new(format!("Country{:02}", i), 2010, Some(50.0 + i as f64))
                    .with_gdp(1000.0 * (i + 1) as f64),
            );
        }
        records.push(Record::new("Country13", 2010, Some(40.0)));
        records.push(Record::new("Country00", 2008, Some(47.0)));
        records.push(Record::new("Country00", 2009, Some(48.5)));
        records.push(Record::new("NoGdp", 2010, Some(55.5)));
        Dataset::new(records).unwrap()
    }

    #[test]
    fn test_bar_top_ten_sorted_unique() {
        let ds = dataset();
        let bar = BarChartModel::compute(&ds, 2010, Some("Country12")).unwrap();

        assert_eq!(bar.bars.len(), TOP_N);
        assert!(bar
            .bars
            .windows(2)
            .all(|w| w[0].life_expectancy >= w[1].life_expectancy));
        let mut names: Vec<_> = bar.bars.iter().map(|b| b.country.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), bar.bars.len());

        // duplicate row with a lower value does not displace the max
        assert_eq!(bar.bars[0].country, "Country13");
        assert_eq!(bar.bars[0].life_expectancy, 63.0);
        assert_eq!(bar.top_country(), Some("Country13"));
        assert_eq!(bar.highlighted().map(|b| b.country.as_str()), Some("Country12"));
        assert_eq!(bar.bars.iter().filter(|b| b.highlighted).count(), 1);
    }

    #[test]
    fn test_bar_empty_year_skips() {
        assert!(BarChartModel::compute(&dataset(), 1999, None).is_none());
    }

    #[test]
    fn test_bar_hit_test() {
        let bar = BarChartModel::compute(&dataset(), 2010, None).unwrap();
        assert_eq!(bar.hit_test(0.1).map(|b| b.country.as_str()), Some("Country13"));
        assert_eq!(bar.hit_test(2.0).map(|b| b.country.as_str()), Some("Country11"));
        assert!(bar.hit_test(0.5).is_none());
        assert!(bar.hit_test(-1.0).is_none());
        assert!(bar.hit_test(12.0).is_none());
    }

    #[test]
    fn test_histogram_counts_match_records() {
        let ds = dataset();
        let hist = HistogramModel::compute(&ds, 2010).unwrap();
        let expected = DataProcessor::records_for_year(&ds, 2010).len();

        assert_eq!(hist.buckets.len(), HISTOGRAM_BUCKETS);
        assert_eq!(hist.total, expected);
        assert_eq!(hist.buckets.iter().map(|b| b.count).sum::<usize>(), expected);
        assert_eq!(hist.x_domain, (40.0, 63.0));
        assert!(hist.caption().starts_with("n = 16"));
    }

    #[test]
    fn test_histogram_hit_test_includes_max() {
        let hist = HistogramModel::compute(&dataset(), 2010).unwrap();
        let last = hist.hit_test(63.0).unwrap();
        assert_eq!(last.x1, 63.0);
        assert!(hist.hit_test(70.0).is_none());
        let tip = hist.tooltip(last);
        assert!(tip.title.contains("63.0"));
        assert_eq!(tip.lines[0], format!("Records: {}", last.count));
    }

    #[test]
    fn test_scatter_requires_gdp() {
        let ds = dataset();
        let scatter = ScatterModel::compute(&ds, 2010, Some("Country03")).unwrap();

        assert!(scatter.points.iter().all(|p| p.country != "NoGdp"));
        assert_eq!(scatter.points.len(), 14);
        let highlighted: Vec<_> = scatter.highlighted().collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].radius(), 7.0);
        assert!(scatter.x_domain.0 < 1000.0 && scatter.x_domain.1 > 14000.0);
    }

    #[test]
    fn test_scatter_hit_test() {
        let scatter = ScatterModel::compute(&dataset(), 2010, None).unwrap();
        let hit = scatter.hit_test(4010.0, 53.05).unwrap();
        assert_eq!(hit.country, "Country03");
        assert!(scatter.hit_test(7500.0, 40.0).is_none());
    }

    #[test]
    fn test_line_sorted_with_single_marker() {
        let ds = dataset();
        let line = LineModel::compute(&ds, 2009, Some("Country00")).unwrap();

        let years: Vec<i32> = line.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2008, 2009, 2010]);
        assert_eq!(
            line.marker,
            Some(LinePoint {
                year: 2009,
                life_expectancy: 48.5
            })
        );
        assert_eq!(line.x_domain, (2008.0, 2010.0));
        assert!(line.marker_tooltip().is_some());

        let outside = LineModel::compute(&ds, 2015, Some("Country00")).unwrap();
        assert!(outside.marker.is_none());
        assert!(outside.marker_tooltip().is_none());
    }

    #[test]
    fn test_line_needs_country() {
        let ds = dataset();
        assert!(LineModel::compute(&ds, 2010, None).is_none());
        assert!(LineModel::compute(&ds, 2010, Some("Atlantis")).is_none());
    }

    #[test]
    fn test_tooltip_text() {
        let tip = Tooltip {
            title: "Chad".into(),
            lines: vec!["a".into(), "b".into()],
        };
        assert_eq!(tip.text(), "Chad\na\nb");
    }
}

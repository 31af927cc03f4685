//! Chart specifications and chart ownership.
//!
//! A [`ChartSpec`] is a rendering-agnostic description of one chart (datasets,
//! colours, axis labels). A [`ChartBackend`] turns specs into live charts;
//! [`ChartSlots`] keeps at most one live chart per projection and releases
//! the previous one before installing its replacement.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::analysis::Dashboard;
use crate::error::Result;
use crate::models::{
    ConditionCategory, ConditionCounts, ConditionSeries, DatePoint, FeedbackPoint, PricePoint,
    Projection, Theme,
};

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

fn point_fill(category: ConditionCategory) -> &'static str {
    match category {
        ConditionCategory::New => "rgba(123, 191, 98, 0.5)",
        ConditionCategory::Used => "rgba(96, 165, 250, 0.5)",
        ConditionCategory::Other => "rgba(209, 213, 219, 0.5)",
    }
}

fn point_border(category: ConditionCategory) -> &'static str {
    match category {
        ConditionCategory::New => "rgba(39, 145, 0, 0.75)",
        ConditionCategory::Used => "rgba(0, 100, 210, 0.75)",
        ConditionCategory::Other => "rgba(153, 153, 153, 0.75)",
    }
}

fn bar_fill(category: ConditionCategory) -> &'static str {
    match category {
        ConditionCategory::New => "#279100",
        ConditionCategory::Used => "#0064D2",
        ConditionCategory::Other => "#999999",
    }
}

fn text_color(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "#333333",
        Theme::Dark => "#bcbcbc",
    }
}

fn grid_color(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "#e5e5e5",
        Theme::Dark => "#333333",
    }
}

// ---------------------------------------------------------------------------
// ChartSpec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    /// `{x, y}` objects for scatter charts, plain numbers for bar charts.
    pub data: Vec<Value>,
    pub background_color: Vec<String>,
    pub border_color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub projection: Projection,
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub text_color: String,
    pub grid_color: String,
}

impl ChartSpec {
    fn scatter<P>(
        projection: Projection,
        series: &ConditionSeries<P>,
        theme: Theme,
        axes: (&str, &str),
        point: impl Fn(&P) -> Value,
    ) -> Self {
        let datasets = series
            .iter()
            .map(|(category, points)| Dataset {
                label: category.label().to_string(),
                data: points.iter().map(&point).collect(),
                background_color: vec![point_fill(category).to_string()],
                border_color: vec![point_border(category).to_string()],
            })
            .collect();

        Self {
            projection,
            kind: ChartKind::Scatter,
            title: projection.title().to_string(),
            x_label: axes.0.to_string(),
            y_label: axes.1.to_string(),
            labels: Vec::new(),
            datasets,
            text_color: text_color(theme).to_string(),
            grid_color: grid_color(theme).to_string(),
        }
    }

    /// Strip plot of prices; every point sits at `y = 0`.
    pub fn price_distribution(series: &ConditionSeries<PricePoint>, theme: Theme) -> Self {
        Self::scatter(
            Projection::PriceDistribution,
            series,
            theme,
            ("Price ($)", ""),
            |p| json!({ "x": p.price, "y": 0 }),
        )
    }

    pub fn price_vs_feedback(series: &ConditionSeries<FeedbackPoint>, theme: Theme) -> Self {
        Self::scatter(
            Projection::PriceVsFeedback,
            series,
            theme,
            ("Seller feedback (%)", "Price ($)"),
            |p| json!({ "x": p.feedback, "y": p.price }),
        )
    }

    pub fn price_vs_date(series: &ConditionSeries<DatePoint>, theme: Theme) -> Self {
        Self::scatter(
            Projection::PriceVsDate,
            series,
            theme,
            ("Date listed", "Price ($)"),
            |p| {
                json!({
                    "x": p.listed.to_rfc3339_opts(SecondsFormat::Millis, true),
                    "y": p.price,
                })
            },
        )
    }

    pub fn condition_counts(counts: &ConditionCounts, theme: Theme) -> Self {
        let projection = Projection::ConditionCounts;
        Self {
            projection,
            kind: ChartKind::Bar,
            title: projection.title().to_string(),
            x_label: "Condition".to_string(),
            y_label: "Listings".to_string(),
            labels: ConditionCategory::ALL
                .iter()
                .map(|c| c.label().to_string())
                .collect(),
            datasets: vec![Dataset {
                label: "Listings".to_string(),
                data: ConditionCategory::ALL
                    .iter()
                    .map(|c| json!(counts.get(*c)))
                    .collect(),
                background_color: ConditionCategory::ALL
                    .iter()
                    .map(|c| bar_fill(*c).to_string())
                    .collect(),
                border_color: ConditionCategory::ALL
                    .iter()
                    .map(|c| bar_fill(*c).to_string())
                    .collect(),
            }],
            text_color: text_color(theme).to_string(),
            grid_color: grid_color(theme).to_string(),
        }
    }
}

/// Specs for every projection of a dashboard, in display order. `None` marks
/// a projection without data.
pub fn chart_specs(dashboard: &Dashboard, theme: Theme) -> Vec<(Projection, Option<ChartSpec>)> {
    vec![
        (
            Projection::PriceDistribution,
            dashboard
                .price_distribution
                .series()
                .map(|s| ChartSpec::price_distribution(s, theme)),
        ),
        (
            Projection::PriceVsFeedback,
            dashboard
                .price_vs_feedback
                .series()
                .map(|s| ChartSpec::price_vs_feedback(s, theme)),
        ),
        (
            Projection::PriceVsDate,
            dashboard
                .price_vs_date
                .series()
                .map(|s| ChartSpec::price_vs_date(s, theme)),
        ),
        (
            Projection::ConditionCounts,
            Some(ChartSpec::condition_counts(&dashboard.condition_counts, theme)),
        ),
    ]
}

// ---------------------------------------------------------------------------
// ChartBackend / ChartSlots
// ---------------------------------------------------------------------------

/// Something that can draw a chart from a spec and later release it.
pub trait ChartBackend {
    /// Handle to a live chart.
    type Chart;

    fn draw(&mut self, spec: &ChartSpec) -> Result<Self::Chart>;

    fn release(&mut self, chart: Self::Chart) -> Result<()>;
}

/// Projections drawn and skipped by [`ChartSlots::render_dashboard`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub rendered: Vec<Projection>,
    pub skipped: Vec<Projection>,
}

/// Owns at most one live chart per projection.
pub struct ChartSlots<B: ChartBackend> {
    backend: B,
    slots: [Option<B::Chart>; 4],
}

impl<B: ChartBackend> ChartSlots<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            slots: [None, None, None, None],
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_live(&self, projection: Projection) -> bool {
        self.slots[projection.index()].is_some()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Draw `spec` into its projection's slot, releasing any chart already there.
    pub fn install(&mut self, spec: &ChartSpec) -> Result<()> {
        self.clear(spec.projection)?;
        let chart = self.backend.draw(spec)?;
        self.slots[spec.projection.index()] = Some(chart);
        debug!(projection = spec.projection.slug(), "chart installed");
        Ok(())
    }

    /// Release the chart in a slot. Returns whether one was live.
    pub fn clear(&mut self, projection: Projection) -> Result<bool> {
        match self.slots[projection.index()].take() {
            Some(chart) => {
                self.backend.release(chart)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Release every live chart.
    pub fn clear_all(&mut self) -> Result<()> {
        for projection in Projection::ALL {
            self.clear(projection)?;
        }
        Ok(())
    }

    /// Draw every projection of `dashboard` that has data. Slots of
    /// projections without data are emptied and reported as skipped.
    pub fn render_dashboard(&mut self, dashboard: &Dashboard, theme: Theme) -> Result<RenderReport> {
        let mut report = RenderReport::default();
        for (projection, spec) in chart_specs(dashboard, theme) {
            match spec {
                Some(spec) => {
                    self.install(&spec)?;
                    report.rendered.push(projection);
                }
                None => {
                    self.clear(projection)?;
                    warn!(projection = projection.slug(), "no data; chart skipped");
                    report.skipped.push(projection);
                }
            }
        }
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// JsonFileBackend
// ---------------------------------------------------------------------------

/// Writes each chart spec to `<dir>/<slug>.json`; releasing a chart deletes
/// its file.
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChartBackend for JsonFileBackend {
    type Chart = PathBuf;

    fn draw(&mut self, spec: &ChartSpec) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.json", spec.projection.slug()));
        fs::write(&path, serde_json::to_vec_pretty(spec)?)?;
        Ok(path)
    }

    fn release(&mut self, chart: PathBuf) -> Result<()> {
        match fs::remove_file(&chart) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

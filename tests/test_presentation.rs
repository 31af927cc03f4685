//! Presentation adapter tests: metric text, table rows, titles, chart specs
//! and chart slot ownership.

mod common;

use std::fs;

use listing_insights::analysis::aggregate::summarize;
use listing_insights::models::Projection;
use listing_insights::presentation::charts::{chart_specs, RenderReport};
use listing_insights::presentation::{
    capitalize_words, dashboard_title, format_amount, round_cents, table_rows, ChartBackend,
    ChartKind, ChartSlots, ChartSpec, JsonFileBackend, MetricCards,
};
use listing_insights::{Dashboard, Result, Theme};
use serde_json::json;

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[test]
fn amounts_round_half_away_from_zero() {
    assert_eq!(round_cents(-0.125), -0.13);
    assert_eq!(format_amount(Some(20.0)), "$20.00");
    assert_eq!(format_amount(Some(0.125)), "$0.13");
    assert_eq!(format_amount(None), "N/A");
}

#[test]
fn huge_amounts_are_not_rounded_to_infinity() {
    assert_eq!(round_cents(1e307), 1e307);
    assert_eq!(round_cents(-f64::MAX), -f64::MAX);
    let text = format_amount(Some(1e307));
    assert!(text.starts_with("$1000"));
    assert!(text.ends_with(".00"));
    assert!(!text.contains("inf"));
}

#[test]
fn metric_cards_for_sample() {
    let cards = MetricCards::from(&summarize(&common::sample_listings()));
    assert_eq!(cards.total_listings, "5");
    assert_eq!(cards.average_price, "$24.62");
    assert_eq!(cards.min_price, "$8.00");
    assert_eq!(cards.max_price, "$45.50");
}

#[test]
fn metric_cards_without_prices() {
    let listings = common::listings(vec![json!({ "price": "free" })]);
    let cards = MetricCards::from(&summarize(&listings));
    assert_eq!(cards.total_listings, "1");
    assert_eq!(cards.average_price, "N/A");
    assert_eq!(cards.max_price, "N/A");
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

#[test]
fn table_rows_format_each_listing() {
    let rows = table_rows(&common::sample_listings());
    assert_eq!(rows.len(), 5);

    assert_eq!(rows[0].number, 1);
    assert_eq!(rows[0].price, "$29.99");
    assert_eq!(rows[0].seller, "gamestop_outlet (99.5%)");
    assert_eq!(rows[0].category, "Video Game Consoles");

    assert_eq!(rows[2].price, "EUR45.50");
    assert_eq!(rows[2].link, "N/A");
    assert_eq!(rows[2].seller, "eu_trader (N/A%)");

    assert_eq!(rows[3].category, "Video Games");
    assert_eq!(rows[4].price, "$8");
    assert_eq!(rows[4].cells()[0], "5");
}

#[test]
fn table_row_without_fields() {
    let rows = table_rows(&common::listings(vec![json!({})]));
    assert_eq!(
        rows[0].cells(),
        ["1", "N/A", "N/A", "N/A", "N/A", "N/A", "N/A"].map(String::from)
    );
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

#[test]
fn titles_capitalize_each_word() {
    assert_eq!(capitalize_words("nintendo SWITCH oled"), "Nintendo Switch Oled");
    assert_eq!(capitalize_words("a  b"), "A  B");
    assert_eq!(dashboard_title("lego star wars"), "Overview: Lego Star Wars");
}

// ---------------------------------------------------------------------------
// Chart specs
// ---------------------------------------------------------------------------

#[test]
fn chart_specs_follow_theme() {
    let dashboard = Dashboard::build(&common::sample_listings());
    let specs = chart_specs(&dashboard, Theme::Light);
    assert_eq!(specs.len(), 4);
    for (projection, spec) in &specs {
        let spec = spec.as_ref().unwrap();
        assert_eq!(spec.projection, *projection);
        assert_eq!(spec.text_color, "#333333");
        assert_eq!(spec.grid_color, "#e5e5e5");
    }

    let dark = chart_specs(&dashboard, Theme::Dark);
    assert_eq!(dark[0].1.as_ref().unwrap().text_color, "#bcbcbc");
}

#[test]
fn scatter_spec_has_one_dataset_per_condition() {
    let dashboard = Dashboard::build(&common::sample_listings());
    let spec = ChartSpec::price_distribution(
        dashboard.price_distribution.series().unwrap(),
        Theme::Dark,
    );
    assert_eq!(spec.kind, ChartKind::Scatter);
    let labels: Vec<&str> = spec.datasets.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["New", "Used", "Other"]);
    assert_eq!(
        spec.datasets[1].data,
        vec![json!({ "x": 15.0, "y": 0 }), json!({ "x": 45.5, "y": 0 })]
    );
}

#[test]
fn condition_count_spec_is_a_bar_chart() {
    let dashboard = Dashboard::build(&common::sample_listings());
    let spec = ChartSpec::condition_counts(&dashboard.condition_counts, Theme::Dark);
    assert_eq!(spec.kind, ChartKind::Bar);
    assert_eq!(spec.labels, vec!["New", "Used", "Other"]);
    assert_eq!(spec.datasets[0].data, vec![json!(2), json!(2), json!(1)]);

    let value = serde_json::to_value(&spec).unwrap();
    assert_eq!(value["kind"], "bar");
    assert_eq!(value["projection"], "condition_counts");
    assert!(value["datasets"][0]["backgroundColor"].is_array());
}

#[test]
fn projections_without_data_have_no_spec() {
    let listings = common::listings(vec![json!({ "price": "n/a", "condition": "Used" })]);
    let specs = chart_specs(&Dashboard::build(&listings), Theme::Dark);
    assert!(specs[0].1.is_none());
    assert!(specs[1].1.is_none());
    assert!(specs[2].1.is_none());
    assert!(specs[3].1.is_some());
}

// ---------------------------------------------------------------------------
// ChartSlots
// ---------------------------------------------------------------------------

/// Backend that hands out numbered charts and logs every call.
#[derive(Default)]
struct RecordingBackend {
    next: u32,
    events: Vec<String>,
}

impl ChartBackend for RecordingBackend {
    type Chart = u32;

    fn draw(&mut self, spec: &ChartSpec) -> Result<u32> {
        self.next += 1;
        self.events
            .push(format!("draw {} #{}", spec.projection.slug(), self.next));
        Ok(self.next)
    }

    fn release(&mut self, chart: u32) -> Result<()> {
        self.events.push(format!("release #{chart}"));
        Ok(())
    }
}

#[test]
fn install_releases_previous_chart_first() {
    let dashboard = Dashboard::build(&common::sample_listings());
    let spec = ChartSpec::condition_counts(&dashboard.condition_counts, Theme::Dark);
    let mut slots = ChartSlots::new(RecordingBackend::default());

    slots.install(&spec).unwrap();
    slots.install(&spec).unwrap();

    assert_eq!(slots.live_count(), 1);
    assert_eq!(
        slots.backend().events,
        vec![
            "draw new-vs-used-chart #1",
            "release #1",
            "draw new-vs-used-chart #2",
        ]
    );
}

#[test]
fn rerender_keeps_one_chart_per_projection() {
    let dashboard = Dashboard::build(&common::sample_listings());
    let mut slots = ChartSlots::new(RecordingBackend::default());

    slots.render_dashboard(&dashboard, Theme::Dark).unwrap();
    slots.render_dashboard(&dashboard, Theme::Light).unwrap();

    assert_eq!(slots.live_count(), 4);
    let releases = slots
        .backend()
        .events
        .iter()
        .filter(|e| e.starts_with("release"))
        .count();
    assert_eq!(releases, 4);
}

#[test]
fn render_skips_and_clears_projections_without_data() {
    let mut slots = ChartSlots::new(RecordingBackend::default());
    slots
        .render_dashboard(&Dashboard::build(&common::sample_listings()), Theme::Dark)
        .unwrap();

    let unpriced = common::listings(vec![json!({ "price": "n/a" })]);
    let report = slots
        .render_dashboard(&Dashboard::build(&unpriced), Theme::Dark)
        .unwrap();

    assert_eq!(
        report,
        RenderReport {
            rendered: vec![Projection::ConditionCounts],
            skipped: vec![
                Projection::PriceDistribution,
                Projection::PriceVsFeedback,
                Projection::PriceVsDate,
            ],
        }
    );
    assert!(!slots.is_live(Projection::PriceDistribution));
    assert!(slots.is_live(Projection::ConditionCounts));
    assert_eq!(slots.live_count(), 1);
}

#[test]
fn clear_all_releases_everything() {
    let mut slots = ChartSlots::new(RecordingBackend::default());
    slots
        .render_dashboard(&Dashboard::build(&common::sample_listings()), Theme::Dark)
        .unwrap();
    slots.clear_all().unwrap();
    assert_eq!(slots.live_count(), 0);
    assert!(!slots.clear(Projection::PriceVsDate).unwrap());
}

#[test]
fn json_file_backend_writes_and_removes_files() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = JsonFileBackend::new(tmp.path().join("charts")).unwrap();
    let dir = backend.dir().to_path_buf();
    let mut slots = ChartSlots::new(backend);

    slots
        .render_dashboard(&Dashboard::build(&common::sample_listings()), Theme::Dark)
        .unwrap();
    let written = dir.join("price-vs-date.json");
    let spec: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(spec["kind"], "scatter");
    assert_eq!(spec["datasets"][0]["data"][0]["x"], "2024-03-01T10:15:00.000Z");

    slots.clear(Projection::PriceVsDate).unwrap();
    assert!(!written.exists());
    assert!(dir.join("new-vs-used-chart.json").exists());
}

//! Search history, theme preference and key-value store tests.

mod common;

use std::fs;

use chrono::{TimeZone, Utc};
use listing_insights::config;
use listing_insights::{KeyValueStore, ListingInsights, Theme};

// ---------------------------------------------------------------------------
// HistoryQuery
// ---------------------------------------------------------------------------

#[test]
fn empty_history_by_default() {
    let (insights, _tmp) = common::temp_insights();
    assert!(insights.history().list().is_empty());
    assert!(insights.history().most_recent().is_none());
}

#[test]
fn record_inserts_at_front_with_timestamp() {
    let (insights, _tmp) = common::temp_insights();
    let history = insights.history();
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap();
    assert!(history.record_at("switch", at).unwrap());
    assert!(history.record("lego").unwrap());

    let entries = history.list();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].query, "lego");
    assert_eq!(entries[1].query, "switch");
    assert_eq!(entries[1].timestamp, "2024-03-01T10:15:00.000Z");
}

#[test]
fn record_dedupes_ignoring_case() {
    let (insights, _tmp) = common::temp_insights();
    let history = insights.history();
    history.record("Switch").unwrap();
    history.record("lego").unwrap();
    history.record("SWITCH").unwrap();

    let queries: Vec<String> = history.list().into_iter().map(|e| e.query).collect();
    assert_eq!(queries, vec!["SWITCH", "lego"]);
}

#[test]
fn record_ignores_blank_queries() {
    let (insights, _tmp) = common::temp_insights();
    assert!(!insights.history().record("   ").unwrap());
    assert!(insights.history().list().is_empty());
}

#[test]
fn history_is_capped() {
    let (insights, _tmp) = common::temp_insights();
    let history = insights.history();
    for i in 0..25 {
        history.record(&format!("query {i}")).unwrap();
    }
    let entries = history.list();
    assert_eq!(entries.len(), config::HISTORY_LIMIT);
    assert_eq!(entries[0].query, "query 24");
    assert_eq!(entries.last().unwrap().query, "query 5");
}

#[test]
fn clear_removes_history() {
    let (insights, _tmp) = common::temp_insights();
    insights.history().record("switch").unwrap();
    insights.history().clear().unwrap();
    assert!(insights.history().list().is_empty());
    // clearing twice is fine
    insights.history().clear().unwrap();
}

#[test]
fn history_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let insights = ListingInsights::builder().data_dir(tmp.path()).build().unwrap();
        insights.history().record("switch").unwrap();
    }
    let insights = ListingInsights::builder().data_dir(tmp.path()).build().unwrap();
    assert_eq!(insights.history().most_recent().unwrap().query, "switch");
}

#[test]
fn unreadable_history_value_reads_as_empty() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut store = KeyValueStore::open(Some(tmp.path().to_path_buf())).unwrap();
        store.set(config::HISTORY_KEY, "not a list").unwrap();
    }
    let insights = ListingInsights::builder().data_dir(tmp.path()).build().unwrap();
    assert!(insights.history().list().is_empty());
    insights.history().record("switch").unwrap();
    assert_eq!(insights.history().list().len(), 1);
}

// ---------------------------------------------------------------------------
// PreferenceQuery
// ---------------------------------------------------------------------------

#[test]
fn theme_defaults_to_dark() {
    let (insights, _tmp) = common::temp_insights();
    assert_eq!(insights.preferences().theme(), Theme::Dark);
}

#[test]
fn toggle_theme_flips_and_persists() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let insights = ListingInsights::builder().data_dir(tmp.path()).build().unwrap();
        assert_eq!(insights.preferences().toggle_theme().unwrap(), Theme::Light);
    }
    let insights = ListingInsights::builder().data_dir(tmp.path()).build().unwrap();
    assert_eq!(insights.preferences().theme(), Theme::Light);
    assert_eq!(insights.preferences().toggle_theme().unwrap(), Theme::Dark);
}

#[test]
fn theme_parses_from_text() {
    assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
    assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
    assert!("sepia".parse::<Theme>().is_err());
    assert_eq!(Theme::Light.to_string(), "light");
}

#[test]
fn unknown_stored_theme_reads_as_dark() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let mut store = KeyValueStore::open(Some(tmp.path().to_path_buf())).unwrap();
        store.set(config::THEME_KEY, "sepia").unwrap();
    }
    let insights = ListingInsights::builder().data_dir(tmp.path()).build().unwrap();
    assert_eq!(insights.preferences().theme(), Theme::Dark);
}

// ---------------------------------------------------------------------------
// KeyValueStore
// ---------------------------------------------------------------------------

#[test]
fn store_set_get_remove() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = KeyValueStore::open(Some(tmp.path().to_path_buf())).unwrap();
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    assert_eq!(store.get("a"), Some("1"));
    assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
    assert!(store.remove("a").unwrap());
    assert!(!store.remove("a").unwrap());
    assert_eq!(store.get("a"), None);
    assert!(store.path().exists());
}

#[test]
fn store_clear_deletes_file() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = KeyValueStore::open(Some(tmp.path().to_path_buf())).unwrap();
    store.set("a", "1").unwrap();
    store.clear().unwrap();
    assert!(store.keys().is_empty());
    assert!(!store.path().exists());
}

#[test]
fn corrupt_store_file_is_removed() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(config::STORE_FILE);
    fs::write(&path, "{ this is not json").unwrap();

    let store = KeyValueStore::open(Some(tmp.path().to_path_buf())).unwrap();
    assert!(store.keys().is_empty());
    assert!(!path.exists());
}

#[test]
fn open_creates_missing_data_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let nested = tmp.path().join("a").join("b");
    let mut store = KeyValueStore::open(Some(nested.clone())).unwrap();
    store.set("k", "v").unwrap();
    assert!(nested.join(config::STORE_FILE).exists());
}

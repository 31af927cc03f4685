//! Saving and loading listing collections for offline analysis.
//!
//! Paths ending in `.gz` are gzip-compressed transparently.

use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;
use tracing::info;

use crate::client::parse_search_response;
use crate::error::{InsightsError, Result};
use crate::models::Listing;

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// Write listings as a JSON array.
pub fn save_snapshot(path: &Path, listings: &[Listing]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = fs::File::create(path)?;
    if is_gzip(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, listings)?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, listings)?;
        writer.flush()?;
    }

    info!(path = %path.display(), listings = listings.len(), "snapshot saved");
    Ok(())
}

/// Read a snapshot: either a JSON array of listings or a search response
/// object with an `itemSummaries` array.
pub fn load_snapshot(path: &Path) -> Result<Vec<Listing>> {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(InsightsError::NotFound(format!(
                "snapshot {}",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };
    let mut contents = String::new();
    if is_gzip(path) {
        BufReader::new(GzDecoder::new(BufReader::new(file))).read_to_string(&mut contents)?;
    } else {
        BufReader::new(file).read_to_string(&mut contents)?;
    }

    let value: Value = serde_json::from_str(&contents)?;
    let listings = match &value {
        Value::Array(items) => items.iter().map(Listing::from_json).collect(),
        other => parse_search_response(other),
    };
    Ok(listings)
}

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::merge::MergedRecord;

const HEADER: [&str; 4] = ["Country", "Code", "Continent", "Region"];

#[derive(Serialize)]
struct CsvRow<'a> {
    country: &'a str,
    code: Option<&'a str>,
    continent: &'a str,
    region: &'a str,
}

impl<'a> From<&'a MergedRecord> for CsvRow<'a> {
    fn from(r: &'a MergedRecord) -> Self {
        CsvRow {
            country: &r.name,
            code: r.code.as_deref(),
            continent: &r.continent,
            region: &r.region,
        }
    }
}

/// Write `Country,Code,Continent,Region` rows; a missing code is an empty field.
pub fn write_csv(path: &Path, records: &[MergedRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    wtr.write_record(HEADER)?;
    for record in records {
        wtr.serialize(CsvRow::from(record))?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write {:?}", path))?;

    info!("Created {} with {} countries", path.display(), records.len());
    Ok(())
}

/// Fixed-width table of the first `limit` rows.
pub fn preview(records: &[MergedRecord], limit: usize) -> String {
    let mut out = format!(
        "{:>3} | {:<32} | {:<4} | {:<12} | {:<24}\n",
        "#", HEADER[0], HEADER[1], HEADER[2], HEADER[3]
    );
    out.push_str(&"-".repeat(88));
    out.push('\n');
    for (i, r) in records.iter().take(limit).enumerate() {
        out.push_str(&format!(
            "{:>3} | {:<32} | {:<4} | {:<12} | {:<24}\n",
            i + 1,
            truncate(&r.name, 32),
            r.code.as_deref().unwrap_or(""),
            truncate(&r.continent, 12),
            truncate(&r.region, 24),
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

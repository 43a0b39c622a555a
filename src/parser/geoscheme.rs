use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{link_or_text, names};
use crate::overrides;

static SORTABLE_WIKITABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.wikitable.sortable").unwrap());
static WIKITABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.wikitable").unwrap());
static WIKITABLE_LIKE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"table[class*="wikitable"]"#).unwrap());
static TR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static TD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// A listing table needs more than this many `id` rows to be picked by the scan tier.
const MIN_ID_ROWS: usize = 10;

const NAME_CELL: usize = 0;
const REGION_CELL: usize = 1;
const CONTINENT_CELL: usize = 3;
const MIN_CELLS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRecord {
    pub name: String,
    pub continent: String,
    pub region: String,
}

#[derive(Debug, Error)]
pub enum RowError {
    #[error("expected at least 4 cells, found {found}")]
    TooFewCells { found: usize },
    #[error("{name} already recorded")]
    Duplicate { name: String },
}

// ── Table location ──

struct TableTier {
    name: &'static str,
    find: fn(&Html) -> Option<ElementRef<'_>>,
}

/// Tried in order; the first tier that returns a table wins.
const TABLE_TIERS: &[TableTier] = &[
    TableTier {
        name: "sortable wikitable",
        find: find_sortable_wikitable,
    },
    TableTier {
        name: "wikitable",
        find: find_wikitable,
    },
    TableTier {
        name: "wikitable scan",
        find: scan_wikitables,
    },
];

fn find_sortable_wikitable(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&SORTABLE_WIKITABLE_SEL).next()
}

fn find_wikitable(doc: &Html) -> Option<ElementRef<'_>> {
    doc.select(&WIKITABLE_SEL).next()
}

fn scan_wikitables(doc: &Html) -> Option<ElementRef<'_>> {
    let tables: Vec<ElementRef> = doc.select(&WIKITABLE_LIKE_SEL).collect();
    info!("Found {} wikitables", tables.len());

    tables.into_iter().enumerate().find_map(|(i, table)| {
        let body = tbody(table)?;
        let id_rows = body.select(&TR_SEL).filter(|r| row_id(*r).is_some()).count();
        if id_rows > MIN_ID_ROWS {
            info!("Using table {} with {} country rows", i + 1, id_rows);
            Some(table)
        } else {
            None
        }
    })
}

pub fn locate_table(doc: &Html) -> Option<ElementRef<'_>> {
    TABLE_TIERS.iter().find_map(|tier| {
        let table = (tier.find)(doc)?;
        info!("Found countries table via {}", tier.name);
        Some(table)
    })
}

fn tbody(table: ElementRef) -> Option<ElementRef> {
    table
        .children()
        .filter_map(ElementRef::wrap)
        .find(|c| c.value().name() == "tbody")
}

fn row_id(row: ElementRef) -> Option<&str> {
    row.value().attr("id").filter(|id| !id.is_empty())
}

// ── Row extraction ──

/// Scrape `(name, continent, region)` records from the geoscheme table.
pub fn extract(doc: &Html) -> Vec<ClassificationRecord> {
    let Some(table) = locate_table(doc) else {
        warn!("Could not find the countries table");
        return Vec::new();
    };

    let rows: Vec<ElementRef> = match tbody(table) {
        Some(body) => body.select(&TR_SEL).collect(),
        None => {
            debug!("No tbody found, reading rows directly from table");
            table.select(&TR_SEL).collect()
        }
    };
    info!("Found {} total rows", rows.len());

    let mut records: Vec<ClassificationRecord> = Vec::new();
    for row in rows {
        // header and spacer rows carry no id
        let Some(id) = row_id(row) else {
            continue;
        };

        let accepted = extract_row(row).and_then(|rec| match rec {
            Some(rec) => check_unique(&records, rec).map(Some),
            None => Ok(None),
        });
        match accepted {
            Ok(Some(rec)) => {
                if records.len() < 5 {
                    debug!("Processed: {} | {} | {}", rec.name, rec.continent, rec.region);
                }
                records.push(rec);
            }
            Ok(None) => {}
            Err(e) => warn!(row = id, "Error processing row: {}", e),
        }
    }

    for name in overrides::ensure_present(&mut records) {
        info!("Added {} manually", name);
    }

    info!("Successfully processed {} countries", records.len());
    records
}

/// `Ok(None)` when a required field is empty.
fn extract_row(row: ElementRef) -> Result<Option<ClassificationRecord>, RowError> {
    let cells: Vec<ElementRef> = row.select(&TD_SEL).collect();
    if cells.len() < MIN_CELLS {
        return Err(RowError::TooFewCells { found: cells.len() });
    }

    let name = names::normalize(&link_or_text(cells[NAME_CELL]));
    let mut region = link_or_text(cells[REGION_CELL]);
    let mut continent = link_or_text(cells[CONTINENT_CELL]);

    // the source row for a self-classified entity is unreliable
    if overrides::rule_for(&name).is_some_and(|r| r.classify_as_self) {
        continent = name.clone();
        region = name.clone();
    }

    if name.is_empty() || continent.is_empty() || region.is_empty() {
        return Ok(None);
    }
    Ok(Some(ClassificationRecord {
        name,
        continent,
        region,
    }))
}

fn check_unique(
    records: &[ClassificationRecord],
    rec: ClassificationRecord,
) -> Result<ClassificationRecord, RowError> {
    let must_be_unique = overrides::rule_for(&rec.name).is_some_and(|r| r.ensure_present);
    if must_be_unique && records.iter().any(|r| r.name == rec.name) {
        return Err(RowError::Duplicate { name: rec.name });
    }
    Ok(rec)
}

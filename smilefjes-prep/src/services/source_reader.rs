//! Inspection table ingestion
//!
//! Fetches the semicolon-delimited inspection table (URL or local file) and
//! parses it into [`InspectionRecord`]s. Columns are located by header name,
//! so column order and extra columns in the source do not matter.

use crate::error::{PrepError, PrepResult};
use crate::models::InspectionRecord;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;

/// Public Mattilsynet inspection table
pub const DEFAULT_SOURCE_URL: &str = "https://hotell.difi.no/download/mattilsynet/smilefjes/tilsyn";

/// Highest per-criterion column number (`karakter1`..`karakter10`)
pub const MAX_CRITERIA: usize = 10;

/// Fetch the raw table text from a URL or a local path
pub async fn load_source(client: &reqwest::Client, location: &str) -> PrepResult<String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        tracing::info!(url = %location, "Downloading inspection table");

        let response = client
            .get(location)
            .send()
            .await
            .map_err(|e| PrepError::Source(format!("GET {} failed: {}", location, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrepError::SourceStatus(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| PrepError::Source(format!("Reading body of {} failed: {}", location, e)))
    } else {
        tracing::info!(path = %location, "Reading inspection table from disk");
        tokio::fs::read_to_string(Path::new(location))
            .await
            .map_err(|e| PrepError::Source(format!("Read {} failed: {}", location, e)))
    }
}

/// Header positions of the columns the pipeline reads
#[derive(Debug)]
struct Columns {
    entity_id: usize,
    name: usize,
    date: usize,
    total_rating: usize,
    org_number: Option<usize>,
    address_lines: Vec<usize>,
    postal_code: Option<usize>,
    postal_place: Option<usize>,
    status: Option<usize>,
    criteria: Vec<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> PrepResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| find(name).ok_or(PrepError::MissingColumn(name));

        Ok(Self {
            entity_id: require("tilsynsobjektid")?,
            name: require("navn")?,
            date: require("dato")?,
            total_rating: require("total_karakter")?,
            org_number: find("orgnummer"),
            address_lines: ["adrlinje1", "adrlinje2"]
                .iter()
                .filter_map(|name| find(*name))
                .collect(),
            postal_code: find("postnr"),
            postal_place: find("poststed"),
            status: find("status"),
            criteria: (1..=MAX_CRITERIA)
                .filter_map(|n| find(format!("karakter{}", n).as_str()))
                .collect(),
        })
    }

    fn record(&self, row: &StringRecord) -> InspectionRecord {
        InspectionRecord {
            entity_id: text(row, Some(self.entity_id)).unwrap_or_default(),
            org_number: text(row, self.org_number),
            name: text(row, Some(self.name)).unwrap_or_default(),
            address_lines: self
                .address_lines
                .iter()
                .filter_map(|&idx| text(row, Some(idx)))
                .collect(),
            postal_code: text(row, self.postal_code),
            postal_place: text(row, self.postal_place),
            status: text(row, self.status),
            date: text(row, Some(self.date)).unwrap_or_default(),
            total_rating: text(row, Some(self.total_rating)),
            criteria: self.criteria.iter().map(|&idx| text(row, Some(idx))).collect(),
        }
    }
}

/// Trimmed non-empty field value
fn text(row: &StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse semicolon-delimited inspection rows
///
/// Short rows are tolerated (missing trailing fields read as blank).
pub fn parse_inspection_table(text: &str) -> PrepResult<Vec<InspectionRecord>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let columns = Columns::from_headers(reader.headers()?)?;
    tracing::debug!(criteria_columns = columns.criteria.len(), "Located source columns");

    let mut records = Vec::new();
    for row in reader.records() {
        records.push(columns.record(&row?));
    }

    Ok(records)
}

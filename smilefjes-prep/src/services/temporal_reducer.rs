//! Latest-inspection-per-establishment reduction

use crate::models::InspectionRecord;
use indexmap::IndexMap;

/// Entity id → latest inspection, in first-appearance order of the id
pub type LatestRecordIndex = IndexMap<String, InspectionRecord>;

/// Result of reducing a batch of rows
#[derive(Debug, Default)]
pub struct Reduction {
    pub latest: LatestRecordIndex,
    /// Rows lacking entity id, date or name
    pub excluded: usize,
}

/// Turn DDMMYYYY into the integer YYYYMMDD
///
/// Anything other than exactly eight ASCII digits yields `0`, which sorts
/// before every real date.
pub fn parse_inspection_date(date: &str) -> u32 {
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }

    let (day, rest) = date.split_at(2);
    let (month, year) = rest.split_at(2);
    format!("{}{}{}", year, month, day).parse().unwrap_or(0)
}

/// Keep the latest record per entity id
///
/// A later record replaces the stored one only if its parsed date is
/// strictly greater, so equal dates keep the first record seen.
pub fn reduce_latest<I>(records: I) -> Reduction
where
    I: IntoIterator<Item = InspectionRecord>,
{
    let mut reduction = Reduction::default();

    for record in records {
        if !record.is_reducible() {
            reduction.excluded += 1;
            continue;
        }

        let date = parse_inspection_date(&record.date);
        match reduction.latest.get_mut(&record.entity_id) {
            Some(existing) => {
                if date > parse_inspection_date(&existing.date) {
                    *existing = record;
                }
            }
            None => {
                reduction.latest.insert(record.entity_id.clone(), record);
            }
        }
    }

    reduction
}

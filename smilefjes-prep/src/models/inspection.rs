//! Raw inspection record

/// One inspection event from the source table
///
/// Optional text fields are `None` when the column is missing or blank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InspectionRecord {
    /// Establishment identifier (`tilsynsobjektid`)
    pub entity_id: String,
    /// Organisation number as written in the table, untrimmed of validity
    pub org_number: Option<String>,
    pub name: String,
    /// Non-blank `adrlinje1`/`adrlinje2` values in column order
    pub address_lines: Vec<String>,
    pub postal_code: Option<String>,
    pub postal_place: Option<String>,
    pub status: Option<String>,
    /// Inspection date as DDMMYYYY text
    pub date: String,
    /// Legacy aggregate rating (`total_karakter`)
    pub total_rating: Option<String>,
    /// Per-criterion ratings (`karakter1`..), one slot per column present
    pub criteria: Vec<Option<String>>,
}

impl InspectionRecord {
    /// Whether the record carries everything needed to take part in reduction
    pub fn is_reducible(&self) -> bool {
        !self.entity_id.is_empty() && !self.date.is_empty() && !self.name.is_empty()
    }

    /// Address assembled from the record's own columns
    ///
    /// Every non-blank component is joined with `", "`.
    pub fn fallback_address(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .address_lines
            .iter()
            .map(String::as_str)
            .chain(self.postal_code.as_deref())
            .chain(self.postal_place.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> InspectionRecord {
        InspectionRecord {
            entity_id: "Z0001".to_string(),
            name: "Kafe Sol".to_string(),
            date: "01012024".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_reducible_requires_id_date_and_name() {
        assert!(record().is_reducible());
        assert!(!InspectionRecord { name: String::new(), ..record() }.is_reducible());
        assert!(!InspectionRecord { date: String::new(), ..record() }.is_reducible());
        assert!(!InspectionRecord { entity_id: String::new(), ..record() }.is_reducible());
    }

    #[test]
    fn test_fallback_address_joins_with_commas() {
        let rec = InspectionRecord {
            address_lines: vec!["Storgata 1".to_string(), "2. etg".to_string()],
            postal_code: Some("0150".to_string()),
            postal_place: Some("OSLO".to_string()),
            ..record()
        };
        assert_eq!(
            rec.fallback_address().as_deref(),
            Some("Storgata 1, 2. etg, 0150, OSLO")
        );
    }

    #[test]
    fn test_fallback_address_empty() {
        assert_eq!(record().fallback_address(), None);
    }
}

//! Smile-face rating derivation
//!
//! Per-criterion ratings run 0 (no remarks) to 3 (serious breach); 4 and 5
//! mean "not applicable" and "not assessed". The public rating is the worst
//! applicable criterion. Only when no criterion qualifies does the legacy
//! aggregate (`total_karakter`) count, and only within the same 0–3 range.
//!
//! The map client recomputes its display rating with the same rule, so any
//! change here has to be mirrored there.

use serde::Deserialize;

/// Highest rating that counts toward the derived score
pub const MAX_RATING: f64 = 3.0;

/// A rating value as it appears in source data: a number or numeric text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RatingField {
    Number(f64),
    Text(String),
}

impl From<&str> for RatingField {
    fn from(s: &str) -> Self {
        RatingField::Text(s.to_string())
    }
}

/// Derived public rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Score(u8),
    Unknown,
}

impl Rating {
    pub fn score(self) -> Option<u8> {
        match self {
            Rating::Score(s) => Some(s),
            Rating::Unknown => None,
        }
    }
}

/// Numeric value of a field, `None` when absent or not a finite number
pub fn parse_rating_number(field: &RatingField) -> Option<f64> {
    let value = match field {
        RatingField::Number(n) => *n,
        RatingField::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
    };

    value.is_finite().then_some(value)
}

fn qualifying(field: Option<&RatingField>) -> Option<f64> {
    field
        .and_then(parse_rating_number)
        .filter(|v| (0.0..=MAX_RATING).contains(v))
}

/// Derive the public rating from criteria, falling back to the legacy total
///
/// A fractional qualifying value truncates toward zero.
pub fn derive_rating(criteria: &[Option<RatingField>], legacy: Option<&RatingField>) -> Rating {
    let worst = criteria
        .iter()
        .filter_map(|c| qualifying(c.as_ref()))
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

    match worst.or_else(|| qualifying(legacy)) {
        Some(v) => Rating::Score(v as u8),
        None => Rating::Unknown,
    }
}

/// Derive from the text columns of an inspection record
pub fn derive_from_text(criteria: &[Option<String>], legacy: Option<&str>) -> Rating {
    let criteria: Vec<Option<RatingField>> = criteria
        .iter()
        .map(|c| c.as_deref().map(RatingField::from))
        .collect();
    derive_rating(&criteria, legacy.map(RatingField::from).as_ref())
}

/// Best-effort integer of the legacy total, `-1` when unparseable
///
/// Leading integer text wins (`"2"`, `" 3 "`); otherwise a finite decimal is
/// truncated (`"2.7"` → 2).
pub fn parse_legacy_rating(value: Option<&str>) -> i64 {
    let Some(text) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return -1;
    };

    if let Ok(n) = text.parse::<i64>() {
        return n;
    }

    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => n.trunc() as i64,
        _ => -1,
    }
}

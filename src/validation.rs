use chrono::{DateTime, Utc};

use crate::error::{PrmError, PrmResult};
use crate::model::GeoPoint;

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> PrmResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(PrmError::BlankField {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

/// Validates that a set/vec is non-empty.
pub fn non_empty_set<T>(value: &[T], field: &str) -> PrmResult<()> {
    if value.is_empty() {
        Err(PrmError::EmptySet {
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Latitude must lie in [-90, 90] and longitude in [-180, 180].
pub fn geo_point(point: GeoPoint) -> PrmResult<GeoPoint> {
    let lat_ok = point.lat.is_finite() && (-90.0..=90.0).contains(&point.lat);
    let lng_ok = point.lng.is_finite() && (-180.0..=180.0).contains(&point.lng);
    if lat_ok && lng_ok {
        Ok(point)
    } else {
        Err(PrmError::InvalidCoordinates {
            lat: point.lat,
            lng: point.lng,
        })
    }
}

pub fn optional_geo_point(point: Option<GeoPoint>) -> PrmResult<Option<GeoPoint>> {
    point.map(geo_point).transpose()
}

/// An optional end must not precede the start.
pub fn date_range(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    field: &str,
) -> PrmResult<()> {
    match end {
        Some(end) if end < start => Err(PrmError::InvalidDateRange {
            field: field.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Trims every entry, drops blanks, and removes case-insensitive duplicates
/// keeping the first occurrence.
pub fn string_list(values: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lower = trimmed.to_lowercase();
        if seen.contains(&lower) {
            continue;
        }
        seen.push(lower);
        out.push(trimmed.to_string());
    }
    out
}

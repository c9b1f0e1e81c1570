pub mod schema;
pub mod user_repo;
pub mod person_repo;
pub mod organization_repo;
pub mod event_repo;
pub mod interaction_repo;
pub mod preference_repo;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::{PrmError, PrmResult};
use crate::model::{GeoPoint, Id};

/// Timestamps are stored as RFC 3339 UTC with a `Z` suffix and a fixed
/// nine-digit fraction, so text ordering matches time ordering and nothing
/// is lost on the way back.
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_timestamp(s: &str) -> PrmResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PrmError::Other(format!("Invalid timestamp '{}': {}", s, e)))
}

pub(crate) fn parse_id<T>(s: &str) -> PrmResult<Id<T>> {
    Ok(Id::new(
        Uuid::parse_str(s).map_err(|e| PrmError::Other(format!("Invalid UUID: {}", e)))?,
    ))
}

pub(crate) fn parse_optional_id<T>(s: Option<String>) -> PrmResult<Option<Id<T>>> {
    s.as_deref().map(parse_id).transpose()
}

pub(crate) fn point_from_columns(lat: Option<f64>, lng: Option<f64>) -> Option<GeoPoint> {
    GeoPoint::from_parts(lat, lng)
}

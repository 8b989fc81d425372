use serde::{Serialize, Serializer};

use super::adapter::ExtractedFields;
use super::classification::VulnerabilityRating;

/// Rendered in place of a date the data source does not provide.
pub const UNKNOWN_DATE: &str = "unknown";

/// Normalized inlet, ready for map overlays and listing views.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    pub id: String,
    pub geocode: String,
    pub vulnerability_rating: VulnerabilityRating,
    pub location: String,
    #[serde(serialize_with = "serialize_date_or_unknown")]
    pub install_date: Option<String>,
    #[serde(serialize_with = "serialize_date_or_unknown")]
    pub last_inspection: Option<String>,
}

fn serialize_date_or_unknown<S: Serializer>(
    date: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(date.as_deref().unwrap_or(UNKNOWN_DATE))
}

/// Identifier of the feature at `index`: the trimmed name, or `inlet-<index>` when the name is
/// missing or blank. Fallback ids are only stable as long as the input order is.
pub fn record_id(name: Option<&str>, index: usize) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("inlet-{}", index),
    }
}

/// Latitude first, both fixed to 5 decimals.
pub fn format_location(location: &geo::Point) -> String {
    format!("{:.5}, {:.5}", location.y(), location.x())
}

pub fn assemble(
    fields: ExtractedFields,
    rating: VulnerabilityRating,
    index: usize,
) -> DomainRecord {
    let id = record_id(fields.name.as_deref(), index);
    DomainRecord {
        geocode: id.clone(),
        id,
        vulnerability_rating: rating,
        location: format_location(&fields.location),
        install_date: fields.install_date,
        last_inspection: fields.last_inspection,
    }
}

use serde::Deserialize;
use serde_json::Value;

use crate::geofile::feature::{PropertyMap, RawFeature};

use super::error::GeometryDefect;

pub const DEFAULT_NAME_FIELD: &str = "In_Name";
pub const DEFAULT_ELEVATION_FIELD: &str = "Inv_Elev";

/// Property keys read from each feature's property bag.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PropertySchema {
    pub name_field: String,
    pub elevation_field: String,
    // Unset until the data source carries inspection records.
    pub install_date_field: Option<String>,
    pub last_inspection_field: Option<String>,
}

impl Default for PropertySchema {
    fn default() -> Self {
        Self {
            name_field: DEFAULT_NAME_FIELD.to_string(),
            elevation_field: DEFAULT_ELEVATION_FIELD.to_string(),
            install_date_field: None,
            last_inspection_field: None,
        }
    }
}

/// Typed fields extracted from one raw feature.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub elevation: Option<f64>,
    /// x is longitude, y is latitude.
    pub location: geo::Point,
    pub install_date: Option<String>,
    pub last_inspection: Option<String>,
}

/// Validate the geometry of `feature` and pull the schema's fields out of its properties.
///
/// Only the geometry can fail. Property fields that are missing or carry a value of the wrong
/// JSON type come back as `None`.
pub fn extract(
    feature: &RawFeature,
    schema: &PropertySchema,
) -> Result<ExtractedFields, GeometryDefect> {
    let location = validate_coordinates(&feature.coordinates)?;
    let properties = &feature.properties;
    Ok(ExtractedFields {
        name: string_property(properties, &schema.name_field),
        elevation: number_property(properties, &schema.elevation_field),
        location,
        install_date: schema
            .install_date_field
            .as_ref()
            .and_then(|field| string_property(properties, field)),
        last_inspection: schema
            .last_inspection_field
            .as_ref()
            .and_then(|field| string_property(properties, field)),
    })
}

fn validate_coordinates(coordinates: &[f64]) -> Result<geo::Point, GeometryDefect> {
    let (longitude, latitude) = match coordinates {
        [longitude, latitude] => (*longitude, *latitude),
        _ => return Err(GeometryDefect::WrongArity(coordinates.len())),
    };
    if !longitude.is_finite() || !latitude.is_finite() {
        return Err(GeometryDefect::NonFinite {
            longitude,
            latitude,
        });
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(GeometryDefect::LongitudeOutOfRange(longitude));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(GeometryDefect::LatitudeOutOfRange(latitude));
    }
    Ok(geo::Point::new(longitude, latitude))
}

fn string_property(properties: &PropertyMap, key: &str) -> Option<String> {
    match properties.get(key) {
        Some(Value::String(value)) => Some(value.to_owned()),
        _ => None,
    }
}

fn number_property(properties: &PropertyMap, key: &str) -> Option<f64> {
    properties
        .get(key)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
}

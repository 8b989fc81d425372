use geojson::JsonObject;

/// Untyped property bag of a feature, as found in GeoJSON `properties`.
pub type PropertyMap = JsonObject;

/// A point feature as it comes from the data source, before any validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeature {
    pub id: Option<String>,
    // Kept as a plain list so that wrong arity or non-finite values reach the schema adapter
    // instead of failing the whole read.
    pub coordinates: Vec<f64>,
    pub properties: PropertyMap,
}

impl RawFeature {
    pub fn new(longitude: f64, latitude: f64, properties: PropertyMap) -> Self {
        Self {
            id: None,
            coordinates: vec![longitude, latitude],
            properties,
        }
    }
}

impl From<geojson::Feature> for RawFeature {
    fn from(feature: geojson::Feature) -> Self {
        let id = feature.id.map(|id| match id {
            geojson::feature::Id::String(id) => id,
            geojson::feature::Id::Number(id) => id.to_string(),
        });
        let coordinates = match feature.geometry.map(|geometry| geometry.value) {
            Some(geojson::Value::Point(position)) => position,
            _ => Vec::new(),
        };
        Self {
            id,
            coordinates,
            properties: feature.properties.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use geojson::{Feature, Geometry, Value};
    use rstest::rstest;
    use serde_json::json;

    use super::RawFeature;

    #[rstest]
    fn test_point_feature_conversion() {
        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![123.9, 10.3]))),
            id: Some(geojson::feature::Id::Number(serde_json::Number::from(7))),
            properties: json!({"In_Name": "A1", "Inv_Elev": 35})
                .as_object()
                .cloned(),
            foreign_members: None,
        };
        let raw = RawFeature::from(feature);
        assert_eq!(raw.id.as_deref(), Some("7"));
        assert_eq!(raw.coordinates, vec![123.9, 10.3]);
        assert_eq!(raw.properties.get("In_Name"), Some(&json!("A1")));
    }

    #[rstest]
    fn test_non_point_feature_has_no_coordinates() {
        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(vec![
                vec![0.0, 0.0],
                vec![1.0, 1.0],
            ]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        let raw = RawFeature::from(feature);
        assert!(raw.coordinates.is_empty());
        assert!(raw.properties.is_empty());
    }
}

use std::collections::HashSet;

use rayon::prelude::*;

use crate::geofile::feature::RawFeature;

use super::{
    adapter::{extract, PropertySchema},
    classification::{classify, ClassificationThresholds},
    error::{FeatureError, NormalizeError},
    record::{assemble, DomainRecord},
};

/// Outcome for one input feature, at the same position as the feature.
pub type NormalizedFeature = Result<DomainRecord, FeatureError>;

/// How a batch of features is walked. Every strategy must return one entry per input feature,
/// in input order.
pub trait NormalizeStrategy {
    fn normalize_batch(
        features: &[RawFeature],
        schema: &PropertySchema,
        thresholds: &ClassificationThresholds,
    ) -> Vec<NormalizedFeature>;
}

/// Single pass over the features on the calling thread.
pub struct Sequential;

impl NormalizeStrategy for Sequential {
    fn normalize_batch(
        features: &[RawFeature],
        schema: &PropertySchema,
        thresholds: &ClassificationThresholds,
    ) -> Vec<NormalizedFeature> {
        features
            .iter()
            .enumerate()
            .map(|(index, feature)| normalize_feature(index, feature, schema, thresholds))
            .collect()
    }
}

/// Spreads the features over the rayon thread pool. The original index travels with each
/// feature, so fallback ids and output positions match `Sequential`.
pub struct Parallel;

impl NormalizeStrategy for Parallel {
    fn normalize_batch(
        features: &[RawFeature],
        schema: &PropertySchema,
        thresholds: &ClassificationThresholds,
    ) -> Vec<NormalizedFeature> {
        features
            .par_iter()
            .enumerate()
            .map(|(index, feature)| normalize_feature(index, feature, schema, thresholds))
            .collect()
    }
}

/// Normalize `features` with the default property schema, one feature after the other.
pub fn normalize(
    features: &[RawFeature],
    thresholds: &ClassificationThresholds,
) -> Result<Vec<NormalizedFeature>, NormalizeError> {
    normalize_with::<Sequential>(features, &PropertySchema::default(), thresholds)
}

/// Normalize `features` using strategy `S`.
///
/// Fails only when the thresholds are unusable, before any feature is looked at. A feature
/// with bad geometry produces an `Err` entry at its position and the rest of the batch is still
/// processed. This includes features with an empty or missing coordinate pair, which come back
/// as `GeometryDefect::WrongArity(0)` rather than failing the call.
///
/// Record ids are unique within the output: the first record keeps its id and every later
/// record with the same id gets its index appended, see `make_ids_unique`.
pub fn normalize_with<S: NormalizeStrategy>(
    features: &[RawFeature],
    schema: &PropertySchema,
    thresholds: &ClassificationThresholds,
) -> Result<Vec<NormalizedFeature>, NormalizeError> {
    thresholds.validate()?;
    log::debug!("Normalizing {} features", features.len());
    let mut normalized = S::normalize_batch(features, schema, thresholds);
    make_ids_unique(&mut normalized);
    Ok(normalized)
}

/// Rename records whose id was already given to an earlier record to `<id>-<index>`, repeating
/// the suffix until the id is free. Runs over the ordered output, so the result does not depend
/// on the strategy.
fn make_ids_unique(normalized: &mut [NormalizedFeature]) {
    let mut taken: HashSet<String> = HashSet::with_capacity(normalized.len());
    for (index, entry) in normalized.iter_mut().enumerate() {
        let record = match entry {
            Ok(record) => record,
            Err(_) => continue,
        };
        if taken.contains(&record.id) {
            let mut unique_id = format!("{}-{}", record.id, index);
            while taken.contains(&unique_id) {
                unique_id = format!("{}-{}", unique_id, index);
            }
            log::warn!(
                "Id {} is already used by an earlier record, renaming record {} to {}",
                record.id,
                index,
                unique_id
            );
            record.id = unique_id.clone();
            record.geocode = unique_id;
        }
        taken.insert(record.id.clone());
    }
}

fn normalize_feature(
    index: usize,
    feature: &RawFeature,
    schema: &PropertySchema,
    thresholds: &ClassificationThresholds,
) -> NormalizedFeature {
    let fields = extract(feature, schema).map_err(|defect| FeatureError::MalformedGeometry {
        index,
        feature_id: feature.id.clone(),
        defect,
    })?;
    let rating = classify(fields.elevation, thresholds);
    Ok(assemble(fields, rating, index))
}


#[cfg(test)]
mod scenario_tests {
    use rstest::rstest;
    use serde_json::json;

    use crate::geofile::feature::RawFeature;
    use crate::inlets::classification::{ClassificationThresholds, VulnerabilityRating};

    use super::normalize;

    fn feature(lon: f64, lat: f64, properties: serde_json::Value) -> RawFeature {
        RawFeature::new(lon, lat, properties.as_object().cloned().unwrap())
    }

    #[rstest]
    fn test_named_inlet_scenario() {
        let features = vec![feature(123.9, 10.3, json!({"In_Name": "A1", "Inv_Elev": 35}))];
        let output = normalize(&features, &ClassificationThresholds::default()).unwrap();
        assert_eq!(
            serde_json::to_value(output[0].as_ref().unwrap()).unwrap(),
            json!({
                "id": "A1",
                "geocode": "A1",
                "vulnerabilityRating": "high",
                "location": "10.30000, 123.90000",
                "installDate": "unknown",
                "lastInspection": "unknown",
            })
        );
    }

    #[rstest]
    fn test_unnamed_inlet_scenario() {
        let features = vec![
            feature(123.9, 10.3, json!({"In_Name": "A1", "Inv_Elev": 35})),
            feature(123.9, 10.3, json!({"In_Name": "A2", "Inv_Elev": 35})),
            feature(123.9, 10.3, json!({"Inv_Elev": 15})),
        ];
        let output = normalize(&features, &ClassificationThresholds::default()).unwrap();
        let record = output[2].as_ref().unwrap();
        assert_eq!(record.id, "inlet-2");
        assert_eq!(record.vulnerability_rating, VulnerabilityRating::Low);
    }
}

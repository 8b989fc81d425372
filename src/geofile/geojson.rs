use std::{fs, path::Path};

use anyhow::{anyhow, Context};
use indicatif::ProgressBar;
use serde::Serialize;

use crate::inlets::{pipeline::NormalizedFeature, record::DomainRecord};

use super::feature::RawFeature;

/// Read the point features of a GeoJSON FeatureCollection file.
///
/// Anything other than a FeatureCollection is rejected. Features without a Point geometry are
/// kept, with an empty coordinate list, so that they show up as per-feature errors later on.
pub fn read_features_from_geojson(filepath: &Path) -> anyhow::Result<Vec<RawFeature>> {
    let contents = fs::read_to_string(filepath)
        .with_context(|| format!("Reading GeoJSON file {:?}", filepath))?;
    parse_feature_collection(&contents)
}

pub fn parse_feature_collection(contents: &str) -> anyhow::Result<Vec<RawFeature>> {
    let geojson: geojson::GeoJson = contents.parse().context("Parsing GeoJSON")?;
    let feature_collection = match geojson {
        geojson::GeoJson::FeatureCollection(feature_collection) => feature_collection,
        geojson::GeoJson::Feature(_) => {
            return Err(anyhow!("Expected a FeatureCollection, found a single Feature"))
        }
        geojson::GeoJson::Geometry(_) => {
            return Err(anyhow!("Expected a FeatureCollection, found a bare Geometry"))
        }
    };

    let num_features = feature_collection.features.len();
    let features: Vec<RawFeature> = feature_collection
        .features
        .into_iter()
        .map(RawFeature::from)
        .collect();
    let num_points = features
        .iter()
        .filter(|feature| !feature.coordinates.is_empty())
        .count();
    if num_points != num_features {
        log::warn!(
            "Out of {} features read, only {} were Points.",
            num_features,
            num_points
        )
    }
    Ok(features)
}

/// Write the successfully normalized records as a Point layer, the record fields becoming
/// feature properties. `features` and `normalized` must line up index by index.
pub fn write_records_to_geojson(
    features: &[RawFeature],
    normalized: &[NormalizedFeature],
    output_filepath: &Path,
) -> anyhow::Result<()> {
    let feature_collection = records_to_feature_collection(features, normalized)?;
    log::info!(
        "Writing {} records to {:?}",
        feature_collection.features.len(),
        output_filepath
    );
    let geojson_contents = geojson::GeoJson::from(feature_collection);
    fs::write(output_filepath, geojson_contents.to_string())
        .with_context(|| format!("Writing GeoJSON file {:?}", output_filepath))
}

fn records_to_feature_collection(
    features: &[RawFeature],
    normalized: &[NormalizedFeature],
) -> anyhow::Result<geojson::FeatureCollection> {
    if features.len() != normalized.len() {
        return Err(anyhow!(
            "Number of features ({}) must match number of normalized entries ({})",
            features.len(),
            normalized.len()
        ));
    }

    let bar = ProgressBar::new(normalized.len() as u64);
    let mut output_features = Vec::new();
    for (feature, entry) in features.iter().zip(normalized) {
        if let Ok(record) = entry {
            output_features.push(record_to_geojson_feature(feature, record)?);
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(output_features.into_iter().collect())
}

fn record_to_geojson_feature(
    feature: &RawFeature,
    record: &DomainRecord,
) -> anyhow::Result<geojson::Feature> {
    let properties = match serde_json::to_value(record)? {
        serde_json::Value::Object(properties) => properties,
        other => return Err(anyhow!("Record serialized to a non-object: {}", other)),
    };
    Ok(geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::Point(
            feature.coordinates.clone(),
        ))),
        id: Some(geojson::feature::Id::String(record.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    })
}

/// One line of the listing view. Failed features stay in place so that the consumer can flag
/// them.
#[derive(Serialize)]
#[serde(untagged)]
enum ListingEntry<'a> {
    Record(&'a DomainRecord),
    #[serde(rename_all = "camelCase")]
    Error {
        index: usize,
        feature_id: Option<&'a str>,
        error: String,
    },
}

impl<'a> From<&'a NormalizedFeature> for ListingEntry<'a> {
    fn from(entry: &'a NormalizedFeature) -> Self {
        match entry {
            Ok(record) => ListingEntry::Record(record),
            Err(err) => ListingEntry::Error {
                index: err.index(),
                feature_id: err.feature_id(),
                error: err.to_string(),
            },
        }
    }
}

/// Write every normalized entry, in input order, as a JSON array.
pub fn write_listing_to_json(
    normalized: &[NormalizedFeature],
    output_filepath: &Path,
) -> anyhow::Result<()> {
    let listing: Vec<ListingEntry> = normalized.iter().map(ListingEntry::from).collect();
    log::info!(
        "Writing listing of {} entries to {:?}",
        listing.len(),
        output_filepath
    );
    let contents = serde_json::to_string_pretty(&listing)?;
    fs::write(output_filepath, contents)
        .with_context(|| format!("Writing listing file {:?}", output_filepath))
}

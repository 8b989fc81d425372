extern crate log;
pub mod geofile;
pub mod inlets;
pub mod report;
use crate::geofile::geojson::{
    read_features_from_geojson, write_listing_to_json, write_records_to_geojson,
};
use crate::inlets::adapter::PropertySchema;
use crate::inlets::classification::ClassificationThresholds;
use crate::inlets::pipeline::{normalize_with, NormalizedFeature, Parallel, Sequential};
use crate::report::summary::RatingSummary;
use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::{fs::read_to_string, path::Path};

/// Normalize drainage inlet features into vulnerability-rated records.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input config file.
    #[arg(short, long)]
    config_filepath: String,
}

#[derive(Deserialize, Debug)]
struct Config {
    input_geojson_path: PathBuf,
    output_dir: PathBuf,
    #[serde(default)]
    thresholds: ClassificationThresholds,
    #[serde(default)]
    schema: PropertySchema,
    #[serde(default)]
    parallel: bool,
}

fn normalize_features(
    features: &[geofile::feature::RawFeature],
    config: &Config,
) -> anyhow::Result<Vec<NormalizedFeature>> {
    let normalized = if config.parallel {
        log::info!("Normalizing {} features in parallel", features.len());
        normalize_with::<Parallel>(features, &config.schema, &config.thresholds)
    } else {
        log::info!("Normalizing {} features", features.len());
        normalize_with::<Sequential>(features, &config.schema, &config.thresholds)
    };
    normalized.context("Normalizing features")
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    if !Path::new(&args.config_filepath).exists() {
        return Err(anyhow!("Config file {} not found", &args.config_filepath));
    }
    let config_contents = read_to_string(args.config_filepath)?;
    let config: Config = serde_yaml::from_str(&config_contents)?;
    log::debug!("{:?}", config);

    let features = read_features_from_geojson(&config.input_geojson_path)?;
    log::info!("Read {} inlet features", features.len());

    let normalized = normalize_features(&features, &config)?;
    for err in normalized.iter().filter_map(|entry| entry.as_ref().err()) {
        log::warn!("{}", err);
    }

    let summary = RatingSummary::from(normalized.as_slice());
    log::info!("{}", summary);

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Creating output directory {:?}", config.output_dir))?;
    write_records_to_geojson(
        &features,
        &normalized,
        &config.output_dir.join("inlets.geojson"),
    )?;
    write_listing_to_json(&normalized, &config.output_dir.join("inlets.json"))?;
    Ok(())
}

/// Logs at `info` unless `RUST_LOG` says otherwise.
fn logger_builder() -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
}

fn main() {
    logger_builder().init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{logger_builder, Config};

    #[rstest]
    fn test_minimal_config_uses_defaults() {
        let config: Config =
            serde_yaml::from_str("input_geojson_path: data/inlets.geojson\noutput_dir: out\n")
                .unwrap();
        assert_eq!(config.thresholds.moderate_above, 20.0);
        assert_eq!(config.thresholds.high_above, 30.0);
        assert_eq!(config.schema.name_field, "In_Name");
        assert!(!config.parallel);
    }

    #[rstest]
    fn test_config_overrides() {
        let config: Config = serde_yaml::from_str(
            r#"
input_geojson_path: data/inlets.geojson
output_dir: out
parallel: true
thresholds:
  high_above: 32.5
schema:
  elevation_field: Rim_Elev
  last_inspection_field: Insp_Date
"#,
        )
        .unwrap();
        assert_eq!(config.thresholds.moderate_above, 20.0);
        assert_eq!(config.thresholds.high_above, 32.5);
        assert_eq!(config.schema.elevation_field, "Rim_Elev");
        assert_eq!(
            config.schema.last_inspection_field.as_deref(),
            Some("Insp_Date")
        );
        assert!(config.parallel);
    }

    #[rstest]
    fn test_logger_defaults_to_info() {
        let logger = logger_builder().build();
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(logger.filter(), log::LevelFilter::Info);
        }
    }
}

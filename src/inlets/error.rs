use thiserror::Error;

/// What is wrong with the coordinates of a single feature.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryDefect {
    #[error("expected a (longitude, latitude) pair, got {0} coordinate(s)")]
    WrongArity(usize),

    #[error("coordinates must be finite, got ({longitude}, {latitude})")]
    NonFinite { longitude: f64, latitude: f64 },

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
}

/// Failure to normalize one feature. Recorded at the feature's position in the output, never
/// raised for the whole batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("feature {index}: malformed geometry, {defect}")]
    MalformedGeometry {
        index: usize,
        feature_id: Option<String>,
        defect: GeometryDefect,
    },
}

impl FeatureError {
    pub fn index(&self) -> usize {
        match self {
            FeatureError::MalformedGeometry { index, .. } => *index,
        }
    }

    pub fn feature_id(&self) -> Option<&str> {
        match self {
            FeatureError::MalformedGeometry { feature_id, .. } => feature_id.as_deref(),
        }
    }
}

/// Errors that reject a whole normalization call before any feature is processed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("invalid classification thresholds: moderate above {moderate_above}, high above {high_above}")]
    InvalidThresholds { moderate_above: f64, high_above: f64 },
}

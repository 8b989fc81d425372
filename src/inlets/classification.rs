use serde::{Deserialize, Serialize};

use super::error::NormalizeError;

/// Elevations strictly above this value are at least `Moderate`.
pub const DEFAULT_MODERATE_ABOVE: f64 = 20.0;
/// Elevations strictly above this value are `High`.
pub const DEFAULT_HIGH_ABOVE: f64 = 30.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VulnerabilityRating {
    Low,
    Moderate,
    High,
}

impl VulnerabilityRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            VulnerabilityRating::Low => "low",
            VulnerabilityRating::Moderate => "moderate",
            VulnerabilityRating::High => "high",
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ClassificationThresholds {
    pub moderate_above: f64,
    pub high_above: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            moderate_above: DEFAULT_MODERATE_ABOVE,
            high_above: DEFAULT_HIGH_ABOVE,
        }
    }
}

impl ClassificationThresholds {
    /// Thresholds must be finite and ordered, otherwise the `Moderate` band is ill-defined.
    pub fn validate(&self) -> Result<(), NormalizeError> {
        if self.moderate_above.is_finite()
            && self.high_above.is_finite()
            && self.moderate_above <= self.high_above
        {
            Ok(())
        } else {
            Err(NormalizeError::InvalidThresholds {
                moderate_above: self.moderate_above,
                high_above: self.high_above,
            })
        }
    }
}

/// Map an elevation to its vulnerability tier. A missing elevation is `Low`.
pub fn classify(
    elevation: Option<f64>,
    thresholds: &ClassificationThresholds,
) -> VulnerabilityRating {
    match elevation {
        Some(elevation) if elevation > thresholds.high_above => VulnerabilityRating::High,
        Some(elevation) if elevation > thresholds.moderate_above => VulnerabilityRating::Moderate,
        _ => VulnerabilityRating::Low,
    }
}

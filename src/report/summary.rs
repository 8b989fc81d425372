use std::fmt;

use crate::inlets::{classification::VulnerabilityRating, pipeline::NormalizedFeature};

/// Per-tier counts over one normalized batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RatingSummary {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
    pub errors: usize,
}

impl RatingSummary {
    pub fn total(&self) -> usize {
        self.low + self.moderate + self.high + self.errors
    }

    pub fn count(&self, rating: VulnerabilityRating) -> usize {
        match rating {
            VulnerabilityRating::Low => self.low,
            VulnerabilityRating::Moderate => self.moderate,
            VulnerabilityRating::High => self.high,
        }
    }
}

impl From<&[NormalizedFeature]> for RatingSummary {
    fn from(normalized: &[NormalizedFeature]) -> Self {
        let mut summary = RatingSummary::default();
        for entry in normalized {
            match entry {
                Ok(record) => {
                    match record.vulnerability_rating {
                        VulnerabilityRating::Low => summary.low += 1,
                        VulnerabilityRating::Moderate => summary.moderate += 1,
                        VulnerabilityRating::High => summary.high += 1,
                    }
                }
                Err(_) => summary.errors += 1,
            }
        }
        summary
    }
}

impl fmt::Display for RatingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} features:", self.total())?;
        for rating in [
            VulnerabilityRating::Low,
            VulnerabilityRating::Moderate,
            VulnerabilityRating::High,
        ] {
            write!(f, " {} {},", self.count(rating), rating.as_str())?;
        }
        write!(f, " {} malformed", self.errors)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use crate::geofile::feature::RawFeature;
    use crate::inlets::{classification::ClassificationThresholds, pipeline::normalize};

    use super::RatingSummary;

    fn feature(lon: f64, lat: f64, properties: serde_json::Value) -> RawFeature {
        RawFeature::new(lon, lat, properties.as_object().cloned().unwrap())
    }

    #[rstest]
    fn test_summary_counts() {
        let features = vec![
            feature(123.9, 10.3, json!({"In_Name": "A1", "Inv_Elev": 35})),
            feature(123.9, 10.3, json!({"In_Name": "A2", "Inv_Elev": 31})),
            feature(123.9, 10.3, json!({"In_Name": "A3", "Inv_Elev": 21})),
            feature(123.9, 10.3, json!({})),
            feature(190.0, 10.3, json!({"In_Name": "A5"})),
        ];
        let normalized = normalize(&features, &ClassificationThresholds::default()).unwrap();
        let summary = RatingSummary::from(normalized.as_slice());
        assert_eq!(
            summary,
            RatingSummary {
                low: 1,
                moderate: 1,
                high: 2,
                errors: 1,
            }
        );
        assert_eq!(summary.total(), features.len());
        assert_eq!(
            summary.to_string(),
            "5 features: 1 low, 1 moderate, 2 high, 1 malformed"
        );
    }
}

//! Certainty scores and their display bands.
//!
//! A certainty is the [0, 1] confidence that an insight is causally valid.
//! Display labels are always derived from the raw value; nothing here is
//! cached.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Thresholds reported by certainty-band counts, in ascending order.
pub const BAND_COUNT_THRESHOLDS: [f64; 7] = [0.60, 0.70, 0.75, 0.80, 0.85, 0.90, 0.95];

/// Certainty at or above which an insight counts as high certainty.
pub const HIGH_CERTAINTY_THRESHOLD: f64 = 0.8;

/// Validated certainty in [0.0, 1.0].
///
/// # Examples
///
/// ```
/// use vitalsim::{Certainty, CertaintyBand};
///
/// let c = Certainty::new(0.8).unwrap();
/// assert_eq!(c.band(), CertaintyBand::High);
/// assert!(c.is_high());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Certainty(f64);

impl Certainty {
    /// Minimum valid certainty value.
    pub const MIN_VALUE: f64 = 0.0;

    /// Maximum valid certainty value.
    pub const MAX_VALUE: f64 = 1.0;

    /// Creates a certainty with validation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::CertaintyOutOfRange` if the value is NaN or
    /// not in [0.0, 1.0].
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if value.is_nan() || !(Self::MIN_VALUE..=Self::MAX_VALUE).contains(&value) {
            return Err(ValidationError::CertaintyOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Raw value in [0.0, 1.0].
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Display band for this value.
    #[must_use]
    pub fn band(self) -> CertaintyBand {
        CertaintyBand::from_value(self.0)
    }

    /// True at or above `HIGH_CERTAINTY_THRESHOLD`.
    #[must_use]
    pub fn is_high(self) -> bool {
        self.0 >= HIGH_CERTAINTY_THRESHOLD
    }

    /// Returns true if this certainty meets `threshold` (inclusive).
    #[must_use]
    pub fn meets(self, threshold: f64) -> bool {
        self.0 >= threshold
    }
}

impl TryFrom<f64> for Certainty {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Certainty> for f64 {
    fn from(c: Certainty) -> Self {
        c.0
    }
}

impl fmt::Display for Certainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} ({})", self.0, self.band())
    }
}

/// Display band for a certainty value.
///
/// Variants are ordered from weakest to strongest so that `Ord` agrees with
/// the underlying value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertaintyBand {
    /// Below 0.6.
    Early,
    /// At least 0.6.
    Developing,
    /// At least 0.7.
    Moderate,
    /// At least 0.8.
    High,
    /// At least 0.9.
    VeryHigh,
}

impl CertaintyBand {
    /// Maps a raw certainty to its band. Lower bounds are inclusive.
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        if value >= 0.9 {
            Self::VeryHigh
        } else if value >= 0.8 {
            Self::High
        } else if value >= 0.7 {
            Self::Moderate
        } else if value >= 0.6 {
            Self::Developing
        } else {
            Self::Early
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Developing => "Developing",
            Self::Early => "Early",
        }
    }
}

impl fmt::Display for CertaintyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Formats a threshold as the key used in band counts (`"0.75"`).
#[must_use]
pub fn threshold_key(threshold: f64) -> String {
    format!("{threshold:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certainty_valid_values() {
        assert!(Certainty::new(0.0).is_ok());
        assert!(Certainty::new(0.5).is_ok());
        assert!(Certainty::new(1.0).is_ok());
    }

    #[test]
    fn test_certainty_invalid_values() {
        assert!(Certainty::new(-0.01).is_err());
        assert!(Certainty::new(1.01).is_err());
        assert!(Certainty::new(f64::NAN).is_err());
        assert!(Certainty::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_band_boundaries_favor_higher_band() {
        assert_eq!(CertaintyBand::from_value(0.9), CertaintyBand::VeryHigh);
        assert_eq!(CertaintyBand::from_value(0.8), CertaintyBand::High);
        assert_eq!(CertaintyBand::from_value(0.7), CertaintyBand::Moderate);
        assert_eq!(CertaintyBand::from_value(0.6), CertaintyBand::Developing);
        assert_eq!(CertaintyBand::from_value(0.599), CertaintyBand::Early);
        assert_eq!(CertaintyBand::from_value(0.0), CertaintyBand::Early);
        assert_eq!(CertaintyBand::from_value(1.0), CertaintyBand::VeryHigh);
    }

    #[test]
    fn test_band_is_monotonic() {
        let mut previous = CertaintyBand::from_value(0.0);
        for step in 0..=1000 {
            let band = CertaintyBand::from_value(f64::from(step) / 1000.0);
            assert!(band >= previous, "band decreased at step {step}");
            previous = band;
        }
    }

    #[test]
    fn test_band_labels() {
        assert_eq!(CertaintyBand::VeryHigh.label(), "Very High");
        assert_eq!(CertaintyBand::Early.to_string(), "Early");
    }

    #[test]
    fn test_is_high_boundary() {
        assert!(Certainty::new(0.8).unwrap().is_high());
        assert!(!Certainty::new(0.79).unwrap().is_high());
    }

    #[test]
    fn test_certainty_serde_rejects_out_of_range() {
        let ok: Certainty = serde_json::from_str("0.85").unwrap();
        assert!((ok.value() - 0.85).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<Certainty>("1.2").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "0.85");
    }

    #[test]
    fn test_threshold_key() {
        assert_eq!(threshold_key(0.6), "0.60");
        assert_eq!(threshold_key(0.75), "0.75");
    }
}

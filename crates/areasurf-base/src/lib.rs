use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_SURFACE_TOLERANCE: f64 = 0.01;
pub const DEFAULT_MIN_AREA_THRESHOLD: f64 = 0.1;

/// Enclosed areas at or below this are treated as zero.
pub const AREA_EPSILON: f64 = 1.0e-9;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Guid(Uuid);

impl Guid {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_object_id(&self) -> String {
        self.0.simple().to_string()
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    pub surface_tolerance: f64,
    pub preserve_original: bool,
    pub merge_holes: bool,
    pub min_area_threshold: f64,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            surface_tolerance: DEFAULT_SURFACE_TOLERANCE,
            preserve_original: true,
            merge_holes: true,
            min_area_threshold: DEFAULT_MIN_AREA_THRESHOLD,
        }
    }
}

impl ConversionSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.surface_tolerance.is_finite() || self.surface_tolerance <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "surface_tolerance must be a finite value > 0, got {}",
                self.surface_tolerance
            )));
        }
        if !self.min_area_threshold.is_finite() || self.min_area_threshold < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "min_area_threshold must be a finite value >= 0, got {}",
                self.min_area_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_inputs() {
        let settings = ConversionSettings::default();
        assert_eq!(settings.surface_tolerance, 0.01);
        assert!(settings.preserve_original);
        assert!(settings.merge_holes);
        assert_eq!(settings.min_area_threshold, 0.1);
    }

    #[test]
    fn missing_fields_take_defaults() -> std::result::Result<(), serde_json::Error> {
        let settings: ConversionSettings =
            serde_json::from_str(r#"{ "merge_holes": false, "min_area_threshold": 1.0 }"#)?;
        assert_eq!(settings.surface_tolerance, DEFAULT_SURFACE_TOLERANCE);
        assert!(settings.preserve_original);
        assert!(!settings.merge_holes);
        assert_eq!(settings.min_area_threshold, 1.0);
        Ok(())
    }

    #[test]
    fn validate_rejects_bad_tolerance() {
        let settings = ConversionSettings {
            surface_tolerance: 0.0,
            ..ConversionSettings::default()
        };
        assert!(settings.validate().is_err());

        let settings = ConversionSettings {
            min_area_threshold: f64::NAN,
            ..ConversionSettings::default()
        };
        assert!(settings.validate().is_err());
        assert!(ConversionSettings::default().validate().is_ok());
    }

    #[test]
    fn object_id_has_no_dashes() {
        let guid = Guid::new();
        let id = guid.to_object_id();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
    }
}

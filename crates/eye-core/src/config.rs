use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::theme::ThemeVariables;

// ============================================================
// Tuning constants
// ============================================================

/// Every numeric constant of the eye model.
///
/// Distances are fractions of the viewport or of the eye; rates are
/// per-frame interpolation amounts in `0..=1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Geometry
    pub width_fraction: f32,
    pub max_eye_width: f32,
    pub height_ratio: f32,
    pub iris_ratio: f32,
    pub pupil_ratio: f32,

    // Gaze
    pub gaze_limit_x: f32,
    pub gaze_limit_y: f32,
    pub gaze_smoothing: f32,
    pub iris_lag: f32,

    // Lids
    pub idle_threshold_ms: u64,
    pub idle_close_rate: f32,
    pub open_rate: f32,
    pub blink_speed: f32,
    pub blink_overshoot: f32,
    pub first_blink_frames: [f32; 2],
    pub blink_interval_frames: [f32; 2],

    // Squint
    pub squint_rate: f32,
    pub velocity_squint_gain: f32,
    pub velocity_squint_cap: f32,

    // Iris rotation
    pub rotation_drift: f32,
    pub rotation_gain: f32,

    // Scheduling
    pub warmup_frames: u64,
    pub settle_frames: u32,

    /// Seed for the blink timer. `None` seeds from entropy.
    pub blink_seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            width_fraction: 0.7,
            max_eye_width: 900.0,
            height_ratio: 0.45,
            iris_ratio: 0.55,
            pupil_ratio: 0.35,

            gaze_limit_x: 0.35,
            gaze_limit_y: 0.15,
            gaze_smoothing: 0.1,
            iris_lag: 0.8,

            idle_threshold_ms: 5000,
            idle_close_rate: 0.05,
            open_rate: 0.08,
            blink_speed: 0.15,
            blink_overshoot: 1.2,
            first_blink_frames: [200.0, 500.0],
            blink_interval_frames: [300.0, 600.0],

            squint_rate: 0.1,
            velocity_squint_gain: 0.005,
            velocity_squint_cap: 0.1,

            rotation_drift: 0.001,
            rotation_gain: 0.0001,

            warmup_frames: 60,
            settle_frames: 2,

            blink_seed: None,
        }
    }
}

impl Tuning {
    /// Reject values the eye model cannot run with: negative sizes,
    /// rates outside `0..=1`, and reversed or negative frame ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("width_fraction", self.width_fraction),
            ("max_eye_width", self.max_eye_width),
            ("height_ratio", self.height_ratio),
            ("iris_ratio", self.iris_ratio),
            ("pupil_ratio", self.pupil_ratio),
            ("gaze_limit_x", self.gaze_limit_x),
            ("gaze_limit_y", self.gaze_limit_y),
            ("velocity_squint_gain", self.velocity_squint_gain),
            ("velocity_squint_cap", self.velocity_squint_cap),
            ("rotation_drift", self.rotation_drift),
            ("rotation_gain", self.rotation_gain),
        ];
        for (field, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(ConfigError::InvalidTuning { field });
            }
        }

        let rates = [
            ("gaze_smoothing", self.gaze_smoothing),
            ("iris_lag", self.iris_lag),
            ("idle_close_rate", self.idle_close_rate),
            ("open_rate", self.open_rate),
            ("squint_rate", self.squint_rate),
        ];
        for (field, v) in rates {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::InvalidTuning { field });
            }
        }

        if !(self.blink_speed.is_finite() && self.blink_speed > 0.0) {
            return Err(ConfigError::InvalidTuning {
                field: "blink_speed",
            });
        }
        if !(self.blink_overshoot.is_finite() && self.blink_overshoot >= 1.0) {
            return Err(ConfigError::InvalidTuning {
                field: "blink_overshoot",
            });
        }

        let ranges = [
            ("first_blink_frames", self.first_blink_frames),
            ("blink_interval_frames", self.blink_interval_frames),
        ];
        for (field, [lo, hi]) in ranges {
            if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi) {
                return Err(ConfigError::InvalidTuning { field });
            }
        }
        Ok(())
    }
}

// ============================================================
// Serializable config file
// ============================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("invalid tuning value for `{field}`")]
    InvalidTuning { field: &'static str },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EyeConfig {
    pub version: u32,
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default)]
    pub theme: ThemeVariables,
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            tuning: Tuning::default(),
            theme: ThemeVariables::default(),
        }
    }
}

impl EyeConfig {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version != Self::CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                expected: Self::CURRENT_VERSION,
            });
        }
        config.tuning.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("loaded eye config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_survive_json() {
        let config = EyeConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(EyeConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let config = EyeConfig::from_json(r#"{ "version": 1, "tuning": { "max_eye_width": 640.0 } }"#)
            .unwrap();
        assert_eq!(config.tuning.max_eye_width, 640.0);
        assert_eq!(config.tuning.idle_threshold_ms, 5000);
        assert_eq!(config.theme.mode, ThemeMode::Dark);
    }

    #[test]
    fn rejects_unknown_version() {
        let err = EyeConfig::from_json(r#"{ "version": 7 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedVersion { found: 7, expected: 1 }
        ));
    }

    #[test]
    fn rejects_negative_eye_width() {
        let err = EyeConfig::from_json(r#"{ "version": 1, "tuning": { "max_eye_width": -10.0 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidTuning {
                field: "max_eye_width"
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_tuning() {
        for (json, want) in [
            (r#"{ "gaze_limit_y": -0.15 }"#, "gaze_limit_y"),
            (r#"{ "open_rate": 1.5 }"#, "open_rate"),
            (r#"{ "blink_speed": 0.0 }"#, "blink_speed"),
            (r#"{ "blink_interval_frames": [600.0, 300.0] }"#, "blink_interval_frames"),
            (r#"{ "first_blink_frames": [-1.0, 10.0] }"#, "first_blink_frames"),
        ] {
            let config = format!(r#"{{ "version": 1, "tuning": {json} }}"#);
            match EyeConfig::from_json(&config) {
                Err(ConfigError::InvalidTuning { field }) => assert_eq!(field, want),
                other => panic!("{json}: expected InvalidTuning, got {other:?}"),
            }
        }
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            EyeConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}

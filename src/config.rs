//! Configuration management for the sign language recognition application

use crate::constants::{
    DEFAULT_CLASSIFIER_MODEL_ASSET, DEFAULT_CONFIDENCE_FLOOR, DEFAULT_LABEL_MAP_ASSET,
    DEFAULT_POSE_MODEL_ASSET, DEFAULT_POSE_SCORE_THRESHOLD, DEFAULT_VISIBILITY_THRESHOLD,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Asset bundle configuration
    pub assets: AssetConfig,

    /// Pose detection configuration
    pub detection: DetectionConfig,

    /// Classification output configuration
    pub classification: ClassificationConfig,

    /// Video source configuration
    pub video: VideoConfig,
}

/// Asset bundle locations and names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding the read-only asset bundle
    pub dir: PathBuf,

    /// Pose landmark model asset name
    pub pose_model: String,

    /// Sequence classifier model asset name
    pub classifier_model: String,

    /// Label map asset name
    pub label_map: String,
}

/// Pose detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Pose presence score threshold (0.0-1.0)
    pub score_threshold: f32,

    /// Per-landmark visibility threshold (0.0-1.0)
    pub visibility_threshold: f32,
}

/// Classification output parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Minimum confidence for a prediction to be reported by the app.
    /// Display policy only; the pipeline itself never thresholds.
    pub confidence_floor: f32,
}

/// Video source parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Image inversion mode (none, x, y, xy)
    pub invert: String,

    /// Brightness adjustment value (0 to disable)
    pub brightness: f32,

    /// Reset the sequence after this many consecutive pose-free frames
    /// (0 disables the policy)
    pub reset_after_lost: u32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            pose_model: DEFAULT_POSE_MODEL_ASSET.to_string(),
            classifier_model: DEFAULT_CLASSIFIER_MODEL_ASSET.to_string(),
            label_map: DEFAULT_LABEL_MAP_ASSET.to_string(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_POSE_SCORE_THRESHOLD,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            invert: "none".to_string(),
            brightness: 0.0,
            reset_after_lost: 0,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.assets.pose_model, DEFAULT_POSE_MODEL_ASSET);
        assert_eq!(config.detection.score_threshold, DEFAULT_POSE_SCORE_THRESHOLD);
        assert_eq!(config.video.reset_after_lost, 0);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("detection:\n  score_threshold: 0.8\n").unwrap();
        assert_eq!(config.detection.score_threshold, 0.8);
        // Untouched sections come from defaults
        assert_eq!(config.detection.visibility_threshold, DEFAULT_VISIBILITY_THRESHOLD);
        assert_eq!(config.assets.label_map, DEFAULT_LABEL_MAP_ASSET);
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = Config::default();
        config.video.invert = "x".to_string();
        config.classification.confidence_floor = 0.6;

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.video.invert, "x");
        assert_eq!(parsed.classification.confidence_floor, 0.6);
    }
}

//! Configuration for the layout engine

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration options for placement, collision, and tier stacking
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Overlap (in pixels, per axis) tolerated before placement is refused
    pub minimum_gap: f64,

    /// Overlap tolerated during rotation gestures
    pub rotation_tolerance: f64,

    /// Maximum number of undo snapshots
    pub history_limit: usize,

    /// Visual magnification applied to tier height and gap
    pub visual_scale: f64,

    /// Tier height used when the parent's type is not registered
    pub default_tier_height: f64,

    /// Gap between stacked tiers (unscaled)
    pub tier_gap: f64,

    /// Largest tier count accepted in one request
    pub max_tiers: u32,

    /// Rotation snap increment in degrees
    pub rotation_snap: f64,

    /// Grid pitch for grid snapping
    pub grid_size: f64,

    /// Distance within which an edge snaps to a neighbor
    pub snap_threshold: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            minimum_gap: 0.0,
            rotation_tolerance: 1.0,
            history_limit: 50,
            visual_scale: 2.0,
            default_tier_height: 60.0,
            tier_gap: 10.0,
            max_tiers: 10,
            rotation_snap: 45.0,
            grid_size: 10.0,
            snap_threshold: 8.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the minimum gap used by placement checks
    pub fn with_minimum_gap(mut self, gap: f64) -> Self {
        self.minimum_gap = gap;
        self
    }

    /// Set the tolerance used during rotation
    pub fn with_rotation_tolerance(mut self, tolerance: f64) -> Self {
        self.rotation_tolerance = tolerance;
        self
    }

    /// Set the undo history cap
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set tier stacking geometry
    pub fn with_tier_geometry(mut self, default_height: f64, gap: f64, scale: f64) -> Self {
        self.default_tier_height = default_height;
        self.tier_gap = gap;
        self.visual_scale = scale;
        self
    }

    /// Set the snap grid pitch and neighbor threshold
    pub fn with_snapping(mut self, grid_size: f64, threshold: f64) -> Self {
        self.grid_size = grid_size;
        self.snap_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.minimum_gap, 0.0);
        assert_eq!(config.rotation_tolerance, 1.0);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.visual_scale, 2.0);
        assert_eq!(config.default_tier_height, 60.0);
        assert_eq!(config.tier_gap, 10.0);
        assert_eq!(config.max_tiers, 10);
        assert_eq!(config.rotation_snap, 45.0);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new()
            .with_minimum_gap(4.0)
            .with_history_limit(5)
            .with_tier_geometry(30.0, 0.0, 2.0);

        assert_eq!(config.minimum_gap, 4.0);
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.default_tier_height, 30.0);
        assert_eq!(config.tier_gap, 0.0);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = LayoutConfig::from_str(
            r#"
minimum_gap = 4.0
history_limit = 20
"#,
        )
        .expect("Should parse");
        assert_eq!(config.minimum_gap, 4.0);
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.rotation_tolerance, 1.0);
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = LayoutConfig::from_str("minimum_gap = \"wide\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_error() {
        let result = LayoutConfig::from_file(Path::new("/nonexistent/layout.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}

//! Configuration for the locator
//!
//! Every knob the filter and the pipeline use lives here, with defaults that
//! reproduce the tuned values. Configurations load from TOML files; missing
//! fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LocatorError, Result};
use crate::matching::AggregationStrategy;

/// Default nearest/second-nearest ratio.
///
/// Tighter than the usual 0.7-0.8: UI screenshots repeat near-identical
/// widgets, so precision matters more than recall.
pub const DEFAULT_RATIO_THRESHOLD: f32 = 0.3;

/// A match needs strictly more accepted correspondences than this.
pub const DEFAULT_MIN_MATCHES: usize = 4;

/// Number of neighbours requested from the matcher per source keypoint
pub const KNN_NEIGHBORS: usize = 2;

pub const DEFAULT_MARKER_RADIUS: u32 = 5;
pub const DEFAULT_MARKER_THICKNESS: u32 = 10;
/// Yellow
pub const DEFAULT_ASSIST_COLOR: [u8; 3] = [255, 255, 0];
/// Red
pub const DEFAULT_RESULT_COLOR: [u8; 3] = [255, 0, 0];

pub const DEFAULT_OUTPUT_DIR: &str = "test-output";
pub const DEFAULT_UPLOAD_CATEGORY: &str = "imageFiles";

/// Styling of the circles drawn on the rendered artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Circle radius in pixels
    #[serde(default = "default_radius")]
    pub radius: u32,
    /// Stroke width in pixels
    #[serde(default = "default_thickness")]
    pub thickness: u32,
    /// RGB colour of the assist point marker
    #[serde(default = "default_assist_color")]
    pub assist_color: [u8; 3],
    /// RGB colour of the chosen coordinate marker
    #[serde(default = "default_result_color")]
    pub result_color: [u8; 3],
}

fn default_radius() -> u32 {
    DEFAULT_MARKER_RADIUS
}

fn default_thickness() -> u32 {
    DEFAULT_MARKER_THICKNESS
}

fn default_assist_color() -> [u8; 3] {
    DEFAULT_ASSIST_COLOR
}

fn default_result_color() -> [u8; 3] {
    DEFAULT_RESULT_COLOR
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: DEFAULT_MARKER_RADIUS,
            thickness: DEFAULT_MARKER_THICKNESS,
            assist_color: DEFAULT_ASSIST_COLOR,
            result_color: DEFAULT_RESULT_COLOR,
        }
    }
}

/// Locator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Ratio test threshold, in (0, 1]
    #[serde(default = "default_ratio")]
    pub ratio_threshold: f32,
    /// Accepted correspondences at or below this count mean "not found"
    #[serde(default = "default_min_matches")]
    pub min_matches: usize,
    /// How accepted points are reduced to one coordinate
    #[serde(default)]
    pub aggregation: AggregationStrategy,
    /// Directory rendered artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Category passed to the artifact store
    #[serde(default = "default_upload_category")]
    pub upload_category: String,
    /// Delete the input images once a request finishes
    #[serde(default = "default_cleanup")]
    pub cleanup_inputs: bool,
    #[serde(default)]
    pub markers: MarkerStyle,
}

fn default_ratio() -> f32 {
    DEFAULT_RATIO_THRESHOLD
}

fn default_min_matches() -> usize {
    DEFAULT_MIN_MATCHES
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_upload_category() -> String {
    DEFAULT_UPLOAD_CATEGORY.to_string()
}

fn default_cleanup() -> bool {
    true
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            ratio_threshold: DEFAULT_RATIO_THRESHOLD,
            min_matches: DEFAULT_MIN_MATCHES,
            aggregation: AggregationStrategy::default(),
            output_dir: default_output_dir(),
            upload_category: default_upload_category(),
            cleanup_inputs: true,
            markers: MarkerStyle::default(),
        }
    }
}

impl LocatorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Set the ratio test threshold
    pub fn with_ratio_threshold(mut self, ratio: f32) -> Self {
        self.ratio_threshold = ratio;
        self
    }

    /// Set the minimum-evidence threshold
    pub fn with_min_matches(mut self, min_matches: usize) -> Self {
        self.min_matches = min_matches;
        self
    }

    /// Set the aggregation strategy
    pub fn with_aggregation(mut self, aggregation: AggregationStrategy) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Set the artifact output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the upload category
    pub fn with_upload_category(mut self, category: impl Into<String>) -> Self {
        self.upload_category = category.into();
        self
    }

    /// Enable or disable input cleanup
    pub fn with_cleanup_inputs(mut self, cleanup: bool) -> Self {
        self.cleanup_inputs = cleanup;
        self
    }

    /// Set the marker style
    pub fn with_markers(mut self, markers: MarkerStyle) -> Self {
        self.markers = markers;
        self
    }

    /// Check values that serde cannot constrain
    pub fn validate(&self) -> Result<()> {
        if !(self.ratio_threshold > 0.0 && self.ratio_threshold <= 1.0) {
            return Err(LocatorError::InvalidRatio(self.ratio_threshold));
        }
        if self.upload_category.trim().is_empty() {
            return Err(LocatorError::Config(
                "upload_category must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

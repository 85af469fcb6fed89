//! Keypoint detection interface

use image::GrayImage;
use std::collections::HashMap;

use crate::error::{LocatorError, Result};

/// Descriptor vector attached to a keypoint
pub type Descriptor = Vec<f32>;

/// A detected keypoint with its descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Sub-pixel x location
    pub x: f32,
    /// Sub-pixel y location
    pub y: f32,
    pub descriptor: Descriptor,
}

impl Feature {
    pub fn new(x: f32, y: f32, descriptor: Descriptor) -> Self {
        Self { x, y, descriptor }
    }
}

/// Detects keypoints and computes their descriptors
pub trait FeatureDetector: Send + Sync {
    /// Detect and describe keypoints in a grayscale image
    fn detect(&self, image: &GrayImage) -> Result<Vec<Feature>>;
}

// =============================================================================
// Mock Implementation for Testing
// =============================================================================

/// Mock detector returning pre-configured features keyed by image size
#[derive(Default)]
pub struct MockFeatureDetector {
    /// (width, height) -> features
    features: HashMap<(u32, u32), Vec<Feature>>,
    /// Fail every call
    failing: bool,
}

impl MockFeatureDetector {
    /// Create a new mock detector that finds nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `features` for every image of the given size
    pub fn with_features(mut self, width: u32, height: u32, features: Vec<Feature>) -> Self {
        self.features.insert((width, height), features);
        self
    }

    /// Make every call fail
    pub fn with_failure(mut self) -> Self {
        self.failing = true;
        self
    }
}

impl FeatureDetector for MockFeatureDetector {
    fn detect(&self, image: &GrayImage) -> Result<Vec<Feature>> {
        if self.failing {
            return Err(LocatorError::Detector("mock detector failure".to_string()));
        }
        Ok(self
            .features
            .get(&image.dimensions())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_detector_by_size() {
        let detector = MockFeatureDetector::new()
            .with_features(4, 3, vec![Feature::new(1.5, 2.5, vec![1.0, 0.0])]);

        let found = detector.detect(&GrayImage::new(4, 3)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].x, 1.5);

        assert!(detector.detect(&GrayImage::new(5, 5)).unwrap().is_empty());
    }

    #[test]
    fn test_mock_detector_failure() {
        let detector = MockFeatureDetector::new().with_failure();
        let err = detector.detect(&GrayImage::new(1, 1)).unwrap_err();
        assert!(matches!(err, LocatorError::Detector(_)));
    }
}

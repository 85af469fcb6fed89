//! Feature Locator
//!
//! Finds a template image (a UI element) inside a reference screenshot by
//! matching keypoints, and reduces the matches to a single tap coordinate.
//!
//! The algorithmic core in [`matching`] is pure: a ratio test rejects
//! ambiguous correspondences, then the survivors are reduced to one point,
//! optionally steered by an assist point. [`pipeline`] wires the core to
//! the image-side collaborators in [`vision`].
//!
//! This crate can be used as:
//! - A Rust library (rlib) for direct integration
//! - A dynamic library (cdylib) exposing the core through [`ffi`]
//!
//! # Example
//!
//! ```ignore
//! use feature_locator::{FeatureFinder, LocalArtifactStore, LocatorConfig, Point};
//!
//! let finder = FeatureFinder::new(LocatorConfig::default(), my_detector, LocalArtifactStore::new("artifacts"))?;
//! if let Some(found) = finder.find(&template_path, &screenshot_path, Some(Point::new(120, 300)))? {
//!     println!("tap at ({}, {})", found.x, found.y);
//! }
//! ```

pub mod config;
pub mod error;
pub mod ffi;
pub mod matching;

#[cfg(feature = "vision")]
pub mod pipeline;
#[cfg(feature = "vision")]
pub mod vision;

// Re-export commonly used types
pub use config::{LocatorConfig, MarkerStyle};
pub use error::{LocatorError, Result};
pub use matching::{
    choose_coordinate, choose_coordinate_with, AggregationStrategy, Correspondence,
    CorrespondenceFilter, FilterResult, Neighbor, Point,
};

#[cfg(feature = "vision")]
pub use pipeline::{FeatureFinder, FindResult};
#[cfg(feature = "vision")]
pub use vision::{
    ArtifactStore, BruteForceMatcher, DescriptorMatcher, Feature, FeatureDetector,
    LocalArtifactStore, MatchRenderer, SideBySideRenderer,
};

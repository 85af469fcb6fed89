//! Image-side collaborators of the locator
//!
//! Feature detection, descriptor matching, rendering and artifact storage
//! sit behind traits so the pipeline can run against real implementations
//! or the mocks in this module.
//!
//! # Example
//!
//! ```ignore
//! use feature_locator::vision::{BruteForceMatcher, DescriptorMatcher};
//!
//! let matcher = BruteForceMatcher::new();
//! let neighbors = matcher.knn_match(&query, &train, 2)?;
//! ```

pub mod detector;
pub mod matcher;
pub mod renderer;
pub mod storage;

// Re-export main types for convenient access
pub use detector::{Descriptor, Feature, FeatureDetector, MockFeatureDetector};
pub use matcher::{BruteForceMatcher, DescriptorMatcher};
pub use renderer::{MatchLine, MatchRenderer, Marker, MarkerKind, SideBySideRenderer};
pub use storage::{ArtifactStore, LocalArtifactStore, MockArtifactStore};

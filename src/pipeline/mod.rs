//! Request orchestration around the matching core

pub mod finder;
pub mod inputs;

pub use finder::{build_correspondences, FeatureFinder, FindResult};
pub use inputs::{unique_artifact_path, InputFiles};

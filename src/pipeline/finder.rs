//! Feature-based template finder
//!
//! Runs one request end to end: load both images, detect and match
//! keypoints, filter the correspondences, pick a coordinate, render the
//! accepted matches and hand the artifact to the store.

use image::imageops;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

use super::inputs::{unique_artifact_path, InputFiles};
use crate::config::{LocatorConfig, KNN_NEIGHBORS};
use crate::error::{LocatorError, Result};
use crate::matching::{choose_coordinate_with, Correspondence, CorrespondenceFilter, Neighbor, Point};
use crate::vision::{
    ArtifactStore, BruteForceMatcher, DescriptorMatcher, Feature, FeatureDetector, MatchLine,
    MatchRenderer, Marker, SideBySideRenderer,
};

/// Successful match returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindResult {
    /// Time from detection start to the chosen coordinate
    pub elapsed_millis: u64,
    pub x: u32,
    pub y: u32,
    /// URL or path of the rendered visualisation
    pub artifact_ref: String,
}

impl FindResult {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Locates a template inside a reference screenshot
pub struct FeatureFinder {
    config: LocatorConfig,
    filter: CorrespondenceFilter,
    detector: Box<dyn FeatureDetector>,
    matcher: Box<dyn DescriptorMatcher>,
    renderer: Box<dyn MatchRenderer>,
    store: Box<dyn ArtifactStore>,
}

impl FeatureFinder {
    /// Create a finder with the brute-force matcher and side-by-side renderer
    pub fn new<D, S>(config: LocatorConfig, detector: D, store: S) -> Result<Self>
    where
        D: FeatureDetector + 'static,
        S: ArtifactStore + 'static,
    {
        config.validate()?;
        let filter = CorrespondenceFilter::from_config(&config)?;
        let renderer = SideBySideRenderer::new(config.markers.clone());

        Ok(Self {
            config,
            filter,
            detector: Box::new(detector),
            matcher: Box::new(BruteForceMatcher::new()),
            renderer: Box::new(renderer),
            store: Box::new(store),
        })
    }

    /// Replace the descriptor matcher
    pub fn with_matcher(mut self, matcher: impl DescriptorMatcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Replace the renderer
    pub fn with_renderer(mut self, renderer: impl MatchRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Search `reference` for `template`.
    ///
    /// Returns `Ok(None)` when too few correspondences survive the ratio
    /// test. Input files are removed on every exit path when
    /// `cleanup_inputs` is set.
    pub fn find(
        &self,
        template: &Path,
        reference: &Path,
        assist: Option<Point>,
    ) -> Result<Option<FindResult>> {
        let inputs = InputFiles::new(template, reference, self.config.cleanup_inputs);

        let reference_rgb = image::open(inputs.reference())?.to_rgb8();
        let template_rgb = image::open(inputs.template())?.to_rgb8();
        let reference_gray = imageops::grayscale(&reference_rgb);
        let template_gray = imageops::grayscale(&template_rgb);

        let start = Instant::now();
        let reference_features = self.detector.detect(&reference_gray)?;
        let template_features = self.detector.detect(&template_gray)?;

        let query: Vec<&[f32]> = reference_features
            .iter()
            .map(|f| f.descriptor.as_slice())
            .collect();
        let train: Vec<&[f32]> = template_features
            .iter()
            .map(|f| f.descriptor.as_slice())
            .collect();
        let neighbors = self.matcher.knn_match(&query, &train, KNN_NEIGHBORS)?;
        log::info!("Matches before filtering: {}", neighbors.len());

        let correspondences =
            build_correspondences(&reference_features, template_features.len(), &neighbors)?;
        let filtered = self.filter.filter(&correspondences)?;
        log::info!("Matches after filtering: {}", filtered.accepted_count());

        if !filtered.is_reliable() {
            log::info!(
                "Not enough reliable matches ({} <= {})",
                filtered.accepted_count(),
                self.filter.min_matches()
            );
            return Ok(None);
        }

        if let Some(assist) = assist {
            log::info!("Assist point at {}", assist);
            for point in filtered.candidate_points() {
                if point.y >= assist.y {
                    log::debug!("Candidate {} is {} below assist point", point, point.y - assist.y);
                } else {
                    log::debug!("Candidate {} lies above assist point", point);
                }
            }
        }

        let Some(chosen) =
            choose_coordinate_with(filtered.candidate_points(), assist, self.config.aggregation)
        else {
            return Ok(None);
        };
        let elapsed_millis = start.elapsed().as_millis() as u64;
        log::info!("Chosen coordinate {}", chosen);

        let lines: Vec<MatchLine> = filtered
            .accepted()
            .iter()
            .map(|c| {
                let from = &reference_features[c.source_index];
                let to = &template_features[c.target_index];
                MatchLine {
                    from: (from.x, from.y),
                    to: (to.x, to.y),
                }
            })
            .collect();
        let mut markers = Vec::with_capacity(2);
        if let Some(assist) = assist {
            markers.push(Marker::assist(assist));
        }
        markers.push(Marker::result(chosen));

        let canvas = self
            .renderer
            .draw_annotated(&reference_rgb, &template_rgb, &lines, &markers);

        std::fs::create_dir_all(&self.config.output_dir)?;
        let artifact = unique_artifact_path(&self.config.output_dir);
        canvas.save(&artifact)?;
        let artifact_ref = self.store.store(&artifact, &self.config.upload_category)?;

        Ok(Some(FindResult {
            elapsed_millis,
            x: chosen.x,
            y: chosen.y,
            artifact_ref,
        }))
    }
}

/// Pair every reference keypoint with its matcher neighbours.
///
/// Keypoints without any neighbour are dropped; indices the matcher made up
/// are rejected.
pub fn build_correspondences(
    reference: &[Feature],
    template_len: usize,
    neighbors: &[Vec<Neighbor>],
) -> Result<Vec<Correspondence>> {
    let mut correspondences = Vec::with_capacity(neighbors.len());

    for (source_index, candidates) in neighbors.iter().enumerate() {
        let source = reference
            .get(source_index)
            .ok_or(LocatorError::NeighborOutOfRange {
                index: source_index,
                len: reference.len(),
            })?;

        if let Some(bad) = candidates.iter().find(|n| n.target_index >= template_len) {
            return Err(LocatorError::NeighborOutOfRange {
                index: bad.target_index,
                len: template_len,
            });
        }

        if let Some(c) = Correspondence::from_neighbors(source_index, source.x, source.y, candidates) {
            correspondences.push(c);
        }
    }

    Ok(correspondences)
}

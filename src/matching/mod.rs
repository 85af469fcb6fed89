//! Correspondence filtering and coordinate selection
//!
//! This module is the pure core of the locator: it receives the matcher's
//! top-2 neighbours per reference keypoint, rejects ambiguous ones with a
//! ratio test and reduces the survivors to a single coordinate. Nothing here
//! touches the filesystem or logs.

pub mod coordinate;
pub mod filter;

use serde::{Deserialize, Serialize};

pub use coordinate::{
    choose_coordinate, choose_coordinate_with, median_of, medoid, nearest_below,
    per_axis_median, AggregationStrategy, MAX_ASSIST_DISTANCE,
};
pub use filter::{passes_ratio_test, CorrespondenceFilter, FilterResult};

/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Truncate a sub-pixel detector location toward zero.
    /// Negative and NaN inputs clamp to 0.
    pub fn from_subpixel(x: f32, y: f32) -> Self {
        Self {
            x: x as u32,
            y: y as u32,
        }
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One candidate returned by the matcher
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighbor {
    /// Index of the keypoint in the template image
    pub target_index: usize,
    pub distance: f32,
}

impl Neighbor {
    pub fn new(target_index: usize, distance: f32) -> Self {
        Self {
            target_index,
            distance,
        }
    }
}

/// A reference keypoint paired with its closest template keypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correspondence {
    /// Index of the keypoint in the reference image
    #[serde(default)]
    pub source_index: usize,
    /// Index of the best template keypoint
    #[serde(default)]
    pub target_index: usize,
    pub source_point: Point,
    pub best_distance: f32,
    /// Absent when the matcher found a single candidate
    #[serde(default)]
    pub second_best_distance: Option<f32>,
}

impl Correspondence {
    /// Create a correspondence from distances alone
    pub fn new(source_point: Point, best_distance: f32, second_best_distance: Option<f32>) -> Self {
        Self {
            source_index: 0,
            target_index: 0,
            source_point,
            best_distance,
            second_best_distance,
        }
    }

    /// Build from matcher output for one reference keypoint.
    ///
    /// `neighbors` must be ordered ascending by distance. Returns `None` when
    /// there is no candidate at all.
    pub fn from_neighbors(source_index: usize, x: f32, y: f32, neighbors: &[Neighbor]) -> Option<Self> {
        let best = neighbors.first()?;
        Some(Self {
            source_index,
            target_index: best.target_index,
            source_point: Point::from_subpixel(x, y),
            best_distance: best.distance,
            second_best_distance: neighbors.get(1).map(|n| n.distance),
        })
    }

    /// Whether the ratio test can be evaluated at all
    pub fn has_second_best(&self) -> bool {
        self.second_best_distance.is_some()
    }
}

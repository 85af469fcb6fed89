//! Reduce accepted correspondences to a single coordinate

use serde::{Deserialize, Serialize};

use super::Point;

/// Assist candidates this far below the assist point or further are ignored
pub const MAX_ASSIST_DISTANCE: u32 = 10_000;

/// How accepted points are aggregated when no assist point decides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    /// Median of x and median of y, taken independently.
    ///
    /// The result may not coincide with any matched point.
    #[default]
    PerAxisMedian,
    /// The matched point with the smallest total Manhattan distance to the others
    Medoid,
}

/// Choose a coordinate with the default per-axis median fallback
pub fn choose_coordinate(candidates: &[Point], assist: Option<Point>) -> Option<Point> {
    choose_coordinate_with(candidates, assist, AggregationStrategy::default())
}

/// Choose a coordinate from accepted candidate points.
///
/// With an assist point the closest candidate at or below it wins. Without
/// one, or when no candidate qualifies, `strategy` aggregates all candidates.
/// A selection at the origin counts as no selection.
pub fn choose_coordinate_with(
    candidates: &[Point],
    assist: Option<Point>,
    strategy: AggregationStrategy,
) -> Option<Point> {
    if let Some(assist) = assist {
        if let Some(point) = nearest_below(candidates, assist) {
            if point != Point::ORIGIN {
                return Some(point);
            }
        }
    }

    match strategy {
        AggregationStrategy::PerAxisMedian => per_axis_median(candidates),
        AggregationStrategy::Medoid => medoid(candidates),
    }
}

/// Candidate with the smallest vertical distance at or below `assist`.
///
/// Candidates above the assist point never qualify. Ties keep the first one.
pub fn nearest_below(candidates: &[Point], assist: Point) -> Option<Point> {
    candidates
        .iter()
        .filter(|p| p.y >= assist.y && p.y - assist.y < MAX_ASSIST_DISTANCE)
        .min_by_key(|p| p.y - assist.y)
        .copied()
}

/// Median of each axis, computed independently
pub fn per_axis_median(candidates: &[Point]) -> Option<Point> {
    let xs: Vec<u32> = candidates.iter().map(|p| p.x).collect();
    let ys: Vec<u32> = candidates.iter().map(|p| p.y).collect();
    Some(Point::new(median_of(&xs)?, median_of(&ys)?))
}

/// Middle value for odd counts, truncated mean of the two middle values for even counts
pub fn median_of(values: &[u32]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;

    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        let sum = sorted[mid - 1] as u64 + sorted[mid] as u64;
        Some((sum / 2) as u32)
    }
}

/// Point minimising the summed Manhattan distance to all others
pub fn medoid(candidates: &[Point]) -> Option<Point> {
    let cost = |p: &Point| -> u64 {
        candidates
            .iter()
            .map(|q| p.x.abs_diff(q.x) as u64 + p.y.abs_diff(q.y) as u64)
            .sum()
    };

    candidates.iter().min_by_key(|p| cost(*p)).copied()
}

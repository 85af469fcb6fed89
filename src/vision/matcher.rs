//! Descriptor matching

use crate::error::{LocatorError, Result};
use crate::matching::Neighbor;

/// Finds the nearest train descriptors for each query descriptor
pub trait DescriptorMatcher: Send + Sync {
    /// Up to `k` neighbours per query descriptor, ascending by distance.
    ///
    /// The outer list has one entry per query descriptor, in query order.
    fn knn_match(&self, query: &[&[f32]], train: &[&[f32]], k: usize) -> Result<Vec<Vec<Neighbor>>>;
}

/// Exhaustive matcher over Euclidean distance
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceMatcher;

impl BruteForceMatcher {
    pub fn new() -> Self {
        Self
    }
}

fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

impl DescriptorMatcher for BruteForceMatcher {
    fn knn_match(&self, query: &[&[f32]], train: &[&[f32]], k: usize) -> Result<Vec<Vec<Neighbor>>> {
        let Some(dim) = query.iter().chain(train).map(|d| d.len()).next() else {
            return Ok(Vec::new());
        };
        if let Some(bad) = query.iter().chain(train).find(|d| d.len() != dim) {
            return Err(LocatorError::Matcher(format!(
                "descriptor length {} does not match {}",
                bad.len(),
                dim
            )));
        }

        let matches = query
            .iter()
            .map(|q| {
                let mut neighbors: Vec<Neighbor> = train
                    .iter()
                    .enumerate()
                    .map(|(i, t)| Neighbor::new(i, euclidean(q, t)))
                    .collect();
                neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
                neighbors.truncate(k);
                neighbors
            })
            .collect();

        Ok(matches)
    }
}

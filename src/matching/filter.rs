//! Ratio test filtering

use super::{Correspondence, Point};
use crate::config::{LocatorConfig, DEFAULT_MIN_MATCHES, DEFAULT_RATIO_THRESHOLD};
use crate::error::{LocatorError, Result};

/// Nearest/second-nearest ambiguity test.
///
/// Accepts when the best candidate is decisively closer than the runner-up.
pub fn passes_ratio_test(best: f32, second_best: f32, ratio_threshold: f32) -> bool {
    best <= ratio_threshold * second_best
}

/// Outcome of filtering one request's correspondences
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    examined: usize,
    evaluated: usize,
    min_matches: usize,
    accepted: Vec<Correspondence>,
    candidate_points: Vec<Point>,
}

impl FilterResult {
    /// Number of correspondences that passed the ratio test
    pub fn accepted_count(&self) -> usize {
        self.candidate_points.len()
    }

    /// Accepted source points, in examination order
    pub fn candidate_points(&self) -> &[Point] {
        &self.candidate_points
    }

    /// Accepted correspondences, in examination order
    pub fn accepted(&self) -> &[Correspondence] {
        &self.accepted
    }

    /// Number of correspondences handed to the filter
    pub fn examined(&self) -> usize {
        self.examined
    }

    /// Number of correspondences that had two candidates
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    /// Whether there is enough evidence to report a match
    pub fn is_reliable(&self) -> bool {
        self.accepted_count() > self.min_matches
    }
}

/// Rejects unreliable correspondences
#[derive(Debug, Clone, PartialEq)]
pub struct CorrespondenceFilter {
    ratio_threshold: f32,
    min_matches: usize,
}

impl CorrespondenceFilter {
    /// Create a filter with the given ratio threshold
    pub fn new(ratio_threshold: f32) -> Result<Self> {
        if !(ratio_threshold > 0.0 && ratio_threshold <= 1.0) {
            return Err(LocatorError::InvalidRatio(ratio_threshold));
        }
        Ok(Self {
            ratio_threshold,
            min_matches: DEFAULT_MIN_MATCHES,
        })
    }

    /// Create a filter from a locator configuration
    pub fn from_config(config: &LocatorConfig) -> Result<Self> {
        Ok(Self::new(config.ratio_threshold)?.with_min_matches(config.min_matches))
    }

    /// Set the minimum-evidence threshold
    pub fn with_min_matches(mut self, min_matches: usize) -> Self {
        self.min_matches = min_matches;
        self
    }

    pub fn ratio_threshold(&self) -> f32 {
        self.ratio_threshold
    }

    pub fn min_matches(&self) -> usize {
        self.min_matches
    }

    /// Run the ratio test over every correspondence.
    ///
    /// Entries without a second-best distance are skipped. Negative or NaN
    /// distances are contract violations and fail the whole call.
    pub fn filter(&self, correspondences: &[Correspondence]) -> Result<FilterResult> {
        let mut accepted = Vec::new();
        let mut candidate_points = Vec::new();
        let mut evaluated = 0;

        for (index, c) in correspondences.iter().enumerate() {
            check_distance(index, c.best_distance)?;
            let Some(second) = c.second_best_distance else {
                continue;
            };
            check_distance(index, second)?;

            evaluated += 1;
            if passes_ratio_test(c.best_distance, second, self.ratio_threshold) {
                candidate_points.push(c.source_point);
                accepted.push(c.clone());
            }
        }

        Ok(FilterResult {
            examined: correspondences.len(),
            evaluated,
            min_matches: self.min_matches,
            accepted,
            candidate_points,
        })
    }
}

impl Default for CorrespondenceFilter {
    fn default() -> Self {
        Self {
            ratio_threshold: DEFAULT_RATIO_THRESHOLD,
            min_matches: DEFAULT_MIN_MATCHES,
        }
    }
}

fn check_distance(index: usize, distance: f32) -> Result<()> {
    if distance.is_nan() || distance < 0.0 {
        return Err(LocatorError::InvalidDistance { index, distance });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corr(x: u32, y: u32, best: f32, second: Option<f32>) -> Correspondence {
        Correspondence::new(Point::new(x, y), best, second)
    }

    fn good(x: u32, y: u32) -> Correspondence {
        corr(x, y, 1.0, Some(10.0))
    }

    #[test]
    fn test_ratio_test() {
        assert!(passes_ratio_test(0.25, 1.0, 0.3));
        assert!(passes_ratio_test(2.9, 10.0, 0.3));
        assert!(!passes_ratio_test(0.5, 1.0, 0.3));
        assert!(passes_ratio_test(0.0, 0.0, 0.3));
    }

    #[test]
    fn test_accepts_decisive_rejects_ambiguous() {
        let filter = CorrespondenceFilter::default();
        let result = filter
            .filter(&[corr(1, 1, 25.0, Some(100.0)), corr(2, 2, 50.0, Some(100.0))])
            .unwrap();

        assert_eq!(result.accepted_count(), 1);
        assert_eq!(result.candidate_points(), &[Point::new(1, 1)]);
    }

    #[test]
    fn test_single_candidate_skipped() {
        let filter = CorrespondenceFilter::default();
        let result = filter
            .filter(&[corr(1, 1, 0.0, None), good(2, 2)])
            .unwrap();

        assert_eq!(result.examined(), 2);
        assert_eq!(result.evaluated(), 1);
        assert_eq!(result.candidate_points(), &[Point::new(2, 2)]);
    }

    #[test]
    fn test_examination_order_kept() {
        let filter = CorrespondenceFilter::default();
        let input = vec![good(9, 9), corr(0, 0, 9.0, Some(10.0)), good(3, 1), good(5, 7)];
        let result = filter.filter(&input).unwrap();

        assert_eq!(
            result.candidate_points(),
            &[Point::new(9, 9), Point::new(3, 1), Point::new(5, 7)]
        );
        assert_eq!(result.accepted().len(), result.accepted_count());
        assert_eq!(result.accepted()[1].source_point, Point::new(3, 1));
    }

    #[test]
    fn test_accepted_count_matches_predicate() {
        let input: Vec<Correspondence> = (0..40u32)
            .map(|i| {
                let second = if i % 7 == 0 { None } else { Some(10.0) };
                corr(i, i, (i % 5) as f32, second)
            })
            .collect();
        let filter = CorrespondenceFilter::default();
        let result = filter.filter(&input).unwrap();

        let expected = input
            .iter()
            .filter(|c| matches!(c.second_best_distance, Some(s) if c.best_distance <= 0.3 * s))
            .count();
        assert_eq!(result.accepted_count(), expected);
        assert_eq!(result.candidate_points().len(), result.accepted_count());
    }

    #[test]
    fn test_three_accepted_is_not_reliable() {
        let filter = CorrespondenceFilter::default();
        let result = filter.filter(&[good(1, 1), good(2, 2), good(3, 3)]).unwrap();

        assert_eq!(result.accepted_count(), 3);
        assert!(!result.is_reliable());
    }

    #[test]
    fn test_reliability_boundary() {
        let filter = CorrespondenceFilter::default();
        let four: Vec<_> = (0..4).map(|i| good(i, i)).collect();
        let five: Vec<_> = (0..5).map(|i| good(i, i)).collect();

        assert!(!filter.filter(&four).unwrap().is_reliable());
        assert!(filter.filter(&five).unwrap().is_reliable());
    }

    #[test]
    fn test_custom_min_matches() {
        let filter = CorrespondenceFilter::default().with_min_matches(1);
        let result = filter.filter(&[good(1, 1), good(2, 2)]).unwrap();
        assert!(result.is_reliable());
    }

    #[test]
    fn test_five_with_one_ambiguous() {
        let filter = CorrespondenceFilter::new(0.3).unwrap();
        let input = vec![
            corr(10, 10, 0.25, Some(1.0)),
            corr(11, 10, 0.5, Some(1.0)),
            corr(12, 10, 2.0, Some(10.0)),
            corr(13, 10, 1.0, Some(8.0)),
            corr(14, 10, 0.1, Some(3.0)),
        ];
        let result = filter.filter(&input).unwrap();

        assert_eq!(result.accepted_count(), 4);
        assert!(!result.candidate_points().contains(&Point::new(11, 10)));
        assert!(result.candidate_points().contains(&Point::new(10, 10)));
    }

    #[test]
    fn test_empty_input() {
        let result = CorrespondenceFilter::default().filter(&[]).unwrap();
        assert_eq!(result.accepted_count(), 0);
        assert!(!result.is_reliable());
    }

    #[test]
    fn test_negative_distance_rejected() {
        let filter = CorrespondenceFilter::default();
        let err = filter.filter(&[good(1, 1), corr(2, 2, -1.0, Some(3.0))]).unwrap_err();
        assert!(matches!(err, LocatorError::InvalidDistance { index: 1, .. }));
    }

    #[test]
    fn test_nan_second_distance_rejected() {
        let filter = CorrespondenceFilter::default();
        let err = filter.filter(&[corr(2, 2, 1.0, Some(f32::NAN))]).unwrap_err();
        assert!(matches!(err, LocatorError::InvalidDistance { index: 0, .. }));
    }

    #[test]
    fn test_invalid_ratio() {
        assert!(matches!(
            CorrespondenceFilter::new(0.0),
            Err(LocatorError::InvalidRatio(_))
        ));
        assert!(CorrespondenceFilter::new(1.01).is_err());
        assert!(CorrespondenceFilter::new(f32::NAN).is_err());
        assert!(CorrespondenceFilter::new(1.0).is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = LocatorConfig::new().with_ratio_threshold(0.8).with_min_matches(2);
        let filter = CorrespondenceFilter::from_config(&config).unwrap();

        assert_eq!(filter.ratio_threshold(), 0.8);
        assert_eq!(filter.min_matches(), 2);
    }

    #[test]
    fn test_idempotent() {
        let filter = CorrespondenceFilter::default();
        let input: Vec<_> = (0..10).map(|i| corr(i, 2 * i, i as f32, Some(10.0))).collect();
        assert_eq!(filter.filter(&input).unwrap(), filter.filter(&input).unwrap());
    }
}

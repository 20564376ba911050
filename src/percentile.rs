//! Rank-based normalization of raw scores across the whole dataset.
//!
//! Built once per full pass at a given preference set, never per target, so
//! a percentile of 0.9 means "better than 90% of all candidate pairs", not
//! just the pairs for one trailhead.

/// Score -> percentile lookup over a fixed population of raw scores.
#[derive(Debug, Clone, Default)]
pub struct PercentileMap {
    /// Distinct scores ascending, each with the percentile of its first
    /// occurrence in the sorted population.
    entries: Vec<(f64, f64)>,
}

impl PercentileMap {
    /// Sort ascending; each distinct value maps to the index of its first
    /// occurrence divided by N-1. Ties share a percentile, and the
    /// denominator is clamped so a single-element population maps to 0.
    pub fn build(scores: &[f64]) -> Self {
        let mut sorted = scores.to_vec();
        sorted.sort_by(f64::total_cmp);

        let denominator = sorted.len().saturating_sub(1).max(1) as f64;
        let mut entries: Vec<(f64, f64)> = Vec::new();
        for (index, score) in sorted.iter().enumerate() {
            if entries.last().is_none_or(|(last, _)| last != score) {
                entries.push((*score, index as f64 / denominator));
            }
        }

        Self { entries }
    }

    /// Percentile in [0, 1] for a score from the population. Scores between
    /// population values take the percentile of the nearest value below;
    /// scores below the minimum (or an empty population) map to 0.
    pub fn percentile_of(&self, score: f64) -> f64 {
        let upper = self
            .entries
            .partition_point(|(value, _)| value.total_cmp(&score).is_le());
        if upper == 0 {
            return 0.0;
        }
        self.entries[upper - 1].1
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_maps_to_zero_and_max_to_one() {
        let map = PercentileMap::build(&[0.4, 0.1, 0.9, 0.7]);
        assert_eq!(map.percentile_of(0.1), 0.0);
        assert_eq!(map.percentile_of(0.9), 1.0);
        assert!((map.percentile_of(0.4) - 1.0 / 3.0).abs() < 1e-12);
        assert!((map.percentile_of(0.7) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn ties_share_the_first_occurrence_percentile() {
        let map = PercentileMap::build(&[0.5, 0.5, 0.5, 0.8]);
        // 0.5 first occurs at index 0 of 3.
        assert_eq!(map.percentile_of(0.5), 0.0);
        assert_eq!(map.percentile_of(0.8), 1.0);
    }

    #[test]
    fn single_element_maps_to_zero() {
        let map = PercentileMap::build(&[0.42]);
        assert_eq!(map.percentile_of(0.42), 0.0);
    }

    #[test]
    fn all_percentiles_within_bounds() {
        let scores = [0.3, 0.6, 0.6, 0.1, 0.95, 0.2, 0.2];
        let map = PercentileMap::build(&scores);
        for score in scores {
            let p = map.percentile_of(score);
            assert!((0.0..=1.0).contains(&p), "percentile {} out of range", p);
        }
    }

    #[test]
    fn empty_population() {
        let map = PercentileMap::build(&[]);
        assert!(map.is_empty());
        assert_eq!(map.percentile_of(0.5), 0.0);
    }
}

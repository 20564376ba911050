//! Diverse subset selection for display: per-(start, day) caps plus a
//! compact headline pick favouring weekends.

use std::collections::HashMap;

use chrono::Weekday;
use serde::Serialize;

use crate::model::Itinerary;
use crate::score::ItineraryScore;

/// Display order for headline options: weekends first.
pub const HEADLINE_DAY_PRIORITY: [Weekday; 4] = [
    Weekday::Sat,
    Weekday::Sun,
    Weekday::Wed,
    Weekday::Fri,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    /// Maximum options kept per (start, day) combination.
    pub per_start_day: usize,
    /// Maximum headline options per target.
    pub headline: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            per_start_day: 10,
            headline: 3,
        }
    }
}

/// One display-ready option: a feasible pair with its global percentile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedOption {
    pub start: String,
    pub target: String,
    pub day: Weekday,
    pub outbound: Itinerary,
    #[serde(rename = "return")]
    pub ret: Itinerary,
    pub score: ItineraryScore,
    pub percentile: f64,
}

/// Keep at most `cap` options per (start, day) group, preferring higher
/// percentiles. Input order is preserved within and across groups.
pub fn cap_per_start_day(options: Vec<RankedOption>, cap: usize) -> Vec<RankedOption> {
    let mut kept_per_group: HashMap<(String, Weekday), usize> = HashMap::new();

    // Decide which options survive by walking them best-first, then rebuild
    // in the original order.
    let mut by_rank: Vec<usize> = (0..options.len()).collect();
    by_rank.sort_by(|a, b| options[*b].percentile.total_cmp(&options[*a].percentile));

    let mut keep = vec![false; options.len()];
    for index in by_rank {
        let option = &options[index];
        let count = kept_per_group
            .entry((option.start.clone(), option.day))
            .or_insert(0);
        if *count < cap {
            *count += 1;
            keep[index] = true;
        }
    }

    options
        .into_iter()
        .zip(keep)
        .filter_map(|(option, kept)| kept.then_some(option))
        .collect()
}

/// At most `limit` headline options: the single best option per day, ordered
/// by the fixed day priority (weekends preferred), then truncated.
pub fn headline(options: &[RankedOption], limit: usize) -> Vec<RankedOption> {
    let mut best_per_day: HashMap<Weekday, &RankedOption> = HashMap::new();
    for option in options {
        let slot = best_per_day.entry(option.day).or_insert(option);
        if option.percentile > slot.percentile {
            *slot = option;
        }
    }

    let mut picked: Vec<RankedOption> = HEADLINE_DAY_PRIORITY
        .iter()
        .filter_map(|day| best_per_day.get(day).map(|option| (*option).clone()))
        .collect();
    picked.truncate(limit);
    picked
}

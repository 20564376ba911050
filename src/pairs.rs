//! Pair selection for a single day: score every outbound/return combination
//! and boost pairs whose return has redundant nearby alternatives.

use crate::model::{day_offset_hours, Itinerary, Route};
use crate::score::{self, ItineraryScore, RankingPreferences, Rejection};

/// Alternatives within this span of the chosen return still count as "the
/// same slot" for redundancy purposes.
const REDUNDANCY_WINDOW_HOURS: f64 = 2.0;

/// One feasible pair, indexed into the day's outbound and return lists.
#[derive(Debug, Clone)]
pub struct ScoredPair {
    pub outbound_index: usize,
    pub return_index: usize,
    pub score: ItineraryScore,
}

/// A pair that failed a hard gate, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct PairRejection {
    pub outbound_index: usize,
    pub return_index: usize,
    pub reason: Rejection,
}

#[derive(Debug, Clone, Default)]
pub struct PairSelection {
    /// Feasible pairs, best raw score first (stable order on ties).
    pub pairs: Vec<ScoredPair>,
    pub rejections: Vec<PairRejection>,
}

/// Evaluate the full outbound x return cross-product for one day.
pub fn select_pairs(
    outbounds: &[Itinerary],
    returns: &[Itinerary],
    route: &Route,
    prefs: &RankingPreferences,
) -> PairSelection {
    let mut selection = PairSelection::default();

    for (outbound_index, outbound) in outbounds.iter().enumerate() {
        for (return_index, ret) in returns.iter().enumerate() {
            match score::score_pair(outbound, Some(ret), route, prefs) {
                Ok(mut score) => {
                    if redundant_returns(outbound, ret, return_index, returns, route, prefs) > 1 {
                        score.components.return_options = 1.0;
                        score.reaggregate(prefs);
                    }
                    selection.pairs.push(ScoredPair {
                        outbound_index,
                        return_index,
                        score,
                    });
                }
                Err(reason) => selection.rejections.push(PairRejection {
                    outbound_index,
                    return_index,
                    reason,
                }),
            }
        }
    }

    selection
        .pairs
        .sort_by(|a, b| b.score.raw.total_cmp(&a.score.raw));
    selection
}

/// How many other returns depart strictly after the buffer-adjusted hike end
/// and within the redundancy window of the chosen return's departure.
fn redundant_returns(
    outbound: &Itinerary,
    chosen: &Itinerary,
    chosen_index: usize,
    returns: &[Itinerary],
    route: &Route,
    prefs: &RankingPreferences,
) -> usize {
    let hike_end = score::hike_end_hours(outbound, route, prefs);
    let chosen_departure = chosen.start_hours() + day_offset_hours(outbound.date, chosen.date);

    returns
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != chosen_index)
        .filter(|(_, alternative)| {
            let departure =
                alternative.start_hours() + day_offset_hours(outbound.date, alternative.date);
            departure > hike_end + prefs.return_buffer
                && (departure - chosen_departure).abs() <= REDUNDANCY_WINDOW_HOURS
        })
        .count()
}

//! Feasibility gates and multi-criteria scoring for one outbound/return pair.
//!
//! Gates run in a fixed order; the first failing gate decides the rejection
//! reason. Times are fractional hours since midnight of the outbound date;
//! a journey past midnight gets +24h, and a return on a later calendar date
//! is shifted by whole days so all arithmetic happens on one axis.

use serde::{Deserialize, Serialize};

use crate::model::{day_offset_hours, Itinerary, Mode, Route};

/// Per-component weights for the aggregate score. Weights are normalized by
/// their own sum, so they need not sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentWeights {
    pub departure_time: f64,
    pub hike_duration: f64,
    pub return_options: f64,
    pub total_duration: f64,
    pub finish_time: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            departure_time: 1.0,
            hike_duration: 1.0,
            return_options: 1.0,
            total_duration: 1.0,
            finish_time: 1.0,
        }
    }
}

impl ComponentWeights {
    fn sum(&self) -> f64 {
        self.departure_time
            + self.hike_duration
            + self.return_options
            + self.total_duration
            + self.finish_time
    }
}

/// User preferences for one scoring run. The engine never mutates them.
/// Hours are fractional hours since midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingPreferences {
    /// Earliest acceptable departure (and earliest sane arrival hour).
    pub earliest_departure: f64,
    /// Multiplier on the route's estimated pace; 1.0 is the published pace.
    pub walking_speed: f64,
    /// Minimum slack between hike end and the return departure, in hours.
    pub return_buffer: f64,
    pub preferred_latest_end: f64,
    pub hard_latest_end: f64,
    pub allow_cycling: bool,
    /// Fractional penalty applied when outbound and return fall on
    /// different calendar dates.
    pub overnight_penalty: f64,
    pub weights: ComponentWeights,
}

impl Default for RankingPreferences {
    fn default() -> Self {
        Self {
            earliest_departure: 6.0,
            walking_speed: 1.0,
            return_buffer: 0.5,
            preferred_latest_end: 18.0,
            hard_latest_end: 22.0,
            allow_cycling: true,
            overnight_penalty: 0.25,
            weights: ComponentWeights::default(),
        }
    }
}

/// Why a pair failed a hard gate. Consumed by diagnostics and UI, in
/// documented gate order; a pair failing several gates reports the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rejection {
    DepartureTooEarly,
    CyclingNotAllowed,
    ArrivalTooEarly,
    HikeEndsTooLate,
    NoReturn,
    BicycleOnlyOnReturn,
    InsufficientBuffer,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Rejection::DepartureTooEarly => "departure too early",
            Rejection::CyclingNotAllowed => "cycling not allowed",
            Rejection::ArrivalTooEarly => "arrival too early",
            Rejection::HikeEndsTooLate => "hike would finish too late",
            Rejection::NoReturn => "no return journey",
            Rejection::BicycleOnlyOnReturn => "return needs a bicycle the outbound never took",
            Rejection::InsufficientBuffer => "insufficient buffer before return",
        };
        f.write_str(text)
    }
}

/// The five component scores, each in [0, 1], higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    pub departure_time: f64,
    pub hike_duration: f64,
    pub return_options: f64,
    pub total_duration: f64,
    pub finish_time: f64,
}

/// Score for one feasible pair. Recomputed whenever preferences change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryScore {
    pub components: Components,
    pub raw: f64,
    /// Outbound and return fall on different calendar dates.
    pub overnight: bool,
}

impl ItineraryScore {
    /// Recompute the raw aggregate from the current components, e.g. after
    /// the pair selector lifts `return_options`.
    pub fn reaggregate(&mut self, prefs: &RankingPreferences) {
        self.raw = aggregate(&self.components, self.overnight, prefs);
    }
}

fn aggregate(components: &Components, overnight: bool, prefs: &RankingPreferences) -> f64 {
    let w = &prefs.weights;
    let weighted = components.departure_time * w.departure_time
        + components.hike_duration * w.hike_duration
        + components.return_options * w.return_options
        + components.total_duration * w.total_duration
        + components.finish_time * w.finish_time;
    let mut raw = weighted / w.sum();
    if overnight {
        raw *= 1.0 - prefs.overnight_penalty;
    }
    raw
}

/// Projected hike end in fractional hours: arrival (midnight-adjusted) plus
/// the route's maximum estimated duration at the hiker's pace.
pub fn hike_end_hours(outbound: &Itinerary, route: &Route, prefs: &RankingPreferences) -> f64 {
    outbound.end_hours_adjusted() + route.max_hours / prefs.walking_speed
}

/// Run the hard gates and, if all pass, score the pair.
pub fn score_pair(
    outbound: &Itinerary,
    ret: Option<&Itinerary>,
    route: &Route,
    prefs: &RankingPreferences,
) -> Result<ItineraryScore, Rejection> {
    let departure = outbound.start_hours();

    // Gate 1: departure before the earliest acceptable hour.
    if departure < prefs.earliest_departure {
        return Err(Rejection::DepartureTooEarly);
    }

    // Gate 2: cycling anywhere in the pair while cycling is disallowed.
    let outbound_cycles = outbound.has_mode(Mode::Bicycle);
    let return_cycles = ret.is_some_and(|r| r.has_mode(Mode::Bicycle));
    if !prefs.allow_cycling && (outbound_cycles || return_cycles) {
        return Err(Rejection::CyclingNotAllowed);
    }

    // Gate 3: the outbound itself ran past midnight into an unreasonable
    // hour (arrival wall-clock time before the earliest-departure hour).
    if outbound.end_hours() < prefs.earliest_departure {
        return Err(Rejection::ArrivalTooEarly);
    }

    // Gate 4: the hike cannot finish before the hard cutoff.
    let arrival = outbound.end_hours_adjusted();
    let hike_end = hike_end_hours(outbound, route, prefs);
    if hike_end > prefs.hard_latest_end {
        return Err(Rejection::HikeEndsTooLate);
    }

    // Gate 5: a pair needs a return.
    let Some(ret) = ret else {
        return Err(Rejection::NoReturn);
    };

    // Gate 6: you cannot ride back a bicycle you never took out.
    if return_cycles && !outbound_cycles {
        return Err(Rejection::BicycleOnlyOnReturn);
    }

    // Gate 7: enough slack between hike end and the return departure.
    let offset = day_offset_hours(outbound.date, ret.date);
    let return_departure = ret.start_hours() + offset;
    if return_departure - hike_end < prefs.return_buffer {
        return Err(Rejection::InsufficientBuffer);
    }

    let return_arrival = ret.end_hours_adjusted() + offset;

    let components = Components {
        departure_time: departure_time_component(departure, prefs),
        hike_duration: hike_duration_component(arrival, return_departure, route, prefs),
        // A pair in isolation scores neutral; the pair selector lifts this
        // to 1.0 when redundant nearby returns exist.
        return_options: 0.5,
        total_duration: total_duration_component(return_arrival - departure),
        finish_time: finish_time_component(hike_end, prefs),
    };

    let overnight = outbound.date != ret.date;
    Ok(ItineraryScore {
        components,
        raw: aggregate(&components, overnight, prefs),
        overnight,
    })
}

/// 1.0 at or after 08:00, 0.9..1.0 across 07:00-08:00, 0..0.9 between the
/// earliest acceptable departure and 07:00.
fn departure_time_component(departure: f64, prefs: &RankingPreferences) -> f64 {
    if departure >= 8.0 {
        1.0
    } else if departure >= 7.0 {
        0.9 + (departure - 7.0) * 0.1
    } else {
        0.9 * (departure - prefs.earliest_departure) / (7.0 - prefs.earliest_departure)
    }
}

/// Available hiking time against an ideal of 1.2x the route's maximum
/// estimated duration.
fn hike_duration_component(
    arrival: f64,
    return_departure: f64,
    route: &Route,
    prefs: &RankingPreferences,
) -> f64 {
    let available = (return_departure - prefs.return_buffer) - arrival;
    let ideal = route.max_hours * 1.2 / prefs.walking_speed;
    (available / ideal).clamp(0.0, 1.0)
}

/// Penalizes door-to-door spans beyond 10 hours, reaching 0 at 20 hours.
fn total_duration_component(total_hours: f64) -> f64 {
    (1.0 - (total_hours - 10.0) / 10.0).clamp(0.0, 1.0)
}

/// 1.0 up to the preferred end, decaying linearly to 0 at the hard cutoff.
fn finish_time_component(hike_end: f64, prefs: &RankingPreferences) -> f64 {
    if hike_end <= prefs.preferred_latest_end {
        1.0
    } else {
        1.0 - (hike_end - prefs.preferred_latest_end)
            / (prefs.hard_latest_end - prefs.preferred_latest_end)
    }
}

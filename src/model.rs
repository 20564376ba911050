//! Shared data model: places, legs, itineraries, routes and munros.
//!
//! Itineraries are produced once by acquisition and never mutated afterwards.
//! All scoring arithmetic works in fractional hours since midnight; helpers
//! here handle the midnight-crossing adjustment and calendar-day offsets.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transport mode of a single leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Bicycle,
    Bus,
    Coach,
    Ferry,
    Rail,
    Tram,
    Walk,
}

impl Mode {
    /// Timetabled public transport, as opposed to self-powered travel.
    pub fn is_transit(self) -> bool {
        !matches!(self, Mode::Bicycle | Mode::Walk)
    }
}

/// A longitude/latitude pair, serialized as a `[lng, lat]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for (f64, f64) {
    fn from(value: LngLat) -> Self {
        (value.lng, value.lat)
    }
}

/// A named point from the trip planner response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: Option<String>,
    pub lng_lat: LngLat,
}

/// One uninterrupted segment of travel by a single mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub from: Place,
    pub to: Place,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub mode: Mode,
    pub agency_name: Option<String>,
    pub route_name: Option<String>,
    pub interline_with_previous_leg: bool,
}

/// A complete one-direction journey: ordered legs on a calendar date.
///
/// Legs are non-empty by construction, so accessors may index the first and
/// last leg directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub date: NaiveDate,
    legs: Vec<Leg>,
}

impl Itinerary {
    pub fn new(date: NaiveDate, legs: Vec<Leg>) -> Result<Self, DataError> {
        if legs.is_empty() {
            return Err(DataError::EmptyItinerary);
        }
        Ok(Self { date, legs })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn start_time(&self) -> NaiveTime {
        self.legs[0].start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.legs[self.legs.len() - 1].end_time
    }

    /// Departure as fractional hours since midnight.
    pub fn start_hours(&self) -> f64 {
        hours_of(self.start_time())
    }

    /// Arrival as fractional hours since midnight, unadjusted.
    pub fn end_hours(&self) -> f64 {
        hours_of(self.end_time())
    }

    /// Arrival in fractional hours, shifted past 24 when the journey crosses
    /// midnight so that end >= start always holds.
    pub fn end_hours_adjusted(&self) -> f64 {
        if self.is_overnight() {
            self.end_hours() + 24.0
        } else {
            self.end_hours()
        }
    }

    /// True when the arrival wall-clock time is numerically before the
    /// departure, i.e. the journey runs past midnight.
    pub fn is_overnight(&self) -> bool {
        self.end_hours() < self.start_hours()
    }

    /// De-duplicated set of modes used across all legs.
    pub fn modes(&self) -> BTreeSet<Mode> {
        self.legs.iter().map(|leg| leg.mode).collect()
    }

    pub fn has_mode(&self, mode: Mode) -> bool {
        self.legs.iter().any(|leg| leg.mode == mode)
    }

    pub fn has_transit_leg(&self) -> bool {
        self.legs.iter().any(|leg| leg.mode.is_transit())
    }

    /// Sortable numeric key for the calendar date.
    pub fn date_key(&self) -> i32 {
        self.date.num_days_from_ce()
    }
}

/// Fractional hours since midnight for a wall-clock time.
pub fn hours_of(time: NaiveTime) -> f64 {
    f64::from(time.num_seconds_from_midnight()) / 3600.0
}

/// Hours to add to a return journey's times when it falls on a later
/// calendar date than its outbound. Computed from whole-day differences.
pub fn day_offset_hours(outbound_date: NaiveDate, return_date: NaiveDate) -> f64 {
    (return_date - outbound_date).num_days() as f64 * 24.0
}

/// One hike reachable from a target: stats plus munro references by number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub name: String,
    pub page: Option<String>,
    #[serde(default)]
    pub munros: Vec<u32>,
    pub distance_km: f64,
    pub ascent_m: f64,
    pub min_hours: f64,
    pub max_hours: f64,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A single munro summit, keyed by its catalogue number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Munro {
    pub number: u32,
    pub name: String,
    pub height_m: f64,
    pub lng_lat: LngLat,
}

/// Lookup table from munro number to munro. The route and munro datasets are
/// expected to be mutually consistent, so a missing number is fatal.
#[derive(Debug, Clone, Default)]
pub struct MunroIndex {
    munros: HashMap<u32, Munro>,
}

impl MunroIndex {
    pub fn new(munros: impl IntoIterator<Item = Munro>) -> Self {
        Self {
            munros: munros.into_iter().map(|m| (m.number, m)).collect(),
        }
    }

    pub fn resolve(&self, number: u32) -> Result<&Munro, DataError> {
        self.munros
            .get(&number)
            .ok_or(DataError::UnknownMunro { number })
    }
}

/// A home city a search starts from. `radius_m` is the distance within which
/// the hiker handles travel without a timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartingPlace {
    pub id: String,
    pub name: String,
    pub lng_lat: LngLat,
    #[serde(rename = "radius")]
    pub radius_m: f64,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A trailhead with the hikes that start there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetPlace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub lng_lat: LngLat,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl TargetPlace {
    /// The most demanding route at this target (largest estimated duration),
    /// used when ranking options for the whole target.
    pub fn primary_route(&self) -> Option<&Route> {
        self.routes
            .iter()
            .max_by(|a, b| a.max_hours.total_cmp(&b.max_hours))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("itinerary has no legs")]
    EmptyItinerary,
    #[error("munro {number} is not in the munro index")]
    UnknownMunro { number: u32 },
}

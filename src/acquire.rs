//! Itinerary acquisition: query the trip planner for a full day of outbound
//! and return journeys, filter the noise, and trim dead legs near the home
//! radius.
//!
//! Each search runs twice, once over {TRANSIT, WALK} and once adding
//! BICYCLE. An unconstrained cycling search may still return pure-transit
//! answers, so the bicycle pass keeps only itineraries that actually use a
//! bicycle leg; anything else would duplicate the first pass.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;
use tracing::debug;

use crate::model::{DataError, Itinerary, LngLat, StartingPlace, TargetPlace};
use crate::otp::{OtpError, PlanRequest, RequestMode, SearchDirection, TripPlanner};
use crate::trim::{self, TrimDirection, TrimError};

/// Weekdays searched for candidate trips.
pub const SEARCH_DAYS: [Weekday; 4] = [
    Weekday::Wed,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone)]
pub struct AcquireConfig {
    /// Start of the timetable week the search dates are resolved against.
    pub base_date: NaiveDate,
    pub search_days: Vec<Weekday>,
    pub walk_reluctance: f64,
    pub search_window_hours: u32,
    pub itineraries_per_page: u32,
}

impl AcquireConfig {
    pub fn new(base_date: NaiveDate) -> Self {
        Self {
            base_date,
            search_days: SEARCH_DAYS.to_vec(),
            walk_reluctance: 1.1,
            search_window_hours: 24,
            itineraries_per_page: 5,
        }
    }
}

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("trip planner request failed ({from} -> {to}, {date})")]
    Service {
        from: String,
        to: String,
        date: NaiveDate,
        #[source]
        source: OtpError,
    },
    #[error(transparent)]
    Trim(#[from] TrimError),
    #[error(transparent)]
    Data(#[from] DataError),
}

/// The next occurrence of `day` strictly after `base`.
pub fn search_date_for(base: NaiveDate, day: Weekday) -> NaiveDate {
    let ahead = (day.num_days_from_monday() + 7 - base.weekday().num_days_from_monday()) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    base + Duration::days(i64::from(ahead))
}

/// All outbound itineraries from `start` to `target` on `date`, trimmed from
/// the start, deduplicated and in chronological order.
pub fn find_outbound<P: TripPlanner>(
    planner: &P,
    config: &AcquireConfig,
    start: &StartingPlace,
    target: &TargetPlace,
    date: NaiveDate,
) -> Result<Vec<Itinerary>, AcquireError> {
    let mut itineraries = Vec::new();
    for with_bicycle in [false, true] {
        let raw = search(planner, config, start.lng_lat, target.lng_lat, date, with_bicycle)
            .map_err(|source| AcquireError::Service {
                from: start.id.clone(),
                to: target.id.clone(),
                date,
                source,
            })?;

        for itinerary in raw {
            itineraries.push(trim::trim(
                &itinerary,
                start.lng_lat,
                start.radius_m,
                TrimDirection::FromStart,
            )?);
        }
    }

    Ok(finalize(itineraries))
}

/// All return itineraries from `target` back to `start` on `date`, trimmed
/// from the end, deduplicated and in chronological order.
pub fn find_return<P: TripPlanner>(
    planner: &P,
    config: &AcquireConfig,
    target: &TargetPlace,
    start: &StartingPlace,
    date: NaiveDate,
) -> Result<Vec<Itinerary>, AcquireError> {
    let mut itineraries = Vec::new();
    for with_bicycle in [false, true] {
        let raw = search(planner, config, target.lng_lat, start.lng_lat, date, with_bicycle)
            .map_err(|source| AcquireError::Service {
                from: target.id.clone(),
                to: start.id.clone(),
                date,
                source,
            })?;

        for itinerary in raw {
            itineraries.push(trim::trim(
                &itinerary,
                start.lng_lat,
                start.radius_m,
                TrimDirection::ToEnd,
            )?);
        }
    }

    Ok(finalize(itineraries))
}

/// One mode-set search: paginate through the planner's 24-hour window and
/// keep itineraries that use public transport at all and, on the bicycle
/// pass, a bicycle.
fn search<P: TripPlanner>(
    planner: &P,
    config: &AcquireConfig,
    from: LngLat,
    to: LngLat,
    date: NaiveDate,
    with_bicycle: bool,
) -> Result<Vec<Itinerary>, OtpError> {
    let mut modes = vec![RequestMode::Transit, RequestMode::Walk];
    if with_bicycle {
        modes.push(RequestMode::Bicycle);
    }

    let mut request = PlanRequest {
        from,
        to,
        modes,
        search_direction: SearchDirection::DepartAt,
        date_time: date.and_time(chrono::NaiveTime::MIN),
        search_window_hours: config.search_window_hours,
        walk_reluctance: config.walk_reluctance,
        optimize_for_speed: true,
        num_itineraries: config.itineraries_per_page,
        page_cursor: None,
    };

    let mut itineraries = Vec::new();
    let mut page = 0u32;
    loop {
        let response = planner.plan(&request)?;
        debug!(page, count = response.itineraries.len(), with_bicycle, "plan page");

        for api_itinerary in response.itineraries {
            if !api_itinerary.has_transit_leg() {
                continue; // pure walk/bike noise
            }
            if with_bicycle && !api_itinerary.has_bicycle_leg() {
                continue; // already covered by the transit-only pass
            }
            itineraries.push(api_itinerary.into_itinerary()?);
        }

        match response.next_page_cursor {
            Some(cursor) => {
                request = request.with_page_cursor(cursor);
                page += 1;
            }
            None => break,
        }
    }

    Ok(itineraries)
}

/// Drop duplicates (the same journey can surface on both mode-set passes or
/// adjacent pages) and sort chronologically.
fn finalize(itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Itinerary> = itineraries
        .into_iter()
        .filter(|itinerary| seen.insert(itinerary_key(itinerary)))
        .collect();
    unique.sort_by_key(|itinerary| (itinerary.date_key(), itinerary.start_time()));
    unique
}

fn itinerary_key(itinerary: &Itinerary) -> String {
    let legs = itinerary
        .legs()
        .iter()
        .map(|leg| format!("{}-{}:{:?}", leg.start_time, leg.end_time, leg.mode))
        .collect::<Vec<_>>()
        .join(";");
    format!("{}|{}", itinerary.date, legs)
}

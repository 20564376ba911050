//! Scottish places and itinerary builders shared across test suites.

use chrono::{NaiveDate, NaiveTime};

use hike_planner::model::{
    Itinerary, Leg, LngLat, Mode, Munro, MunroIndex, Place, Route, StartingPlace, TargetPlace,
};

pub fn edinburgh() -> LngLat {
    LngLat::new(-3.188159, 55.95186)
}

/// Ben Vorlich (Loch Earn) car park.
pub fn ben_vorlich() -> LngLat {
    LngLat::new(-4.2199, 56.3427)
}

/// A point roughly `meters` north of `base`.
pub fn offset_north(base: LngLat, meters: f64) -> LngLat {
    LngLat::new(base.lng, base.lat + meters / 111_111.0)
}

/// 2025-06-09, a Monday: the base of the searched timetable week.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 9).unwrap()
}

pub fn saturday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
}

pub fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

pub fn time(text: &str) -> NaiveTime {
    text.parse().unwrap()
}

pub fn place(lng_lat: LngLat) -> Place {
    Place { name: None, lng_lat }
}

pub fn leg_between(from: LngLat, to: LngLat, start: &str, end: &str, mode: Mode) -> Leg {
    Leg {
        from: place(from),
        to: place(to),
        start_time: time(start),
        end_time: time(end),
        mode,
        agency_name: None,
        route_name: None,
        interline_with_previous_leg: false,
    }
}

/// A leg well away from any home radius; coordinates are irrelevant to
/// scoring, only times and modes matter.
pub fn leg(start: &str, end: &str, mode: Mode) -> Leg {
    leg_between(ben_vorlich(), offset_north(ben_vorlich(), 5_000.0), start, end, mode)
}

/// An itinerary from (start, end, mode) leg specs.
pub fn itinerary(date: NaiveDate, specs: &[(&str, &str, Mode)]) -> Itinerary {
    let legs = specs
        .iter()
        .map(|(start, end, mode)| leg(start, end, *mode))
        .collect();
    Itinerary::new(date, legs).unwrap()
}

/// A route with the given maximum estimated duration.
pub fn route_hours(max_hours: f64) -> Route {
    Route {
        name: "Ben Vorlich and Stuc a' Chroin".to_string(),
        page: None,
        munros: vec![1],
        distance_km: 14.5,
        ascent_m: 1150.0,
        min_hours: max_hours * 0.75,
        max_hours,
        data: serde_json::Value::Null,
    }
}

pub fn start_edinburgh() -> StartingPlace {
    StartingPlace {
        id: "edinburgh".to_string(),
        name: "Edinburgh".to_string(),
        lng_lat: edinburgh(),
        radius_m: 2_000.0,
        data: serde_json::Value::Null,
    }
}

pub fn target_ben_vorlich() -> TargetPlace {
    TargetPlace {
        id: "ben-vorlich".to_string(),
        name: "Ben Vorlich".to_string(),
        description: None,
        lng_lat: ben_vorlich(),
        routes: vec![route_hours(6.0)],
        data: serde_json::Value::Null,
    }
}

pub fn munro_index() -> MunroIndex {
    MunroIndex::new([Munro {
        number: 1,
        name: "Ben Vorlich (Loch Earn)".to_string(),
        height_m: 985.0,
        lng_lat: ben_vorlich(),
    }])
}

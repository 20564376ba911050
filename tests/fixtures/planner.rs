//! A scripted trip-planner double and wire-object builders.

use chrono::NaiveDate;

use hike_planner::model::{LngLat, Mode};
use hike_planner::otp::{ApiItinerary, ApiLeg, ApiPlace, OtpError, PlanRequest, PlanResponse, TripPlanner};

/// Trip planner backed by a closure over the request; `Sync` whenever the
/// closure is, so it works under the parallel batch runner.
pub struct ScriptedPlanner<F>(pub F);

impl<F> TripPlanner for ScriptedPlanner<F>
where
    F: Fn(&PlanRequest) -> Result<PlanResponse, OtpError>,
{
    fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, OtpError> {
        (self.0)(request)
    }
}

pub fn page(itineraries: Vec<ApiItinerary>, next_page_cursor: Option<&str>) -> PlanResponse {
    PlanResponse {
        itineraries,
        next_page_cursor: next_page_cursor.map(str::to_string),
    }
}

pub fn api_itinerary(date: NaiveDate, legs: Vec<ApiLeg>) -> ApiItinerary {
    ApiItinerary { date, legs }
}

pub fn api_leg(from: LngLat, to: LngLat, start: &str, end: &str, mode: Mode) -> ApiLeg {
    ApiLeg {
        from: api_place(from),
        to: api_place(to),
        start_time: start.parse().unwrap(),
        end_time: end.parse().unwrap(),
        mode,
        agency_name: None,
        route_name: None,
        interline_with_previous_leg: false,
    }
}

pub fn api_place(lng_lat: LngLat) -> ApiPlace {
    ApiPlace {
        name: None,
        lat: lng_lat.lat,
        lon: lng_lat.lng,
    }
}

/// Requests are matched on their origin: an outbound search starts at the
/// home city, a return search starts at the trailhead.
pub fn is_from(request: &PlanRequest, origin: LngLat) -> bool {
    (request.from.lat - origin.lat).abs() < 1e-6 && (request.from.lng - origin.lng).abs() < 1e-6
}

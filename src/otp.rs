//! Trip-planner HTTP adapter and wire contract.
//!
//! The planner's internal routing is not reproduced here; only its
//! request/response contract is consumed. `TripPlanner` is the seam that
//! lets acquisition run against the real service or a test double.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{DataError, Itinerary, Leg, LngLat, Mode, Place};

/// Modes a plan request may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestMode {
    Transit,
    Walk,
    Bicycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchDirection {
    DepartAt,
    ArriveBy,
}

/// One trip-planning request: a search window anchored at `date_time`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub from: LngLat,
    pub to: LngLat,
    pub modes: Vec<RequestMode>,
    pub search_direction: SearchDirection,
    pub date_time: NaiveDateTime,
    pub search_window_hours: u32,
    pub walk_reluctance: f64,
    pub optimize_for_speed: bool,
    pub num_itineraries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_cursor: Option<String>,
}

impl PlanRequest {
    pub fn with_page_cursor(mut self, cursor: String) -> Self {
        self.page_cursor = Some(cursor);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    #[serde(default)]
    pub itineraries: Vec<ApiItinerary>,
    #[serde(default)]
    pub next_page_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiItinerary {
    pub date: NaiveDate,
    pub legs: Vec<ApiLeg>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLeg {
    pub from: ApiPlace,
    pub to: ApiPlace,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub mode: Mode,
    #[serde(default)]
    pub agency_name: Option<String>,
    #[serde(default)]
    pub route_name: Option<String>,
    #[serde(default)]
    pub interline_with_previous_leg: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlace {
    #[serde(default)]
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl ApiItinerary {
    pub fn has_transit_leg(&self) -> bool {
        self.legs.iter().any(|leg| leg.mode.is_transit())
    }

    pub fn has_bicycle_leg(&self) -> bool {
        self.legs.iter().any(|leg| leg.mode == Mode::Bicycle)
    }

    pub fn into_itinerary(self) -> Result<Itinerary, DataError> {
        let legs = self.legs.into_iter().map(ApiLeg::into_leg).collect();
        Itinerary::new(self.date, legs)
    }
}

impl ApiLeg {
    fn into_leg(self) -> Leg {
        Leg {
            from: self.from.into_place(),
            to: self.to.into_place(),
            start_time: self.start_time,
            end_time: self.end_time,
            mode: self.mode,
            agency_name: self.agency_name,
            route_name: self.route_name,
            interline_with_previous_leg: self.interline_with_previous_leg,
        }
    }
}

impl ApiPlace {
    fn into_place(self) -> Place {
        Place {
            name: self.name,
            lng_lat: LngLat::new(self.lon, self.lat),
        }
    }
}

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("trip planner HTTP request failed")]
    Http(#[from] reqwest::Error),
    #[error("malformed trip planner response")]
    Data(#[from] DataError),
}

/// Source of trip plans. Implemented by [`OtpClient`] for the real service
/// and by in-memory doubles in tests.
pub trait TripPlanner {
    fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, OtpError>;
}

#[derive(Debug, Clone)]
pub struct OtpConfig {
    pub base_url: String,
    /// An unresponsive planner would otherwise block acquisition forever.
    pub timeout_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OtpClient {
    config: OtpConfig,
    client: reqwest::blocking::Client,
}

impl OtpClient {
    pub fn new(config: OtpConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl TripPlanner for OtpClient {
    fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, OtpError> {
        let url = format!("{}/otp/plan", self.config.base_url);

        let response = self
            .client
            .post(url)
            .json(request)
            .send()?
            .error_for_status()?
            .json::<PlanResponse>()?;

        Ok(response)
    }
}

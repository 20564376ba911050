//! Radius trimming of itinerary legs near a journey endpoint.
//!
//! Legs wholly inside the radius of the home city are walking/local-transit
//! noise the hiker handles without a timetable. Outbound journeys are trimmed
//! from the start, returns from the end.

use thiserror::Error;
use tracing::debug;

use crate::haversine::distance_meters;
use crate::model::{Itinerary, Leg, LngLat};

/// Which end of the itinerary to trim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimDirection {
    /// Remove the prefix of legs that arrive inside the radius.
    FromStart,
    /// Remove the suffix of legs that depart inside the radius.
    ToEnd,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrimError {
    /// Every leg fell inside the radius. For returns this means the journey
    /// is entirely inside the home radius, which the given radii never
    /// produce; the itinerary is ill-formed for ranking.
    #[error("trimming removed every leg of the itinerary")]
    EmptyAfterTrim,
}

/// Remove the contiguous run of legs whose relevant endpoint (arrival point
/// for a prefix trim, departure point for a suffix trim) lies within
/// `radius_m` of `anchor`, stopping at the first leg outside the radius.
pub fn trim(
    itinerary: &Itinerary,
    anchor: LngLat,
    radius_m: f64,
    direction: TrimDirection,
) -> Result<Itinerary, TrimError> {
    let legs = itinerary.legs();

    let kept: Vec<Leg> = match direction {
        TrimDirection::FromStart => {
            let cut = leading_inside(legs.iter(), anchor, radius_m, |leg| leg.to.lng_lat);
            legs[cut..].to_vec()
        }
        TrimDirection::ToEnd => {
            let cut = leading_inside(legs.iter().rev(), anchor, radius_m, |leg| leg.from.lng_lat);
            legs[..legs.len() - cut].to_vec()
        }
    };

    Itinerary::new(itinerary.date, kept).map_err(|_| TrimError::EmptyAfterTrim)
}

/// Count the contiguous run of legs, from the front of `legs`, whose relevant
/// endpoint is inside the radius.
fn leading_inside<'a>(
    legs: impl Iterator<Item = &'a Leg>,
    anchor: LngLat,
    radius_m: f64,
    endpoint: impl Fn(&Leg) -> LngLat,
) -> usize {
    let mut count = 0;
    for leg in legs {
        if distance_meters(anchor, endpoint(leg)) < radius_m {
            debug!(mode = ?leg.mode, "trimmed leg inside radius");
            count += 1;
        } else {
            break;
        }
    }
    count
}

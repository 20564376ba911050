//! Test fixtures for hike-planner.
//!
//! Provides realistic test data including:
//! - Real Scottish coordinates (Edinburgh and trailhead anchors)
//! - Builders for legs, itineraries, routes and places
//! - A scripted trip-planner double

pub mod planner;
pub mod scotland;

pub use planner::*;
pub use scotland::*;

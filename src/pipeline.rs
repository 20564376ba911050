//! End-to-end orchestration: acquire itineraries for every (start, target)
//! unit, rank all pairs globally, and build display-ready snapshots.
//!
//! Acquisition units are independent and run in parallel; pagination inside
//! one unit stays sequential. Ranking is pure and parallelized across units.
//! A failed unit is logged and skipped so the rest of the batch completes.

use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Instant;

use chrono::{NaiveDate, Weekday};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::acquire::{self, AcquireConfig, AcquireError};
use crate::model::{DataError, Itinerary, Munro, MunroIndex, Route, StartingPlace, TargetPlace};
use crate::otp::TripPlanner;
use crate::pairs::{self, ScoredPair};
use crate::percentile::PercentileMap;
use crate::score::RankingPreferences;
use crate::select::{self, RankedOption, SelectionLimits};

/// Outbound and return candidates for one searched weekday.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayItineraries {
    pub day: Weekday,
    pub date: NaiveDate,
    pub outbounds: Vec<Itinerary>,
    pub returns: Vec<Itinerary>,
}

/// Everything acquired for one (start, target) unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAnalysis {
    pub start: String,
    pub target: String,
    pub days: Vec<DayItineraries>,
}

/// Acquire all search days for one (start, target) unit.
pub fn analyze_unit<P: TripPlanner>(
    planner: &P,
    config: &AcquireConfig,
    start: &StartingPlace,
    target: &TargetPlace,
) -> Result<UnitAnalysis, AcquireError> {
    info!(start = %start.id, target = %target.id, "analyzing");
    let started = Instant::now();

    let mut days = Vec::with_capacity(config.search_days.len());
    for day in &config.search_days {
        let date = acquire::search_date_for(config.base_date, *day);
        let outbounds = acquire::find_outbound(planner, config, start, target, date)?;
        let returns = acquire::find_return(planner, config, target, start, date)?;
        days.push(DayItineraries {
            day: *day,
            date,
            outbounds,
            returns,
        });
    }

    info!(
        start = %start.id,
        target = %target.id,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "analyzed"
    );
    Ok(UnitAnalysis {
        start: start.id.clone(),
        target: target.id.clone(),
        days,
    })
}

/// Run every (start, target) unit, in parallel across units. A unit failure
/// is fatal for that unit only: it is logged, returned as an `Err`, and the
/// remaining units still run.
pub fn analyze_all<P: TripPlanner + Sync>(
    planner: &P,
    config: &AcquireConfig,
    starts: &[StartingPlace],
    targets: &[TargetPlace],
) -> Vec<Result<UnitAnalysis, AcquireError>> {
    let units: Vec<(&StartingPlace, &TargetPlace)> = targets
        .iter()
        .flat_map(|target| starts.iter().map(move |start| (start, target)))
        .collect();

    info!(units = units.len(), "starting acquisition batch");
    let started = Instant::now();

    let results: Vec<Result<UnitAnalysis, AcquireError>> = units
        .par_iter()
        .map(|&(start, target)| {
            analyze_unit(planner, config, start, target).inspect_err(|err| {
                error!(start = %start.id, target = %target.id, error = %err, "unit failed");
            })
        })
        .collect();

    let failures = results.iter().filter(|r| r.is_err()).count();
    info!(
        units = units.len(),
        failures,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "acquisition batch done"
    );
    results
}

/// A route with its munros resolved, as handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub name: String,
    pub munros: Vec<Munro>,
    pub distance_km: f64,
    pub ascent_m: f64,
    pub min_hours: f64,
    pub max_hours: f64,
}

impl RouteSummary {
    fn resolve(route: &Route, munros: &MunroIndex) -> Result<Self, DataError> {
        let munros = route
            .munros
            .iter()
            .map(|number| munros.resolve(*number).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: route.name.clone(),
            munros,
            distance_km: route.distance_km,
            ascent_m: route.ascent_m,
            min_hours: route.min_hours,
            max_hours: route.max_hours,
        })
    }
}

/// Ranked, capped options for one target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTarget {
    pub target: String,
    pub routes: Vec<RouteSummary>,
    pub options: Vec<RankedOption>,
}

impl RankedTarget {
    /// The compact headline subset for this target.
    pub fn headline(&self, limits: &SelectionLimits) -> Vec<RankedOption> {
        select::headline(&self.options, limits.headline)
    }
}

/// The full ranking at one preference set. Immutable once built.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingSnapshot {
    pub targets: Vec<RankedTarget>,
}

struct Candidate<'a> {
    analysis: &'a UnitAnalysis,
    day: &'a DayItineraries,
    pair: ScoredPair,
}

impl RankingSnapshot {
    /// Score every pair in the dataset, normalize raw scores into global
    /// percentiles, and cap the options kept per (start, day).
    pub fn build(
        analyses: &[UnitAnalysis],
        targets: &[TargetPlace],
        munros: &MunroIndex,
        prefs: &RankingPreferences,
        limits: &SelectionLimits,
    ) -> Result<Self, DataError> {
        let started = Instant::now();
        let targets_by_id: HashMap<&str, &TargetPlace> = targets
            .iter()
            .map(|target| (target.id.as_str(), target))
            .collect();

        // Pair selection is pure and independent per unit.
        let candidates: Vec<Candidate<'_>> = analyses
            .par_iter()
            .map(|analysis| {
                let Some(target) = targets_by_id.get(analysis.target.as_str()) else {
                    warn!(target = %analysis.target, "analysis references unknown target");
                    return Vec::new();
                };
                let Some(route) = target.primary_route() else {
                    warn!(target = %analysis.target, "target has no routes, skipping");
                    return Vec::new();
                };
                analysis
                    .days
                    .iter()
                    .flat_map(|day| {
                        pairs::select_pairs(&day.outbounds, &day.returns, route, prefs)
                            .pairs
                            .into_iter()
                            .map(move |pair| Candidate {
                                analysis,
                                day,
                                pair,
                            })
                    })
                    .collect()
            })
            .collect::<Vec<Vec<Candidate<'_>>>>()
            .into_iter()
            .flatten()
            .collect();

        // One percentile map over the whole dataset, so percentiles compare
        // across targets and routes of different inherent quality.
        let raw_scores: Vec<f64> = candidates.iter().map(|c| c.pair.score.raw).collect();
        let percentiles = PercentileMap::build(&raw_scores);

        let mut options_by_target: HashMap<&str, Vec<RankedOption>> = HashMap::new();
        for candidate in candidates {
            let option = RankedOption {
                start: candidate.analysis.start.clone(),
                target: candidate.analysis.target.clone(),
                day: candidate.day.day,
                outbound: candidate.day.outbounds[candidate.pair.outbound_index].clone(),
                ret: candidate.day.returns[candidate.pair.return_index].clone(),
                score: candidate.pair.score,
                percentile: percentiles.percentile_of(candidate.pair.score.raw),
            };
            options_by_target
                .entry(candidate.analysis.target.as_str())
                .or_default()
                .push(option);
        }

        let mut ranked_targets = Vec::with_capacity(targets.len());
        for target in targets {
            let options = options_by_target.remove(target.id.as_str()).unwrap_or_default();
            let routes = target
                .routes
                .iter()
                .map(|route| RouteSummary::resolve(route, munros))
                .collect::<Result<Vec<_>, _>>()?;
            ranked_targets.push(RankedTarget {
                target: target.id.clone(),
                routes,
                options: select::cap_per_start_day(options, limits.per_start_day),
            });
        }

        info!(
            targets = ranked_targets.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ranking snapshot built"
        );
        Ok(Self {
            targets: ranked_targets,
        })
    }
}

/// Ranking snapshot built once at default preferences and handed out by
/// reference; any other preference set triggers a fresh computation.
#[derive(Debug, Clone)]
pub struct DefaultRankingCache {
    snapshot: RankingSnapshot,
}

impl DefaultRankingCache {
    pub fn build(
        analyses: &[UnitAnalysis],
        targets: &[TargetPlace],
        munros: &MunroIndex,
        limits: &SelectionLimits,
    ) -> Result<Self, DataError> {
        let snapshot = RankingSnapshot::build(
            analyses,
            targets,
            munros,
            &RankingPreferences::default(),
            limits,
        )?;
        Ok(Self { snapshot })
    }

    pub fn snapshot(&self) -> &RankingSnapshot {
        &self.snapshot
    }

    /// The cached snapshot when `prefs` equals the default set, otherwise a
    /// freshly computed one.
    pub fn snapshot_for(
        &self,
        analyses: &[UnitAnalysis],
        targets: &[TargetPlace],
        munros: &MunroIndex,
        prefs: &RankingPreferences,
        limits: &SelectionLimits,
    ) -> Result<Cow<'_, RankingSnapshot>, DataError> {
        if *prefs == RankingPreferences::default() {
            return Ok(Cow::Borrowed(&self.snapshot));
        }
        RankingSnapshot::build(analyses, targets, munros, prefs, limits).map(Cow::Owned)
    }
}

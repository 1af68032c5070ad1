//! Route ordering and metrics for a courier's active deliveries.
//!
//! Ordering is a greedy nearest-neighbor pass with a hard
//! pickup-before-dropoff precedence rule per delivery. Stop counts are
//! small (tens), so an optimal tour is not attempted; the precedence rule
//! is a correctness requirement and is never traded for distance.

use crate::models::{ActiveDelivery, Coordinate, Stop, StopKind};
use crate::spatial::haversine_distance_km;
use crate::stops::extract_stops;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tunable estimation constants.
///
/// The defaults are heuristics (3 min per km of transit, 5 min dwell per
/// stop), not measurements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoutePolicy {
    pub minutes_per_km: f64,
    pub dwell_minutes_per_stop: f64,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            minutes_per_km: 3.0,
            dwell_minutes_per_stop: 5.0,
        }
    }
}

/// Result of one ordering pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderedStops {
    pub stops: Vec<Stop>,
    /// Dropoffs whose pickup never appeared in the input. Dropped from the
    /// route rather than reordered around the precedence rule.
    pub dropped: Vec<Stop>,
    /// True when no stop carried a coordinate; `stops` is then the input,
    /// unchanged, and the caller decides how to present it.
    pub unrankable: bool,
}

/// Distance and time estimate for an ordered stop sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Rounded to one decimal
    pub total_distance_km: f64,
    pub estimated_minutes: u32,
}

/// A computed route. Ephemeral: recalculated on demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub stops: Vec<Stop>,
    pub total_distance_km: f64,
    pub estimated_minutes: u32,
    pub dropped: Vec<Stop>,
    pub unrankable: bool,
}

/// Order stops by repeatedly taking the nearest reachable stop from the
/// courier's current position, starting at `origin`.
///
/// A dropoff only becomes reachable once its delivery's pickup has been
/// placed. Ties go to the earliest input position, so the result is
/// deterministic. Stops without coordinates are appended at the end in
/// input order.
pub fn optimize_route(stops: &[Stop], origin: Coordinate) -> OrderedStops {
    if stops.is_empty() {
        return OrderedStops {
            stops: Vec::new(),
            dropped: Vec::new(),
            unrankable: false,
        };
    }

    let (ranked, unranked): (Vec<Stop>, Vec<Stop>) = stops
        .iter()
        .cloned()
        .partition(|stop| stop.coordinate.is_some());

    if ranked.is_empty() {
        return OrderedStops {
            stops: stops.to_vec(),
            dropped: Vec::new(),
            unrankable: true,
        };
    }

    let mut ordered = Vec::with_capacity(ranked.len());
    let mut dropped = Vec::new();
    let mut remaining = ranked;
    let mut picked: HashSet<String> = HashSet::new();
    let mut current = origin;

    while !remaining.is_empty() {
        let mut nearest: Option<(usize, f64)> = None;

        for (index, stop) in remaining.iter().enumerate() {
            // A dropoff is only reachable after its pickup
            if stop.kind == StopKind::Dropoff && !picked.contains(&stop.delivery_id) {
                continue;
            }
            let Some(coordinate) = stop.coordinate else {
                continue;
            };
            let distance = haversine_distance_km(current, coordinate);
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((index, distance));
            }
        }

        let Some((index, _)) = nearest else {
            // Everything left is a dropoff awaiting a pickup that is not in
            // the input. Caller data is inconsistent; drop them from the
            // ranked route.
            tracing::warn!(
                count = remaining.len(),
                "dropping dropoffs with no matching pickup from route"
            );
            dropped = remaining;
            break;
        };

        let stop = remaining.remove(index);
        if stop.kind == StopKind::Pickup {
            picked.insert(stop.delivery_id.clone());
        }
        if let Some(coordinate) = stop.coordinate {
            current = coordinate;
        }
        ordered.push(stop);
    }

    ordered.extend(unranked);

    OrderedStops {
        stops: ordered,
        dropped,
        unrankable: false,
    }
}

/// Sum consecutive leg distances from `origin` along the route and derive
/// the time estimate.
///
/// Stops without coordinates contribute dwell time but no distance; the
/// running position only advances at coordinate-bearing stops, so a gap in
/// geocoding does not break the chain.
pub fn compute_metrics(stops: &[Stop], origin: Coordinate, policy: &RoutePolicy) -> RouteMetrics {
    let mut distance_km = 0.0;
    let mut previous = origin;

    for stop in stops {
        if let Some(coordinate) = stop.coordinate {
            distance_km += haversine_distance_km(previous, coordinate);
            previous = coordinate;
        }
    }

    let estimated = distance_km * policy.minutes_per_km
        + stops.len() as f64 * policy.dwell_minutes_per_stop;

    RouteMetrics {
        total_distance_km: (distance_km * 10.0).round() / 10.0,
        estimated_minutes: estimated.round() as u32,
    }
}

/// Full pipeline: extract stops, order them, compute metrics.
pub fn plan_route(
    deliveries: &[ActiveDelivery],
    origin: Coordinate,
    policy: &RoutePolicy,
) -> Route {
    let stops = extract_stops(deliveries);
    let ordering = optimize_route(&stops, origin);
    let metrics = compute_metrics(&ordering.stops, origin, policy);

    Route {
        stops: ordering.stops,
        total_distance_km: metrics.total_distance_km,
        estimated_minutes: metrics.estimated_minutes,
        dropped: ordering.dropped,
        unrankable: ordering.unrankable,
    }
}

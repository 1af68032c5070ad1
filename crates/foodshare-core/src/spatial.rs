//! Spatial math for route distance calculations.

use crate::models::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the great-circle distance between two points in kilometers
/// using the Haversine formula.
///
/// Pure and total for any two valid coordinates. Not defined for unknown
/// locations; callers holding an `Option<Coordinate>` must guard first.
pub fn haversine_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

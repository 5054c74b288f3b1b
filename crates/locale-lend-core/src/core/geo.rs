//! Great-circle distance

use crate::models::geo::GeoPoint;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two points, truncated to whole meters.
///
/// The latitude/longitude deltas are taken as absolute values; both only
/// appear squared under a sine, so this keeps `d(a, b) == d(b, a)` exact
/// without changing the result.
pub fn haversine_distance(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let d_lat = (to.latitude() - from.latitude()).abs().to_radians();
    let d_lon = (to.longitude() - from.longitude()).abs().to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1 for near-antipodal pairs.
    let a = a.min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_METERS * c).floor()
}

//! Admissible lower bound on remaining travel time

use geo::{Distance, Haversine, Point};

/// Fastest plausible road speed (km/h)
pub const DEFAULT_MAX_SPEED_KMH: f64 = 130.0;

/// Great-circle distance to the goal driven at `max_speed_kmh`, in seconds.
///
/// Roads are never shorter than the great circle and never faster than the
/// assumed maximum, so this never exceeds the true remaining time.
pub fn travel_time_lower_bound(from: Point<f64>, goal: Point<f64>, max_speed_kmh: f64) -> f64 {
    let distance_km = Haversine.distance(from, goal) / 1000.0;
    distance_km / max_speed_kmh * 3600.0
}

//! Great-circle distance on a spherical Earth.

use crate::business::Coordinates;

/// Mean Earth radius used for every distance in the catalog.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometres.
///
/// Inputs are not range-checked; callers that need to skip malformed
/// positions check [`Coordinates::is_valid`] first.
#[must_use]
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Human-readable distance: whole metres under 1 km, else one decimal km.
#[must_use]
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0}m", km * 1000.0)
    } else {
        format!("{km:.1}km")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAN_JUAN: Coordinates = Coordinates::new(14.7174, -90.6413);

    #[test]
    fn distance_to_self_is_zero() {
        assert!(haversine_km(SAN_JUAN, SAN_JUAN).abs() < 1e-9);
    }

    #[test]
    fn antipodal_on_equator_is_half_circumference() {
        let d = haversine_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0));
        // pi * 6371 = 20015.09
        assert!((d - 20_015.09).abs() < 0.5, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let guatemala_city = Coordinates::new(14.6349, -90.5069);
        let a = haversine_km(SAN_JUAN, guatemala_city);
        let b = haversine_km(guatemala_city, SAN_JUAN);
        assert!((a - b).abs() < 1e-9);
        // Roughly 17 km between the two centres.
        assert!(a > 15.0 && a < 19.0, "got {a}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_km(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn format_distance_switches_units_at_one_km() {
        assert_eq!(format_distance(0.35), "350m");
        assert_eq!(format_distance(0.9996), "1000m");
        assert_eq!(format_distance(1.0), "1.0km");
        assert_eq!(format_distance(12.345), "12.3km");
    }
}

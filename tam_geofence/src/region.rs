use tam_models::reminder::ReminderId;

use crate::registry::GeofenceError;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Circular trigger region around a reminder's location. Fires on entry
/// only and never expires on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchedRegion {
    pub reminder_id: ReminderId,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
}

impl WatchedRegion {
    pub fn new(
        reminder_id: ReminderId,
        latitude: f64,
        longitude: f64,
        radius_m: f64,
    ) -> Result<Self, GeofenceError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeofenceError::InvalidRegion {
                latitude,
                longitude,
            });
        }
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(GeofenceError::InvalidRadius(radius_m));
        }

        Ok(Self {
            reminder_id,
            latitude,
            longitude,
            radius_m,
        })
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        haversine_distance_m(self.latitude, self.longitude, latitude, longitude) <= self.radius_m
    }
}

/// Great-circle distance between two coordinates, in meters.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

// Entry detection. A region fires when a report lands inside it and the
// previous report (if any) was not already inside; a region that is occupied
// at registration time fires on the very first report.
pub(crate) fn entered(was_inside: Option<bool>, now_inside: bool) -> bool {
    now_inside && was_inside != Some(true)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tam_models::uuid::Uuid;

    use super::*;

    // Charles Bridge, Prague.
    const CENTER: (f64, f64) = (50.0865, 14.4114);

    #[test]
    fn distance_between_a_point_and_itself_is_zero() {
        assert_eq!(
            haversine_distance_m(CENTER.0, CENTER.1, CENTER.0, CENTER.1),
            0.0
        );
    }

    #[test]
    fn paris_to_london_is_roughly_344_km() {
        let distance = haversine_distance_m(48.8566, 2.3522, 51.5074, -0.1278);

        assert!(
            (340_000.0..348_000.0).contains(&distance),
            "got {distance}"
        );
    }

    #[test]
    fn a_nearby_point_is_inside_the_default_radius() {
        let region = WatchedRegion::new(Uuid::new_v4(), CENTER.0, CENTER.1, 1_000.0).unwrap();

        // ~450 m north of the center.
        assert!(region.contains(CENTER.0 + 0.004, CENTER.1));
    }

    #[test]
    fn a_distant_point_is_outside_the_default_radius() {
        let region = WatchedRegion::new(Uuid::new_v4(), CENTER.0, CENTER.1, 1_000.0).unwrap();

        // ~2.2 km north of the center.
        assert!(!region.contains(CENTER.0 + 0.02, CENTER.1));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let result = WatchedRegion::new(Uuid::new_v4(), 91.0, 0.0, 1_000.0);
        assert!(matches!(result, Err(GeofenceError::InvalidRegion { .. })));

        let result = WatchedRegion::new(Uuid::new_v4(), 0.0, -181.0, 1_000.0);
        assert!(matches!(result, Err(GeofenceError::InvalidRegion { .. })));
    }

    #[test]
    fn non_positive_radii_are_rejected() {
        for radius in [0.0, -5.0, f64::NAN] {
            let result = WatchedRegion::new(Uuid::new_v4(), CENTER.0, CENTER.1, radius);
            assert!(matches!(result, Err(GeofenceError::InvalidRadius(_))));
        }
    }

    #[test]
    fn entry_requires_landing_inside_from_not_inside() {
        assert!(entered(None, true));
        assert!(entered(Some(false), true));
        assert!(!entered(Some(true), true));
        assert!(!entered(None, false));
        assert!(!entered(Some(false), false));
        assert!(!entered(Some(true), false));
    }

    proptest! {
        #[test]
        fn distance_is_symmetric_and_bounded(
            lat1 in -90.0f64..=90.0,
            lon1 in -180.0f64..=180.0,
            lat2 in -90.0f64..=90.0,
            lon2 in -180.0f64..=180.0,
        ) {
            let there = haversine_distance_m(lat1, lon1, lat2, lon2);
            let back = haversine_distance_m(lat2, lon2, lat1, lon1);

            prop_assert!(there >= 0.0);
            // Half the Earth's circumference is the farthest apart two
            // points can be.
            prop_assert!(there <= std::f64::consts::PI * 6_371_000.0 + 1.0);
            prop_assert!((there - back).abs() < 1e-6);
        }

        #[test]
        fn a_region_always_contains_its_own_center(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            radius in 1.0f64..=100_000.0,
        ) {
            let region = WatchedRegion::new(Uuid::new_v4(), lat, lon, radius).unwrap();

            prop_assert!(region.contains(lat, lon));
        }
    }
}

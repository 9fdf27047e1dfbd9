use std::collections::BTreeMap;

use crate::ephemeris::houses::{self, HouseFailure};
use crate::ephemeris::orbits;
use crate::ephemeris::provider::{sampled_speed, EphemerisError, EphemerisProvider};
use crate::ephemeris::types::{
    EphemerisSettings, EphemerisSnapshot, GeoLocation, HouseCusps, RawPosition,
};

/// 1800-01-01 00:00 UT
pub const ANALYTIC_MIN_JD: f64 = 2_378_496.5;
/// 2051-01-01 00:00 UT, the end of 2050-12-31
pub const ANALYTIC_MAX_JD: f64 = 2_470_172.5;

/// Built-in provider driven by mean orbital elements.
///
/// Accurate to a few arcminutes for the planets and better than a tenth of
/// a degree for the Moon across 1800-2050. Instants outside that window are
/// refused rather than extrapolated. Julian Days are taken as UT; the
/// difference from dynamical time is below the model's precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub const NAME: &'static str = "analytic";

    pub fn new() -> Self {
        Self
    }

    /// Whether `jd` lies in `[ANALYTIC_MIN_JD, ANALYTIC_MAX_JD)`.
    pub fn supports(jd: f64) -> bool {
        (ANALYTIC_MIN_JD..ANALYTIC_MAX_JD).contains(&jd)
    }

    /// Speed sample pair around `jd`, slid inward so both samples stay
    /// inside the supported window.
    fn sample_window(jd: f64, span: f64) -> (f64, f64) {
        let start = (jd - span / 2.0).max(ANALYTIC_MIN_JD);
        let end = start + span;
        if end < ANALYTIC_MAX_JD {
            (start, end)
        } else {
            (jd - span, jd)
        }
    }

    fn out_of_range(jd: f64) -> EphemerisError {
        EphemerisError::OutOfRange {
            provider: Self::NAME.to_string(),
            jd,
            min: ANALYTIC_MIN_JD,
            max: ANALYTIC_MAX_JD,
        }
    }
}

impl EphemerisProvider for AnalyticEphemeris {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn snapshot(
        &self,
        jd: f64,
        location: GeoLocation,
        settings: &EphemerisSettings,
    ) -> Result<EphemerisSnapshot, EphemerisError> {
        if !jd.is_finite() || !Self::supports(jd) {
            return Err(Self::out_of_range(jd));
        }
        if settings.speed_sample_days.is_nan() || settings.speed_sample_days <= 0.0 {
            return Err(EphemerisError::Unavailable {
                provider: Self::NAME.to_string(),
                reason: format!(
                    "speed sample span must be positive, got {}",
                    settings.speed_sample_days
                ),
            });
        }

        let (sample_start, sample_end) = Self::sample_window(jd, settings.speed_sample_days);
        let mut bodies = BTreeMap::new();
        for &body in &settings.bodies {
            let now = orbits::geocentric(body, jd);
            let before = orbits::geocentric(body, sample_start).longitude;
            let after = orbits::geocentric(body, sample_end).longitude;
            bodies.insert(
                body,
                RawPosition {
                    longitude: now.longitude,
                    latitude: now.latitude,
                    distance: now.distance,
                    speed: sampled_speed(before, after, settings.speed_sample_days),
                },
            );
        }

        let angles = houses::angles(jd, location.lat, location.lon);
        let cusps = houses::house_cusps(settings.house_system, &angles, location.lat).map_err(
            |failure| match failure {
                HouseFailure::Circumpolar { latitude } => EphemerisError::UnsupportedLocation {
                    provider: Self::NAME.to_string(),
                    system: settings.house_system.to_string(),
                    latitude,
                },
                HouseFailure::NoConvergence { cusp } => EphemerisError::CalculationFailed {
                    provider: Self::NAME.to_string(),
                    body: format!("house cusp {}", cusp),
                    jd,
                    message: "Placidus iteration did not converge".to_string(),
                },
            },
        )?;

        log::debug!(
            "analytic snapshot at JD {:.5}: {} bodies, {} houses",
            jd,
            bodies.len(),
            settings.house_system
        );

        Ok(EphemerisSnapshot {
            julian_day: jd,
            bodies,
            houses: HouseCusps {
                system: settings.house_system,
                cusps,
            },
            ascendant: angles.ascendant,
            midheaven: angles.midheaven,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::types::HouseSystem;
    use crate::time::julian_day;
    use crate::zodiac::Body;

    const LONDON: GeoLocation = GeoLocation { lat: 51.5, lon: -0.13 };

    #[test]
    fn range_bounds_match_calendar() {
        assert_eq!(julian_day(1800, 1, 1, 0, 0), ANALYTIC_MIN_JD);
        assert_eq!(julian_day(2051, 1, 1, 0, 0), ANALYTIC_MAX_JD);
    }

    #[test]
    fn refuses_instants_outside_range() {
        let provider = AnalyticEphemeris::new();
        let jd = julian_day(1700, 6, 1, 12, 0);
        let err = provider
            .snapshot(jd, LONDON, &EphemerisSettings::default())
            .unwrap_err();
        assert!(matches!(err, EphemerisError::OutOfRange { .. }));
        assert_eq!(err.provider(), "analytic");
    }

    #[test]
    fn upper_bound_is_exclusive() {
        let provider = AnalyticEphemeris::new();
        let here = GeoLocation { lat: 10.0, lon: 0.0 };
        let err = provider
            .snapshot(ANALYTIC_MAX_JD, here, &EphemerisSettings::default())
            .unwrap_err();
        assert!(matches!(err, EphemerisError::OutOfRange { .. }));

        assert!(provider
            .snapshot(ANALYTIC_MAX_JD - 0.1, here, &EphemerisSettings::default())
            .is_ok());
        assert!(provider
            .snapshot(ANALYTIC_MIN_JD, here, &EphemerisSettings::default())
            .is_ok());
    }

    #[test]
    fn speed_samples_stay_inside_window() {
        assert_eq!(
            AnalyticEphemeris::sample_window(ANALYTIC_MIN_JD, 1.0),
            (ANALYTIC_MIN_JD, ANALYTIC_MIN_JD + 1.0)
        );
        let late = ANALYTIC_MAX_JD - 0.25;
        assert_eq!(AnalyticEphemeris::sample_window(late, 1.0), (late - 1.0, late));
        assert_eq!(
            AnalyticEphemeris::sample_window(2_451_545.0, 1.0),
            (2_451_544.5, 2_451_545.5)
        );

        let provider = AnalyticEphemeris::new();
        for jd in [ANALYTIC_MIN_JD, late] {
            let snapshot = provider
                .snapshot(jd, LONDON, &EphemerisSettings::default())
                .unwrap();
            let sun = snapshot.bodies[&Body::Sun];
            assert!((sun.speed - 1.0).abs() < 0.05, "speed = {}", sun.speed);
        }
    }

    #[test]
    fn snapshot_covers_requested_bodies() {
        let provider = AnalyticEphemeris::new();
        let snapshot = provider
            .snapshot(julian_day(1990, 6, 15, 0, 0), LONDON, &EphemerisSettings::default())
            .unwrap();
        assert_eq!(snapshot.bodies.len(), 13);
        assert_eq!(snapshot.houses.cusps[0], snapshot.ascendant);
        assert_eq!(snapshot.houses.cusps[9], snapshot.midheaven);
    }

    #[test]
    fn sun_moves_about_a_degree_a_day() {
        let provider = AnalyticEphemeris::new();
        let snapshot = provider
            .snapshot(julian_day(2010, 3, 1, 0, 0), LONDON, &EphemerisSettings::default())
            .unwrap();
        let sun = snapshot.bodies[&Body::Sun];
        assert!((sun.speed - 1.0).abs() < 0.05, "speed = {}", sun.speed);
        assert!(!sun.is_retrograde());
        assert!(snapshot.bodies[&Body::NorthNode].is_retrograde());
    }

    #[test]
    fn polar_placidus_is_unavailable_but_equal_works() {
        let provider = AnalyticEphemeris::new();
        let tromso = GeoLocation { lat: 69.65, lon: 18.96 };
        let jd = julian_day(2000, 1, 1, 12, 0);

        let err = provider
            .snapshot(jd, tromso, &EphemerisSettings::default())
            .unwrap_err();
        assert!(matches!(err, EphemerisError::UnsupportedLocation { .. }));

        let equal = EphemerisSettings {
            house_system: HouseSystem::Equal,
            ..EphemerisSettings::default()
        };
        assert!(provider.snapshot(jd, tromso, &equal).is_ok());
    }

    #[test]
    fn deterministic_for_same_input() {
        let provider = AnalyticEphemeris::new();
        let jd = julian_day(1975, 11, 2, 8, 45);
        let a = provider.snapshot(jd, LONDON, &EphemerisSettings::default()).unwrap();
        let b = provider.snapshot(jd, LONDON, &EphemerisSettings::default()).unwrap();
        assert_eq!(a, b);
    }
}

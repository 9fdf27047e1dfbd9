//! Replayable provider for tests, benches and offline runs.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::ephemeris::houses;
use crate::ephemeris::provider::{EphemerisError, EphemerisProvider};
use crate::ephemeris::types::{
    EphemerisSettings, EphemerisSnapshot, GeoLocation, HouseCusps, HouseSystem, RawPosition,
};
use crate::position::normalize_deg;
use crate::zodiac::Body;

/// Serves the same recorded positions for every request.
///
/// Speeds are stored as already sampled, so a fixture can pin a body as
/// retrograde without modelling its orbit.
#[derive(Debug, Clone)]
pub struct FixedEphemeris {
    name: String,
    bodies: BTreeMap<Body, RawPosition>,
    houses: HouseCusps,
    ascendant: f64,
    midheaven: f64,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl FixedEphemeris {
    pub fn new(houses: HouseCusps, ascendant: f64, midheaven: f64) -> Self {
        Self {
            name: "fixture".to_string(),
            bodies: BTreeMap::new(),
            houses,
            ascendant: normalize_deg(ascendant),
            midheaven: normalize_deg(midheaven),
            failure: None,
            delay: None,
        }
    }

    /// Equal houses from `ascendant`, with the midheaven a quadrant behind.
    pub fn equal_houses(ascendant: f64) -> Self {
        Self::new(
            HouseCusps {
                system: HouseSystem::Equal,
                cusps: houses::equal(ascendant),
            },
            ascendant,
            ascendant - 90.0,
        )
    }

    /// Replay a snapshot captured from another provider.
    pub fn from_snapshot(snapshot: EphemerisSnapshot) -> Self {
        Self {
            bodies: snapshot.bodies,
            ..Self::new(snapshot.houses, snapshot.ascendant, snapshot.midheaven)
        }
    }

    /// A provider that refuses every request.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::equal_houses(0.0)
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_body(self, body: Body, longitude: f64, speed: f64) -> Self {
        self.with_position(
            body,
            RawPosition {
                longitude: normalize_deg(longitude),
                latitude: 0.0,
                distance: 1.0,
                speed,
            },
        )
    }

    pub fn with_position(mut self, body: Body, position: RawPosition) -> Self {
        self.bodies.insert(body, position);
        self
    }

    /// Block the calling thread this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl EphemerisProvider for FixedEphemeris {
    fn name(&self) -> &str {
        &self.name
    }

    fn snapshot(
        &self,
        jd: f64,
        _location: GeoLocation,
        settings: &EphemerisSettings,
    ) -> Result<EphemerisSnapshot, EphemerisError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if let Some(reason) = &self.failure {
            return Err(EphemerisError::Unavailable {
                provider: self.name.clone(),
                reason: reason.clone(),
            });
        }

        let mut bodies = BTreeMap::new();
        for body in &settings.bodies {
            let position = self.bodies.get(body).ok_or_else(|| EphemerisError::CalculationFailed {
                provider: self.name.clone(),
                body: body.slug().to_string(),
                jd,
                message: "no recorded position".to_string(),
            })?;
            bodies.insert(*body, *position);
        }

        Ok(EphemerisSnapshot {
            julian_day: jd,
            bodies,
            houses: self.houses,
            ascendant: self.ascendant,
            midheaven: self.midheaven,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANYWHERE: GeoLocation = GeoLocation { lat: 0.0, lon: 0.0 };

    #[test]
    fn serves_only_requested_bodies() {
        let provider = FixedEphemeris::equal_houses(15.0)
            .with_body(Body::Sun, 10.0, 1.0)
            .with_body(Body::Moon, 200.0, 13.0);
        let settings = EphemerisSettings {
            bodies: vec![Body::Sun],
            ..EphemerisSettings::default()
        };
        let snapshot = provider.snapshot(2_451_545.0, ANYWHERE, &settings).unwrap();
        assert_eq!(snapshot.bodies.len(), 1);
        assert_eq!(snapshot.houses.cusps[0], 15.0);
        assert_eq!(snapshot.midheaven, 285.0);
    }

    #[test]
    fn missing_body_is_an_error() {
        let provider = FixedEphemeris::equal_houses(0.0).with_body(Body::Sun, 10.0, 1.0);
        let err = provider
            .snapshot(2_451_545.0, ANYWHERE, &EphemerisSettings::default())
            .unwrap_err();
        assert!(matches!(err, EphemerisError::CalculationFailed { .. }));
    }

    #[test]
    fn failing_provider_reports_its_name() {
        let provider = FixedEphemeris::failing("archive offline").named("archive");
        let err = provider
            .snapshot(2_451_545.0, ANYWHERE, &EphemerisSettings::default())
            .unwrap_err();
        assert_eq!(err.provider(), "archive");
        assert_eq!(err.to_string(), "archive offline");
    }
}

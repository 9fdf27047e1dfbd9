use std::sync::Arc;
use std::time::Duration;

use astrot_config::AstrotSettings;

use crate::aspects::{AspectCalculator, AspectSettings};
use crate::chart::data::{BirthData, BodyPosition, ChartAngles, ChartDerived, HousePosition};
use crate::chart::distribution::{ElementDistribution, ModalityDistribution};
use crate::ephemeris::{
    snapshot_with_timeout, AnalyticEphemeris, EphemerisProvider, EphemerisSettings,
    EphemerisSnapshot, GeoLocation, HouseSystem,
};
use crate::error::{AstrotError, Result};
use crate::position::{house_for_longitude, validate_cusps, Placement};
use crate::zodiac::{Body, House, ALL_BODIES};

/// Typed chart settings
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub house_system: HouseSystem,
    pub aspects: AspectSettings,
    pub speed_sample_days: f64,
    pub timeout: Duration,
    pub bodies: Vec<Body>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            house_system: HouseSystem::default(),
            aspects: AspectSettings::default(),
            speed_sample_days: 1.0,
            timeout: Duration::from_millis(5000),
            bodies: ALL_BODIES.to_vec(),
        }
    }
}

impl ChartSettings {
    pub fn ephemeris_settings(&self) -> EphemerisSettings {
        EphemerisSettings {
            house_system: self.house_system,
            speed_sample_days: self.speed_sample_days,
            bodies: self.bodies.clone(),
        }
    }
}

impl TryFrom<&AstrotSettings> for ChartSettings {
    type Error = AstrotError;

    fn try_from(config: &AstrotSettings) -> Result<Self> {
        let house_system: HouseSystem = config
            .house_system
            .parse()
            .map_err(AstrotError::Configuration)?;
        let aspects = AspectSettings::from_named_orbs(&config.orbs, config.exact_orb)?;
        if !(config.speed_sample_days.is_finite() && config.speed_sample_days > 0.0) {
            return Err(AstrotError::Configuration(format!(
                "speed_sample_days must be positive, got {}",
                config.speed_sample_days
            )));
        }
        if config.timeout_ms == 0 {
            return Err(AstrotError::Configuration(
                "timeout_ms must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            house_system,
            aspects,
            speed_sample_days: config.speed_sample_days,
            timeout: Duration::from_millis(config.timeout_ms),
            bodies: ALL_BODIES.to_vec(),
        })
    }
}

/// Open the provider named in the settings.
pub fn provider_from_config(config: &AstrotSettings) -> Result<Arc<dyn EphemerisProvider>> {
    match config.provider.as_str() {
        AnalyticEphemeris::NAME => Ok(Arc::new(AnalyticEphemeris::new())),
        #[cfg(feature = "swisseph")]
        crate::ephemeris::SwissEphemerisAdapter::NAME => Ok(Arc::new(
            crate::ephemeris::SwissEphemerisAdapter::new(config.swiss_ephemeris_path.clone())?,
        )),
        other => Err(AstrotError::Configuration(format!(
            "unknown ephemeris provider '{}'",
            other
        ))),
    }
}

/// Turns birth data into a derived chart through one provider.
#[derive(Clone)]
pub struct ChartBuilder {
    provider: Arc<dyn EphemerisProvider>,
    settings: ChartSettings,
    calculator: AspectCalculator,
}

impl ChartBuilder {
    pub fn new(provider: Arc<dyn EphemerisProvider>, settings: ChartSettings) -> Self {
        Self {
            provider,
            settings,
            calculator: AspectCalculator::new(),
        }
    }

    pub fn from_config(config: &AstrotSettings) -> Result<Self> {
        Ok(Self::new(
            provider_from_config(config)?,
            ChartSettings::try_from(config)?,
        ))
    }

    pub fn provider(&self) -> &Arc<dyn EphemerisProvider> {
        &self.provider
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    /// Compute the chart synchronously.
    pub fn build(&self, birth: &BirthData) -> Result<ChartDerived> {
        birth.validate()?;
        let jd = birth.julian_day()?;
        self.chart_at(jd, birth.location())
    }

    /// Compute the chart with the provider call bounded by the configured
    /// timeout.
    pub async fn build_bounded(&self, birth: &BirthData) -> Result<ChartDerived> {
        birth.validate()?;
        let jd = birth.julian_day()?;
        let snapshot = snapshot_with_timeout(
            Arc::clone(&self.provider),
            jd,
            birth.location(),
            self.settings.ephemeris_settings(),
            self.settings.timeout,
        )
        .await?;
        self.derive(&snapshot)
    }

    /// Chart for an arbitrary instant and place.
    pub fn chart_at(&self, jd: f64, location: GeoLocation) -> Result<ChartDerived> {
        let snapshot = self
            .provider
            .snapshot(jd, location, &self.settings.ephemeris_settings())?;
        self.derive(&snapshot)
    }

    /// Resolve a snapshot into signs, houses, angles, aspects and
    /// distributions. Pure: the same snapshot always gives the same chart.
    pub fn derive(&self, snapshot: &EphemerisSnapshot) -> Result<ChartDerived> {
        for required in [Body::Sun, Body::Moon] {
            if !snapshot.bodies.contains_key(&required) {
                return Err(AstrotError::data_unavailable(
                    self.provider.name(),
                    format!("snapshot has no {} position", required),
                ));
            }
        }
        let cusps = &snapshot.houses.cusps;
        validate_cusps(cusps)?;

        let mut bodies = Vec::with_capacity(snapshot.bodies.len());
        for (&body, raw) in &snapshot.bodies {
            if !raw.longitude.is_finite() || !raw.speed.is_finite() {
                return Err(AstrotError::data_unavailable(
                    self.provider.name(),
                    format!("non-finite position for {}", body),
                ));
            }
            let placement = Placement::from_longitude(raw.longitude);
            bodies.push(BodyPosition {
                body,
                sign: placement.sign,
                degree: placement.degree,
                house: house_for_longitude(raw.longitude, cusps)?,
                retrograde: raw.is_retrograde(),
                longitude: placement.longitude,
                speed: raw.speed,
            });
        }

        let houses = House::all()
            .map(|house| {
                let placement = Placement::from_longitude(cusps[house.index()]);
                HousePosition {
                    house,
                    sign: placement.sign,
                    degree: placement.degree,
                    longitude: placement.longitude,
                }
            })
            .collect();

        let angles = ChartAngles {
            ascendant: Placement::from_longitude(snapshot.ascendant),
            midheaven: Placement::from_longitude(snapshot.midheaven),
        };

        let aspects = self.calculator.natal_aspects(&bodies, &self.settings.aspects);
        let elements = ElementDistribution::from_signs(bodies.iter().map(|p| p.sign));
        let modalities = ModalityDistribution::from_signs(bodies.iter().map(|p| p.sign));

        log::debug!(
            "chart at JD {:.5}: {} bodies, {} aspects, rising {}",
            snapshot.julian_day,
            bodies.len(),
            aspects.len(),
            angles.ascendant.sign
        );

        Ok(ChartDerived {
            julian_day: snapshot.julian_day,
            house_system: snapshot.houses.system,
            bodies,
            houses,
            angles,
            aspects,
            elements,
            modalities,
        })
    }
}

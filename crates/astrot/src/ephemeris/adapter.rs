use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use swisseph::swe::{calc_ut, houses_ex, set_ephe_path};
use swisseph::{AscMc, Cusp};

use crate::ephemeris::provider::{sampled_speed, EphemerisError, EphemerisProvider};
use crate::ephemeris::types::{
    EphemerisSettings, EphemerisSnapshot, GeoLocation, HouseCusps, HouseSystem, RawPosition,
};
use crate::position::normalize_deg;
use crate::zodiac::Body;

// SUN=0 .. PLUTO=9, MEAN_NODE=10, CHIRON=15. The south node is derived.
const PLANET_IDS: &[(Body, u32)] = &[
    (Body::Sun, 0),
    (Body::Moon, 1),
    (Body::Mercury, 2),
    (Body::Venus, 3),
    (Body::Mars, 4),
    (Body::Jupiter, 5),
    (Body::Saturn, 6),
    (Body::Uranus, 7),
    (Body::Neptune, 8),
    (Body::Pluto, 9),
    (Body::NorthNode, 10),
    (Body::Chiron, 15),
];

// FLG_SWIEPH
const FLAGS: i32 = 2;

fn house_system_byte(system: HouseSystem) -> u8 {
    match system {
        HouseSystem::Placidus => b'P',
        HouseSystem::Porphyry => b'O',
        HouseSystem::Equal => b'E',
        HouseSystem::WholeSign => b'W',
    }
}

/// Provider backed by the Swiss Ephemeris data files.
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
}

impl SwissEphemerisAdapter {
    pub const NAME: &'static str = "swiss";

    /// Create a new adapter with optional ephemeris path
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                provider: Self::NAME.to_string(),
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        set_ephe_path(&path.to_string_lossy());
        log::info!("Swiss Ephemeris data at {}", path.display());
        Ok(Self {
            ephemeris_path: path,
        })
    }

    pub fn ephemeris_path(&self) -> &PathBuf {
        &self.ephemeris_path
    }

    fn longitude(&self, body: Body, code: u32, jd: f64) -> Result<[f64; 3], EphemerisError> {
        let result = calc_ut(jd, code, FLAGS as u32).map_err(|e| EphemerisError::CalculationFailed {
            provider: Self::NAME.to_string(),
            body: body.slug().to_string(),
            jd,
            message: format!("Swiss Ephemeris error: {}", e),
        })?;
        let out = result.out;
        Ok([normalize_deg(out[0]), out[1], out[2]])
    }

    fn position(&self, body: Body, jd: f64, span: f64) -> Result<RawPosition, EphemerisError> {
        let (lookup, flip) = match body {
            Body::SouthNode => (Body::NorthNode, 180.0),
            other => (other, 0.0),
        };
        let code = PLANET_IDS
            .iter()
            .find(|(b, _)| *b == lookup)
            .map(|(_, code)| *code)
            .ok_or_else(|| EphemerisError::CalculationFailed {
                provider: Self::NAME.to_string(),
                body: body.slug().to_string(),
                jd,
                message: format!("No Swiss Ephemeris code for {}", body),
            })?;

        let now = self.longitude(body, code, jd)?;
        let before = self.longitude(body, code, jd - span / 2.0)?[0];
        let after = self.longitude(body, code, jd + span / 2.0)?[0];

        Ok(RawPosition {
            longitude: normalize_deg(now[0] + flip),
            latitude: if flip == 0.0 { now[1] } else { -now[1] },
            distance: now[2],
            speed: sampled_speed(before, after, span),
        })
    }
}

impl EphemerisProvider for SwissEphemerisAdapter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn snapshot(
        &self,
        jd: f64,
        location: GeoLocation,
        settings: &EphemerisSettings,
    ) -> Result<EphemerisSnapshot, EphemerisError> {
        let mut bodies = BTreeMap::new();
        for &body in &settings.bodies {
            bodies.insert(body, self.position(body, jd, settings.speed_sample_days)?);
        }

        let (c, a) = houses_ex(
            jd,
            FLAGS,
            location.lat,
            location.lon,
            house_system_byte(settings.house_system) as i32,
        );
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let cusp_values = [
            cusps.first, cusps.second, cusps.third, cusps.fourth,
            cusps.fifth, cusps.sixth, cusps.seventh, cusps.eighth,
            cusps.ninth, cusps.tenth, cusps.eleventh, cusps.twelfth,
        ];
        if cusp_values.iter().any(|c| !c.is_finite()) {
            return Err(EphemerisError::UnsupportedLocation {
                provider: Self::NAME.to_string(),
                system: settings.house_system.to_string(),
                latitude: location.lat,
            });
        }

        Ok(EphemerisSnapshot {
            julian_day: jd,
            bodies,
            houses: HouseCusps {
                system: settings.house_system,
                cusps: cusp_values.map(normalize_deg),
            },
            ascendant: normalize_deg(ascmc.ascendant),
            midheaven: normalize_deg(ascmc.mc),
        })
    }
}

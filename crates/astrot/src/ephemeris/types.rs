use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::zodiac::{Body, ALL_BODIES};

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Degrees, north positive
    pub lat: f64,
    /// Degrees, east positive
    pub lon: f64,
}

/// Raw geocentric position of one body at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    /// Ecliptic longitude in degrees (0-360)
    pub longitude: f64,
    /// Ecliptic latitude in degrees
    pub latitude: f64,
    /// Geocentric distance in AU
    pub distance: f64,
    /// Speed in longitude (degrees per day)
    pub speed: f64,
}

impl RawPosition {
    pub fn is_retrograde(&self) -> bool {
        self.speed < 0.0
    }
}

/// House division method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    Placidus,
    Porphyry,
    Equal,
    WholeSign,
}

const HOUSE_SYSTEMS: &[(&str, HouseSystem)] = &[
    ("placidus", HouseSystem::Placidus),
    ("porphyry", HouseSystem::Porphyry),
    ("equal", HouseSystem::Equal),
    ("whole_sign", HouseSystem::WholeSign),
];

impl HouseSystem {
    pub fn name(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "placidus",
            HouseSystem::Porphyry => "porphyry",
            HouseSystem::Equal => "equal",
            HouseSystem::WholeSign => "whole_sign",
        }
    }

    /// Systems whose cusps come from the diurnal motion and break down
    /// inside the polar circles.
    pub fn is_time_based(self) -> bool {
        matches!(self, HouseSystem::Placidus)
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HouseSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        HOUSE_SYSTEMS
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, system)| *system)
            .ok_or_else(|| {
                let valid: Vec<&str> = HOUSE_SYSTEMS.iter().map(|(name, _)| *name).collect();
                format!("Invalid house system: {}. Valid systems: {:?}", s, valid)
            })
    }
}

/// House cusp longitudes, index 0 = house 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseCusps {
    pub system: HouseSystem,
    pub cusps: [f64; 12],
}

/// Everything a provider returns for one instant and place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisSnapshot {
    pub julian_day: f64,
    pub bodies: BTreeMap<Body, RawPosition>,
    pub houses: HouseCusps,
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Settings for ephemeris calculations
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisSettings {
    pub house_system: HouseSystem,
    /// Total span between the two samples used to derive speed, in days
    pub speed_sample_days: f64,
    /// Bodies to compute
    pub bodies: Vec<Body>,
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        Self {
            house_system: HouseSystem::default(),
            speed_sample_days: 1.0,
            bodies: ALL_BODIES.to_vec(),
        }
    }
}

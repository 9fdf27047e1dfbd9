use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aspects::Aspect;
use crate::chart::distribution::{ElementDistribution, ModalityDistribution};
use crate::ephemeris::{GeoLocation, HouseSystem};
use crate::error::AstrotError;
use crate::position::Placement;
use crate::time::{julian_day_from_utc, local_to_utc};
use crate::zodiac::{Body, House, Sign};

/// Birth data as submitted: local wall-clock time plus place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    /// Degrees, north positive
    pub latitude: f64,
    /// Degrees, east positive
    pub longitude: f64,
    /// `UTC`, `GMT`, `Z` or a fixed offset such as `UTC+03:00`
    pub timezone: String,
}

impl BirthData {
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        latitude: f64,
        longitude: f64,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            date,
            time,
            latitude,
            longitude,
            timezone: timezone.into(),
        }
    }

    /// Reject coordinates no upstream validator should have let through.
    pub fn validate(&self) -> Result<(), AstrotError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AstrotError::InvalidInput(format!(
                "latitude {} outside -90..=90",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AstrotError::InvalidInput(format!(
                "longitude {} outside -180..=180",
                self.longitude
            )));
        }
        Ok(())
    }

    pub fn location(&self) -> GeoLocation {
        GeoLocation {
            lat: self.latitude,
            lon: self.longitude,
        }
    }

    pub fn to_utc(&self) -> Result<DateTime<Utc>, AstrotError> {
        local_to_utc(self.date.and_time(self.time), &self.timezone)
    }

    pub fn julian_day(&self) -> Result<f64, AstrotError> {
        Ok(julian_day_from_utc(self.to_utc()?))
    }
}

/// `HH:MM` on output (`HH:MM:SS` when seconds are set), either on input.
mod clock_time {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        let text = if time.second() == 0 {
            time.format("%H:%M").to_string()
        } else {
            time.format("%H:%M:%S").to_string()
        };
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&text, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(&text, "%H:%M"))
            .map_err(|e| serde::de::Error::custom(format!("invalid time '{}': {}", text, e)))
    }
}

/// One body resolved to sign, degree and house.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub body: Body,
    pub sign: Sign,
    /// Degree within the sign, in [0, 30)
    pub degree: f64,
    pub house: House,
    pub retrograde: bool,
    /// Absolute ecliptic longitude
    pub longitude: f64,
    /// Degrees per day
    pub speed: f64,
}

/// Sign and degree of a house's starting cusp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HousePosition {
    pub house: House,
    pub sign: Sign,
    pub degree: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartAngles {
    pub ascendant: Placement,
    pub midheaven: Placement,
}

/// Everything computed from one birth data submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDerived {
    pub julian_day: f64,
    pub house_system: HouseSystem,
    /// Canonical body order
    pub bodies: Vec<BodyPosition>,
    /// Houses 1 through 12
    pub houses: Vec<HousePosition>,
    pub angles: ChartAngles,
    pub aspects: Vec<Aspect>,
    pub elements: ElementDistribution,
    pub modalities: ModalityDistribution,
}

impl ChartDerived {
    pub fn body(&self, body: Body) -> Option<&BodyPosition> {
        self.bodies.iter().find(|p| p.body == body)
    }

    pub fn house(&self, house: House) -> Option<&HousePosition> {
        self.houses.get(house.index())
    }

    /// Sign of the ascendant.
    pub fn rising_sign(&self) -> Sign {
        self.angles.ascendant.sign
    }

    pub fn bodies_in_house(&self, house: House) -> impl Iterator<Item = &BodyPosition> {
        self.bodies.iter().filter(move |p| p.house == house)
    }
}

/// A persisted chart: identity, the submitted data and what was derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthChart {
    pub id: Uuid,
    pub user_id: String,
    pub birth_data: BirthData,
    pub derived: ChartDerived,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BirthChart {
    pub fn new(user_id: impl Into<String>, birth_data: BirthData, derived: ChartDerived) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            birth_data,
            derived,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the birth data and everything derived from it, keeping the
    /// chart's identity.
    pub fn recompute(&mut self, birth_data: BirthData, derived: ChartDerived) {
        self.birth_data = birth_data;
        self.derived = derived;
        self.updated_at = Utc::now().max(self.created_at);
    }
}

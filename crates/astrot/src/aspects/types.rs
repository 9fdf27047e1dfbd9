use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AstrotError;
use crate::zodiac::Body;

/// Angular relationships recognised by the detector, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectType {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Quincunx,
    Opposition,
}

pub const ALL_ASPECT_TYPES: [AspectType; 6] = [
    AspectType::Conjunction,
    AspectType::Sextile,
    AspectType::Square,
    AspectType::Trine,
    AspectType::Quincunx,
    AspectType::Opposition,
];

impl AspectType {
    pub fn index(self) -> usize {
        match self {
            AspectType::Conjunction => 0,
            AspectType::Sextile => 1,
            AspectType::Square => 2,
            AspectType::Trine => 3,
            AspectType::Quincunx => 4,
            AspectType::Opposition => 5,
        }
    }

    /// Exact separation in degrees
    pub fn angle(self) -> f64 {
        match self {
            AspectType::Conjunction => 0.0,
            AspectType::Sextile => 60.0,
            AspectType::Square => 90.0,
            AspectType::Trine => 120.0,
            AspectType::Quincunx => 150.0,
            AspectType::Opposition => 180.0,
        }
    }

    pub fn default_orb(self) -> f64 {
        match self {
            AspectType::Sextile => 6.0,
            AspectType::Quincunx => 3.0,
            _ => 8.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AspectType::Conjunction => "conjunction",
            AspectType::Sextile => "sextile",
            AspectType::Square => "square",
            AspectType::Trine => "trine",
            AspectType::Quincunx => "quincunx",
            AspectType::Opposition => "opposition",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            AspectType::Conjunction => "☌",
            AspectType::Sextile => "⚹",
            AspectType::Square => "□",
            AspectType::Trine => "△",
            AspectType::Quincunx => "⚻",
            AspectType::Opposition => "☍",
        }
    }

    /// Ptolemaic aspects; the quincunx is minor.
    pub fn is_major(self) -> bool {
        !matches!(self, AspectType::Quincunx)
    }
}

impl fmt::Display for AspectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AspectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL_ASPECT_TYPES
            .iter()
            .copied()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| format!("unknown aspect type '{}'", s))
    }
}

/// Core aspect information
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectCore {
    pub aspect_type: AspectType,
    /// Absolute deviation from the exact angle, degrees
    pub orb: f64,
    /// Orb below the exact threshold
    pub exact: bool,
    /// Separation is closing toward the exact angle
    pub applying: bool,
}

/// An aspect between two bodies of the same chart.
///
/// `first` always precedes `second` in canonical body order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub first: Body,
    pub second: Body,
    #[serde(flatten)]
    pub aspect: AspectCore,
}

/// An aspect between a body of one chart and a body of another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossAspect {
    pub from: Body,
    pub to: Body,
    #[serde(flatten)]
    pub aspect: AspectCore,
}

/// Orb tolerances and the exact threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectSettings {
    orbs: [f64; 6],
    pub exact_orb: f64,
}

impl Default for AspectSettings {
    fn default() -> Self {
        Self {
            orbs: ALL_ASPECT_TYPES.map(AspectType::default_orb),
            exact_orb: 1.0,
        }
    }
}

impl AspectSettings {
    pub fn orb(&self, kind: AspectType) -> f64 {
        self.orbs[kind.index()]
    }

    pub fn with_orb(mut self, kind: AspectType, orb: f64) -> Self {
        self.orbs[kind.index()] = orb;
        self
    }

    pub fn max_orb(&self) -> f64 {
        self.orbs.iter().copied().fold(0.0, f64::max)
    }

    /// Overlay named orbs (as read from configuration) on the defaults.
    pub fn from_named_orbs(
        orbs: &BTreeMap<String, f64>,
        exact_orb: f64,
    ) -> Result<Self, AstrotError> {
        if !(exact_orb.is_finite() && exact_orb > 0.0) {
            return Err(AstrotError::Configuration(format!(
                "exact orb must be positive, got {}",
                exact_orb
            )));
        }
        let mut settings = Self {
            exact_orb,
            ..Self::default()
        };
        for (name, &orb) in orbs {
            let kind: AspectType = name.parse().map_err(AstrotError::Configuration)?;
            if !(orb.is_finite() && orb > 0.0) {
                return Err(AstrotError::Configuration(format!(
                    "orb for {} must be positive, got {}",
                    kind, orb
                )));
            }
            settings = settings.with_orb(kind, orb);
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orbs() {
        let settings = AspectSettings::default();
        assert_eq!(settings.orb(AspectType::Conjunction), 8.0);
        assert_eq!(settings.orb(AspectType::Sextile), 6.0);
        assert_eq!(settings.orb(AspectType::Quincunx), 3.0);
        assert_eq!(settings.max_orb(), 8.0);
        assert_eq!(settings.exact_orb, 1.0);
    }

    #[test]
    fn named_orbs_override_defaults() {
        let mut orbs = BTreeMap::new();
        orbs.insert("trine".to_string(), 5.5);
        let settings = AspectSettings::from_named_orbs(&orbs, 0.5).unwrap();
        assert_eq!(settings.orb(AspectType::Trine), 5.5);
        assert_eq!(settings.orb(AspectType::Square), 8.0);
        assert_eq!(settings.exact_orb, 0.5);
    }

    #[test]
    fn unknown_or_bad_orbs_are_configuration_errors() {
        let mut orbs = BTreeMap::new();
        orbs.insert("semisquare".to_string(), 2.0);
        assert!(matches!(
            AspectSettings::from_named_orbs(&orbs, 1.0),
            Err(AstrotError::Configuration(_))
        ));

        let mut negative = BTreeMap::new();
        negative.insert("square".to_string(), -1.0);
        assert!(AspectSettings::from_named_orbs(&negative, 1.0).is_err());
        assert!(AspectSettings::from_named_orbs(&BTreeMap::new(), 0.0).is_err());
    }

    #[test]
    fn aspect_serializes_flat() {
        let aspect = Aspect {
            first: Body::Sun,
            second: Body::Moon,
            aspect: AspectCore {
                aspect_type: AspectType::Trine,
                orb: 1.5,
                exact: false,
                applying: true,
            },
        };
        let json = serde_json::to_value(aspect).unwrap();
        assert_eq!(json["first"], "sun");
        assert_eq!(json["aspect_type"], "trine");
        assert_eq!(json["applying"], true);
    }
}

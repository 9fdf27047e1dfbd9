//! Tracked bodies and chart points.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tracked body. Declaration order is the canonical ordering index used
/// when pairing bodies for aspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    SouthNode,
    Chiron,
}

pub const ALL_BODIES: [Body; 13] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
    Body::NorthNode,
    Body::SouthNode,
    Body::Chiron,
];

impl Body {
    pub const fn all() -> &'static [Body; 13] {
        &ALL_BODIES
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
            Body::NorthNode => "north_node",
            Body::SouthNode => "south_node",
            Body::Chiron => "chiron",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::NorthNode => "North Node",
            Body::SouthNode => "South Node",
            Body::Chiron => "Chiron",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Body::Sun => "☉",
            Body::Moon => "☽",
            Body::Mercury => "☿",
            Body::Venus => "♀",
            Body::Mars => "♂",
            Body::Jupiter => "♃",
            Body::Saturn => "♄",
            Body::Uranus => "♅",
            Body::Neptune => "♆",
            Body::Pluto => "♇",
            Body::NorthNode => "☊",
            Body::SouthNode => "☋",
            Body::Chiron => "⚷",
        }
    }

    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Body::Sun => &["identity", "ego", "vitality", "purpose"],
            Body::Moon => &["emotions", "intuition", "subconscious", "nurturing"],
            Body::Mercury => &["communication", "thinking", "learning", "travel"],
            Body::Venus => &["love", "beauty", "harmony", "values"],
            Body::Mars => &["action", "energy", "passion", "conflict"],
            Body::Jupiter => &["expansion", "wisdom", "luck", "philosophy"],
            Body::Saturn => &["discipline", "responsibility", "limitations", "structure"],
            Body::Uranus => &["innovation", "rebellion", "freedom", "change"],
            Body::Neptune => &["dreams", "spirituality", "illusion", "compassion"],
            Body::Pluto => &["transformation", "power", "rebirth", "intensity"],
            Body::NorthNode => &["destiny", "growth", "future", "karma"],
            Body::SouthNode => &["past", "talents", "karma", "release"],
            Body::Chiron => &["healing", "wounds", "wisdom", "teaching"],
        }
    }

    /// Calculated points rather than physical bodies.
    pub const fn is_point(self) -> bool {
        matches!(self, Body::NorthNode | Body::SouthNode)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        ALL_BODIES
            .iter()
            .copied()
            .find(|body| body.slug() == wanted)
            .ok_or_else(|| format!("Unknown body: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_index_follows_declaration() {
        for (i, body) in ALL_BODIES.iter().enumerate() {
            assert_eq!(body.index(), i);
        }
        assert!(Body::Sun < Body::Chiron);
    }

    #[test]
    fn parses_display_names_and_slugs() {
        assert_eq!("North Node".parse::<Body>().unwrap(), Body::NorthNode);
        assert_eq!("south_node".parse::<Body>().unwrap(), Body::SouthNode);
        assert!("vulcan".parse::<Body>().is_err());
    }
}

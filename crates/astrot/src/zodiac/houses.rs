use serde::{Deserialize, Serialize};
use std::fmt;

/// House number, always within 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct House(u8);

impl House {
    pub const FIRST: House = House(1);
    pub const TENTH: House = House(10);

    pub const fn new(number: u8) -> Option<House> {
        if number >= 1 && number <= 12 {
            Some(House(number))
        } else {
            None
        }
    }

    /// House for a 0-based cusp index; wraps modulo 12.
    pub const fn from_index(index: usize) -> House {
        House((index % 12) as u8 + 1)
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn all() -> impl Iterator<Item = House> {
        (1..=12).map(House)
    }

    pub const fn name(self) -> &'static str {
        match self.0 {
            1 => "1st House",
            2 => "2nd House",
            3 => "3rd House",
            4 => "4th House",
            5 => "5th House",
            6 => "6th House",
            7 => "7th House",
            8 => "8th House",
            9 => "9th House",
            10 => "10th House",
            11 => "11th House",
            _ => "12th House",
        }
    }

    pub const fn theme(self) -> &'static str {
        match self.0 {
            1 => "Identity",
            2 => "Resources",
            3 => "Communication",
            4 => "Foundation",
            5 => "Expression",
            6 => "Service",
            7 => "Relationships",
            8 => "Transformation",
            9 => "Expansion",
            10 => "Achievement",
            11 => "Community",
            _ => "Transcendence",
        }
    }

    pub const fn keywords(self) -> &'static [&'static str] {
        match self.0 {
            1 => &["self", "appearance", "first impressions"],
            2 => &["money", "possessions", "values"],
            3 => &["communication", "siblings", "short trips"],
            4 => &["home", "family", "roots"],
            5 => &["creativity", "romance", "children"],
            6 => &["work", "health", "service"],
            7 => &["partnerships", "marriage", "others"],
            8 => &["transformation", "shared resources", "mystery"],
            9 => &["philosophy", "travel", "higher learning"],
            10 => &["career", "reputation", "authority"],
            11 => &["friends", "groups", "hopes"],
            _ => &["spirituality", "subconscious", "sacrifice"],
        }
    }
}

impl TryFrom<u8> for House {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        House::new(value).ok_or_else(|| format!("house must be within 1..=12, got {}", value))
    }
}

impl From<House> for u8 {
    fn from(house: House) -> u8 {
        house.0
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

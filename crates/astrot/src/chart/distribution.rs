use serde::{Deserialize, Serialize};

use crate::zodiac::{Element, Modality, Sign};

/// Count of resolved bodies per element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementDistribution {
    pub fire: u32,
    pub earth: u32,
    pub air: u32,
    pub water: u32,
}

impl ElementDistribution {
    pub fn from_signs(signs: impl IntoIterator<Item = Sign>) -> Self {
        let mut dist = Self::default();
        for sign in signs {
            dist.increment(sign.element());
        }
        dist
    }

    pub fn get(&self, element: Element) -> u32 {
        match element {
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Air => self.air,
            Element::Water => self.water,
        }
    }

    pub fn increment(&mut self, element: Element) {
        let slot = match element {
            Element::Fire => &mut self.fire,
            Element::Earth => &mut self.earth,
            Element::Air => &mut self.air,
            Element::Water => &mut self.water,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        Element::ALL.iter().map(|e| self.get(*e)).sum()
    }

    /// Element with the highest count; ties go to the earlier element
    /// (fire, earth, air, water). `None` for an empty chart.
    pub fn dominant(&self) -> Option<Element> {
        dominant_of(&Element::ALL, |e| self.get(e))
    }
}

/// Count of resolved bodies per modality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModalityDistribution {
    pub cardinal: u32,
    pub fixed: u32,
    pub mutable: u32,
}

impl ModalityDistribution {
    pub fn from_signs(signs: impl IntoIterator<Item = Sign>) -> Self {
        let mut dist = Self::default();
        for sign in signs {
            dist.increment(sign.modality());
        }
        dist
    }

    pub fn get(&self, modality: Modality) -> u32 {
        match modality {
            Modality::Cardinal => self.cardinal,
            Modality::Fixed => self.fixed,
            Modality::Mutable => self.mutable,
        }
    }

    pub fn increment(&mut self, modality: Modality) {
        let slot = match modality {
            Modality::Cardinal => &mut self.cardinal,
            Modality::Fixed => &mut self.fixed,
            Modality::Mutable => &mut self.mutable,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        Modality::ALL.iter().map(|m| self.get(*m)).sum()
    }

    pub fn dominant(&self) -> Option<Modality> {
        dominant_of(&Modality::ALL, |m| self.get(m))
    }
}

fn dominant_of<T: Copy>(all: &[T], count: impl Fn(T) -> u32) -> Option<T> {
    let mut best: Option<(T, u32)> = None;
    for &item in all {
        let n = count(item);
        if n > 0 && best.map_or(true, |(_, top)| n > top) {
            best = Some((item, n));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_signs() {
        let signs = [Sign::Aries, Sign::Leo, Sign::Taurus, Sign::Pisces, Sign::Gemini];
        let elements = ElementDistribution::from_signs(signs);
        assert_eq!(elements.fire, 2);
        assert_eq!(elements.earth, 1);
        assert_eq!(elements.air, 1);
        assert_eq!(elements.water, 1);
        assert_eq!(elements.total(), 5);
        assert_eq!(elements.dominant(), Some(Element::Fire));

        let modalities = ModalityDistribution::from_signs(signs);
        assert_eq!(modalities.cardinal, 1);
        assert_eq!(modalities.fixed, 2);
        assert_eq!(modalities.mutable, 2);
        assert_eq!(modalities.total(), 5);
        // fixed and mutable tie, fixed comes first
        assert_eq!(modalities.dominant(), Some(Modality::Fixed));
    }

    #[test]
    fn empty_has_no_dominant() {
        assert_eq!(ElementDistribution::default().dominant(), None);
        assert_eq!(ModalityDistribution::default().dominant(), None);
    }
}

use crate::aspects::types::{
    Aspect, AspectCore, AspectSettings, AspectType, CrossAspect, ALL_ASPECT_TYPES,
};
use crate::chart::BodyPosition;
use crate::position::{separation, signed_arc};

/// Relative speed below which a pair counts as stationary, degrees per day
const STATIONARY_SPEED: f64 = 1e-6;

/// Aspect calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct AspectCalculator;

impl AspectCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Aspects among the bodies of one chart, at most one per pair.
    ///
    /// Output follows canonical body order of the first member, then the
    /// second.
    pub fn natal_aspects(&self, positions: &[BodyPosition], settings: &AspectSettings) -> Vec<Aspect> {
        let mut ordered: Vec<&BodyPosition> = positions.iter().collect();
        ordered.sort_by_key(|p| p.body);
        ordered.dedup_by_key(|p| p.body);

        let mut aspects = Vec::new();
        for i in 0..ordered.len() {
            for j in (i + 1)..ordered.len() {
                let (a, b) = (ordered[i], ordered[j]);
                if let Some(aspect) =
                    self.calculate_aspect(a.longitude, b.longitude, a.speed, b.speed, settings)
                {
                    aspects.push(Aspect {
                        first: a.body,
                        second: b.body,
                        aspect,
                    });
                }
            }
        }
        aspects
    }

    /// Aspects from each body of `left` to each body of `right`.
    ///
    /// A body is never paired with its own counterpart.
    pub fn inter_chart_aspects(
        &self,
        left: &[BodyPosition],
        right: &[BodyPosition],
        settings: &AspectSettings,
    ) -> Vec<CrossAspect> {
        let mut aspects = Vec::new();
        for a in left {
            for b in right {
                if a.body == b.body {
                    continue;
                }
                if let Some(aspect) =
                    self.calculate_aspect(a.longitude, b.longitude, a.speed, b.speed, settings)
                {
                    aspects.push(CrossAspect {
                        from: a.body,
                        to: b.body,
                        aspect,
                    });
                }
            }
        }
        aspects
    }

    /// The tightest aspect within tolerance between two longitudes.
    ///
    /// Ties keep the earlier type in canonical order.
    pub fn calculate_aspect(
        &self,
        lon1: f64,
        lon2: f64,
        speed1: f64,
        speed2: f64,
        settings: &AspectSettings,
    ) -> Option<AspectCore> {
        let angle = separation(lon1, lon2);

        let mut best: Option<(AspectType, f64)> = None;
        for kind in ALL_ASPECT_TYPES {
            let orb = (angle - kind.angle()).abs();
            if orb > settings.orb(kind) {
                continue;
            }
            if best.map_or(true, |(_, best_orb)| orb < best_orb) {
                best = Some((kind, orb));
            }
        }

        best.map(|(aspect_type, orb)| AspectCore {
            aspect_type,
            orb,
            exact: orb < settings.exact_orb,
            applying: self.is_aspect_applying(lon1, lon2, speed1, speed2, aspect_type.angle(), angle),
        })
    }

    /// Whether the separation is closing toward `aspect_angle`.
    fn is_aspect_applying(
        &self,
        lon1: f64,
        lon2: f64,
        speed1: f64,
        speed2: f64,
        aspect_angle: f64,
        current_angle: f64,
    ) -> bool {
        let relative_speed = speed1 - speed2;
        if relative_speed.abs() < STATIONARY_SPEED {
            return false;
        }

        let current_distance = (current_angle - aspect_angle).abs();

        // Project a small step forward and see whether the orb shrinks
        let time_step = 0.01;
        let future_signed = signed_arc(lon2, lon1) + relative_speed * time_step;
        let future_angle = separation(future_signed, 0.0);
        let future_distance = (future_angle - aspect_angle).abs();

        future_distance < current_distance
    }
}

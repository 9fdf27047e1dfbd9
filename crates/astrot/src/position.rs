//! Position resolver: ecliptic longitude to sign/degree and to house.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::zodiac::{House, Sign};

/// Tolerance used when checking that cusp arcs close the circle.
const CUSP_CLOSURE_EPSILON: f64 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("House cusps are not circularly monotonic: {message}")]
    MalformedCusps { message: String },
}

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Forward (counter-clockwise) arc from `from` to `to`, in [0, 360).
pub fn arc_forward(from: f64, to: f64) -> f64 {
    normalize_deg(to - from)
}

/// Signed shortest arc from `from` to `to`, in (-180, 180].
pub fn signed_arc(from: f64, to: f64) -> f64 {
    let d = arc_forward(from, to);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Unsigned shortest separation between two longitudes, in [0, 180].
pub fn separation(a: f64, b: f64) -> f64 {
    let raw = normalize_deg(a - b);
    if raw > 180.0 {
        360.0 - raw
    } else {
        raw
    }
}

/// Sign and degree within that sign for an ecliptic longitude.
///
/// The degree is always in [0, 30).
pub fn sign_for_longitude(longitude: f64) -> (Sign, f64) {
    let lon = normalize_deg(longitude);
    let mut index = ((lon / 30.0).floor() as usize).min(11);
    let mut degree = lon - index as f64 * 30.0;
    if degree < 0.0 {
        index = (index + 11) % 12;
        degree += 30.0;
    } else if degree >= 30.0 {
        index = (index + 1) % 12;
        degree -= 30.0;
    }
    (Sign::from_index(index), degree.clamp(0.0, 30.0 - f64::EPSILON * 32.0))
}

/// A longitude resolved to its sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub sign: Sign,
    /// Degree within the sign, in [0, 30).
    pub degree: f64,
    /// Absolute ecliptic longitude, in [0, 360).
    pub longitude: f64,
}

impl Placement {
    pub fn from_longitude(longitude: f64) -> Self {
        let (sign, degree) = sign_for_longitude(longitude);
        Self {
            sign,
            degree,
            longitude: normalize_deg(longitude),
        }
    }
}

/// Check that twelve cusps walk once around the circle.
///
/// Every forward arc between consecutive cusps must be positive and the
/// arcs must add up to one full turn. Unequal spacing is fine.
pub fn validate_cusps(cusps: &[f64; 12]) -> Result<(), ResolveError> {
    if let Some(bad) = cusps.iter().position(|c| !c.is_finite()) {
        return Err(ResolveError::MalformedCusps {
            message: format!("cusp {} is not finite", bad + 1),
        });
    }

    let mut total = 0.0;
    for i in 0..12 {
        let arc = arc_forward(cusps[i], cusps[(i + 1) % 12]);
        if arc <= 0.0 {
            return Err(ResolveError::MalformedCusps {
                message: format!("house {} has zero width", i + 1),
            });
        }
        total += arc;
    }

    if (total - 360.0).abs() > CUSP_CLOSURE_EPSILON {
        return Err(ResolveError::MalformedCusps {
            message: format!("cusp arcs cover {:.4}° instead of 360°", total),
        });
    }
    Ok(())
}

/// House whose circular interval `[cusp[i], cusp[i+1])` holds the longitude.
pub fn house_for_longitude(longitude: f64, cusps: &[f64; 12]) -> Result<House, ResolveError> {
    validate_cusps(cusps)?;
    let lon = normalize_deg(longitude);

    for i in 0..12 {
        let start = cusps[i];
        let width = arc_forward(start, cusps[(i + 1) % 12]);
        if arc_forward(start, lon) < width {
            return Ok(House::from_index(i));
        }
    }

    // Validated cusps tile the circle, so only rounding lands here.
    Err(ResolveError::MalformedCusps {
        message: format!("longitude {:.6}° fell between cusps", lon),
    })
}

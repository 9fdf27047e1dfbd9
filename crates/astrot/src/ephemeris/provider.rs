use thiserror::Error;

use crate::ephemeris::types::{EphemerisSettings, EphemerisSnapshot, GeoLocation};
use crate::position::signed_arc;

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Instant JD {jd:.5} is outside the supported range JD {min:.1}..{max:.1}")]
    OutOfRange {
        provider: String,
        jd: f64,
        min: f64,
        max: f64,
    },
    #[error("{system} houses are undefined at latitude {latitude:.2}°")]
    UnsupportedLocation {
        provider: String,
        system: String,
        latitude: f64,
    },
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound {
        provider: String,
        path: String,
        message: String,
    },
    #[error("Failed to calculate position for {body} at JD {jd:.5}: {message}")]
    CalculationFailed {
        provider: String,
        body: String,
        jd: f64,
        message: String,
    },
    #[error("No answer within {timeout_ms} ms")]
    Timeout { provider: String, timeout_ms: u64 },
    #[error("{reason}")]
    Unavailable { provider: String, reason: String },
}

impl EphemerisError {
    /// Name of the provider that failed.
    pub fn provider(&self) -> &str {
        match self {
            Self::OutOfRange { provider, .. }
            | Self::UnsupportedLocation { provider, .. }
            | Self::FileNotFound { provider, .. }
            | Self::CalculationFailed { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Unavailable { provider, .. } => provider,
        }
    }
}

/// Source of planetary and house positions.
///
/// Implementations must be deterministic for a given input and free of
/// shared mutable state; the chart builder relies on both.
pub trait EphemerisProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Positions of the requested bodies, house cusps, ascendant and
    /// midheaven for a UT Julian Day and observer location.
    fn snapshot(
        &self,
        jd: f64,
        location: GeoLocation,
        settings: &EphemerisSettings,
    ) -> Result<EphemerisSnapshot, EphemerisError>;
}

/// Daily speed in longitude from two samples `span_days` apart.
///
/// Uses the shortest signed arc so a body crossing 0° Aries keeps its sign
/// of motion.
pub fn sampled_speed(before: f64, after: f64, span_days: f64) -> f64 {
    signed_arc(before, after) / span_days
}

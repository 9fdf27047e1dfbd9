#[cfg(feature = "swisseph")]
pub mod adapter;
pub mod analytic;
pub mod bounded;
pub mod fixture;
pub mod houses;
pub mod orbits;
pub mod provider;
pub mod types;

#[cfg(feature = "swisseph")]
pub use adapter::SwissEphemerisAdapter;
pub use analytic::{AnalyticEphemeris, ANALYTIC_MAX_JD, ANALYTIC_MIN_JD};
pub use bounded::snapshot_with_timeout;
pub use fixture::FixedEphemeris;
pub use provider::{sampled_speed, EphemerisError, EphemerisProvider};
pub use types::{
    EphemerisSettings, EphemerisSnapshot, GeoLocation, HouseCusps, HouseSystem, RawPosition,
};

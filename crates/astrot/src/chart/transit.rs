//! Chart-to-chart aspects: synastry between two natal charts, and the sky
//! of a given moment against a natal chart.

use chrono::{DateTime, Utc};

use crate::aspects::{AspectCalculator, AspectSettings, CrossAspect};
use crate::chart::builder::ChartBuilder;
use crate::chart::data::ChartDerived;
use crate::ephemeris::GeoLocation;
use crate::error::Result;
use crate::time::julian_day_from_utc;

/// Aspects from each body of `first` to each body of `second`.
pub fn synastry_aspects(
    first: &ChartDerived,
    second: &ChartDerived,
    settings: &AspectSettings,
) -> Vec<CrossAspect> {
    AspectCalculator::new().inter_chart_aspects(&first.bodies, &second.bodies, settings)
}

/// Aspects the bodies at `instant` make to the natal chart, computed for
/// the natal location.
///
/// `from` is the transiting body, `to` the natal one.
pub fn transit_aspects(
    natal: &ChartDerived,
    birth_location: GeoLocation,
    builder: &ChartBuilder,
    instant: DateTime<Utc>,
) -> Result<Vec<CrossAspect>> {
    let sky = builder.chart_at(julian_day_from_utc(instant), birth_location)?;
    log::debug!("transits for {}: {} bodies in the sky", instant, sky.bodies.len());
    Ok(AspectCalculator::new().inter_chart_aspects(
        &sky.bodies,
        &natal.bodies,
        &builder.settings().aspects,
    ))
}

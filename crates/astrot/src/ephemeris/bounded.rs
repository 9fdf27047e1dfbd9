use std::sync::Arc;
use std::time::Duration;

use crate::ephemeris::provider::{EphemerisError, EphemerisProvider};
use crate::ephemeris::types::{EphemerisSettings, EphemerisSnapshot, GeoLocation};

/// Run a provider call on the blocking pool and give up after `timeout`.
///
/// The provider work itself cannot be interrupted; a late answer is
/// discarded.
pub async fn snapshot_with_timeout(
    provider: Arc<dyn EphemerisProvider>,
    jd: f64,
    location: GeoLocation,
    settings: EphemerisSettings,
    timeout: Duration,
) -> Result<EphemerisSnapshot, EphemerisError> {
    let name = provider.name().to_string();
    let task = tokio::task::spawn_blocking(move || provider.snapshot(jd, location, &settings));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(EphemerisError::Unavailable {
            provider: name,
            reason: format!("ephemeris task failed: {}", join_error),
        }),
        Err(_) => {
            log::warn!("{} gave no answer within {:?}", name, timeout);
            Err(EphemerisError::Timeout {
                provider: name,
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }
}

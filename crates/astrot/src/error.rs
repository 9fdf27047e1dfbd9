//! Error taxonomy for chart computation.

use thiserror::Error;

use crate::ephemeris::EphemerisError;
use crate::position::ResolveError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstrotError {
    /// Malformed birth data reached the engine.
    #[error("Invalid birth data: {0}")]
    InvalidInput(String),
    /// The ephemeris could not produce positions; the whole chart fails.
    #[error("Chart cannot be computed: {provider} has no data ({reason})")]
    DataUnavailable { provider: String, reason: String },
    /// Static or configured reference data is unusable. Not retryable.
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Chart storage failed: {0}")]
    Storage(String),
}

impl AstrotError {
    pub fn data_unavailable(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. })
    }
}

impl From<EphemerisError> for AstrotError {
    fn from(e: EphemerisError) -> Self {
        let provider = e.provider().to_string();
        Self::DataUnavailable {
            provider,
            reason: e.to_string(),
        }
    }
}

impl From<ResolveError> for AstrotError {
    fn from(e: ResolveError) -> Self {
        Self::Configuration(e.to_string())
    }
}

pub type Result<T, E = AstrotError> = std::result::Result<T, E>;

/// Result type used across the crate.
pub type SerenadeResult<T> = Result<T, SerenadeError>;

/// Crate-level error type.
///
/// Nothing on the sequencer's hot path returns this: the timeline itself cannot fail once
/// constructed. Errors come from configuration, simulation scripts, and serialization.
#[derive(thiserror::Error, Debug)]
pub enum SerenadeError {
    /// Invalid user-provided value (texts, presets, timings).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// A scripted simulation did not behave as requested.
    #[error("simulation error: {0}")]
    Simulation(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SerenadeError {
    /// Build a [`SerenadeError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SerenadeError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`SerenadeError::Simulation`].
    pub fn simulation(msg: impl Into<String>) -> Self {
        Self::Simulation(msg.into())
    }

    /// Build a [`SerenadeError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for SerenadeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

/// Failure reported by a presentation collaborator.
///
/// These are best-effort capabilities; the sequencer logs and drops them.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    /// The capability does not exist on this device (e.g. no vibration motor).
    #[error("capability unsupported: {0}")]
    Unsupported(&'static str),

    /// The environment refused the request (e.g. autoplay without a user gesture).
    #[error("request rejected: {0}")]
    Rejected(String),

    /// A layout query could not be answered.
    #[error("layout unavailable: {0}")]
    Layout(String),
}

/// Log and drop a failed best-effort request.
pub(crate) fn best_effort(result: Result<(), PortError>, what: &'static str) {
    if let Err(err) = result {
        tracing::debug!(%err, what, "best-effort request skipped");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

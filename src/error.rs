use thiserror::Error;

/// Why a single clip was skipped. Detected locally, logged by the batch
/// runner, and never allowed to cross clip boundaries.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("pre-emphasized signal contains non-finite samples")]
    MalformedSignal,

    #[error("linear prediction polynomial contains non-finite coefficients")]
    DegenerateModel,

    #[error("prediction polynomial roots are non-finite")]
    DegenerateRoots,

    #[error("no prediction pole lies inside the unit circle")]
    NoStableRoots,

    #[error("failed to decode audio")]
    Decode(#[source] anyhow::Error),

    #[error("failed to write output artifact")]
    Artifact(#[source] anyhow::Error),
}

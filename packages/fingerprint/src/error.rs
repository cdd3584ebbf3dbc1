use thiserror::Error;

#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error("Invalid source record: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode source record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to serialize canonical projection: {0}")]
    Canonical(#[source] serde_json::Error),
}

pub type FingerprintResult<T> = Result<T, FingerprintError>;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioErrorCode {
    ProbeFailure,
    LoadFailure,
    PlaybackRejected,
}

/// Failures of the ambient audio subsystem. None of these reach the page;
/// each one degrades the session to a silent muted or disabled state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("autoplay probe rejected: {0}")]
    ProbeFailure(String),
    #[error("ambient asset failed to load: {0}")]
    LoadFailure(String),
    #[error("play command rejected: {0}")]
    PlaybackRejected(String),
}

impl AudioError {
    pub fn probe(message: impl Into<String>) -> Self {
        Self::ProbeFailure(message.into())
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::LoadFailure(message.into())
    }

    pub fn playback(message: impl Into<String>) -> Self {
        Self::PlaybackRejected(message.into())
    }

    pub fn code(&self) -> AudioErrorCode {
        match self {
            Self::ProbeFailure(_) => AudioErrorCode::ProbeFailure,
            Self::LoadFailure(_) => AudioErrorCode::LoadFailure,
            Self::PlaybackRejected(_) => AudioErrorCode::PlaybackRejected,
        }
    }
}

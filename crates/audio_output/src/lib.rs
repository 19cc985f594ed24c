use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;

mod simulated;

pub use simulated::{ResourceSnapshot, SimulatedAudioBackend, SimulatedBehavior, SimulatedResource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// The fixed local track played as background music.
    Asset(PathBuf),
    /// A silent throwaway source used only to test whether unsolicited
    /// playback is permitted.
    SilentProbe,
}

impl AudioSource {
    pub fn is_probe(&self) -> bool {
        matches!(self, Self::SilentProbe)
    }
}

/// One audio-output handle. Setters are synchronous and infallible the way a
/// media element's properties are; only loading and starting playback can be
/// rejected.
#[async_trait]
pub trait AudioResource: Send + Sync {
    async fn load(&self) -> anyhow::Result<()>;
    async fn play(&self) -> anyhow::Result<()>;
    fn pause(&self);
    fn set_muted(&self, muted: bool);
    fn set_volume(&self, volume: f32);
    fn set_looping(&self, looping: bool);
    /// Drops the underlying output. Calling it more than once is a no-op.
    fn release(&self);
}

pub trait AudioBackend: Send + Sync {
    fn create_resource(&self, source: AudioSource) -> anyhow::Result<Arc<dyn AudioResource>>;
}

#[cfg(test)]
#[path = "tests/simulated_tests.rs"]
mod tests;

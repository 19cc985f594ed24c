//! In-process stand-in for a browser media element, with a configurable
//! autoplay policy and failure modes.

use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::{AudioBackend, AudioResource, AudioSource};

#[derive(Debug, Clone)]
pub struct SimulatedBehavior {
    pub autoplay_allowed: bool,
    pub load_fails: bool,
    pub reject_play: bool,
    pub probe_delay: Duration,
    pub load_delay: Duration,
    pub play_delay: Duration,
}

impl Default for SimulatedBehavior {
    fn default() -> Self {
        Self {
            autoplay_allowed: true,
            load_fails: false,
            reject_play: false,
            probe_delay: Duration::ZERO,
            load_delay: Duration::ZERO,
            play_delay: Duration::ZERO,
        }
    }
}

/// Everything a simulated resource has been told so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSnapshot {
    pub source: AudioSource,
    pub muted: bool,
    pub volume: f32,
    pub looping: bool,
    pub loaded: bool,
    pub playing: bool,
    pub released: bool,
    pub play_calls: u32,
    pub pause_calls: u32,
}

impl ResourceSnapshot {
    fn new(source: AudioSource) -> Self {
        Self {
            // A silent probe has nothing to fetch and is playable immediately.
            loaded: source.is_probe(),
            source,
            muted: false,
            volume: 1.0,
            looping: false,
            playing: false,
            released: false,
            play_calls: 0,
            pause_calls: 0,
        }
    }
}

pub struct SimulatedResource {
    behavior: SimulatedBehavior,
    state: Mutex<ResourceSnapshot>,
}

impl SimulatedResource {
    fn new(source: AudioSource, behavior: SimulatedBehavior) -> Self {
        Self {
            behavior,
            state: Mutex::new(ResourceSnapshot::new(source)),
        }
    }

    pub fn snapshot(&self) -> ResourceSnapshot {
        self.state.lock().clone()
    }

    fn is_probe(&self) -> bool {
        self.state.lock().source.is_probe()
    }
}

#[async_trait]
impl AudioResource for SimulatedResource {
    async fn load(&self) -> Result<()> {
        if self.is_probe() {
            self.state.lock().loaded = true;
            return Ok(());
        }

        tokio::time::sleep(self.behavior.load_delay).await;

        let mut state = self.state.lock();
        if state.released {
            return Err(anyhow!("resource released before load completed"));
        }
        if self.behavior.load_fails {
            return Err(match &state.source {
                AudioSource::Asset(path) => anyhow!("failed to fetch '{}'", path.display()),
                AudioSource::SilentProbe => anyhow!("failed to fetch silent probe"),
            });
        }
        state.loaded = true;
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        let probe = self.is_probe();
        self.state.lock().play_calls += 1;

        let delay = if probe {
            self.behavior.probe_delay
        } else {
            self.behavior.play_delay
        };
        tokio::time::sleep(delay).await;

        let mut state = self.state.lock();
        if state.released {
            return Err(anyhow!("AbortError: resource was released"));
        }
        if probe && !self.behavior.autoplay_allowed {
            return Err(anyhow!(
                "NotAllowedError: play() failed because the user didn't interact with the document first"
            ));
        }
        if !probe && self.behavior.reject_play {
            return Err(anyhow!("NotSupportedError: playback rejected"));
        }
        if !state.loaded {
            return Err(anyhow!("InvalidStateError: resource is not loaded"));
        }
        state.playing = true;
        debug!(probe, "simulated playback started");
        Ok(())
    }

    fn pause(&self) {
        let mut state = self.state.lock();
        state.playing = false;
        state.pause_calls += 1;
    }

    fn set_muted(&self, muted: bool) {
        self.state.lock().muted = muted;
    }

    fn set_volume(&self, volume: f32) {
        self.state.lock().volume = volume.clamp(0.0, 1.0);
    }

    fn set_looping(&self, looping: bool) {
        self.state.lock().looping = looping;
    }

    fn release(&self) {
        let mut state = self.state.lock();
        state.playing = false;
        state.released = true;
    }
}

/// Backend that hands out [`SimulatedResource`]s and keeps every one it
/// created so callers can inspect them afterwards.
pub struct SimulatedAudioBackend {
    behavior: SimulatedBehavior,
    created: Mutex<Vec<Arc<SimulatedResource>>>,
}

impl SimulatedAudioBackend {
    pub fn new(behavior: SimulatedBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            created: Mutex::new(Vec::new()),
        })
    }

    pub fn resources(&self) -> Vec<Arc<SimulatedResource>> {
        self.created.lock().clone()
    }

    pub fn probes(&self) -> Vec<ResourceSnapshot> {
        self.snapshots(true)
    }

    pub fn assets(&self) -> Vec<ResourceSnapshot> {
        self.snapshots(false)
    }

    fn snapshots(&self, probes: bool) -> Vec<ResourceSnapshot> {
        self.created
            .lock()
            .iter()
            .map(|resource| resource.snapshot())
            .filter(|snapshot| snapshot.source.is_probe() == probes)
            .collect()
    }
}

impl AudioBackend for SimulatedAudioBackend {
    fn create_resource(&self, source: AudioSource) -> Result<Arc<dyn AudioResource>> {
        let resource = Arc::new(SimulatedResource::new(source, self.behavior.clone()));
        self.created.lock().push(Arc::clone(&resource));
        Ok(resource)
    }
}

use std::{path::PathBuf, sync::Arc, time::Duration};

use audio_output::{AudioBackend, AudioResource, AudioSource};
use parking_lot::Mutex;
use serde::Serialize;
use shared::{
    domain::{volume_for, AutoplayPermission, LoadState, MUTED_VOLUME, UNMUTED_VOLUME},
    error::AudioError,
};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

pub mod prober;
pub mod view;

pub use prober::AutoplayProbe;
pub use view::ToggleView;

pub const DEFAULT_ASSET_PATH: &str = "assets/audio/background-music.mp3";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub asset_path: PathBuf,
    pub probe_timeout: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            asset_path: PathBuf::from(DEFAULT_ASSET_PATH),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerStatus {
    pub load_state: LoadState,
    pub autoplay_permission: AutoplayPermission,
    pub muted: bool,
    pub volume: f32,
    pub user_has_interacted: bool,
    pub playing: bool,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    StatusChanged(ControllerStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// Not ready (still loading, failed, or unmounted); nothing changed.
    Ignored,
    Muted,
    Unmuted,
    /// The play command was rejected and the session went back to muted.
    Reverted,
    /// A newer toggle arrived while this one's play command was in flight.
    Superseded,
}

struct PlaybackSession {
    resource: Option<Arc<dyn AudioResource>>,
    probe: Option<Arc<dyn AudioResource>>,
    load_state: LoadState,
    permission: AutoplayPermission,
    muted: bool,
    user_has_interacted: bool,
    playing: bool,
    generation: u64,
    autoplay_attempted: bool,
    disposed: bool,
}

impl PlaybackSession {
    fn status(&self) -> ControllerStatus {
        ControllerStatus {
            load_state: self.load_state,
            autoplay_permission: self.permission,
            muted: self.muted,
            volume: volume_for(self.muted),
            user_has_interacted: self.user_has_interacted,
            playing: self.playing,
        }
    }

    /// Hands out the resource for the one automatic muted playback, once
    /// both the probe and the load have come back favourably.
    fn take_autoplay(&mut self) -> Option<Arc<dyn AudioResource>> {
        if self.disposed
            || self.autoplay_attempted
            || self.user_has_interacted
            || self.load_state != LoadState::Ready
            || self.permission != AutoplayPermission::Allowed
        {
            return None;
        }
        self.autoplay_attempted = true;
        self.resource.clone()
    }

    fn apply_muted(&mut self, resource: &dyn AudioResource) {
        self.muted = true;
        resource.set_muted(true);
        resource.set_volume(MUTED_VOLUME);
    }
}

struct PendingPlay {
    resource: Arc<dyn AudioResource>,
    generation: u64,
    was_playing: bool,
}

struct ControllerInner {
    session: Mutex<PlaybackSession>,
    events: broadcast::Sender<ControllerEvent>,
    settled: watch::Sender<bool>,
}

impl ControllerInner {
    fn publish(&self, session: &PlaybackSession) {
        if session.disposed {
            return;
        }
        let _ = self
            .events
            .send(ControllerEvent::StatusChanged(session.status()));
    }

    async fn resolve_permission(&self, permission: AutoplayPermission) {
        let autoplay = {
            let mut session = self.session.lock();
            if session.disposed {
                return;
            }
            session.permission = permission;
            session.probe = None;
            self.publish(&session);
            session.take_autoplay()
        };

        if let Some(resource) = autoplay {
            self.autoplay(resource).await;
        }
    }

    async fn resolve_load(&self, result: Result<(), AudioError>) {
        let autoplay = {
            let mut session = self.session.lock();
            if session.disposed {
                return;
            }
            match result {
                Ok(()) => {
                    session.load_state = LoadState::Ready;
                    info!("ambient audio: asset ready");
                }
                Err(err) => {
                    session.load_state = LoadState::Failed;
                    session.playing = false;
                    warn!(code = ?err.code(), "ambient audio: {err}; toggle disabled");
                }
            }
            self.publish(&session);
            session.take_autoplay()
        };

        if let Some(resource) = autoplay {
            self.autoplay(resource).await;
        }
    }

    async fn autoplay(&self, resource: Arc<dyn AudioResource>) {
        debug!("ambient audio: attempting muted autoplay");
        let result = resource.play().await;

        let mut session = self.session.lock();
        if session.disposed {
            return;
        }
        match result {
            Ok(()) => {
                session.playing = true;
                info!(muted = session.muted, "ambient audio: autoplay started");
            }
            Err(err) => {
                let err = AudioError::playback(err.to_string());
                warn!(code = ?err.code(), "ambient audio: autoplay {err}");
            }
        }
        self.publish(&session);
    }

    async fn toggle(&self) -> ToggleOutcome {
        let pending = {
            let mut session = self.session.lock();
            if session.disposed || session.load_state != LoadState::Ready {
                return ToggleOutcome::Ignored;
            }
            let Some(resource) = session.resource.clone() else {
                return ToggleOutcome::Ignored;
            };

            session.generation += 1;
            session.user_has_interacted = true;

            if !session.muted {
                session.apply_muted(resource.as_ref());
                debug!(generation = session.generation, "ambient audio: muted");
                self.publish(&session);
                return ToggleOutcome::Muted;
            }

            session.muted = false;
            resource.set_muted(false);
            resource.set_volume(UNMUTED_VOLUME);
            self.publish(&session);
            PendingPlay {
                resource,
                generation: session.generation,
                was_playing: session.playing,
            }
        };

        debug!(generation = pending.generation, "ambient audio: unmuting");
        let result = pending.resource.play().await;
        self.settle_play(pending, result)
    }

    fn settle_play(&self, pending: PendingPlay, result: anyhow::Result<()>) -> ToggleOutcome {
        let mut session = self.session.lock();
        if session.disposed {
            return ToggleOutcome::Ignored;
        }

        let outcome = if pending.generation == session.generation {
            match result {
                Ok(()) => {
                    session.playing = true;
                    ToggleOutcome::Unmuted
                }
                Err(err) => {
                    let err = AudioError::playback(err.to_string());
                    warn!(
                        code = ?err.code(),
                        generation = pending.generation,
                        "ambient audio: unmute {err}; reverting to muted"
                    );
                    session.apply_muted(pending.resource.as_ref());
                    ToggleOutcome::Reverted
                }
            }
        } else {
            // A newer toggle already decided the mute state. Converge on the
            // state from before the unmute: a loop that was not running before
            // stays paused, unlike a plain mute which keeps the loop going.
            if result.is_ok() {
                session.playing = true;
                if session.muted && !pending.was_playing {
                    pending.resource.pause();
                    session.playing = false;
                }
            }
            debug!(
                generation = pending.generation,
                latest = session.generation,
                "ambient audio: play settled after a newer toggle"
            );
            ToggleOutcome::Superseded
        };

        self.publish(&session);
        outcome
    }

    fn dispose(&self) {
        let (resource, probe) = {
            let mut session = self.session.lock();
            if session.disposed {
                return;
            }
            session.disposed = true;
            session.playing = false;
            (session.resource.take(), session.probe.take())
        };

        if let Some(resource) = resource {
            resource.pause();
            resource.release();
        }
        if let Some(probe) = probe {
            probe.release();
        }
        self.settled.send_replace(true);
        debug!("ambient audio: session disposed");
    }
}

#[derive(Clone)]
pub struct ToggleHandle {
    inner: Arc<ControllerInner>,
}

impl ToggleHandle {
    pub async fn toggle(&self) -> ToggleOutcome {
        self.inner.toggle().await
    }
}

/// Owns one playback session for the lifetime of the mounted music toggle.
/// Dropping the controller (or calling [`AmbientAudioController::unmount`])
/// pauses and releases the audio resource immediately; probe, load and play
/// completions arriving afterwards are ignored.
pub struct AmbientAudioController {
    inner: Arc<ControllerInner>,
    mount_task: JoinHandle<()>,
}

impl AmbientAudioController {
    /// Starts a session. Must be called from within a tokio runtime.
    ///
    /// The silent probe resource is created before the real one; the probe and
    /// the asset load then run concurrently, and the single muted autoplay
    /// attempt happens only after both have resolved.
    pub fn mount(backend: Arc<dyn AudioBackend>, options: ControllerOptions) -> Self {
        let probe = AutoplayProbe::prepare(backend.as_ref(), options.probe_timeout);

        let resource = match backend.create_resource(AudioSource::Asset(options.asset_path.clone()))
        {
            Ok(resource) => {
                resource.set_looping(true);
                resource.set_volume(MUTED_VOLUME);
                resource.set_muted(true);
                Some(resource)
            }
            Err(err) => {
                let err = AudioError::load(err.to_string());
                warn!(code = ?err.code(), "ambient audio: {err}");
                None
            }
        };

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (settled, _) = watch::channel(false);
        let inner = Arc::new(ControllerInner {
            session: Mutex::new(PlaybackSession {
                resource: resource.clone(),
                probe: probe.handle(),
                load_state: LoadState::Loading,
                permission: AutoplayPermission::Unknown,
                muted: true,
                user_has_interacted: false,
                playing: false,
                generation: 0,
                autoplay_attempted: false,
                disposed: false,
            }),
            events,
            settled,
        });

        info!(asset = %options.asset_path.display(), "ambient audio: mounting");
        let mount_task = tokio::spawn(run_mount(Arc::clone(&inner), probe, resource));

        Self { inner, mount_task }
    }

    pub fn status(&self) -> ControllerStatus {
        self.inner.session.lock().status()
    }

    pub fn view(&self) -> ToggleView {
        ToggleView::from_status(&self.status())
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.inner.events.subscribe()
    }

    /// Resolves once the probe and load have both finished and any automatic
    /// playback attempt has settled.
    pub async fn settled(&self) {
        let mut settled = self.inner.settled.subscribe();
        let _ = settled.wait_for(|done| *done).await;
    }

    /// Handles one click on the music toggle.
    ///
    /// Muting takes effect immediately. Unmuting sets the volume and issues a
    /// play command; the returned future completes when that command settles.
    pub async fn toggle(&self) -> ToggleOutcome {
        self.inner.toggle().await
    }

    /// Cloneable click handler for hosts that dispatch toggles from spawned
    /// tasks. It does not keep the session alive past unmount.
    pub fn toggle_handle(&self) -> ToggleHandle {
        ToggleHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for AmbientAudioController {
    fn drop(&mut self) {
        self.inner.dispose();
        self.mount_task.abort();
    }
}

async fn run_mount(
    inner: Arc<ControllerInner>,
    probe: AutoplayProbe,
    resource: Option<Arc<dyn AudioResource>>,
) {
    let probe_branch = async {
        let permission = probe.run().await;
        inner.resolve_permission(permission).await;
    };

    let load_branch = async {
        let result = match &resource {
            Some(resource) => resource
                .load()
                .await
                .map_err(|err| AudioError::load(err.to_string())),
            None => Err(AudioError::load("audio resource could not be created")),
        };
        inner.resolve_load(result).await;
    };

    tokio::join!(probe_branch, load_branch);
    inner.settled.send_replace(true);
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

use std::{sync::Arc, time::Duration};

use audio_output::{AudioBackend, AudioResource, AudioSource};
use shared::{domain::AutoplayPermission, error::AudioError};
use tracing::{debug, info, warn};

/// Disposable silent resource used to find out whether the environment lets
/// playback start without a user gesture. It is never handed to the caller
/// and is released when the probe is dropped, whichever way it ends.
pub struct AutoplayProbe {
    resource: Option<Arc<dyn AudioResource>>,
    timeout: Duration,
}

impl AutoplayProbe {
    pub fn prepare(backend: &dyn AudioBackend, timeout: Duration) -> Self {
        let resource = match backend.create_resource(AudioSource::SilentProbe) {
            Ok(resource) => {
                resource.set_volume(0.0);
                resource.set_muted(true);
                Some(resource)
            }
            Err(err) => {
                let err = AudioError::probe(err.to_string());
                warn!(code = ?err.code(), "autoplay probe: {err}");
                None
            }
        };

        Self { resource, timeout }
    }

    pub(crate) fn handle(&self) -> Option<Arc<dyn AudioResource>> {
        self.resource.clone()
    }

    pub async fn run(self) -> AutoplayPermission {
        let Some(resource) = self.resource.as_ref() else {
            return AutoplayPermission::Denied;
        };

        match tokio::time::timeout(self.timeout, resource.play()).await {
            Ok(Ok(())) => {
                resource.pause();
                info!("autoplay probe: allowed");
                AutoplayPermission::Allowed
            }
            Ok(Err(err)) => {
                let err = AudioError::probe(err.to_string());
                debug!(code = ?err.code(), "autoplay probe: {err}");
                info!("autoplay probe: denied");
                AutoplayPermission::Denied
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "autoplay probe: play did not settle in time; treating as denied"
                );
                AutoplayPermission::Denied
            }
        }
    }
}

impl Drop for AutoplayProbe {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            resource.release();
        }
    }
}

#[cfg(test)]
#[path = "tests/prober_tests.rs"]
mod tests;

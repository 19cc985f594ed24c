//! Display contract for the host UI: which icon and accessible label the
//! music toggle shows, and whether it accepts clicks.

use serde::Serialize;
use shared::domain::{AffordanceIcon, AffordanceState, LoadState};

use crate::ControllerStatus;

pub const LABEL_LOADING: &str = "Loading music...";
pub const LABEL_ENABLE: &str = "Click to enable background music";
pub const LABEL_UNMUTE: &str = "Unmute background music";
pub const LABEL_MUTE: &str = "Mute background music";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleView {
    pub affordance: AffordanceState,
    pub icon: AffordanceIcon,
    pub label: Option<&'static str>,
    pub interactive: bool,
    pub awaiting_first_interaction: bool,
    /// Advisory only; never blocks the toggle.
    pub tooltip: Option<&'static str>,
}

impl ToggleView {
    pub fn from_status(status: &ControllerStatus) -> Self {
        let awaiting_first_interaction =
            status.load_state == LoadState::Ready && !status.user_has_interacted;

        let (affordance, icon, label) = match (status.load_state, status.muted) {
            (LoadState::Loading, _) => (
                AffordanceState::Loading,
                AffordanceIcon::Spinner,
                Some(LABEL_LOADING),
            ),
            (LoadState::Failed, muted) => (AffordanceState::Disabled, muted_icon(muted), None),
            (LoadState::Ready, true) if awaiting_first_interaction => {
                (AffordanceState::Muted, AffordanceIcon::Muted, Some(LABEL_ENABLE))
            }
            (LoadState::Ready, true) => {
                (AffordanceState::Muted, AffordanceIcon::Muted, Some(LABEL_UNMUTE))
            }
            (LoadState::Ready, false) => (
                AffordanceState::Unmuted,
                AffordanceIcon::Unmuted,
                Some(LABEL_MUTE),
            ),
        };

        Self {
            affordance,
            icon,
            label,
            interactive: status.load_state == LoadState::Ready,
            awaiting_first_interaction,
            tooltip: awaiting_first_interaction.then_some(LABEL_ENABLE),
        }
    }
}

fn muted_icon(muted: bool) -> AffordanceIcon {
    if muted {
        AffordanceIcon::Muted
    } else {
        AffordanceIcon::Unmuted
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;

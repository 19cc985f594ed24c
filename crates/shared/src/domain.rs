use serde::{Deserialize, Serialize};

/// Output level while muted.
pub const MUTED_VOLUME: f32 = 0.0;
/// Output level while unmuted, half of full scale.
pub const UNMUTED_VOLUME: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoplayPermission {
    Unknown,
    Allowed,
    Denied,
}

/// What the host UI should render for the music toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffordanceState {
    Loading,
    Disabled,
    Muted,
    Unmuted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffordanceIcon {
    Spinner,
    Muted,
    Unmuted,
}

pub fn volume_for(muted: bool) -> f32 {
    if muted {
        MUTED_VOLUME
    } else {
        UNMUTED_VOLUME
    }
}

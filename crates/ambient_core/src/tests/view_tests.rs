use super::*;
use shared::domain::AutoplayPermission;

fn status(load_state: LoadState, muted: bool, user_has_interacted: bool) -> ControllerStatus {
    ControllerStatus {
        load_state,
        autoplay_permission: AutoplayPermission::Denied,
        muted,
        volume: shared::domain::volume_for(muted),
        user_has_interacted,
        playing: !muted,
    }
}

#[test]
fn loading_shows_spinner_and_is_not_interactive() {
    let view = ToggleView::from_status(&status(LoadState::Loading, true, false));

    assert_eq!(view.affordance, AffordanceState::Loading);
    assert_eq!(view.icon, AffordanceIcon::Spinner);
    assert_eq!(view.label, Some(LABEL_LOADING));
    assert!(!view.interactive);
    assert!(!view.awaiting_first_interaction);
    assert_eq!(view.tooltip, None);
}

#[test]
fn ready_before_any_click_invites_the_user() {
    let view = ToggleView::from_status(&status(LoadState::Ready, true, false));

    assert_eq!(view.affordance, AffordanceState::Muted);
    assert_eq!(view.icon, AffordanceIcon::Muted);
    assert_eq!(view.label, Some(LABEL_ENABLE));
    assert!(view.interactive);
    assert!(view.awaiting_first_interaction);
    assert_eq!(view.tooltip, Some(LABEL_ENABLE));
}

#[test]
fn ready_muted_after_interaction_offers_unmute() {
    let view = ToggleView::from_status(&status(LoadState::Ready, true, true));

    assert_eq!(view.affordance, AffordanceState::Muted);
    assert_eq!(view.label, Some(LABEL_UNMUTE));
    assert!(!view.awaiting_first_interaction);
    assert_eq!(view.tooltip, None);
}

#[test]
fn ready_unmuted_offers_mute() {
    let view = ToggleView::from_status(&status(LoadState::Ready, false, true));

    assert_eq!(view.affordance, AffordanceState::Unmuted);
    assert_eq!(view.icon, AffordanceIcon::Unmuted);
    assert_eq!(view.label, Some(LABEL_MUTE));
    assert!(view.interactive);
}

#[test]
fn failed_load_disables_without_actionable_text() {
    let view = ToggleView::from_status(&status(LoadState::Failed, true, false));

    assert_eq!(view.affordance, AffordanceState::Disabled);
    assert_eq!(view.icon, AffordanceIcon::Muted);
    assert_eq!(view.label, None);
    assert!(!view.interactive);
    assert!(!view.awaiting_first_interaction);
    assert_eq!(view.tooltip, None);
}

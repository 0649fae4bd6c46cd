// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! `Reducer::reduce` is the only place screen state changes. It routes every
//! message to a focused handler that takes the current state by reference and
//! returns a [`Transition`]: the replacement state and at most one side effect
//! for the controller to run. Handlers never perform I/O.

use crate::app::state::{Effect, Message, ScreenState, Transition};
use crate::backends::camera::{DeviceSet, Facing, PermissionStatus};
use crate::errors::PhotoResult;
use tracing::{debug, error, info, warn};

/// Pure state transition function for the capture screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reducer {
    /// Facing selected when permission is granted
    pub preferred_facing: Facing,
}

impl Default for Reducer {
    fn default() -> Self {
        Self {
            preferred_facing: Facing::Back,
        }
    }
}

impl Reducer {
    pub fn new(preferred_facing: Facing) -> Self {
        Self { preferred_facing }
    }

    /// Apply one message
    pub fn reduce(&self, state: &ScreenState, message: Message) -> Transition {
        match message {
            // ===== Capability =====
            Message::DevicesListed(devices) => self.handle_devices_listed(state, devices),
            Message::PermissionResult(granted) => self.handle_permission_result(state, granted),
            Message::CaptureFinished(result) => handle_capture_finished(state, result),

            // ===== Controls =====
            Message::RequestClose => handle_request_close(state),
            Message::ResumePreview => handle_resume_preview(state),
            Message::Capture => handle_capture(state),
            Message::ToggleDevice => handle_toggle_device(state),
            Message::OpenReview => handle_open_review(state),
            Message::CloseReview => {
                let mut next = state.clone();
                next.review_visible = false;
                Transition::to(next)
            }

            // ===== Timers =====
            Message::ShutterUnlocked => {
                let mut next = state.clone();
                next.shutter_locked = false;
                Transition::to(next)
            }
        }
    }

    fn handle_devices_listed(&self, state: &ScreenState, devices: DeviceSet) -> Transition {
        info!(
            front = devices.front.is_some(),
            back = devices.back.is_some(),
            "Camera devices listed"
        );
        let mut next = state.clone();

        // Drop a selection that no longer exists
        if let Some(active) = &next.active_device
            && devices.get(active.facing) != Some(active)
        {
            next.active_device = None;
        }
        next.devices = devices;

        if next.permission.is_granted() && next.active_device.is_none() {
            self.select_initial_device(&mut next);
        }
        Transition::to(next)
    }

    fn handle_permission_result(&self, state: &ScreenState, granted: bool) -> Transition {
        let mut next = state.clone();
        next.permission = PermissionStatus::from(granted);

        if granted {
            info!("Camera permission granted");
            if next.active_device.is_none() {
                self.select_initial_device(&mut next);
            }
        } else {
            // A valid outcome, not a fault
            info!("Camera permission denied");
        }
        Transition::to(next)
    }

    fn select_initial_device(&self, next: &mut ScreenState) {
        next.active_device = next.devices.preferred(self.preferred_facing).cloned();
        match &next.active_device {
            Some(device) => info!(device = %device, "Selected camera"),
            None if next.devices.is_empty() => warn!("No camera device found"),
            None => {}
        }
    }
}

fn handle_capture_finished(state: &ScreenState, result: PhotoResult<String>) -> Transition {
    let mut next = state.clone();
    next.pending_captures = next.pending_captures.saturating_sub(1);

    match result {
        Ok(path) => {
            info!(path = %path, "Photo captured");
            next.last_photo_path = Some(path);
        }
        Err(e) => {
            error!(error = %e, "Error capturing image");
        }
    }
    Transition::to(next)
}

fn handle_request_close(state: &ScreenState) -> Transition {
    if state.shutter_locked {
        debug!("Close ignored during lockout");
        return Transition::unchanged(state);
    }

    let mut next = state.clone();
    next.shutter_locked = true;
    // Stays off until ResumePreview; the lockout timer only unlocks
    next.preview_active = false;
    Transition::with_effect(next, Effect::StartLockoutTimer)
}

fn handle_resume_preview(state: &ScreenState) -> Transition {
    let mut next = state.clone();
    next.preview_active = true;
    Transition::to(next)
}

fn handle_capture(state: &ScreenState) -> Transition {
    let Some(session) = state.session() else {
        debug!("No camera session, capture ignored");
        return Transition::unchanged(state);
    };

    // Not debounced: every press starts its own capture
    let mut next = state.clone();
    next.pending_captures += 1;
    info!(device = %session.device, in_flight = next.pending_captures, "Capturing photo...");
    Transition::with_effect(next, Effect::StartCapture(session))
}

fn handle_toggle_device(state: &ScreenState) -> Transition {
    let Some(active) = &state.active_device else {
        return Transition::unchanged(state);
    };
    if !state.devices.can_flip() {
        debug!("Only one camera available, cannot switch");
        return Transition::unchanged(state);
    }

    let mut next = state.clone();
    next.active_device = state.devices.get(active.facing.flipped()).cloned();
    if let Some(device) = &next.active_device {
        info!(device = %device, "Switching camera");
    }
    Transition::to(next)
}

fn handle_open_review(state: &ScreenState) -> Transition {
    if state.last_photo_path.is_none() {
        return Transition::unchanged(state);
    }
    let mut next = state.clone();
    next.review_visible = true;
    Transition::to(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::ScreenPhase;
    use crate::backends::camera::{DeviceHandle, SessionHandle};
    use crate::errors::PhotoError;

    fn front() -> DeviceHandle {
        DeviceHandle::new("cam-front", "Front", Facing::Front)
    }

    fn back() -> DeviceHandle {
        DeviceHandle::new("cam-back", "Back", Facing::Back)
    }

    fn run(reducer: &Reducer, state: ScreenState, messages: Vec<Message>) -> ScreenState {
        messages
            .into_iter()
            .fold(state, |s, m| reducer.reduce(&s, m).state)
    }

    fn ready(devices: DeviceSet) -> ScreenState {
        run(
            &Reducer::default(),
            ScreenState::default(),
            vec![Message::DevicesListed(devices), Message::PermissionResult(true)],
        )
    }

    #[test]
    fn test_grant_selects_back_camera() {
        let state = ready(DeviceSet::new(Some(front()), Some(back())));
        assert_eq!(state.active_device, Some(back()));
        assert!(state.preview_visible());
    }

    #[test]
    fn test_grant_keeps_existing_selection() {
        let reducer = Reducer::default();
        let mut state = ready(DeviceSet::new(Some(front()), Some(back())));
        state = reducer.reduce(&state, Message::ToggleDevice).state;
        state = reducer.reduce(&state, Message::PermissionResult(true)).state;
        assert_eq!(state.active_device, Some(front()));
    }

    #[test]
    fn test_preferred_front_facing() {
        let state = run(
            &Reducer::new(Facing::Front),
            ScreenState::default(),
            vec![
                Message::DevicesListed(DeviceSet::new(Some(front()), Some(back()))),
                Message::PermissionResult(true),
            ],
        );
        assert_eq!(state.active_device, Some(front()));
    }

    #[test]
    fn test_devices_listed_after_grant_selects_device() {
        let state = run(
            &Reducer::default(),
            ScreenState::default(),
            vec![
                Message::PermissionResult(true),
                Message::DevicesListed(DeviceSet::new(None, Some(back()))),
            ],
        );
        assert_eq!(state.active_device, Some(back()));
    }

    #[test]
    fn test_no_devices_means_no_camera_phase() {
        let state = ready(DeviceSet::default());
        assert_eq!(state.phase(), ScreenPhase::NoCamera);
        assert!(state.session().is_none());
    }

    #[test]
    fn test_request_close_locks_and_schedules_timer() {
        let state = ready(DeviceSet::new(None, Some(back())));
        let transition = Reducer::default().reduce(&state, Message::RequestClose);
        assert!(transition.state.shutter_locked);
        assert!(!transition.state.preview_active);
        assert_eq!(transition.effect, Some(Effect::StartLockoutTimer));
    }

    #[test]
    fn test_request_close_during_lockout_is_noop() {
        let reducer = Reducer::default();
        let state = ready(DeviceSet::new(None, Some(back())));
        let locked = reducer.reduce(&state, Message::RequestClose).state;
        let resumed = reducer.reduce(&locked, Message::ResumePreview).state;

        let again = reducer.reduce(&resumed, Message::RequestClose);
        assert_eq!(again.state, resumed);
        assert_eq!(again.effect, None);
    }

    #[test]
    fn test_unlock_does_not_resume_preview() {
        let reducer = Reducer::default();
        let state = ready(DeviceSet::new(None, Some(back())));
        let state = run(
            &reducer,
            state,
            vec![Message::RequestClose, Message::ShutterUnlocked],
        );
        assert!(!state.shutter_locked);
        assert!(!state.preview_active);
        assert_eq!(state.phase(), ScreenPhase::PreviewOff);
    }

    #[test]
    fn test_capture_requires_session() {
        let reducer = Reducer::default();
        let state = ready(DeviceSet::new(None, Some(back())));
        let closed = reducer.reduce(&state, Message::RequestClose).state;

        let transition = reducer.reduce(&closed, Message::Capture);
        assert_eq!(transition.effect, None);
        assert_eq!(transition.state.pending_captures, 0);
    }

    #[test]
    fn test_capture_emits_session_for_active_device() {
        let state = ready(DeviceSet::new(Some(front()), Some(back())));
        let transition = Reducer::default().reduce(&state, Message::Capture);
        assert_eq!(transition.state.pending_captures, 1);
        assert_eq!(
            transition.effect,
            Some(Effect::StartCapture(SessionHandle { device: back() }))
        );
    }

    #[test]
    fn test_capture_success_overwrites_path_even_while_reviewing() {
        let reducer = Reducer::default();
        let mut state = ready(DeviceSet::new(None, Some(back())));
        state.last_photo_path = Some("/photos/old.jpg".into());
        state.review_visible = true;
        state.pending_captures = 1;

        let next = reducer
            .reduce(&state, Message::CaptureFinished(Ok("/photos/new.jpg".into())))
            .state;
        assert_eq!(next.last_photo_path.as_deref(), Some("/photos/new.jpg"));
        assert!(next.review_visible);
        assert_eq!(next.pending_captures, 0);
    }

    #[test]
    fn test_capture_failure_only_clears_pending() {
        let reducer = Reducer::default();
        let mut state = ready(DeviceSet::new(None, Some(back())));
        state.last_photo_path = Some("/photos/old.jpg".into());
        state.pending_captures = 1;

        let next = reducer
            .reduce(
                &state,
                Message::CaptureFinished(Err(PhotoError::CaptureFailed("busy".into()))),
            )
            .state;
        let mut expected = state.clone();
        expected.pending_captures = 0;
        assert_eq!(next, expected);
    }

    #[test]
    fn test_toggle_swaps_devices() {
        let reducer = Reducer::default();
        let state = ready(DeviceSet::new(Some(front()), Some(back())));
        let flipped = reducer.reduce(&state, Message::ToggleDevice).state;
        assert_eq!(flipped.active_device, Some(front()));
        let back_again = reducer.reduce(&flipped, Message::ToggleDevice).state;
        assert_eq!(back_again.active_device, Some(back()));
    }

    #[test]
    fn test_toggle_with_single_device_is_noop() {
        let state = ready(DeviceSet::new(None, Some(back())));
        let next = Reducer::default().reduce(&state, Message::ToggleDevice).state;
        assert_eq!(next, state);
        assert!(!state.can_flip());
    }

    #[test]
    fn test_open_review_without_photo_is_noop() {
        let state = ready(DeviceSet::new(None, Some(back())));
        let next = Reducer::default().reduce(&state, Message::OpenReview).state;
        assert!(!next.review_visible);
    }

    #[test]
    fn test_review_open_close() {
        let reducer = Reducer::default();
        let mut state = ready(DeviceSet::new(None, Some(back())));
        state.last_photo_path = Some("/photos/a.jpg".into());
        let state = reducer.reduce(&state, Message::OpenReview).state;
        assert!(state.review_visible);
        let state = reducer.reduce(&state, Message::CloseReview).state;
        assert!(!state.review_visible);
    }

    #[test]
    fn test_denied_then_anything_never_shows_preview() {
        let reducer = Reducer::default();
        let denied = run(
            &reducer,
            ScreenState::default(),
            vec![
                Message::DevicesListed(DeviceSet::new(Some(front()), Some(back()))),
                Message::PermissionResult(false),
            ],
        );
        let events = [
            Message::ResumePreview,
            Message::Capture,
            Message::ToggleDevice,
            Message::RequestClose,
            Message::ShutterUnlocked,
            Message::OpenReview,
            Message::CloseReview,
            Message::ResumePreview,
        ];

        let mut state = denied;
        for event in events {
            state = reducer.reduce(&state, event).state;
            assert_eq!(state.phase(), ScreenPhase::Denied);
            assert!(!state.preview_visible());
            assert!(state.session().is_none());
        }
    }

    #[test]
    fn test_resume_preview_while_denied() {
        let reducer = Reducer::default();
        let mut state = run(
            &reducer,
            ScreenState::default(),
            vec![Message::PermissionResult(false), Message::RequestClose],
        );
        assert!(!state.preview_active);
        state = reducer.reduce(&state, Message::ResumePreview).state;
        assert!(state.preview_active);
        assert_eq!(state.permission, PermissionStatus::Denied);
        assert!(!state.preview_visible());
    }

    #[test]
    fn test_relisting_drops_vanished_device() {
        let reducer = Reducer::default();
        let state = ready(DeviceSet::new(Some(front()), Some(back())));
        let next = reducer
            .reduce(&state, Message::DevicesListed(DeviceSet::new(Some(front()), None)))
            .state;
        assert_eq!(next.active_device, Some(front()));
    }
}

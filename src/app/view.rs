// SPDX-License-Identifier: GPL-3.0-only

//! View derivation
//!
//! Maps a [`ScreenState`] to what the presentation layer should draw.
//! Presentation layers render a [`ScreenView`] and never look at the raw
//! flags, so the permission gate lives in exactly one place.

use crate::app::state::{ScreenPhase, ScreenState};
use crate::backends::camera::DeviceHandle;

pub const REQUESTING_PERMISSION_TEXT: &str = "Requesting camera permission...";
pub const NO_CAMERA_TEXT: &str = "No camera device found";
pub const OPEN_CAMERA_TEXT: &str = "Open to camera";

/// Controls drawn over the live preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewView {
    pub device: DeviceHandle,
    /// Last photo, shown as a tappable thumbnail
    pub thumbnail: Option<String>,
    /// Flip control does something
    pub flip_enabled: bool,
    /// Close control accepts presses
    pub close_enabled: bool,
    /// At least one capture is in flight
    pub capturing: bool,
}

/// Main screen content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainView {
    RequestingPermission,
    NoCamera,
    /// "Open to camera" placeholder; `denied` when permission is the reason
    Placeholder { denied: bool },
    Preview(PreviewView),
}

impl MainView {
    /// Primary text for the non-preview views
    pub fn message(&self) -> Option<&'static str> {
        match self {
            MainView::RequestingPermission => Some(REQUESTING_PERMISSION_TEXT),
            MainView::NoCamera => Some(NO_CAMERA_TEXT),
            MainView::Placeholder { .. } => Some(OPEN_CAMERA_TEXT),
            MainView::Preview(_) => None,
        }
    }
}

/// Everything on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub main: MainView,
    /// Photo shown in the full-screen review overlay
    pub review: Option<String>,
}

impl ScreenView {
    pub fn from_state(state: &ScreenState) -> Self {
        let main = match state.phase() {
            ScreenPhase::AwaitingPermission => MainView::RequestingPermission,
            ScreenPhase::NoCamera => MainView::NoCamera,
            ScreenPhase::Denied => MainView::Placeholder { denied: true },
            ScreenPhase::PreviewOff => MainView::Placeholder { denied: false },
            ScreenPhase::PreviewOn => match &state.active_device {
                Some(device) => MainView::Preview(PreviewView {
                    device: device.clone(),
                    thumbnail: state.last_photo_path.clone(),
                    flip_enabled: state.can_flip(),
                    close_enabled: !state.shutter_locked,
                    capturing: state.is_capturing(),
                }),
                None => MainView::NoCamera,
            },
        };

        let review = if state.review_visible {
            state.last_photo_path.clone()
        } else {
            None
        };

        Self { main, review }
    }

    pub fn shows_live_preview(&self) -> bool {
        matches!(self.main, MainView::Preview(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{DeviceSet, Facing, PermissionStatus};

    fn granted(devices: DeviceSet) -> ScreenState {
        ScreenState {
            permission: PermissionStatus::Granted,
            active_device: devices.preferred(Facing::Back).cloned(),
            devices,
            ..Default::default()
        }
    }

    fn back() -> DeviceHandle {
        DeviceHandle::new("b", "Back", Facing::Back)
    }

    #[test]
    fn test_initial_state_requests_permission() {
        let view = ScreenView::from_state(&ScreenState::default());
        assert_eq!(view.main, MainView::RequestingPermission);
        assert_eq!(view.main.message(), Some(REQUESTING_PERMISSION_TEXT));
    }

    #[test]
    fn test_denied_with_preview_flag_still_placeholder() {
        let state = ScreenState {
            permission: PermissionStatus::Denied,
            preview_active: true,
            ..Default::default()
        };
        let view = ScreenView::from_state(&state);
        assert_eq!(view.main, MainView::Placeholder { denied: true });
        assert!(!view.shows_live_preview());
    }

    #[test]
    fn test_denied_without_devices_stays_denied() {
        let state = ScreenState {
            permission: PermissionStatus::Denied,
            devices: DeviceSet::default(),
            ..Default::default()
        };
        let view = ScreenView::from_state(&state);
        assert_eq!(view.main, MainView::Placeholder { denied: true });
    }

    #[test]
    fn test_back_only_disables_flip() {
        let view = ScreenView::from_state(&granted(DeviceSet::new(None, Some(back()))));
        match view.main {
            MainView::Preview(preview) => {
                assert!(!preview.flip_enabled);
                assert!(preview.close_enabled);
                assert_eq!(preview.thumbnail, None);
            }
            other => panic!("expected preview, got {:?}", other),
        }
    }

    #[test]
    fn test_granted_without_devices_is_no_camera() {
        let view = ScreenView::from_state(&granted(DeviceSet::default()));
        assert_eq!(view.main, MainView::NoCamera);
    }

    #[test]
    fn test_review_overlay_over_placeholder() {
        let mut state = granted(DeviceSet::new(None, Some(back())));
        state.preview_active = false;
        state.last_photo_path = Some("/p.jpg".into());
        state.review_visible = true;

        let view = ScreenView::from_state(&state);
        assert_eq!(view.main, MainView::Placeholder { denied: false });
        assert_eq!(view.review.as_deref(), Some("/p.jpg"));
    }
}

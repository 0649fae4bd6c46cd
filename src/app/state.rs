// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen state

use crate::backends::camera::{DeviceHandle, DeviceSet, PermissionStatus, SessionHandle};
use crate::errors::PhotoResult;

/// Everything the capture screen knows
///
/// Values are never edited in place: each event produces a new `ScreenState`
/// which replaces the previous one as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenState {
    /// Camera access as last reported by the capability
    pub permission: PermissionStatus,
    /// Handles reported by `list_devices`
    pub devices: DeviceSet,
    /// Camera feeding the preview
    pub active_device: Option<DeviceHandle>,
    /// Whether the live feed should be shown
    ///
    /// Rendering additionally requires granted permission and an active
    /// device, see [`ScreenState::preview_visible`].
    pub preview_active: bool,
    /// Path of the most recent successful capture
    pub last_photo_path: Option<String>,
    /// Full-screen review overlay shown
    pub review_visible: bool,
    /// Close control is in its lockout window
    pub shutter_locked: bool,
    /// Captures started but not yet resolved
    pub pending_captures: u32,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            permission: PermissionStatus::Unknown,
            devices: DeviceSet::default(),
            active_device: None,
            preview_active: true,
            last_photo_path: None,
            review_visible: false,
            shutter_locked: false,
            pending_captures: 0,
        }
    }
}

impl ScreenState {
    /// The live preview is actually on screen
    pub fn preview_visible(&self) -> bool {
        self.permission.is_granted() && self.active_device.is_some() && self.preview_active
    }

    /// Session to capture from, present only while the preview is mounted
    pub fn session(&self) -> Option<SessionHandle> {
        if !self.preview_visible() {
            return None;
        }
        self.active_device.clone().map(|device| SessionHandle { device })
    }

    /// Flip control has somewhere to go
    pub fn can_flip(&self) -> bool {
        self.active_device.is_some() && self.devices.can_flip()
    }

    pub fn is_capturing(&self) -> bool {
        self.pending_captures > 0
    }

    pub fn phase(&self) -> ScreenPhase {
        match self.permission {
            PermissionStatus::Unknown => ScreenPhase::AwaitingPermission,
            PermissionStatus::Denied => ScreenPhase::Denied,
            PermissionStatus::Granted if self.active_device.is_none() => ScreenPhase::NoCamera,
            PermissionStatus::Granted if self.preview_active => ScreenPhase::PreviewOn,
            PermissionStatus::Granted => ScreenPhase::PreviewOff,
        }
    }
}

/// Coarse screen phase derived from [`ScreenState`]
///
/// `AwaitingPermission → {Denied, Ready}`, where ready is one of
/// `PreviewOn`/`PreviewOff` (or `NoCamera` on hardware without cameras). The
/// review overlay is orthogonal to the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPhase {
    AwaitingPermission,
    Denied,
    NoCamera,
    PreviewOn,
    PreviewOff,
}

/// Inputs to the capture screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // ===== From the capability =====
    /// Device enumeration finished
    DevicesListed(DeviceSet),
    /// Permission query or prompt resolved
    PermissionResult(bool),
    /// A capture resolved
    CaptureFinished(PhotoResult<String>),

    // ===== From the presentation layer =====
    /// Dismiss control (debounced)
    RequestClose,
    /// "Open to camera" placeholder control
    ResumePreview,
    /// Shutter control
    Capture,
    /// Flip control
    ToggleDevice,
    /// Thumbnail tapped
    OpenReview,
    /// Review overlay close control
    CloseReview,

    // ===== Timers =====
    /// Close-control lockout elapsed
    ShutterUnlocked,
}

impl Message {
    /// Whether the presentation layer may send this message
    ///
    /// Capability results and timer expiries are produced by the controller
    /// itself and never accepted from outside.
    pub fn from_presentation(&self) -> bool {
        matches!(
            self,
            Message::RequestClose
                | Message::ResumePreview
                | Message::Capture
                | Message::ToggleDevice
                | Message::OpenReview
                | Message::CloseReview
        )
    }
}

/// Side effects requested by a transition, run by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Schedule `ShutterUnlocked` after the cooldown
    StartLockoutTimer,
    /// Invoke the capability's capture for this session
    StartCapture(SessionHandle),
}

/// New state plus the effects it requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ScreenState,
    pub effect: Option<Effect>,
}

impl Transition {
    /// State change without side effects
    pub fn to(state: ScreenState) -> Self {
        Self {
            state,
            effect: None,
        }
    }

    pub fn with_effect(state: ScreenState, effect: Effect) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }

    /// Leave the state as it was
    pub fn unchanged(state: &ScreenState) -> Self {
        Self::to(state.clone())
    }
}

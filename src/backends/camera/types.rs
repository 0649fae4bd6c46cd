// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera capabilities

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which side of the device a camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Front,
    #[default]
    Back,
}

impl Facing {
    /// The opposite facing
    pub fn flipped(self) -> Self {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }
}

impl std::fmt::Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facing::Front => write!(f, "front"),
            Facing::Back => write!(f, "back"),
        }
    }
}

impl std::str::FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(Facing::Front),
            "back" | "rear" => Ok(Facing::Back),
            other => Err(format!("unknown camera facing '{}'", other)),
        }
    }
}

/// Camera permission as reported by the capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// Not yet resolved
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

impl From<bool> for PermissionStatus {
    fn from(granted: bool) -> Self {
        if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

/// Handle to one physical camera
///
/// Handles are opaque to the controller: it compares and stores them but never
/// looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceHandle {
    /// Capability-specific identifier
    pub id: String,
    /// Human readable name
    pub name: String,
    pub facing: Facing,
}

impl DeviceHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>, facing: Facing) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            facing,
        }
    }
}

impl std::fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.facing)
    }
}

/// Result of `list_devices`: at most one handle per facing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSet {
    pub front: Option<DeviceHandle>,
    pub back: Option<DeviceHandle>,
}

impl DeviceSet {
    pub fn new(front: Option<DeviceHandle>, back: Option<DeviceHandle>) -> Self {
        Self { front, back }
    }

    /// Handle for a facing, if present
    pub fn get(&self, facing: Facing) -> Option<&DeviceHandle> {
        match facing {
            Facing::Front => self.front.as_ref(),
            Facing::Back => self.back.as_ref(),
        }
    }

    /// Handle for `preferred`, falling back to the other facing
    pub fn preferred(&self, preferred: Facing) -> Option<&DeviceHandle> {
        self.get(preferred).or_else(|| self.get(preferred.flipped()))
    }

    /// Both front and back are present, so flipping is possible
    pub fn can_flip(&self) -> bool {
        self.front.is_some() && self.back.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }

    /// Present handles, front first
    pub fn iter(&self) -> impl Iterator<Item = &DeviceHandle> {
        self.front.iter().chain(self.back.iter())
    }
}

/// Opaque binding of an active camera device, handed to `capture`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub device: DeviceHandle,
}

/// Byte length of a tightly packed RGB24 frame, `None` if it does not fit
pub fn rgb_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(3)
}

/// An RGB24 frame produced by a capability for preview or capture
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Packed RGB bytes, `stride` bytes per row
    pub data: Arc<[u8]>,
    pub stride: usize,
}

impl CameraFrame {
    /// Build a frame from tightly packed RGB bytes
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data),
            stride: (width as usize).saturating_mul(3),
        }
    }

    /// Frame with no pixels
    pub fn empty() -> Self {
        Self::from_rgb(0, 0, Vec::new())
    }

    /// RGB triple at (x, y), clamped to the frame bounds
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = y
            .checked_mul(self.stride)
            .and_then(|row| row.checked_add(x * 3));
        match idx.and_then(|idx| self.data.get(idx..idx.saturating_add(3))) {
            Some(px) => (px[0], px[1], px[2]),
            None => (0, 0, 0),
        }
    }
}

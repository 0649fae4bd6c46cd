// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application identifier used for config, cache and picture directories
pub const APP_ID: &str = "camera-screen";

/// Lockout window applied to the close control after each accepted press
pub const SHUTTER_LOCKOUT_MS: u64 = 1000;

/// Simulated capture latency of the virtual camera
pub const VIRTUAL_CAPTURE_LATENCY_MS: u64 = 150;

/// Default synthetic frame size of the virtual camera
pub const VIRTUAL_FRAME_WIDTH: u32 = 640;
pub const VIRTUAL_FRAME_HEIGHT: u32 = 480;

/// Largest accepted synthetic frame edge
pub const VIRTUAL_FRAME_MAX_EDGE: u32 = 4096;

/// Capacity of the channel carrying async completions back to the controller
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Terminal UI timing
pub mod ui {
    use super::Duration;

    /// Input poll timeout, also the preview refresh period (~60 fps)
    pub const INPUT_POLL: Duration = Duration::from_millis(16);
}

/// Photo output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhotoFormat {
    /// JPEG (default)
    #[default]
    Jpeg,
    /// Lossless PNG
    Png,
}

impl PhotoFormat {
    /// Get all variants for UI iteration
    pub const ALL: [PhotoFormat; 2] = [PhotoFormat::Jpeg, PhotoFormat::Png];

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            PhotoFormat::Jpeg => "jpg",
            PhotoFormat::Png => "png",
        }
    }

    /// Matching `image` crate format
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            PhotoFormat::Jpeg => image::ImageFormat::Jpeg,
            PhotoFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// Shutter lockout as a `Duration`
pub fn shutter_lockout() -> Duration {
    Duration::from_millis(SHUTTER_LOCKOUT_MS)
}

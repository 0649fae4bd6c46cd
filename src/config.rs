// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON in `<config dir>/camera-screen/config.json`. Unknown or
//! missing fields fall back to their defaults so older files keep loading.

use crate::backends::camera::Facing;
use crate::constants::{
    APP_ID, PhotoFormat, SHUTTER_LOCKOUT_MS, VIRTUAL_CAPTURE_LATENCY_MS, VIRTUAL_FRAME_HEIGHT,
    VIRTUAL_FRAME_MAX_EDGE, VIRTUAL_FRAME_WIDTH,
};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Behaviour of the software camera
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualCameraConfig {
    /// Outcome of the permission prompt
    pub grant_permission: bool,
    /// Expose a front camera
    pub has_front: bool,
    /// Expose a back camera
    pub has_back: bool,
    /// Simulated time from shutter press to written file
    pub capture_latency_ms: u64,
    /// Make every capture fail (exercises the failure path)
    pub fail_captures: bool,
    /// Synthetic frame width
    pub frame_width: u32,
    /// Synthetic frame height
    pub frame_height: u32,
}

impl Default for VirtualCameraConfig {
    fn default() -> Self {
        Self {
            grant_permission: true,
            has_front: true,
            has_back: true,
            capture_latency_ms: VIRTUAL_CAPTURE_LATENCY_MS,
            fail_captures: false,
            frame_width: VIRTUAL_FRAME_WIDTH,
            frame_height: VIRTUAL_FRAME_HEIGHT,
        }
    }
}

impl VirtualCameraConfig {
    /// Whether the frame size is non-empty and within `VIRTUAL_FRAME_MAX_EDGE`
    pub fn frame_size_valid(&self) -> bool {
        (1..=VIRTUAL_FRAME_MAX_EDGE).contains(&self.frame_width)
            && (1..=VIRTUAL_FRAME_MAX_EDGE).contains(&self.frame_height)
    }

    /// Replace an out-of-range frame size with the default one
    pub fn sanitized(mut self) -> Self {
        if !self.frame_size_valid() {
            warn!(
                width = self.frame_width,
                height = self.frame_height,
                max = VIRTUAL_FRAME_MAX_EDGE,
                "Virtual frame size out of range, using default"
            );
            self.frame_width = VIRTUAL_FRAME_WIDTH;
            self.frame_height = VIRTUAL_FRAME_HEIGHT;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Close-control lockout after each accepted press
    pub shutter_cooldown_ms: u64,
    /// Camera selected once permission is granted
    pub preferred_facing: Facing,
    /// Override for the photo directory
    pub photo_dir: Option<PathBuf>,
    /// Output format for captured photos
    pub photo_format: PhotoFormat,
    /// Software camera settings
    pub virtual_camera: VirtualCameraConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shutter_cooldown_ms: SHUTTER_LOCKOUT_MS,
            preferred_facing: Facing::Back,
            photo_dir: None,
            photo_format: PhotoFormat::default(),
            virtual_camera: VirtualCameraConfig::default(),
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_ID).join("config.json"))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    /// Load from `path`
    ///
    /// A missing file yields defaults silently; an unreadable or malformed
    /// file is logged and also yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Self::default();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str::<Self>(&contents) {
            Ok(mut config) => {
                info!(path = %path.display(), "Loaded config");
                config.virtual_camera = config.virtual_camera.sanitized();
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Effective photo directory
    pub fn photo_directory(&self) -> PathBuf {
        self.photo_dir
            .clone()
            .unwrap_or_else(crate::storage::default_photo_directory)
    }

    pub fn shutter_cooldown(&self) -> Duration {
        Duration::from_millis(self.shutter_cooldown_ms)
    }
}

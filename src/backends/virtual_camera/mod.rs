// SPDX-License-Identifier: GPL-3.0-only

//! Virtual camera capability
//!
//! A software [`CameraCapability`] used when no native camera binding is
//! present. Everything the capture screen depends on is configurable so the
//! unusual paths (denied permission, single camera, failing captures) can be
//! exercised from the command line.
//!
//! ```text
//! capture(session)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │ simulated latency│  ← tokio::time::sleep
//! └──────────────────┘
//!        │
//!        ▼
//! ┌──────────────────┐
//! │ pattern::render  │  ← synthetic RGB frame, tinted by facing
//! └──────────────────┘
//!        │
//!        ▼
//! ┌──────────────────┐
//! │ storage::save    │  ← JPEG/PNG via `image`, on the blocking pool
//! └──────────────────┘
//!        │
//!        ▼
//!    photo path
//! ```

pub mod pattern;

use crate::backends::camera::{
    CameraCapability, CameraFrame, DeviceHandle, DeviceSet, Facing, PermissionStatus,
    SessionHandle,
};
use crate::config::{Config, VirtualCameraConfig};
use crate::constants::PhotoFormat;
use crate::errors::{PhotoError, PhotoResult};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Pixels the preview bar advances per requested frame
const PREVIEW_STEP: u64 = 4;

/// Software camera
pub struct VirtualCamera {
    settings: VirtualCameraConfig,
    photo_dir: PathBuf,
    photo_format: PhotoFormat,
    /// Resolved permission; starts unknown until the first prompt
    permission: Arc<Mutex<PermissionStatus>>,
    /// Preview animation phase
    phase: AtomicU64,
}

impl VirtualCamera {
    pub fn new(settings: VirtualCameraConfig, photo_dir: PathBuf, photo_format: PhotoFormat) -> Self {
        info!(
            front = settings.has_front,
            back = settings.has_back,
            grant = settings.grant_permission,
            "Creating virtual camera"
        );
        Self {
            settings: settings.sanitized(),
            photo_dir,
            photo_format,
            permission: Arc::new(Mutex::new(PermissionStatus::Unknown)),
            phase: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.virtual_camera.clone(),
            config.photo_directory(),
            config.photo_format,
        )
    }

    fn handle(facing: Facing) -> DeviceHandle {
        let name = match facing {
            Facing::Front => "Virtual Front Camera",
            Facing::Back => "Virtual Back Camera",
        };
        DeviceHandle::new(format!("virtual:{}", facing), name, facing)
    }
}

impl CameraCapability for VirtualCamera {
    fn query_permission(&self) -> PermissionStatus {
        self.permission
            .lock()
            .map(|status| *status)
            .unwrap_or(PermissionStatus::Unknown)
    }

    fn request_permission(&self) -> BoxFuture<'static, bool> {
        let granted = self.settings.grant_permission;
        let permission = Arc::clone(&self.permission);
        async move {
            if let Ok(mut status) = permission.lock() {
                *status = PermissionStatus::from(granted);
            }
            debug!(granted, "Virtual camera permission prompt answered");
            granted
        }
        .boxed()
    }

    fn list_devices(&self) -> DeviceSet {
        DeviceSet::new(
            self.settings.has_front.then(|| Self::handle(Facing::Front)),
            self.settings.has_back.then(|| Self::handle(Facing::Back)),
        )
    }

    fn capture(&self, session: SessionHandle) -> BoxFuture<'static, PhotoResult<String>> {
        let latency = Duration::from_millis(self.settings.capture_latency_ms);
        let fail = self.settings.fail_captures;
        let (width, height) = (self.settings.frame_width, self.settings.frame_height);
        let phase = self.phase.load(Ordering::Relaxed);
        let dir = self.photo_dir.clone();
        let format = self.photo_format;

        async move {
            debug!(device = %session.device, "Virtual capture started");
            tokio::time::sleep(latency).await;

            if fail {
                return Err(PhotoError::CaptureFailed(format!(
                    "{} is not responding",
                    session.device.name
                )));
            }

            let facing = session.device.facing;
            tokio::task::spawn_blocking(move || {
                let frame = pattern::render(width, height, facing, phase);
                crate::storage::save_frame(&frame, &dir, format)
            })
            .await
            .map_err(|e| PhotoError::CaptureFailed(e.to_string()))?
            .map(|path| path.display().to_string())
        }
        .boxed()
    }

    fn preview_frame(&self, device: &DeviceHandle) -> Option<CameraFrame> {
        let phase = self.phase.fetch_add(PREVIEW_STEP, Ordering::Relaxed);
        Some(pattern::render(
            self.settings.frame_width,
            self.settings.frame_height,
            device.facing,
            phase,
        ))
    }
}

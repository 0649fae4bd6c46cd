// SPDX-License-Identifier: GPL-3.0-only

//! Camera capability abstraction
//!
//! The capture screen never talks to hardware itself. Everything it needs from
//! a camera goes through [`CameraCapability`], which is handed to the
//! controller at construction time.
//!
//! ```text
//! ┌─────────────────────┐
//! │ Presentation layer  │  ← terminal UI, CLI
//! └──────────┬──────────┘
//!            │ events / snapshots
//!            ▼
//! ┌─────────────────────┐
//! │ ScreenController    │  ← reducer + timers + in-flight captures
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CameraCapability    │  ← permission, devices, capture
//! └──────────┬──────────┘
//!            │
//!            ▼
//!     ┌──────────────┐
//!     │VirtualCamera │  ← software implementation
//!     └──────────────┘
//! ```

pub mod types;

pub use types::*;

use crate::errors::PhotoResult;
use futures::future::BoxFuture;

/// Everything the capture screen consumes from a camera
///
/// Implementations must guarantee that at most one session per device is
/// active at a time; the controller relies on this and does not enforce it.
pub trait CameraCapability: Send + Sync + 'static {
    /// Current permission without prompting
    fn query_permission(&self) -> PermissionStatus;

    /// Prompt for camera access
    ///
    /// Resolves to `true` if access was granted.
    fn request_permission(&self) -> BoxFuture<'static, bool>;

    /// Enumerate the front and back cameras
    fn list_devices(&self) -> DeviceSet;

    /// Take a photo with the bound session
    ///
    /// Resolves to the path of the written photo. The path is opaque to the
    /// caller.
    fn capture(&self, session: SessionHandle) -> BoxFuture<'static, PhotoResult<String>>;

    /// Latest preview frame for a device, if the capability can provide one
    fn preview_frame(&self, _device: &DeviceHandle) -> Option<CameraFrame> {
        None
    }
}

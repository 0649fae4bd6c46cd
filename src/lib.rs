// SPDX-License-Identifier: GPL-3.0-only

//! Camera Screen - a single-screen camera
//!
//! Live preview, photo capture, front/back toggle and a full-screen review of
//! the last photo, driven by a small state machine over an injected camera
//! capability.
//!
//! # Architecture
//!
//! - [`app`]: screen state, reducer, controller and view derivation
//! - [`backends`]: the camera capability trait and a virtual implementation
//! - [`config`]: user configuration
//! - [`storage`]: photo files
//! - [`terminal`]: terminal presentation layer
//!
//! # Example
//!
//! ```ignore
//! let camera = VirtualCamera::from_config(&config);
//! let mut controller = ScreenController::new(camera, ControllerSettings::from_config(&config));
//! controller.mount().await;
//! controller.dispatch(Message::Capture);
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{ControllerSettings, Message, ScreenController, ScreenState, ScreenView};
pub use backends::camera::CameraCapability;
pub use backends::virtual_camera::VirtualCamera;
pub use config::Config;

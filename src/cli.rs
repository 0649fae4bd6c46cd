// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Taking a photo through the same controller the interactive screen uses

use camera_screen::app::{MainView, Message, ScreenController, ScreenView};
use camera_screen::backends::camera::{CameraCapability, Facing};
use camera_screen::errors::CameraError;
use camera_screen::{Config, ControllerSettings, VirtualCamera};
use std::path::PathBuf;

/// List all available cameras
pub fn list_cameras(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let camera = VirtualCamera::from_config(config);
    let devices = camera.list_devices();

    if devices.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for device in devices.iter() {
        println!("  [{}] {}", device.facing, device.name);
        println!(
            "      Frame: {}x{}",
            config.virtual_camera.frame_width, config.virtual_camera.frame_height
        );
    }
    println!();
    println!("Photos are saved to {}", config.photo_directory().display());

    Ok(())
}

/// Mount the capture screen headlessly, capture once and print the path
pub fn take_photo(
    mut config: Config,
    facing: Option<Facing>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = output {
        config.photo_dir = Some(dir);
    }
    if let Some(facing) = facing {
        config.preferred_facing = facing;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let camera = VirtualCamera::from_config(&config);
        let mut controller =
            ScreenController::new(camera, ControllerSettings::from_config(&config));
        controller.mount().await;

        let view = ScreenView::from_state(controller.state());
        let device = match view.main {
            MainView::Preview(preview) => preview.device,
            MainView::Placeholder { denied: true } => return Err(CameraError::PermissionDenied.into()),
            MainView::NoCamera => return Err(CameraError::NoCameraFound.into()),
            other => return Err(format!("Camera not ready: {:?}", other).into()),
        };
        if let Some(wanted) = facing
            && device.facing != wanted
        {
            return Err(CameraError::FacingUnavailable(wanted.to_string()).into());
        }
        println!("Using camera: {}", device);

        controller.dispatch(Message::Capture);
        let result = loop {
            match controller.next_event().await {
                Some(Message::CaptureFinished(result)) => break result,
                Some(_) => continue,
                None => return Err("Capture screen closed before the photo was saved".into()),
            }
        };
        controller.teardown();

        let path = result?;
        println!("Photo saved: {}", path);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

// SPDX-License-Identifier: GPL-3.0-only

//! End-to-end tests: controller driving the virtual camera

use camera_screen::app::{MainView, Message, ScreenView};
use camera_screen::backends::camera::Facing;
use camera_screen::config::VirtualCameraConfig;
use camera_screen::constants::PhotoFormat;
use camera_screen::{ControllerSettings, ScreenController, VirtualCamera};
use std::path::Path;

fn camera(dir: &Path, settings: VirtualCameraConfig) -> VirtualCamera {
    VirtualCamera::new(settings, dir.to_path_buf(), PhotoFormat::Jpeg)
}

fn fast() -> VirtualCameraConfig {
    VirtualCameraConfig {
        capture_latency_ms: 0,
        frame_width: 64,
        frame_height: 48,
        ..Default::default()
    }
}

async fn next_capture(controller: &mut ScreenController<VirtualCamera>) -> Message {
    loop {
        match controller.next_event().await {
            Some(message @ Message::CaptureFinished(_)) => return message,
            Some(_) => continue,
            None => panic!("controller closed"),
        }
    }
}

#[tokio::test]
async fn test_capture_writes_photo_and_opens_review() {
    let dir = tempfile::tempdir().unwrap();
    let mut controller =
        ScreenController::new(camera(dir.path(), fast()), ControllerSettings::default());
    controller.mount().await;

    controller.dispatch(Message::Capture);
    next_capture(&mut controller).await;

    let path = controller.state().last_photo_path.clone().unwrap();
    assert!(Path::new(&path).starts_with(dir.path()));
    let photo = camera_screen::storage::load_review_image(&path).unwrap();
    assert_eq!((photo.width, photo.height), (64, 48));

    controller.dispatch(Message::OpenReview);
    let view = ScreenView::from_state(controller.state());
    assert_eq!(view.review, Some(path));
}

#[tokio::test]
async fn test_failing_camera_reports_and_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let settings = VirtualCameraConfig {
        fail_captures: true,
        ..fast()
    };
    let mut controller =
        ScreenController::new(camera(dir.path(), settings), ControllerSettings::default());
    controller.mount().await;

    controller.dispatch(Message::Capture);
    let message = next_capture(&mut controller).await;

    assert!(matches!(message, Message::CaptureFinished(Err(_))));
    assert_eq!(controller.state().last_photo_path, None);
    assert!(ScreenView::from_state(controller.state()).shows_live_preview());
}

#[tokio::test]
async fn test_front_only_hardware_falls_back_to_front() {
    let dir = tempfile::tempdir().unwrap();
    let settings = VirtualCameraConfig {
        has_back: false,
        ..fast()
    };
    let mut controller =
        ScreenController::new(camera(dir.path(), settings), ControllerSettings::default());
    controller.mount().await;

    match ScreenView::from_state(controller.state()).main {
        MainView::Preview(preview) => {
            assert_eq!(preview.device.facing, Facing::Front);
            assert!(!preview.flip_enabled);
        }
        other => panic!("expected preview, got {:?}", other),
    }
}

#[tokio::test]
async fn test_denied_virtual_camera() {
    let dir = tempfile::tempdir().unwrap();
    let settings = VirtualCameraConfig {
        grant_permission: false,
        ..fast()
    };
    let mut controller =
        ScreenController::new(camera(dir.path(), settings), ControllerSettings::default());
    controller.mount().await;

    assert_eq!(
        ScreenView::from_state(controller.state()).main,
        MainView::Placeholder { denied: true }
    );
}

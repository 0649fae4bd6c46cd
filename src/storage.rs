// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for captured photos

use crate::backends::camera::{CameraFrame, rgb_len};
use crate::constants::{APP_ID, PhotoFormat};
use crate::errors::{PhotoError, PhotoResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default photo directory (~/Pictures/camera-screen)
pub fn default_photo_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_ID)
}

/// Ensure the photo directory exists, creating it if necessary
pub fn ensure_photo_directory(dir: &Path) -> PhotoResult<()> {
    std::fs::create_dir_all(dir)?;
    debug!(path = %dir.display(), "Photo directory ready");
    Ok(())
}

/// File name for a new photo
///
/// Includes a short random suffix so two captures within the same second do
/// not overwrite each other.
pub fn photo_file_name(format: PhotoFormat) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("IMG_{}_{}.{}", timestamp, &suffix[..8], format.extension())
}

/// Encode a frame and write it into `dir`
///
/// Blocking; call from `spawn_blocking` in async contexts.
pub fn save_frame(frame: &CameraFrame, dir: &Path, format: PhotoFormat) -> PhotoResult<PathBuf> {
    let truncated = || PhotoError::EncodingFailed("frame data truncated".to_string());
    let len = rgb_len(frame.width, frame.height)
        .ok_or_else(|| PhotoError::EncodingFailed("frame too large".to_string()))?;
    let row_len = frame.width as usize * 3;
    let mut rgb = Vec::with_capacity(len);
    for y in 0..frame.height as usize {
        let start = y.checked_mul(frame.stride).ok_or_else(truncated)?;
        let row = start
            .checked_add(row_len)
            .and_then(|end| frame.data.get(start..end))
            .ok_or_else(truncated)?;
        rgb.extend_from_slice(row);
    }

    let img: image::RgbImage = image::ImageBuffer::from_raw(frame.width, frame.height, rgb)
        .ok_or_else(|| PhotoError::EncodingFailed("failed to create image".to_string()))?;

    ensure_photo_directory(dir)?;
    let filepath = dir.join(photo_file_name(format));
    img.save_with_format(&filepath, format.image_format())?;
    info!(path = %filepath.display(), "Photo saved");

    Ok(filepath)
}

/// Display URI for an opaque photo path
pub fn photo_uri(path: &str) -> String {
    if path.contains("://") {
        path.to_string()
    } else {
        format!("file://{}", path)
    }
}

/// Decode a captured photo for the review overlay
pub fn load_review_image(path: &str) -> PhotoResult<CameraFrame> {
    let img = image::open(path)?.to_rgb8();
    let (width, height) = img.dimensions();
    Ok(CameraFrame::from_rgb(width, height, img.into_raw()))
}

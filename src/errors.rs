// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture screen

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for capture operations
pub type PhotoResult<T> = Result<T, PhotoError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Photo capture errors
    Photo(PhotoError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// Requested facing is not present on this hardware
    FacingUnavailable(String),
    /// Camera access was not granted
    PermissionDenied,
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// Capture failed in the camera capability
    CaptureFailed(String),
    /// Encoding failed
    EncodingFailed(String),
    /// Save failed
    SaveFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera device found"),
            CameraError::FacingUnavailable(facing) => {
                write!(f, "No {} camera on this device", facing)
            }
            CameraError::PermissionDenied => write!(f, "Camera permission denied"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}

impl From<image::ImageError> for PhotoError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => PhotoError::SaveFailed(io.to_string()),
            other => PhotoError::EncodingFailed(other.to_string()),
        }
    }
}

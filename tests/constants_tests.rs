// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use camera_screen::constants::{PhotoFormat, SHUTTER_LOCKOUT_MS, shutter_lockout};

#[test]
fn test_photo_format_values() {
    assert_eq!(PhotoFormat::ALL.len(), 2);
    assert_eq!(PhotoFormat::default(), PhotoFormat::Jpeg);
}

#[test]
fn test_photo_format_extensions() {
    for format in PhotoFormat::ALL {
        assert!(
            !format.extension().is_empty(),
            "Format {:?} has empty extension",
            format
        );
    }
}

#[test]
fn test_shutter_lockout_matches_constant() {
    assert_eq!(shutter_lockout().as_millis() as u64, SHUTTER_LOCKOUT_MS);
}

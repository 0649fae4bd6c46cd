// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic frames for the virtual camera
//!
//! A diagonal gradient with a sweeping vertical bar, so a running preview is
//! visibly alive. Front cameras are tinted warm and back cameras cool, which
//! makes a flip obvious on screen and in saved photos.

use crate::backends::camera::{CameraFrame, Facing, rgb_len};
use tracing::warn;

/// Width of the moving bar in pixels
const BAR_WIDTH: u32 = 12;

/// Render one frame; `phase` advances the moving bar
///
/// Sizes whose byte length does not fit in memory yield an empty frame.
pub fn render(width: u32, height: u32, facing: Facing, phase: u64) -> CameraFrame {
    let Some(len) = rgb_len(width, height) else {
        warn!(width, height, "Frame size too large, rendering nothing");
        return CameraFrame::empty();
    };
    let mut data = Vec::with_capacity(len);
    let bar_x = if width == 0 {
        0
    } else {
        (phase % u64::from(width)) as u32
    };
    let (tint_r, tint_b) = match facing {
        Facing::Front => (60u16, 0u16),
        Facing::Back => (0u16, 60u16),
    };

    for y in 0..height {
        for x in 0..width {
            if x >= bar_x && x < bar_x.saturating_add(BAR_WIDTH) {
                data.extend_from_slice(&[240, 240, 240]);
                continue;
            }
            let gx = (u64::from(x) * 195 / u64::from(width)) as u16;
            let gy = (u64::from(y) * 195 / u64::from(height)) as u16;
            let r = (gx + tint_r).min(255) as u8;
            let g = ((gx + gy) / 2) as u8;
            let b = (gy + tint_b).min(255) as u8;
            data.extend_from_slice(&[r, g, b]);
        }
    }

    CameraFrame::from_rgb(width, height, data)
}

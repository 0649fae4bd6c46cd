// SPDX-License-Identifier: GPL-3.0-only

//! Camera capability layer
//!
//! - [`camera`]: the capability trait and shared device types
//! - [`virtual_camera`]: software capability with synthetic frames

pub mod camera;
pub mod virtual_camera;

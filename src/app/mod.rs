// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen logic
//!
//! # Architecture
//!
//! - `state`: screen state, messages, effects
//! - `update`: the reducer, one handler per message
//! - `controller`: owns the state, runs effects on tokio, cancels timers
//! - `view`: derives what to draw from a state snapshot
//!
//! # Main Types
//!
//! - `ScreenController`: the state machine the presentation layer talks to
//! - `Message`: user input and async completions
//! - `ScreenView`: render data handed to the presentation layer

mod controller;
mod state;
mod update;
mod view;

pub use controller::{ControllerSettings, ScreenController};
pub use state::{Effect, Message, ScreenPhase, ScreenState, Transition};
pub use update::Reducer;
pub use view::{
    MainView, NO_CAMERA_TEXT, OPEN_CAMERA_TEXT, PreviewView, REQUESTING_PERMISSION_TEXT,
    ScreenView,
};

// SPDX-License-Identifier: GPL-3.0-only

//! Capture screen controller
//!
//! Owns the current [`ScreenState`], runs the reducer for every message and
//! executes the effects it asks for. Asynchronous work (captures, the close
//! lockout timer) runs on tokio tasks that report back through a channel; the
//! presentation layer drains that channel with [`ScreenController::next_event`]
//! or [`ScreenController::drain_pending`], so one message is always applied to
//! completion before the next.

use crate::app::state::{Effect, Message, ScreenState};
use crate::app::update::Reducer;
use crate::backends::camera::{CameraCapability, Facing, PermissionStatus, SessionHandle};
use crate::config::Config;
use crate::constants::{EVENT_CHANNEL_CAPACITY, shutter_lockout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Controller tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Close-control lockout
    pub cooldown: Duration,
    /// Camera chosen once permission is granted
    pub preferred_facing: Facing,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            cooldown: shutter_lockout(),
            preferred_facing: Facing::Back,
        }
    }
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cooldown: config.shutter_cooldown(),
            preferred_facing: config.preferred_facing,
        }
    }
}

/// State machine behind the capture screen
///
/// Must be created inside a tokio runtime: effects are spawned onto it.
pub struct ScreenController<C: CameraCapability> {
    camera: Arc<C>,
    reducer: Reducer,
    cooldown: Duration,
    state: Arc<ScreenState>,
    events_tx: mpsc::Sender<Message>,
    events_rx: mpsc::Receiver<Message>,
    lockout_timer: Option<JoinHandle<()>>,
    torn_down: bool,
}

impl<C: CameraCapability> ScreenController<C> {
    pub fn new(camera: C, settings: ControllerSettings) -> Self {
        Self::with_shared(Arc::new(camera), settings)
    }

    /// Build around a capability the caller keeps a handle to
    pub fn with_shared(camera: Arc<C>, settings: ControllerSettings) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            camera,
            reducer: Reducer::new(settings.preferred_facing),
            cooldown: settings.cooldown,
            state: Arc::new(ScreenState::default()),
            events_tx,
            events_rx,
            lockout_timer: None,
            torn_down: false,
        }
    }

    /// Current state
    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Read-only snapshot that stays valid after further events
    pub fn snapshot(&self) -> Arc<ScreenState> {
        Arc::clone(&self.state)
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// Enumerate devices and resolve permission
    ///
    /// Prompts only when access is not already granted.
    pub async fn mount(&mut self) {
        info!("Mounting capture screen");
        let devices = self.camera.list_devices();
        self.apply(Message::DevicesListed(devices));

        let granted = match self.camera.query_permission() {
            PermissionStatus::Granted => true,
            status => {
                debug!(?status, "Requesting camera permission");
                self.camera.request_permission().await
            }
        };
        self.apply(Message::PermissionResult(granted));
    }

    /// Apply one user action and run its effect
    ///
    /// Only presentation messages are accepted here; anything else is
    /// dropped with a warning.
    pub fn dispatch(&mut self, message: Message) -> &ScreenState {
        if !message.from_presentation() {
            warn!(?message, "Ignoring internal message from the presentation layer");
            return &self.state;
        }
        self.apply(message)
    }

    fn apply(&mut self, message: Message) -> &ScreenState {
        if self.torn_down {
            debug!(?message, "Screen torn down, message dropped");
            return &self.state;
        }

        let transition = self.reducer.reduce(&self.state, message);
        self.state = Arc::new(transition.state);
        if let Some(effect) = transition.effect {
            self.run_effect(effect);
        }
        &self.state
    }

    /// Wait for the next async completion and apply it
    ///
    /// Returns the applied message, or `None` once torn down.
    pub async fn next_event(&mut self) -> Option<Message> {
        if self.torn_down {
            return None;
        }
        let message = self.events_rx.recv().await?;
        self.apply(message.clone());
        Some(message)
    }

    /// Apply every completion that is already queued
    pub fn drain_pending(&mut self) -> Vec<Message> {
        let mut applied = Vec::new();
        while !self.torn_down {
            let Ok(message) = self.events_rx.try_recv() else {
                break;
            };
            self.apply(message.clone());
            applied.push(message);
        }
        applied
    }

    /// Unmount: cancel the lockout timer and stop accepting messages
    ///
    /// In-flight captures keep running; their results are discarded.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        info!("Tearing down capture screen");
        self.cancel_lockout_timer();
        self.events_rx.close();
        self.torn_down = true;
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::StartLockoutTimer => self.start_lockout_timer(),
            Effect::StartCapture(session) => self.start_capture(session),
        }
    }

    fn start_lockout_timer(&mut self) {
        self.cancel_lockout_timer();
        let tx = self.events_tx.clone();
        let cooldown = self.cooldown;
        self.lockout_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;
            let _ = tx.send(Message::ShutterUnlocked).await;
        }));
    }

    fn cancel_lockout_timer(&mut self) {
        if let Some(timer) = self.lockout_timer.take() {
            timer.abort();
        }
    }

    fn start_capture(&mut self, session: SessionHandle) {
        let capture = self.camera.capture(session);
        let tx = self.events_tx.clone();
        // Known gap: a pending capture cannot be cancelled. Its result is
        // applied whenever it lands, even if the device changed meanwhile.
        tokio::spawn(async move {
            let result = capture.await;
            let _ = tx.send(Message::CaptureFinished(result)).await;
        });
    }
}

impl<C: CameraCapability> Drop for ScreenController<C> {
    fn drop(&mut self) {
        self.cancel_lockout_timer();
    }
}

// SPDX-License-Identifier: GPL-3.0-only

//! Scripted camera capability for integration tests
//!
//! Captures stay pending until the test resolves them, which makes the
//! ordering of late results fully controllable.

#![allow(dead_code)]

use camera_screen::backends::camera::{
    CameraCapability, DeviceHandle, DeviceSet, Facing, PermissionStatus, SessionHandle,
};
use camera_screen::errors::{PhotoError, PhotoResult};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

pub struct ScriptedCamera {
    pub permission: PermissionStatus,
    pub prompt_answer: bool,
    pub devices: DeviceSet,
    pending: Mutex<VecDeque<(SessionHandle, oneshot::Sender<PhotoResult<String>>)>>,
    prompts: Mutex<u32>,
}

impl ScriptedCamera {
    pub fn new(prompt_answer: bool, devices: DeviceSet) -> Self {
        Self {
            permission: PermissionStatus::Unknown,
            prompt_answer,
            devices,
            pending: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(0),
        }
    }

    pub fn front_and_back() -> Self {
        Self::new(true, DeviceSet::new(Some(front()), Some(back())))
    }

    pub fn back_only() -> Self {
        Self::new(true, DeviceSet::new(None, Some(back())))
    }

    pub fn denying() -> Self {
        Self::new(false, DeviceSet::new(Some(front()), Some(back())))
    }

    pub fn pending_captures(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn prompts(&self) -> u32 {
        *self.prompts.lock().unwrap()
    }

    /// Session of the oldest pending capture
    pub fn oldest_session(&self) -> Option<SessionHandle> {
        self.pending.lock().unwrap().front().map(|(s, _)| s.clone())
    }

    /// Resolve the oldest pending capture
    pub fn resolve_oldest(&self, result: PhotoResult<String>) {
        let (_, tx) = self
            .pending
            .lock()
            .unwrap()
            .pop_front()
            .expect("no pending capture");
        let _ = tx.send(result);
    }

    /// Resolve the newest pending capture
    pub fn resolve_newest(&self, result: PhotoResult<String>) {
        let (_, tx) = self
            .pending
            .lock()
            .unwrap()
            .pop_back()
            .expect("no pending capture");
        let _ = tx.send(result);
    }
}

impl CameraCapability for ScriptedCamera {
    fn query_permission(&self) -> PermissionStatus {
        self.permission
    }

    fn request_permission(&self) -> BoxFuture<'static, bool> {
        *self.prompts.lock().unwrap() += 1;
        let answer = self.prompt_answer;
        async move { answer }.boxed()
    }

    fn list_devices(&self) -> DeviceSet {
        self.devices.clone()
    }

    fn capture(&self, session: SessionHandle) -> BoxFuture<'static, PhotoResult<String>> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back((session, tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(PhotoError::CaptureFailed("capture dropped".into())))
        }
        .boxed()
    }
}

pub fn front() -> DeviceHandle {
    DeviceHandle::new("scripted:front", "Scripted Front", Facing::Front)
}

pub fn back() -> DeviceHandle {
    DeviceHandle::new("scripted:back", "Scripted Back", Facing::Back)
}

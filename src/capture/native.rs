//! OS camera backend built on nokhwa.
//!
//! nokhwa's `Camera` is not `Send`, so each open stream owns a dedicated
//! thread that holds the device. The session talks to it over a command
//! channel; stopping the stream (or dropping it) ends the thread, which
//! stops the device stream on its way out.

use super::camera::{classify_open_error, pick_device, CameraDevice, Facing, Frame, VideoStream};
use crate::error::CaptureError;
use async_trait::async_trait;
use nokhwa::pixel_format::RgbAFormat;
use nokhwa::utils::{ApiBackend, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use std::sync::mpsc;
use tokio::sync::oneshot;

enum Command {
    Grab(mpsc::Sender<Result<Frame, CaptureError>>),
    Stop,
}

/// Camera access through the platform's native capture API.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCamera;

#[async_trait]
impl CameraDevice for NativeCamera {
    async fn open(&self, facing: Facing) -> Result<Box<dyn VideoStream>, CaptureError> {
        let (ready_tx, ready_rx) = oneshot::channel();
        let (commands, command_rx) = mpsc::channel();

        std::thread::Builder::new()
            .name("camera".into())
            .spawn(move || run_device(facing, ready_tx, command_rx))
            .map_err(|e| CaptureError::Snapshot(format!("camera thread: {}", e)))?;

        let resolution = ready_rx
            .await
            .map_err(|_| CaptureError::Snapshot("camera thread exited before opening".into()))??;
        Ok(Box::new(NativeStream::new(commands, resolution)))
    }
}

/// Handle to a stream running on its device thread.
struct NativeStream {
    commands: Option<mpsc::Sender<Command>>,
    resolution: (u32, u32),
}

impl NativeStream {
    fn new(commands: mpsc::Sender<Command>, resolution: (u32, u32)) -> Self {
        Self {
            commands: Some(commands),
            resolution,
        }
    }
}

impl VideoStream for NativeStream {
    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn grab_frame(&mut self) -> Result<Frame, CaptureError> {
        let commands = self
            .commands
            .as_ref()
            .ok_or_else(|| CaptureError::Snapshot("camera stream is stopped".into()))?;
        let (reply_tx, reply_rx) = mpsc::channel();
        commands
            .send(Command::Grab(reply_tx))
            .map_err(|_| CaptureError::Snapshot("camera thread is gone".into()))?;
        reply_rx
            .recv()
            .map_err(|_| CaptureError::Snapshot("camera thread is gone".into()))?
    }

    fn stop(&mut self) {
        if let Some(commands) = self.commands.take() {
            let _ = commands.send(Command::Stop);
        }
    }
}

impl Drop for NativeStream {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_device(
    facing: Facing,
    ready: oneshot::Sender<Result<(u32, u32), CaptureError>>,
    commands: mpsc::Receiver<Command>,
) {
    let mut camera = match open_device(facing) {
        Ok(camera) => camera,
        Err(e) => {
            log::warn!("[CAMERA] Open failed: {}", e);
            let _ = ready.send(Err(e));
            return;
        }
    };
    let res = camera.resolution();
    let resolution = (res.width(), res.height());
    if ready.send(Ok(resolution)).is_err() {
        // Opener went away before the stream was handed over.
        let _ = camera.stop_stream();
        return;
    }

    while let Ok(Command::Grab(reply)) = commands.recv() {
        let _ = reply.send(grab(&mut camera));
    }

    match camera.stop_stream() {
        Ok(()) => log::info!("[CAMERA] Device stream stopped"),
        Err(e) => log::warn!("[CAMERA] Stopping device stream failed: {}", e),
    }
}

fn open_device(facing: Facing) -> Result<Camera, CaptureError> {
    let devices = nokhwa::query(ApiBackend::Auto).map_err(|e| {
        log::warn!("[CAMERA] Device query failed: {}", e);
        CaptureError::CameraUnsupported
    })?;
    if devices.is_empty() {
        return Err(CaptureError::CameraUnsupported);
    }

    let names: Vec<String> = devices.iter().map(|d| d.human_name()).collect();
    let chosen = &devices[pick_device(&names, facing)];
    log::info!("[CAMERA] Opening {:?} camera: {}", facing, chosen.human_name());

    let format = RequestedFormat::new::<RgbAFormat>(RequestedFormatType::AbsoluteHighestResolution);
    let mut camera = Camera::new(chosen.index().clone(), format)
        .map_err(|e| classify_open_error(&e.to_string()))?;
    camera
        .open_stream()
        .map_err(|e| classify_open_error(&e.to_string()))?;
    Ok(camera)
}

fn grab(camera: &mut Camera) -> Result<Frame, CaptureError> {
    let buffer = camera
        .frame()
        .map_err(|e| CaptureError::Snapshot(e.to_string()))?;
    let decoded = buffer
        .decode_image::<RgbAFormat>()
        .map_err(|e| CaptureError::Snapshot(e.to_string()))?;
    Ok(Frame {
        width: decoded.width(),
        height: decoded.height(),
        rgba: decoded.into_raw(),
    })
}

//! Session state machine — which screen is visible and what it holds.
//!
//! `Session` is an explicit state container owned by one controller; there
//! is no ambient global state, so independent sessions (tabs, tests) never
//! interfere. All transitions are caller-triggered.
//!
//! Async operations (file read, camera open, extraction) run outside the
//! session. Starting one issues a `Ticket`; every later transition bumps
//! the generation counter, and a result presented with an outdated ticket
//! is discarded deterministically. A stale camera stream is stopped on
//! arrival.

mod processing;

pub use processing::{ProcessingTicker, PROCESSING_MESSAGES, PROCESSING_ROTATE_INTERVAL, SCAN_TIPS};

use crate::capture::{CameraPermission, ImagePayload, LiveStream, VideoStream, MAX_IMAGE_BYTES};
use crate::error::{CaptureError, ExtractionError, SessionError};
use crate::llm::types::ExtractionOutput;
use crate::notice::Notice;
use crate::prescription::{MedicineEdit, MedicineId, PrescriptionRecord};
use serde::Serialize;

/// The six screens of the flow. Initial: `Upload`. No terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    Upload,
    Preview,
    CameraCapture,
    Processing,
    Results,
    Error,
}

/// Kind of async operation a ticket was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FileRead,
    CameraOpen,
    Extraction,
}

/// Generation token for one in-flight async operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    op: Operation,
    generation: u64,
}

impl Ticket {
    pub fn operation(&self) -> Operation {
        self.op
    }
}

/// Whether an async result was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// An extraction the caller must now run against `image`.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    pub ticket: Ticket,
    pub image: ImagePayload,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub max_image_bytes: u64,
    pub jpeg_quality: u8,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_image_bytes: MAX_IMAGE_BYTES,
            jpeg_quality: 92,
        }
    }
}

/// Camera screen state. Exists only while on `CameraCapture`.
#[derive(Debug)]
struct CameraState {
    permission: CameraPermission,
    initializing: bool,
    stream: Option<LiveStream>,
}

#[derive(Debug)]
pub struct Session {
    options: SessionOptions,
    screen: Screen,
    image: Option<ImagePayload>,
    record: Option<PrescriptionRecord>,
    error: Option<String>,
    in_flight: bool,
    camera: Option<CameraState>,
    generation: u64,
    notices: Vec<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            screen: Screen::Upload,
            image: None,
            record: None,
            error: None,
            in_flight: false,
            camera: None,
            generation: 0,
            notices: Vec::new(),
        }
    }

    // ── Read access ──────────────────────────────────────────────────

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    pub fn record(&self) -> Option<&PrescriptionRecord> {
        self.record.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Message for the error screen.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("An unexpected error occurred.")
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn camera_permission(&self) -> Option<CameraPermission> {
        self.camera.as_ref().map(|c| c.permission)
    }

    pub fn camera_initializing(&self) -> bool {
        self.camera.as_ref().is_some_and(|c| c.initializing)
    }

    /// True while a camera stream is held.
    pub fn camera_live(&self) -> bool {
        self.camera
            .as_ref()
            .and_then(|c| c.stream.as_ref())
            .is_some_and(LiveStream::is_live)
    }

    /// The capture button is enabled only with a granted, attached stream.
    pub fn can_capture(&self) -> bool {
        self.camera.as_ref().is_some_and(|c| {
            c.permission == CameraPermission::Granted && !c.initializing && c.stream.is_some()
        })
    }

    /// "Try Analyzing Current Image Again" is offered only with an image.
    pub fn can_retry_same_image(&self) -> bool {
        self.screen == Screen::Error && self.image.is_some()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn push_notice(&mut self, notice: Notice) {
        log::debug!("[SESSION] Notice: {}", notice);
        self.notices.push(notice);
    }

    // ── Upload: file path ────────────────────────────────────────────

    /// Start reading a selected file (after the size pre-flight passed).
    pub fn begin_file_read(&mut self) -> Result<Ticket, SessionError> {
        self.require(Screen::Upload, "select file")?;
        Ok(self.issue(Operation::FileRead))
    }

    /// A file was rejected before any read started (e.g. too large).
    pub fn reject_file(&mut self, err: CaptureError) -> Result<(), SessionError> {
        self.require(Screen::Upload, "select file")?;
        self.apply_file_error(err);
        Ok(())
    }

    pub fn finish_file_read(
        &mut self,
        ticket: Ticket,
        result: Result<ImagePayload, CaptureError>,
    ) -> Completion {
        if !self.is_current(ticket, Operation::FileRead) || self.screen != Screen::Upload {
            log::info!("[SESSION] Discarding stale file read");
            return Completion::Stale;
        }
        match result {
            Ok(image) => self.enter_preview(image),
            Err(err) => self.apply_file_error(err),
        }
        Completion::Applied
    }

    fn apply_file_error(&mut self, err: CaptureError) {
        match err {
            CaptureError::TooLarge { limit, .. } => {
                self.push_notice(Notice::warning(
                    "File too large",
                    format!(
                        "Please select an image smaller than {}MB.",
                        limit / (1024 * 1024)
                    ),
                ));
            }
            CaptureError::UnsupportedFormat => {
                self.push_notice(Notice::warning(
                    "Unsupported file",
                    "Please select an image file (JPEG, PNG, WebP, HEIC).",
                ));
            }
            other => {
                log::warn!("[SESSION] File read failed: {:?}", other);
                self.fail(CaptureError::Unreadable(String::new()).to_string());
            }
        }
    }

    // ── Camera ───────────────────────────────────────────────────────

    /// Enter the camera screen and begin permission negotiation.
    pub fn open_camera(&mut self) -> Result<Ticket, SessionError> {
        self.require(Screen::Upload, "open camera")?;
        self.screen = Screen::CameraCapture;
        self.camera = Some(CameraState {
            permission: CameraPermission::Pending,
            initializing: true,
            stream: None,
        });
        Ok(self.issue(Operation::CameraOpen))
    }

    pub fn finish_camera_open(
        &mut self,
        ticket: Ticket,
        result: Result<Box<dyn VideoStream>, CaptureError>,
    ) -> Completion {
        if !self.is_current(ticket, Operation::CameraOpen) || self.screen != Screen::CameraCapture
        {
            if let Ok(stream) = result {
                // Nobody is on the camera screen any more.
                LiveStream::new(stream).release();
            }
            log::info!("[SESSION] Discarding stale camera open");
            return Completion::Stale;
        }

        match result {
            Ok(stream) => {
                if let Some(camera) = self.camera.as_mut() {
                    camera.permission = CameraPermission::Granted;
                    camera.initializing = false;
                    camera.stream = Some(LiveStream::new(stream));
                }
            }
            Err(CaptureError::CameraUnsupported) => {
                self.push_notice(Notice::error(
                    "Camera Not Supported",
                    "This device does not support camera access.",
                ));
                self.leave_camera();
                self.screen = Screen::Upload;
            }
            Err(err) => {
                log::warn!("[CAMERA] Access failed: {}", err);
                if let Some(camera) = self.camera.as_mut() {
                    camera.permission = CameraPermission::Denied;
                    camera.initializing = false;
                }
                self.push_notice(Notice::error(
                    "Camera Access Denied",
                    "Please enable camera permissions in your settings to use this feature.",
                ));
            }
        }
        Completion::Applied
    }

    /// Snapshot the current frame, release the camera, go to preview.
    ///
    /// A snapshot failure releases the camera and routes to the error screen.
    pub fn capture_photo(&mut self) -> Result<(), SessionError> {
        self.require(Screen::CameraCapture, "capture photo")?;
        if !self.can_capture() {
            return Err(SessionError::InvalidTransition {
                screen: self.screen,
                event: "capture photo",
            });
        }

        let quality = self.options.jpeg_quality;
        let snapshot = match self.camera.as_mut().and_then(|c| c.stream.as_mut()) {
            Some(stream) => stream.snapshot(quality),
            None => Err(CaptureError::Snapshot("camera stream is not active".into())),
        };
        self.leave_camera();

        match snapshot {
            Ok(image) => self.enter_preview(image),
            Err(err) => {
                log::warn!("[CAMERA] Snapshot failed: {}", err);
                self.fail(err.to_string());
            }
        }
        Ok(())
    }

    /// Cancel the camera screen: release the camera, back to upload.
    pub fn close_camera(&mut self) -> Result<(), SessionError> {
        self.require(Screen::CameraCapture, "cancel camera")?;
        self.leave_camera();
        self.screen = Screen::Upload;
        self.invalidate();
        Ok(())
    }

    fn leave_camera(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Some(stream) = camera.stream.as_mut() {
                stream.release();
            }
        }
    }

    // ── Preview / processing ─────────────────────────────────────────

    /// Start extraction on the held image ("Analyze" or "retry same image").
    pub fn begin_analysis(&mut self) -> Result<PendingAnalysis, SessionError> {
        if !matches!(self.screen, Screen::Preview | Screen::Error) {
            return Err(SessionError::InvalidTransition {
                screen: self.screen,
                event: "analyze",
            });
        }
        let Some(image) = self.image.clone() else {
            self.fail(SessionError::NoImage.to_string());
            return Err(SessionError::NoImage);
        };

        self.screen = Screen::Processing;
        self.error = None;
        self.in_flight = true;
        let ticket = self.issue(Operation::Extraction);
        log::info!("[SESSION] Analysis started ({} bytes)", image.len());
        Ok(PendingAnalysis { ticket, image })
    }

    pub fn finish_analysis(
        &mut self,
        ticket: Ticket,
        result: Result<ExtractionOutput, ExtractionError>,
    ) -> Completion {
        if !self.is_current(ticket, Operation::Extraction) || self.screen != Screen::Processing {
            log::info!("[SESSION] Discarding stale extraction result");
            return Completion::Stale;
        }
        self.in_flight = false;
        match result {
            Ok(output) => {
                let record = PrescriptionRecord::from_extraction(output);
                log::info!("[SESSION] Results: {} medicines", record.medicines().len());
                self.record = Some(record);
                self.screen = Screen::Results;
                self.invalidate();
            }
            Err(err) => {
                log::error!("[SESSION] Analysis failed: {}", err.message());
                self.fail(err.user_message().to_string());
            }
        }
        Completion::Applied
    }

    /// "Retake or Choose Different" on the preview screen.
    pub fn retake(&mut self) -> Result<(), SessionError> {
        self.require(Screen::Preview, "retake")?;
        self.reset();
        Ok(())
    }

    // ── Results / error ──────────────────────────────────────────────

    pub fn scan_another(&mut self) -> Result<(), SessionError> {
        self.require(Screen::Results, "scan another")?;
        self.reset();
        Ok(())
    }

    pub fn retry_with_new_image(&mut self) -> Result<(), SessionError> {
        self.require(Screen::Error, "retry with new image")?;
        self.reset();
        Ok(())
    }

    /// Re-invoke extraction on the image still held after a failure.
    pub fn retry_same_image(&mut self) -> Result<PendingAnalysis, SessionError> {
        self.require(Screen::Error, "retry same image")?;
        if self.image.is_none() {
            return Err(SessionError::NoImage);
        }
        self.begin_analysis()
    }

    /// Replace one medicine with its edited version. Results screen only.
    pub fn edit_medicine(&mut self, id: MedicineId, edit: MedicineEdit) -> Result<(), SessionError> {
        self.require(Screen::Results, "edit medicine")?;
        let record = self.record.as_ref().ok_or(SessionError::NoRecord)?;
        let updated = record.with_edit(id, edit)?;
        let name = updated
            .medicine(id)
            .map(|m| m.display_name().to_string())
            .unwrap_or_default();
        self.record = Some(updated);
        self.push_notice(Notice::info("Success", Some(format!("{} updated.", name))));
        Ok(())
    }

    /// Navigate away from wherever the user is and start fresh.
    ///
    /// Releases the camera and invalidates any in-flight operation.
    pub fn start_over(&mut self) {
        self.reset();
    }

    // ── Internals ────────────────────────────────────────────────────

    fn enter_preview(&mut self, image: ImagePayload) {
        log::info!("[SESSION] Preview: {} ({} bytes)", image.media_type(), image.len());
        self.image = Some(image);
        self.record = None;
        self.error = None;
        self.screen = Screen::Preview;
        self.invalidate();
    }

    fn fail(&mut self, message: String) {
        self.leave_camera();
        self.error = Some(message);
        self.in_flight = false;
        self.screen = Screen::Error;
        self.invalidate();
    }

    fn reset(&mut self) {
        self.leave_camera();
        self.image = None;
        self.record = None;
        self.error = None;
        self.in_flight = false;
        self.screen = Screen::Upload;
        self.invalidate();
        log::info!("[SESSION] Reset to upload");
    }

    fn require(&self, screen: Screen, event: &'static str) -> Result<(), SessionError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                screen: self.screen,
                event,
            })
        }
    }

    fn issue(&mut self, op: Operation) -> Ticket {
        self.generation += 1;
        Ticket {
            op,
            generation: self.generation,
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    fn is_current(&self, ticket: Ticket, op: Operation) -> bool {
        ticket.op == op && ticket.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Frame;
    use crate::llm::types::ExtractedMedicine;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn jpeg() -> ImagePayload {
        ImagePayload::new("image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    fn output(names: &[&str]) -> ExtractionOutput {
        ExtractionOutput {
            medicines: names
                .iter()
                .map(|n| ExtractedMedicine {
                    medicine_name: n.to_string(),
                    dosage: "1".into(),
                    frequency: "daily".into(),
                    duration: None,
                    route_of_administration: None,
                    instructions: None,
                })
                .collect(),
            doctor_name: None,
            clinic_information: None,
            patient_name: None,
            date_of_prescription: None,
        }
    }

    struct FakeStream(Arc<AtomicUsize>);

    impl VideoStream for FakeStream {
        fn resolution(&self) -> (u32, u32) {
            (2, 2)
        }
        fn grab_frame(&mut self) -> Result<Frame, CaptureError> {
            Ok(Frame {
                width: 2,
                height: 2,
                rgba: vec![255; 16],
            })
        }
        fn stop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn in_preview() -> Session {
        let mut s = Session::default();
        let t = s.begin_file_read().unwrap();
        assert_eq!(s.finish_file_read(t, Ok(jpeg())), Completion::Applied);
        s
    }

    #[test]
    fn starts_on_upload_with_nothing_held() {
        let s = Session::default();
        assert_eq!(s.screen(), Screen::Upload);
        assert!(s.image().is_none() && s.record().is_none() && s.error().is_none());
        assert!(!s.is_in_flight());
    }

    #[test]
    fn file_read_moves_to_preview() {
        let s = in_preview();
        assert_eq!(s.screen(), Screen::Preview);
        assert_eq!(s.image(), Some(&jpeg()));
    }

    #[test]
    fn too_large_file_warns_and_stays() {
        let mut s = Session::default();
        s.reject_file(CaptureError::TooLarge {
            size: 5 * 1024 * 1024,
            limit: MAX_IMAGE_BYTES,
        })
        .unwrap();
        assert_eq!(s.screen(), Screen::Upload);
        let notices = s.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "File too large");
        assert_eq!(
            notices[0].description.as_deref(),
            Some("Please select an image smaller than 4MB.")
        );
    }

    #[test]
    fn unreadable_file_goes_to_error_screen() {
        let mut s = Session::default();
        let t = s.begin_file_read().unwrap();
        s.finish_file_read(t, Err(CaptureError::Unreadable("EIO".into())));
        assert_eq!(s.screen(), Screen::Error);
        assert_eq!(s.error(), Some("Failed to read the image file."));
        assert!(!s.can_retry_same_image());
    }

    #[test]
    fn analysis_success_assigns_ids_and_shows_results() {
        let mut s = in_preview();
        let pending = s.begin_analysis().unwrap();
        assert_eq!(s.screen(), Screen::Processing);
        assert!(s.is_in_flight());
        assert_eq!(pending.image, jpeg());

        s.finish_analysis(pending.ticket, Ok(output(&["A", "B"])));
        assert_eq!(s.screen(), Screen::Results);
        assert!(!s.is_in_flight());
        let record = s.record().unwrap();
        assert_eq!(record.medicines().len(), 2);
        assert_ne!(record.medicines()[0].id(), record.medicines()[1].id());
    }

    #[test]
    fn analysis_failure_keeps_image_for_retry() {
        let mut s = in_preview();
        let pending = s.begin_analysis().unwrap();
        s.finish_analysis(pending.ticket, Err(ExtractionError::new("")));
        assert_eq!(s.screen(), Screen::Error);
        assert_eq!(s.error(), Some(crate::error::GENERIC_EXTRACTION_FAILURE));
        assert!(s.can_retry_same_image());

        let again = s.retry_same_image().unwrap();
        assert_eq!(s.screen(), Screen::Processing);
        assert!(s.error().is_none());
        assert_eq!(again.image, jpeg());
    }

    #[test]
    fn stale_extraction_result_is_discarded_after_navigating_away() {
        let mut s = in_preview();
        let pending = s.begin_analysis().unwrap();
        s.start_over();
        assert_eq!(
            s.finish_analysis(pending.ticket, Ok(output(&["A"]))),
            Completion::Stale
        );
        assert_eq!(s.screen(), Screen::Upload);
        assert!(s.record().is_none());
    }

    #[test]
    fn superseded_extraction_ticket_is_discarded() {
        let mut s = in_preview();
        let first = s.begin_analysis().unwrap();
        s.finish_analysis(first.ticket, Err(ExtractionError::new("boom")));
        let second = s.retry_same_image().unwrap();
        assert_eq!(
            s.finish_analysis(first.ticket, Ok(output(&["late"]))),
            Completion::Stale
        );
        assert_eq!(
            s.finish_analysis(second.ticket, Ok(output(&["fresh"]))),
            Completion::Applied
        );
        assert_eq!(s.record().unwrap().medicines()[0].name(), "fresh");
    }

    #[test]
    fn ticket_for_another_operation_is_rejected() {
        let mut s = Session::default();
        let file_ticket = s.begin_file_read().unwrap();
        assert_eq!(
            s.finish_analysis(file_ticket, Ok(output(&[]))),
            Completion::Stale
        );
    }

    #[test]
    fn retake_and_scan_another_clear_everything() {
        let mut s = in_preview();
        s.retake().unwrap();
        assert_eq!(s.screen(), Screen::Upload);
        assert!(s.image().is_none());

        let mut s = in_preview();
        let p = s.begin_analysis().unwrap();
        s.finish_analysis(p.ticket, Ok(output(&["A"])));
        s.scan_another().unwrap();
        assert_eq!(s.screen(), Screen::Upload);
        assert!(s.image().is_none() && s.record().is_none() && s.error().is_none());
    }

    #[test]
    fn invalid_events_are_rejected_without_state_change() {
        let mut s = Session::default();
        assert!(matches!(
            s.begin_analysis(),
            Err(SessionError::InvalidTransition { screen: Screen::Upload, .. })
        ));
        assert!(s.scan_another().is_err());
        assert!(s.capture_photo().is_err());
        assert_eq!(s.screen(), Screen::Upload);
    }

    #[test]
    fn edit_only_on_results() {
        let mut s = in_preview();
        let p = s.begin_analysis().unwrap();
        s.finish_analysis(p.ticket, Ok(output(&["A", "B"])));
        let id = s.record().unwrap().medicines()[1].id();

        let mut edit = MedicineEdit::default();
        edit.set("dosage", "2");
        s.edit_medicine(id, edit.clone()).unwrap();
        assert_eq!(s.screen(), Screen::Results);
        assert_eq!(s.record().unwrap().medicines()[1].details().dosage, "2");
        assert_eq!(s.take_notices()[0].description.as_deref(), Some("B updated."));

        s.scan_another().unwrap();
        assert!(s.edit_medicine(id, edit).is_err());
    }

    #[test]
    fn camera_capture_releases_stream_and_previews() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut s = Session::default();
        let t = s.open_camera().unwrap();
        assert!(s.camera_initializing());
        assert!(!s.can_capture());

        s.finish_camera_open(t, Ok(Box::new(FakeStream(stops.clone()))));
        assert!(s.can_capture());
        assert!(s.camera_live());

        s.capture_photo().unwrap();
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(s.screen(), Screen::Preview);
        assert_eq!(s.image().unwrap().media_type(), "image/jpeg");
        assert!(!s.camera_live());
    }

    #[test]
    fn camera_cancel_releases_stream() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut s = Session::default();
        let t = s.open_camera().unwrap();
        s.finish_camera_open(t, Ok(Box::new(FakeStream(stops.clone()))));
        s.close_camera().unwrap();
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(s.screen(), Screen::Upload);
        assert_eq!(s.camera_permission(), None);
    }

    #[test]
    fn stream_arriving_after_cancel_is_stopped_immediately() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut s = Session::default();
        let t = s.open_camera().unwrap();
        s.close_camera().unwrap();
        let done = s.finish_camera_open(t, Ok(Box::new(FakeStream(stops.clone()))));
        assert_eq!(done, Completion::Stale);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(s.screen(), Screen::Upload);
    }

    #[test]
    fn start_over_from_camera_releases_stream() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut s = Session::default();
        let t = s.open_camera().unwrap();
        s.finish_camera_open(t, Ok(Box::new(FakeStream(stops.clone()))));
        s.start_over();
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_the_session_releases_the_camera() {
        let stops = Arc::new(AtomicUsize::new(0));
        let mut s = Session::default();
        let t = s.open_camera().unwrap();
        s.finish_camera_open(t, Ok(Box::new(FakeStream(stops.clone()))));
        drop(s);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn camera_denied_disables_capture() {
        let mut s = Session::default();
        let t = s.open_camera().unwrap();
        s.finish_camera_open(t, Err(CaptureError::PermissionDenied));
        assert_eq!(s.screen(), Screen::CameraCapture);
        assert_eq!(s.camera_permission(), Some(CameraPermission::Denied));
        assert!(!s.can_capture());
        assert!(s.capture_photo().is_err());
        s.close_camera().unwrap();
        assert_eq!(s.screen(), Screen::Upload);
    }

    #[test]
    fn camera_unsupported_returns_to_upload() {
        let mut s = Session::default();
        let t = s.open_camera().unwrap();
        s.finish_camera_open(t, Err(CaptureError::CameraUnsupported));
        assert_eq!(s.screen(), Screen::Upload);
        assert_eq!(s.take_notices()[0].title, "Camera Not Supported");
    }
}

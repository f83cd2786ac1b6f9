//! Session controller: wires the session state machine to its devices.
//!
//! Multi-step operations:
//! - select_file: size pre-flight → async read → preview
//! - open_camera: permission + stream open → live camera screen
//! - analyze / retry_same_image: extraction call → results or error
//!
//! The controller owns the only `Session`. The lock is never held across
//! an await: each operation takes a ticket, drops the lock, runs the slow
//! part, then presents the result with its ticket. Whatever the user did in
//! the meantime wins; outdated results are dropped by the session.

use crate::capture::{check_file_size, read_image_file, CameraDevice, Facing};
use crate::error::SessionError;
use crate::export::{self, ClipboardSink, ShareSheet};
use crate::llm::{extract_prescription_data, ExtractionInput, Extractor};
use crate::notice::Notice;
use crate::prescription::{MedicineEdit, MedicineId};
use crate::session::{Completion, PendingAnalysis, Session, SessionOptions};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub struct SessionController {
    session: Arc<Mutex<Session>>,
    extractor: Arc<dyn Extractor>,
    camera: Arc<dyn CameraDevice>,
    clipboard: Arc<dyn ClipboardSink>,
    share: Arc<dyn ShareSheet>,
}

impl SessionController {
    pub fn new(
        options: SessionOptions,
        extractor: Arc<dyn Extractor>,
        camera: Arc<dyn CameraDevice>,
        clipboard: Arc<dyn ClipboardSink>,
        share: Arc<dyn ShareSheet>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new(options))),
            extractor,
            camera,
            clipboard,
            share,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the session under the lock.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.lock())
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        self.lock().take_notices()
    }

    // ── Capture ──────────────────────────────────────────────────────

    /// Select an image file from the upload screen.
    pub async fn select_file(&self, path: &Path) -> Result<Completion, SessionError> {
        let limit = self.lock().options().max_image_bytes;
        log::info!("[CAPTURE] File selected: {}", path.display());

        if let Err(err) = check_file_size(path, limit).await {
            log::warn!("[CAPTURE] Rejected {}: {}", path.display(), err);
            self.lock().reject_file(err)?;
            return Ok(Completion::Applied);
        }

        let ticket = self.lock().begin_file_read()?;
        let start = std::time::Instant::now();
        let result = read_image_file(path, limit).await;
        log::info!("[CAPTURE] File read: {}ms", start.elapsed().as_millis());
        Ok(self.lock().finish_file_read(ticket, result))
    }

    /// Enter the camera screen and negotiate the rear camera.
    pub async fn open_camera(&self) -> Result<Completion, SessionError> {
        let ticket = self.lock().open_camera()?;
        log::info!("[CAMERA] Requesting camera access");
        let result = self.camera.open(Facing::Environment).await;
        Ok(self.lock().finish_camera_open(ticket, result))
    }

    pub fn capture_photo(&self) -> Result<(), SessionError> {
        self.lock().capture_photo()
    }

    pub fn close_camera(&self) -> Result<(), SessionError> {
        self.lock().close_camera()
    }

    // ── Extraction ───────────────────────────────────────────────────

    /// Run extraction on the previewed image.
    pub async fn analyze(&self) -> Result<Completion, SessionError> {
        let pending = self.lock().begin_analysis()?;
        Ok(self.run_extraction(pending).await)
    }

    /// Re-run extraction on the image kept after a failure.
    pub async fn retry_same_image(&self) -> Result<Completion, SessionError> {
        let pending = self.lock().retry_same_image()?;
        Ok(self.run_extraction(pending).await)
    }

    async fn run_extraction(&self, pending: PendingAnalysis) -> Completion {
        let start = std::time::Instant::now();
        log::info!("[LLM] Extracting with {}", self.extractor.name());
        let input = ExtractionInput::new(&pending.image);
        let result = extract_prescription_data(self.extractor.as_ref(), &input).await;
        log::info!("[LLM] Extraction finished in {}ms", start.elapsed().as_millis());
        self.lock().finish_analysis(pending.ticket, result)
    }

    // ── Navigation ───────────────────────────────────────────────────

    pub fn retake(&self) -> Result<(), SessionError> {
        self.lock().retake()
    }

    pub fn scan_another(&self) -> Result<(), SessionError> {
        self.lock().scan_another()
    }

    pub fn retry_with_new_image(&self) -> Result<(), SessionError> {
        self.lock().retry_with_new_image()
    }

    pub fn start_over(&self) {
        self.lock().start_over();
    }

    // ── Results ──────────────────────────────────────────────────────

    pub fn edit_medicine(&self, id: MedicineId, edit: MedicineEdit) -> Result<(), SessionError> {
        self.lock().edit_medicine(id, edit)
    }

    /// "Copy All" on the results screen.
    pub fn copy_summary(&self) -> Result<(), SessionError> {
        let mut session = self.lock();
        let record = session.record().ok_or(SessionError::NoRecord)?;
        let notice = export::copy_summary(record, self.clipboard.as_ref());
        session.push_notice(notice);
        Ok(())
    }

    /// "Share" on the results screen, with clipboard fallback.
    pub async fn share_summary(&self) -> Result<(), SessionError> {
        let record = self.lock().record().cloned().ok_or(SessionError::NoRecord)?;
        let notice = export::share_summary(&record, self.share.as_ref(), self.clipboard.as_ref()).await;
        self.lock().push_notice(notice);
        Ok(())
    }
}

use std::path::Path;
use std::time::Instant;

use tracing::{debug, warn};

use crate::core::caption_client::{CaptionClient, CaptionJob};
use crate::core::constants::{COPIED_STATUS, COPY_FAILED_STATUS, STATUS_TTL};
use crate::core::error::{CaptionError, ClipboardError};
use crate::core::image::ImageFile;
use crate::core::session::{CaptionSession, RequestState};
use crate::core::status::TransientStatus;
use crate::utils::clipboard::Clipboard;

/// What `generate_caption` decided to do.
#[derive(Debug, Clone)]
pub enum Submission {
    /// A request was started; run the job and hand the outcome back.
    Started(CaptionJob),
    /// A request is already on the wire; nothing was issued.
    AlreadyInFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    NothingToCopy,
    Copied,
    Failed,
}

/// Mediates user actions against a [`CaptionSession`].
pub struct CaptionController<'a> {
    session: &'a mut CaptionSession,
}

impl<'a> CaptionController<'a> {
    pub fn new(session: &'a mut CaptionSession) -> Self {
        Self { session }
    }

    /// Replace the selected image.
    ///
    /// On rejection only the error line changes; any earlier selection and
    /// caption are kept as they were.
    pub fn select_image(&mut self, file: ImageFile) -> Result<(), CaptionError> {
        let name = file.name.clone();
        let selected = match file.into_selected() {
            Ok(selected) => selected,
            Err(err) => {
                debug!(file = %name, kind = err.kind(), "image rejected");
                self.session.error = Some(err.user_message());
                return Err(err);
            }
        };

        if let Some(previous) = self.session.image.as_ref() {
            debug!(previous = %previous.name, "releasing superseded image");
        }
        if let Some(request_id) = self.session.in_flight {
            debug!(request_id, "selection changed while a request is in flight");
        }

        debug!(file = %selected.name, bytes = selected.size(), "image selected");
        self.session.image = Some(selected);
        self.session.caption = None;
        self.session.error = None;
        self.session.status = None;
        self.session.state = RequestState::AwaitingSelection;
        Ok(())
    }

    /// Describe the file at `path` and select it.
    ///
    /// A path that cannot be opened is reported like any other rejected
    /// selection.
    pub fn select_path(&mut self, path: &Path) -> Result<(), CaptionError> {
        match ImageFile::from_path(path) {
            Ok(file) => self.select_image(file),
            Err(err) => {
                let err =
                    CaptionError::Validation(format!("Could not open {}: {err}", path.display()));
                self.session.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Begin a caption request for the selected image.
    ///
    /// Returns [`Submission::AlreadyInFlight`] without touching state while a
    /// request is outstanding; requests are never queued.
    pub fn generate_caption(&mut self) -> Result<Submission, CaptionError> {
        let Some(image) = self.session.image.as_ref() else {
            let err = CaptionError::Precondition;
            self.session.error = Some(err.user_message());
            return Err(err);
        };

        if let Some(request_id) = self.session.in_flight {
            debug!(request_id, "caption request already in flight; ignoring");
            return Ok(Submission::AlreadyInFlight);
        }

        let request_id = self.session.last_request_id + 1;
        let job = CaptionJob::new(request_id, image);
        self.session.last_request_id = request_id;

        self.session.in_flight = Some(request_id);
        self.session.state = RequestState::Submitting;
        self.session.caption = None;
        self.session.error = None;
        self.session.status = None;
        debug!(request_id, "state -> Submitting");

        Ok(Submission::Started(job))
    }

    /// Apply the outcome of request `request_id`.
    ///
    /// Returns `false` when the outcome was discarded: either the id is not
    /// the one in flight, or a new image was selected while it ran.
    pub fn complete_caption(
        &mut self,
        request_id: u64,
        outcome: Result<String, CaptionError>,
    ) -> bool {
        if self.session.in_flight != Some(request_id) {
            debug!(request_id, "ignoring outcome for unknown request");
            return false;
        }
        self.session.in_flight = None;

        if !self.session.state.is_submitting() {
            debug!(request_id, "discarding outcome for a superseded selection");
            return false;
        }

        match outcome {
            Ok(caption) => {
                debug!(request_id, "state -> Succeeded");
                self.session.caption = Some(caption);
                self.session.state = RequestState::Succeeded;
            }
            Err(err) => {
                warn!(request_id, kind = err.kind(), error = %err, "caption request failed");
                self.session.error = Some(err.user_message());
                self.session.caption = None;
                self.session.state = RequestState::Failed(err);
            }
        }
        true
    }

    /// Start, run, and complete one request against `client`.
    ///
    /// `Ok(None)` means another request was already in flight.
    pub async fn run_caption(
        &mut self,
        client: &CaptionClient,
    ) -> Result<Option<String>, CaptionError> {
        let job = match self.generate_caption()? {
            Submission::Started(job) => job,
            Submission::AlreadyInFlight => return Ok(None),
        };

        let outcome = client.caption(&job).await;
        self.complete_caption(job.request_id, outcome.clone());
        outcome.map(Some)
    }

    /// Put the caption on the clipboard and set a transient status.
    ///
    /// With no caption this does nothing. Neither outcome touches the
    /// request state or the caption.
    pub fn copy_result(&mut self, clipboard: &dyn Clipboard, now: Instant) -> CopyOutcome {
        let Some(caption) = self.session.caption.as_deref() else {
            return CopyOutcome::NothingToCopy;
        };

        let result = clipboard.copy(caption);
        self.record_copy(result, now)
    }

    /// Set the transient status for a clipboard write that ran elsewhere.
    pub fn record_copy(&mut self, result: Result<(), ClipboardError>, now: Instant) -> CopyOutcome {
        let (outcome, text) = match result {
            Ok(()) => (CopyOutcome::Copied, COPIED_STATUS),
            Err(err) => {
                warn!(error = %err, "clipboard write failed");
                (CopyOutcome::Failed, COPY_FAILED_STATUS)
            }
        };
        self.session.status = Some(TransientStatus::new(text, now, STATUS_TTL));
        outcome
    }
}

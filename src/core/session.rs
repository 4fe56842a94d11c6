use std::time::Instant;

use crate::core::error::CaptionError;
use crate::core::image::SelectedImage;
use crate::core::status::TransientStatus;

/// Where the current caption attempt stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    AwaitingSelection,
    Submitting,
    Succeeded,
    Failed(CaptionError),
}

impl RequestState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, RequestState::Submitting)
    }

    pub fn failure(&self) -> Option<&CaptionError> {
        match self {
            RequestState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// State of the single active caption session.
///
/// There is at most one selected image and one caption at a time; a new
/// selection replaces both. The controller is the only writer.
#[derive(Debug, Default)]
pub struct CaptionSession {
    pub(crate) image: Option<SelectedImage>,
    pub(crate) caption: Option<String>,
    pub(crate) state: RequestState,
    pub(crate) error: Option<String>,
    pub(crate) status: Option<TransientStatus>,
    pub(crate) in_flight: Option<u64>,
    pub(crate) last_request_id: u64,
}

impl CaptionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// User-visible error line, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Transient status text still live at `now`.
    pub fn status_at(&self, now: Instant) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|status| status.visible_at(now))
    }

    /// Id of the request currently on the wire.
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Whether the generate control should accept input.
    pub fn can_generate(&self) -> bool {
        self.image.is_some() && self.in_flight.is_none()
    }

    /// The result panel is shown while waiting and once a caption arrives.
    pub fn shows_result(&self) -> bool {
        matches!(
            self.state,
            RequestState::Submitting | RequestState::Succeeded
        )
    }

    /// Drop the status once it has expired so it no longer holds a redraw.
    pub fn prune_status(&mut self, now: Instant) -> bool {
        if self
            .status
            .as_ref()
            .is_some_and(|status| status.is_expired(now))
        {
            self.status = None;
            return true;
        }
        false
    }
}

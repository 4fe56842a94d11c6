use std::path::PathBuf;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::core::caption_client::CaptionClient;
use crate::core::config::data::Config;
use crate::core::controller::CaptionController;
use crate::core::error::CaptionError;
use crate::core::session::CaptionSession;

/// Editing state of the path entry line.
#[derive(Debug, Default)]
pub struct UiState {
    pub path_input: String,
    pub exit_requested: bool,
}

impl UiState {
    pub fn insert_char(&mut self, c: char) {
        self.path_input.push(c);
    }

    pub fn insert_str(&mut self, text: &str) {
        // pasted paths often carry a trailing newline
        self.path_input
            .push_str(text.trim_end_matches(['\r', '\n']));
    }

    /// Remove the last grapheme so combined characters go in one keypress.
    pub fn backspace(&mut self) {
        if let Some((index, _)) = self.path_input.grapheme_indices(true).next_back() {
            self.path_input.truncate(index);
        }
    }

    pub fn clear_input(&mut self) {
        self.path_input.clear();
    }

    /// Display width of the typed text, for cursor placement.
    pub fn input_width(&self) -> u16 {
        u16::try_from(self.path_input.width()).unwrap_or(u16::MAX)
    }

    /// The typed path with quotes and `~` handled, or `None` when blank.
    pub fn take_path(&mut self) -> Option<PathBuf> {
        let raw = std::mem::take(&mut self.path_input);
        resolve_input_path(&raw)
    }
}

fn resolve_input_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| {
            trimmed
                .strip_prefix('\'')
                .and_then(|rest| rest.strip_suffix('\''))
        })
        .unwrap_or(trimmed);
    if unquoted.is_empty() {
        return None;
    }

    if let Some(rest) = unquoted.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(rest));
        }
    }
    Some(PathBuf::from(unquoted))
}

/// Everything the interactive view works with.
pub struct App {
    pub session: CaptionSession,
    pub ui: UiState,
    pub client: CaptionClient,
}

impl App {
    pub fn new(client: CaptionClient) -> Self {
        Self {
            session: CaptionSession::new(),
            ui: UiState::default(),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, CaptionError> {
        let client = CaptionClient::new(&config.base_url(), config.request_timeout())?;
        Ok(Self::new(client))
    }

    pub fn controller(&mut self) -> CaptionController<'_> {
        CaptionController::new(&mut self.session)
    }
}

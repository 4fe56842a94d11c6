use serde::Deserialize;

/// Name of the multipart field that carries the image bytes.
pub const IMAGE_FIELD: &str = "image";

/// Body returned by `POST /api/caption`. Extra fields are ignored.
#[derive(Debug, Deserialize, Default)]
pub struct CaptionResponse {
    #[serde(default)]
    pub caption: Option<String>,
}

impl CaptionResponse {
    /// The caption text, treating an empty string the same as a missing field.
    pub fn into_caption(self) -> Option<String> {
        self.caption.filter(|text| !text.is_empty())
    }
}

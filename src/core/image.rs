use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::constants::MAX_IMAGE_BYTES;
use crate::core::error::CaptionError;

pub const TOO_LARGE_MESSAGE: &str = "Please select an image smaller than 2MB.";
pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Please select a PNG, JPG, or WEBP image.";

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const SNIFF_LEN: u64 = 12;

/// Image formats the captioning endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Png,
    Jpeg,
    Webp,
}

impl MediaType {
    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Webp => "image/webp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaType::Png => "PNG",
            MediaType::Jpeg => "JPG",
            MediaType::Webp => "WEBP",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(MediaType::Png),
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "webp" => Some(MediaType::Webp),
            _ => None,
        }
    }

    /// Identify the format from the leading magic bytes.
    pub fn sniff(header: &[u8]) -> Option<Self> {
        if header.starts_with(PNG_MAGIC) {
            Some(MediaType::Png)
        } else if header.starts_with(JPEG_MAGIC) {
            Some(MediaType::Jpeg)
        } else if header.len() >= 12 && &header[..4] == b"RIFF" && &header[8..12] == b"WEBP" {
            Some(MediaType::Webp)
        } else {
            None
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

#[derive(Debug, Clone)]
enum ImageSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

/// A candidate image as offered by the file-input surface.
///
/// Size and declared type are known up front, so an oversize file can be
/// rejected before its bytes are read.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub size: u64,
    pub media_type: Option<MediaType>,
    source: ImageSource,
}

impl ImageFile {
    pub fn from_bytes<S: Into<String>>(
        name: S,
        bytes: Vec<u8>,
        media_type: Option<MediaType>,
    ) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            media_type,
            source: ImageSource::Bytes(bytes),
        }
    }

    /// Describe a file on disk without reading its contents.
    ///
    /// The media type comes from the extension; files without a recognized
    /// extension are sniffed from their first few bytes.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }

        let media_type = match path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(MediaType::from_extension)
        {
            Some(media_type) => Some(media_type),
            None => {
                let mut header = Vec::with_capacity(SNIFF_LEN as usize);
                File::open(path)?.take(SNIFF_LEN).read_to_end(&mut header)?;
                MediaType::sniff(&header)
            }
        };

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size: metadata.len(),
            media_type,
            source: ImageSource::Path(path.to_path_buf()),
        })
    }

    /// Check the size limit and media type, then read the bytes.
    pub fn into_selected(self) -> Result<SelectedImage, CaptionError> {
        if self.size > MAX_IMAGE_BYTES {
            return Err(CaptionError::Validation(TOO_LARGE_MESSAGE.to_string()));
        }
        let media_type = self
            .media_type
            .ok_or_else(|| CaptionError::Validation(UNSUPPORTED_TYPE_MESSAGE.to_string()))?;

        let bytes = match self.source {
            ImageSource::Bytes(bytes) => bytes,
            ImageSource::Path(path) => std::fs::read(&path).map_err(|err| {
                CaptionError::Validation(format!("Could not read {}: {err}", self.name))
            })?,
        };
        // the file may have grown between stat and read
        if bytes.len() as u64 > MAX_IMAGE_BYTES {
            return Err(CaptionError::Validation(TOO_LARGE_MESSAGE.to_string()));
        }

        let preview = ImagePreview::derive(&self.name, media_type, &bytes);
        Ok(SelectedImage {
            name: self.name,
            media_type,
            bytes: Arc::from(bytes),
            preview,
        })
    }
}

/// The image currently held by the session.
///
/// Bytes are shared with in-flight requests through an `Arc`, so handing a
/// copy to the HTTP task never duplicates the buffer.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub name: String,
    pub media_type: MediaType,
    bytes: Arc<[u8]>,
    preview: ImagePreview,
}

impl SelectedImage {
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn preview(&self) -> &ImagePreview {
        &self.preview
    }
}

/// What the terminal shows in place of the image itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub name: String,
    pub size_bytes: u64,
    pub media_type: MediaType,
    pub dimensions: Option<(u32, u32)>,
}

impl ImagePreview {
    fn derive(name: &str, media_type: MediaType, bytes: &[u8]) -> Self {
        let dimensions = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok());

        Self {
            name: name.to_string(),
            size_bytes: bytes.len() as u64,
            media_type,
            dimensions,
        }
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![
            self.name.clone(),
            format_size(self.size_bytes),
            self.media_type.label().to_string(),
        ];
        if let Some((width, height)) = self.dimensions {
            parts.push(format!("{width}×{height}"));
        }
        parts.join(" · ")
    }
}

pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f >= KIB * KIB {
        format!("{:.1} MB", bytes_f / (KIB * KIB))
    } else if bytes_f >= KIB {
        format!("{:.1} KB", bytes_f / KIB)
    } else {
        format!("{bytes} B")
    }
}

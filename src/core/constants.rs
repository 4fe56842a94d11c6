//! Shared constants used across the application

use std::time::Duration;

/// Base URL of the hosted captioning service.
pub const DEFAULT_BASE_URL: &str = "https://chrono-weave-backend.onrender.com";

/// Endpoint path appended to the base URL for caption requests.
pub const CAPTION_ENDPOINT: &str = "api/caption";

/// Largest image accepted for upload (2 MiB).
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

/// How long a transient status such as "Copied!" stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(2);

pub const COPIED_STATUS: &str = "Copied!";
pub const COPY_FAILED_STATUS: &str = "Failed to copy";

pub const APP_TITLE: &str = "CaptionSense";
pub const APP_TAGLINE: &str = "Your personal AI caption assistant.";

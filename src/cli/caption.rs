//! TUI-less "caption" command

use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use crate::core::caption_client::CaptionClient;
use crate::core::config::data::Config;
use crate::core::controller::{CaptionController, CopyOutcome};
use crate::core::error::CaptionError;
use crate::core::session::CaptionSession;
use crate::utils::clipboard::{Clipboard, SystemClipboard};

/// What a one-shot caption run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionReport {
    pub caption: String,
    pub copy_status: Option<String>,
}

pub async fn run_caption_command(image: PathBuf, copy: bool) -> Result<ExitCode, Box<dyn Error>> {
    let config = Config::load()?;
    let client = CaptionClient::new(&config.base_url(), config.request_timeout())?;
    let system_clipboard = SystemClipboard;
    let clipboard: Option<&dyn Clipboard> = if copy { Some(&system_clipboard) } else { None };

    let outcome = caption_image(&image, &client, clipboard).await;
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    let status = write_outcome(&outcome, &mut stdout, &mut stderr)?;
    Ok(ExitCode::from(status))
}

/// Print a caption run and return the process exit status.
///
/// The caption goes to `out`; the copy status and any error go to `err`.
pub fn write_outcome(
    outcome: &Result<CaptionReport, CaptionError>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<u8> {
    match outcome {
        Ok(report) => {
            writeln!(out, "{}", report.caption)?;
            if let Some(status) = &report.copy_status {
                writeln!(err, "{status}")?;
            }
            Ok(0)
        }
        Err(error) => {
            writeln!(err, "❌ Error: {}", error.user_message())?;
            Ok(1)
        }
    }
}

/// Select `path`, caption it once, and optionally copy the result.
pub async fn caption_image(
    path: &Path,
    client: &CaptionClient,
    clipboard: Option<&dyn Clipboard>,
) -> Result<CaptionReport, CaptionError> {
    let mut session = CaptionSession::new();
    let mut controller = CaptionController::new(&mut session);
    controller.select_path(path)?;
    controller.run_caption(client).await?;

    let now = Instant::now();
    let copied = match clipboard {
        Some(clipboard) => controller.copy_result(clipboard, now) != CopyOutcome::NothingToCopy,
        None => false,
    };
    let copy_status = if copied {
        session.status_at(now).map(str::to_string)
    } else {
        None
    };

    Ok(CaptionReport {
        caption: session.caption().unwrap_or_default().to_string(),
        copy_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::image::test_images::TINY_PNG;
    use crate::utils::test_utils::{test_caption_client, FakeClipboard, MockCaptionServer};
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, TINY_PNG).expect("write png");
        path
    }

    #[tokio::test]
    async fn captions_and_copies_image_from_disk() {
        let server = MockCaptionServer::start(200, r#"{"caption":"a cat on a mat"}"#).await;
        let client = test_caption_client(&server.base_url);
        let dir = TempDir::new().expect("temp dir");
        let path = write_png(&dir, "cat.png");
        let clipboard = FakeClipboard::default();

        let report = caption_image(&path, &client, Some(&clipboard))
            .await
            .expect("caption");

        assert_eq!(
            report,
            CaptionReport {
                caption: "a cat on a mat".to_string(),
                copy_status: Some("Copied!".to_string()),
            }
        );
        assert_eq!(clipboard.copied(), ["a cat on a mat"]);
    }

    #[tokio::test]
    async fn missing_file_fails_before_any_request() {
        let server = MockCaptionServer::start(200, r#"{"caption":"unused"}"#).await;
        let client = test_caption_client(&server.base_url);
        let dir = TempDir::new().expect("temp dir");

        let err = caption_image(&dir.path().join("nope.png"), &client, None)
            .await
            .expect_err("missing file");

        assert!(matches!(err, CaptionError::Validation(_)));
        assert_eq!(server.request_count().await, 0);
    }

    #[tokio::test]
    async fn remote_failure_is_reported() {
        let server = MockCaptionServer::start(500, "{}").await;
        let client = test_caption_client(&server.base_url);
        let dir = TempDir::new().expect("temp dir");
        let path = write_png(&dir, "cat.png");

        let err = caption_image(&path, &client, None)
            .await
            .expect_err("remote error");
        assert_eq!(err, CaptionError::Remote { status: 500 });
    }

    #[test]
    fn failed_run_prints_error_and_exits_nonzero() {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let status = write_outcome(
            &Err(CaptionError::Remote { status: 503 }),
            &mut out,
            &mut err,
        )
        .expect("write");

        assert_eq!(status, 1);
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).expect("utf8"),
            "❌ Error: API request failed with status 503.\n"
        );
    }

    #[test]
    fn successful_run_prints_caption_and_copy_status() {
        let report = CaptionReport {
            caption: "a cat on a mat".to_string(),
            copy_status: Some("Copied!".to_string()),
        };
        let mut out = Vec::new();
        let mut err = Vec::new();

        let status = write_outcome(&Ok(report), &mut out, &mut err).expect("write");

        assert_eq!(status, 0);
        assert_eq!(String::from_utf8(out).expect("utf8"), "a cat on a mat\n");
        assert_eq!(String::from_utf8(err).expect("utf8"), "Copied!\n");
    }
}

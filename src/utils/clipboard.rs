use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::core::error::ClipboardError;

/// Destination for copied caption text.
pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Writes to the desktop clipboard through the platform's copy command.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        copy_to_clipboard(text)
    }
}

pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    #[cfg(target_os = "macos")]
    {
        return run_with_stdin("pbcopy", &[], text);
    }
    #[cfg(target_os = "windows")]
    {
        return run_with_stdin("cmd", &["/C", "clip"], text);
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        const CANDIDATES: [(&str, &[&str]); 3] = [
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard"]),
            ("xsel", &["--clipboard", "--input"]),
        ];
        for (cmd, args) in CANDIDATES {
            if run_with_stdin(cmd, args, text).is_ok() {
                return Ok(());
            }
        }
        Err(ClipboardError(
            "No clipboard command found (install wl-copy, xclip, or xsel)".to_string(),
        ))
    }
}

fn run_with_stdin(cmd: &str, args: &[&str], input: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|_| ClipboardError(format!("Clipboard command `{cmd}` not available")))?;

    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(input.as_bytes()),
        None => Ok(()),
    };
    // always reap the child, even when the write failed
    let status = child.wait();
    if let Err(err) = written {
        return Err(ClipboardError(format!("Clipboard command `{cmd}` failed: {err}")));
    }
    match status {
        Ok(status) if status.success() => Ok(()),
        _ => Err(ClipboardError(format!("Clipboard command `{cmd}` failed"))),
    }
}

/// Runs clipboard writes on the blocking pool and reports each result back.
pub struct ClipboardService {
    clipboard: Arc<dyn Clipboard + Send + Sync>,
    tx: mpsc::UnboundedSender<Result<(), ClipboardError>>,
}

impl ClipboardService {
    pub fn new(
        clipboard: Arc<dyn Clipboard + Send + Sync>,
    ) -> (Self, mpsc::UnboundedReceiver<Result<(), ClipboardError>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { clipboard, tx }, rx)
    }

    pub fn spawn_copy(&self, text: String) {
        let clipboard = Arc::clone(&self.clipboard);
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(clipboard.copy(&text));
        });
    }
}

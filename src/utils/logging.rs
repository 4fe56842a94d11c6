use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "captionsense=info";

/// Where diagnostics should go for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Append to the given file; the only choice that is safe under the TUI.
    File(&'a Path),
    /// Warnings and errors on stderr, for non-interactive commands.
    Stderr,
    Disabled,
}

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global tracing subscriber.
pub fn init_logging(target: LogTarget<'_>) -> Result<(), Box<dyn Error>> {
    match target {
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(env_filter(DEFAULT_FILTER))
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .try_init()?;
        }
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(env_filter("captionsense=warn"))
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .without_time(),
                )
                .try_init()?;
        }
        LogTarget::Disabled => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_target_creates_log_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("captionsense.log");

        // another test may already own the global subscriber; the file must
        // still be created before that is detected
        let _ = init_logging(LogTarget::File(&path));
        assert!(path.exists());
    }

    #[test]
    fn unwritable_log_path_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("missing").join("captionsense.log");
        assert!(init_logging(LogTarget::File(&path)).is_err());
    }

    #[test]
    fn disabled_target_is_a_no_op() {
        assert!(init_logging(LogTarget::Disabled).is_ok());
    }
}

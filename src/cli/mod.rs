//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod caption;

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::cli::caption::run_caption_command;
use crate::core::config::data::Config;
use crate::ui::event_loop::run_interactive;
use crate::utils::logging::{init_logging, LogTarget};
use crate::utils::url::validate_base_url;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "captionsense")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Generate a caption for an image and copy it to the clipboard")]
#[command(
    long_about = "CaptionSense sends an image to a captioning service and shows the \
returned caption in a full-screen terminal view, ready to copy.\n\n\
Images must be PNG, JPG, or WEBP and no larger than 2MB.\n\n\
Controls:\n\
  Type a path       Enter the path of an image\n\
  Enter             Select the typed image\n\
  Ctrl+G            Generate a caption\n\
  Ctrl+Y            Copy the caption to the clipboard\n\
  Ctrl+U            Clear the path field\n\
  Esc / Ctrl+C      Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Image to select when the interactive view opens
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Write diagnostics to the given file (filter with RUST_LOG)
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Caption an image without opening the interactive view
    Caption {
        /// Path to a PNG, JPG, or WEBP image
        image: PathBuf,
        /// Also copy the caption to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Set configuration values (base-url, request-timeout)
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        value: Option<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<ExitCode, Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        Some(Commands::Caption { image, copy }) => {
            let target = match args.log.as_deref() {
                Some(path) => LogTarget::File(path),
                None => LogTarget::Stderr,
            };
            init_logging(target)?;
            run_caption_command(image, copy).await
        }
        Some(Commands::Set { key, value }) => {
            let mut config = Config::load()?;
            let Some(value) = value else {
                config.print_all();
                return Ok(ExitCode::SUCCESS);
            };
            save_setting(&mut config, &key, Some(&value))
        }
        Some(Commands::Unset { key }) => {
            let mut config = Config::load()?;
            save_setting(&mut config, &key, None)
        }
        None => {
            let target = match args.log.as_deref() {
                Some(path) => LogTarget::File(path),
                None => LogTarget::Disabled,
            };
            init_logging(target)?;
            let config = Config::load()?;
            run_interactive(&config, args.image).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn save_setting(
    config: &mut Config,
    key: &str,
    value: Option<&str>,
) -> Result<ExitCode, Box<dyn Error>> {
    match apply_setting(config, key, value) {
        Ok(message) => {
            config.save()?;
            println!("✅ {message}");
            Ok(ExitCode::SUCCESS)
        }
        Err(message) => {
            eprintln!("❌ {message}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Set (`Some`) or unset (`None`) one configuration key.
fn apply_setting(config: &mut Config, key: &str, value: Option<&str>) -> Result<String, String> {
    match (key, value) {
        ("base-url", Some(value)) => {
            let url = validate_base_url(value)?;
            config.base_url = Some(url.clone());
            Ok(format!("Set base-url to: {url}"))
        }
        ("base-url", None) => {
            config.base_url = None;
            Ok("Unset base-url".to_string())
        }
        ("request-timeout", Some(value)) => {
            let secs = value
                .trim()
                .trim_end_matches('s')
                .parse::<u64>()
                .map_err(|_| {
                    format!("request-timeout must be a whole number of seconds (got '{value}')")
                })?;
            config.request_timeout_secs = Some(secs);
            Ok(format!("Set request-timeout to: {secs}s"))
        }
        ("request-timeout", None) => {
            config.request_timeout_secs = None;
            Ok("Unset request-timeout".to_string())
        }
        _ => Err(format!("Unknown config key: {key}")),
    }
}

//! CaptionSense is a terminal client for a remote image-captioning service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the caption session state, the request lifecycle
//!   controller, the HTTP client for the captioning endpoint, and
//!   configuration.
//! - [`ui`] renders the full-screen terminal view and runs the event loop
//!   that turns key presses into controller operations.
//! - [`api`] defines the wire payloads returned by the captioning endpoint.
//! - [`utils`] holds clipboard access, URL helpers, and logging setup.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches either into
//! [`ui::event_loop::run_interactive`] or the non-interactive caption command.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;

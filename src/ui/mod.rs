//! Terminal UI layer for the interactive caption view.
//!
//! - [`event_loop`]: runs the view, turning key presses into controller
//!   operations and applying caption results as they arrive.
//! - [`keybindings`]: decodes key events into [`keybindings::UiAction`]s.
//! - [`renderer`]: draws one frame from the current session state.
//! - [`lifecycle`]: enters and leaves raw mode and the alternate screen.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns the request lifecycle.

pub mod event_loop;
pub mod keybindings;
pub mod lifecycle;
pub mod renderer;

//! Terminal rendering of the three-pane file manager.
//!
//! ```text
//! AppState → ViewModel::compute → ViewModel → render → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`layout`]: Pane geometry, shared with the session's scroll math
//! - [`viewmodel`]: Display-ready rows, status bar and hints
//! - [`renderer`]: Prints a view model with absolute cursor positioning
//! - [`helpers`]: Cursor positioning and text fitting
//! - [`theme`]: Color scheme definitions and ANSI escape sequence generation

pub mod helpers;
pub mod layout;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::ViewModel;

//! Application layer coordinating state, events, and effects.
//!
//! This module defines the core application logic layer, sitting between the
//! plugin runtime (main.rs) and the keymap/filesystem/git/worker layers. It
//! implements the event-driven architecture that powers the interactive UI.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Session → Actions → reduce → AppState
//!                          │                            ↓
//!                          └──→ Effects → Runtime     render
//!                                   ↓
//!              Worker Responses / Command Results → Events
//! ```
//!
//! # Modules
//!
//! - [`state`]: Central application state container
//! - [`reducer`]: Pure state transition function and the action set
//! - [`modes`]: Input mode type
//! - [`session`]: State owner, key routing and request fulfilment
//! - [`text_input`]: Command, search and prompt line editors
//! - [`commands`]: `:` command dispatcher
//! - [`effects`]: Side effects emitted for the runtime
//! - [`handler`]: Event processing entry point

pub mod commands;
pub mod effects;
pub mod handler;
pub mod modes;
pub mod reducer;
pub mod session;
pub mod state;
pub mod text_input;

pub use effects::Effect;
pub use handler::{handle_event, Event};
pub use modes::Mode;
pub use reducer::{reduce, Action};
pub use session::{Session, Settings};
pub use state::{AppState, PromptState, PromptSubmit, SearchState};

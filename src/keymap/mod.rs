//! Keyboard handling for the binding-driven modes.
//!
//! A key travels through these stages:
//!
//! ```text
//! RawKey ──normalize──▶ KeyToken ──KeyBuffer::feed──▶ Resolution
//!                                                       │
//!                                   Dispatch { intent, count }
//!                                                       │
//!                                  Intent::run(ActionContext) ──▶ Actions + Requests
//! ```
//!
//! # Modules
//!
//! - [`token`]: raw keys and the canonical token form (`j`, `C-d`, `escape`)
//! - [`registry`]: per-mode binding tables with exact/pending lookup
//! - [`matcher`]: the key buffer, repeat counts and timeout disambiguation
//! - [`intent`]: what each binding does
//! - [`context`]: the snapshot and capability bundle intents run against
//! - [`bindings`]: the built-in binding tables

pub mod bindings;
pub mod context;
pub mod intent;
pub mod matcher;
pub mod registry;
pub mod token;

pub use bindings::default_bindings;
pub use context::{ActionContext, Request};
pub use intent::Intent;
pub use matcher::{Dispatch, KeyBuffer, Resolution, TimerId};
pub use registry::{Binding, BindingRegistry, Lookup};
pub use token::{normalize, normalize_key, KeyToken, Modifiers, RawKey, SpecialKey};

//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input,
//! timer fires, worker responses and finished commands, translating them into
//! state changes and effect sequences. It serves as the primary control flow
//! coordinator between the plugin runtime and the [`Session`].
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the plugin runtime or worker thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. The session applies reducer actions to its state
//! 4. Effects are collected and returned for execution
//!
//! # Example
//!
//! ```rust
//! use voy::app::{handle_event, AppState, Event, Session, Settings};
//! use voy::keymap::RawKey;
//!
//! let mut session = Session::new(AppState::new("/tmp".into(), false, Default::default()), Settings::default());
//! let (should_render, effects) = handle_event(&mut session, &Event::Key(RawKey::char('j')));
//! assert!(should_render);
//! assert!(effects.is_empty());
//! ```

use super::effects::Effect;
use super::session::Session;
use crate::git::{CommandKind, CommandOutput};
use crate::keymap::RawKey;
use crate::worker::WorkerResponse;

/// Events delivered to the session by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Permissions were granted; load the starting directory.
    Started,

    /// A key press.
    Key(RawKey),

    /// A key with no token (function keys, Home/End). It only dismisses the
    /// displayed message.
    UnmappedKey,

    /// The oldest armed sequence timer fired.
    Timer,

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),

    /// An external command started by an [`Effect::RunCommand`] finished.
    CommandFinished {
        kind: CommandKind,
        output: CommandOutput,
    },
}

/// Processes an event and returns whether to re-render plus the effects to
/// execute, in order.
pub fn handle_event(session: &mut Session, event: &Event) -> (bool, Vec<Effect>) {
    let _span = tracing::debug_span!("handle_event", event_type = %event_name(event)).entered();

    let effects = match event {
        Event::Started => session.start(),
        Event::Key(key) => session.handle_key(key),
        Event::UnmappedKey => session.on_unmapped_key(),
        Event::Timer => session.on_timer(),
        Event::WorkerResponse(response) => session.on_worker_response(response.clone()),
        Event::CommandFinished { kind, output } => session.on_command_finished(kind.clone(), output),
    };

    tracing::debug!(
        effect_count = effects.len(),
        mode = %session.state().mode,
        cursor = session.state().cursor,
        "event handled"
    );

    (true, effects)
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Started => "Started",
        Event::Key(_) => "Key",
        Event::UnmappedKey => "UnmappedKey",
        Event::Timer => "Timer",
        Event::WorkerResponse(_) => "WorkerResponse",
        Event::CommandFinished { .. } => "CommandFinished",
    }
}

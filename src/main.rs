//! Zellij plugin wrapper and entry point.
//!
//! This module is the thin integration layer between the voy library and the
//! Zellij plugin system. It translates Zellij events into [`voy::Event`]s and
//! executes the [`Effect`]s the session returns.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← Session, rendering, git commands
//! │  └──────────────────┘   │
//! │          │              │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │ FsWorker         │   │  ← Listings, previews, file operations
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, build the session
//! 2. **Subscribe**: Key, Timer, `CustomMessage`, `RunCommandResult`
//! 3. **Permissions granted**: Mount the host root and load the start directory
//! 4. **Update**: Map events, run them through the session, execute effects
//! 5. **Render**: Record the viewport and print the frame
//!
//! # Event Mapping
//!
//! - `Key` → `Event::Key` (normalized later by the keymap), or
//!   `Event::UnmappedKey` for keys without a token
//! - `Timer` → `Event::Timer` (sequence timeout)
//! - `CustomMessage` from the worker → `Event::WorkerResponse`
//! - `RunCommandResult` → `Event::CommandFinished` (kind recovered from the context)

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use voy::git::{CommandKind, CommandOutput};
use voy::keymap::RawKey;
use voy::worker::{FsWorker, WorkerMessage, WorkerResponse};
use voy::{handle_event, Config, Effect, Session, Theme};

register_plugin!(State);
register_worker!(FsWorker, fs_worker, FS_WORKER);

/// Name the filesystem worker is registered and addressed under.
const WORKER_NAME: &str = "fs";

/// Plugin state wrapper.
struct State {
    session: Session,
    theme: Theme,
    started: bool,
}

impl Default for State {
    fn default() -> Self {
        let (session, theme) = voy::initialize(&Config::default(), Path::new("/"));
        Self {
            session,
            theme,
            started: false,
        }
    }
}

impl ZellijPlugin for State {
    /// Parses configuration, builds the session, requests permissions and
    /// subscribes to events.
    ///
    /// # Permissions
    ///
    /// - `FullHdAccess`: Mount the host root for the worker
    /// - `RunCommands`: git, gh and the clipboard command
    /// - `OpenFiles`: Open files in the default editor
    /// - `ChangeApplicationState`: Open editor command panes
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        voy::observability::init_tracing(&config);

        let _guard = tracing::debug_span!("plugin_load").entered();

        let initial_cwd = get_plugin_ids().initial_cwd;
        tracing::debug!(initial_cwd = %initial_cwd.display(), ?config, "parsed configuration");
        (self.session, self.theme) = voy::initialize(&config, &initial_cwd);

        request_permission(&[
            PermissionType::FullHdAccess,
            PermissionType::RunCommands,
            PermissionType::OpenFiles,
            PermissionType::ChangeApplicationState,
        ]);

        subscribe(&[
            EventType::Key,
            EventType::Timer,
            EventType::CustomMessage,
            EventType::RunCommandResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Maps the Zellij event, hands it to the session and executes the
    /// resulting effects. Returns `true` if the UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let _guard = tracing::debug_span!("plugin_update_event", event_type = %event_name).entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => {
                RawKey::from_zellij(key).map_or(voy::Event::UnmappedKey, voy::Event::Key)
            }
            zellij_tile::prelude::Event::Timer(_) => voy::Event::Timer,
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match Self::map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::RunCommandResult(exit_code, stdout, stderr, context) => {
                match Self::map_command_result_event(exit_code, stdout, stderr, &context) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(permissions) => {
                match self.handle_permission_result(permissions) {
                    Some(event) => event,
                    None => return false,
                }
            }
            _ => return false,
        };

        let (should_render, effects) = handle_event(&mut self.session, &our_event);
        tracing::debug!(effect_count = effects.len(), should_render, "event handled");
        for effect in effects {
            Self::execute_effect(effect);
        }
        should_render
    }

    fn render(&mut self, rows: usize, cols: usize) {
        self.session.set_viewport(rows);
        voy::ui::render(
            self.session.state(),
            &self.theme,
            &self.session.pending_keys(),
            rows,
            cols,
        );
    }
}

impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::Timer(_) => "Timer".to_string(),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::RunCommandResult(..) => "RunCommandResult".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    /// Mounts the host root at `/host` and starts the session once.
    fn handle_permission_result(&mut self, permissions: PermissionStatus) -> Option<voy::Event> {
        match permissions {
            PermissionStatus::Granted if !self.started => {
                tracing::debug!("permissions granted - loading start directory");
                self.started = true;
                change_host_folder(PathBuf::from("/"));
                Some(voy::Event::Started)
            }
            PermissionStatus::Granted => None,
            PermissionStatus::Denied => {
                tracing::warn!("permissions denied - plugin functionality limited");
                None
            }
        }
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<voy::Event> {
        if message != WORKER_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(voy::Event::WorkerResponse(response)),
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    fn map_command_result_event(
        exit_code: Option<i32>,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        context: &BTreeMap<String, String>,
    ) -> Option<voy::Event> {
        tracing::debug!(exit_code = ?exit_code, "run command result event");

        let kind = CommandKind::from_context(context)?;
        let output = CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        };
        Some(voy::Event::CommandFinished { kind, output })
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_NAME.to_string()),
                    name: WORKER_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    /// Translates a session effect into Zellij API calls.
    #[tracing::instrument(level = "debug")]
    fn execute_effect(effect: Effect) {
        match effect {
            Effect::Exit => close_self(),
            Effect::PostToWorker(message) => Self::post_worker_message(&message),
            Effect::ArmTimer { after, .. } => set_timeout(after.as_secs_f64()),
            Effect::RunCommand(request) => {
                let context = request.context();
                let args: Vec<&str> = request.args.iter().map(String::as_str).collect();
                run_command_with_env_variables_and_cwd(&args, BTreeMap::new(), request.cwd, context);
            }
            Effect::OpenEditor { path, line, editor } => Self::open_in_editor(path, line, editor),
        }
    }

    /// Opens with Zellij's default editor, or runs the configured editor in a
    /// command pane with a `+<line>` argument.
    fn open_in_editor(path: PathBuf, line: Option<usize>, editor: Option<String>) {
        let cwd = path.parent().map(Path::to_path_buf);

        let Some(editor) = editor else {
            open_file(
                FileToOpen {
                    path,
                    line_number: line,
                    cwd,
                },
                BTreeMap::new(),
            );
            return;
        };

        let mut words = editor.split_whitespace();
        let Some(program) = words.next() else {
            return;
        };
        let mut args: Vec<String> = words.map(String::from).collect();
        if let Some(line) = line {
            args.push(format!("+{line}"));
        }
        args.push(path.to_string_lossy().into_owned());

        open_command_pane(
            CommandToRun {
                path: PathBuf::from(program),
                args,
                cwd,
            },
            BTreeMap::new(),
        );
    }
}

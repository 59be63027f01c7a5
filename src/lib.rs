//! Voy: a vim-modal three-pane file manager running as a Zellij plugin.
//!
//! Voy provides:
//! - Modal keyboard control (normal, visual, command, search, prompt, preview)
//! - Multi-key sequences (`gg`, `dd`, `yy`) with counts and timeout disambiguation
//! - Parent / current / preview panes with text, directory and diff previews
//! - Copy, move, delete, rename and create operations on a background worker
//! - Git status markers and git/GitHub actions behind a `g` prefix

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │ Event / Effect
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Session: key routing, request fulfilment         │
//! │  - Reducer: pure state transitions                  │
//! │  - Line editors for command / search / prompt       │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Keymap        │   │ Worker        │   │ UI            │
//! │ (keymap/)     │   │ (worker/)     │   │ (ui/)         │
//! │ - Normalizer  │   │ - Listings    │   │ - View model  │
//! │ - Matcher     │   │ - Previews    │   │ - Renderer    │
//! │ - Bindings    │   │ - File ops    │   │ - Themes      │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────┐
//! │  Providers & Domain                                 │
//! │  - Filesystem (fs/), git (git/)                     │
//! │  - Sandbox paths (infrastructure/)                  │
//! │  - Entries, previews, errors (domain/)              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Session, reducer and application state
//! - [`keymap`]: Key normalization, sequence matching and the binding table
//! - [`domain`]: Core domain types (entries, previews, errors)
//! - [`fs`]: Directory listing, previews and file operations
//! - [`git`]: Git command builders and status parsing
//! - [`infrastructure`]: Sandbox path mapping and path resolution
//! - [`worker`]: Background worker for filesystem I/O
//! - [`ui`]: Terminal rendering with theme support
//! - [`observability`]: OpenTelemetry tracing with file export
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/voy.wasm" {
//!         start_path "~/src"
//!         editor "hx"
//!         show_hidden "true"
//!         sort "modified:desc"
//!         sequence_timeout_ms "800"
//!         clipboard_command "wl-copy"
//!         theme "catppuccin-latte"
//!         trace_level "debug"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use std::path::Path;
//! use voy::{handle_event, initialize, Config, Effect, Event};
//!
//! let config = Config::from_zellij(&BTreeMap::new());
//! let (mut session, _theme) = initialize(&config, Path::new("/home/me/src"));
//! assert_eq!(session.settings().home, Path::new("/home/me"));
//!
//! let (_, effects) = handle_event(&mut session, &Event::Started);
//! assert!(matches!(effects[0], Effect::PostToWorker(_)));
//! ```

pub mod app;
pub mod domain;
pub mod fs;
pub mod git;
pub mod infrastructure;
pub mod keymap;
pub mod observability;
pub mod ui;
pub mod worker;

pub use app::{handle_event, AppState, Effect, Event, Mode, Session, Settings};
pub use domain::{Result, SortSpec, VoyError};
pub use ui::Theme;

use app::session::DEFAULT_SEQUENCE_TIMEOUT;
use infrastructure::{guess_home, resolve};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default command the preview's selected lines are piped into.
pub const DEFAULT_CLIPBOARD_COMMAND: &str = "pbcopy";

/// Plugin configuration parsed from Zellij's configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory to open, absolute or relative to the initial cwd, `~` allowed.
    pub start_path: Option<String>,

    /// Editor command for `e`. `None` opens files with Zellij's default editor.
    pub editor: Option<String>,

    pub show_hidden: bool,

    pub sort: SortSpec,

    /// How long an ambiguous key sequence waits for its next key.
    pub sequence_timeout: Duration,

    /// Command that receives copied preview lines on stdin.
    pub clipboard_command: String,

    /// Built-in theme name: `catppuccin-mocha` or `catppuccin-latte`.
    /// Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// Tracing filter, e.g. `debug` or `voy=trace`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Home directory for `~`. Guessed from the initial cwd when unset.
    pub home_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_path: None,
            editor: None,
            show_hidden: false,
            sort: SortSpec::default(),
            sequence_timeout: DEFAULT_SEQUENCE_TIMEOUT,
            clipboard_command: DEFAULT_CLIPBOARD_COMMAND.to_string(),
            theme_name: None,
            theme_file: None,
            trace_level: None,
            home_dir: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Unparseable values fall back to their defaults; blank strings count as
    /// unset.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    /// use voy::domain::SortField;
    /// use voy::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("sort".to_string(), "size:desc".to_string());
    /// map.insert("sequence_timeout_ms".to_string(), "500".to_string());
    /// map.insert("show_hidden".to_string(), "true".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.sort.field, SortField::Size);
    /// assert_eq!(config.sequence_timeout, Duration::from_millis(500));
    /// assert!(config.show_hidden);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            config
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let sort = get("sort").map_or(defaults.sort, |raw| {
            SortSpec::parse(raw).unwrap_or_else(|| {
                tracing::debug!(sort = %raw, "invalid sort option, using default");
                defaults.sort
            })
        });

        let sequence_timeout = get("sequence_timeout_ms")
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map_or(defaults.sequence_timeout, Duration::from_millis);

        Self {
            start_path: get("start_path").map(String::from),
            editor: get("editor").map(String::from),
            show_hidden: get("show_hidden").is_some_and(|raw| raw.eq_ignore_ascii_case("true")),
            sort,
            sequence_timeout,
            clipboard_command: get("clipboard_command").map_or(defaults.clipboard_command, String::from),
            theme_name: get("theme").map(String::from),
            theme_file: get("theme_file").map(String::from),
            trace_level: get("trace_level").map(String::from),
            home_dir: get("home_dir").map(String::from),
        }
    }

    /// Loads the configured theme, falling back to the default on any error.
    #[must_use]
    pub fn load_theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }

        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|e| {
                tracing::debug!(theme_name = %theme_name, error = %e, "failed to load theme, using default");
                Theme::default()
            })
        })
    }
}

/// Builds the session and theme for a plugin started in `initial_cwd`.
///
/// Nothing is loaded yet; the first listing is requested by
/// [`Event::Started`] once permissions are granted.
#[must_use]
pub fn initialize(config: &Config, initial_cwd: &Path) -> (Session, Theme) {
    let home = config
        .home_dir
        .as_deref()
        .map(PathBuf::from)
        .or_else(|| guess_home(initial_cwd))
        .unwrap_or_else(|| PathBuf::from("/"));

    let start = config
        .start_path
        .as_deref()
        .map_or_else(|| initial_cwd.to_path_buf(), |path| resolve(initial_cwd, path, &home));

    tracing::debug!(start = %start.display(), home = %home.display(), "initializing voy");

    let state = AppState::new(start, config.show_hidden, config.sort);
    let settings = Settings {
        editor: config.editor.clone(),
        clipboard_command: config.clipboard_command.clone(),
        sequence_timeout: config.sequence_timeout,
        home,
    };

    (Session::new(state, settings), config.load_theme())
}

//! Path manipulation utilities for the Zellij sandbox environment.
//!
//! The plugin asks Zellij to mount the host's root folder, so every host path
//! is reachable inside the sandbox under `/host`. Paths in application state
//! are always host paths; the worker translates them right before touching the
//! filesystem and translates listing results back.

use std::path::{Component, Path, PathBuf};

/// Mount point of the host folder inside the plugin sandbox.
pub const HOST_MOUNT: &str = "/host";

/// Per-plugin data directory provided by Zellij inside the sandbox.
pub const DATA_DIR: &str = "/data";

/// Returns the directory trace output is written to.
///
/// # Examples
///
/// ```
/// use voy::infrastructure::get_data_dir;
///
/// assert_eq!(get_data_dir().to_str(), Some("/data"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(DATA_DIR)
}

/// Maps an absolute host path to where it is mounted in the sandbox.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use voy::infrastructure::to_sandbox;
///
/// assert_eq!(to_sandbox(Path::new("/home/me/src")), Path::new("/host/home/me/src"));
/// assert_eq!(to_sandbox(Path::new("/")), Path::new("/host"));
/// ```
#[must_use]
pub fn to_sandbox(path: &Path) -> PathBuf {
    let relative = path.strip_prefix("/").unwrap_or(path);
    Path::new(HOST_MOUNT).join(relative)
}

/// Maps a sandbox path under `/host` back to the host path. Paths outside the
/// mount are returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use voy::infrastructure::to_host;
///
/// assert_eq!(to_host(Path::new("/host/home/me")), Path::new("/home/me"));
/// assert_eq!(to_host(Path::new("/host")), Path::new("/"));
/// assert_eq!(to_host(Path::new("/data/x")), Path::new("/data/x"));
/// ```
#[must_use]
pub fn to_host(path: &Path) -> PathBuf {
    path.strip_prefix(HOST_MOUNT)
        .map_or_else(|_| path.to_path_buf(), |relative| Path::new("/").join(relative))
}

/// Expands a leading `~` to `home`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use voy::infrastructure::expand_tilde;
///
/// let home = Path::new("/home/me");
/// assert_eq!(expand_tilde("~/projects", home), Path::new("/home/me/projects"));
/// assert_eq!(expand_tilde("~", home), home);
/// assert_eq!(expand_tilde("/etc", home), Path::new("/etc"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Removes `.` and resolves `..` without touching the filesystem. `..` at the
/// root stays at the root.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::from("/");
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    out
}

/// Resolves user input such as `../src`, `~/notes` or `/tmp` against `base`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use voy::infrastructure::resolve;
///
/// let home = Path::new("/home/me");
/// let base = Path::new("/home/me/src/voy");
/// assert_eq!(resolve(base, "../other", home), Path::new("/home/me/src/other"));
/// assert_eq!(resolve(base, "~/notes", home), Path::new("/home/me/notes"));
/// assert_eq!(resolve(base, "/tmp/./x", home), Path::new("/tmp/x"));
/// ```
#[must_use]
pub fn resolve(base: &Path, input: &str, home: &Path) -> PathBuf {
    normalize(&base.join(expand_tilde(input, home)))
}

/// Guesses the home directory from a host path below it, such as the
/// directory Zellij was started in.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use voy::infrastructure::guess_home;
///
/// assert_eq!(guess_home(Path::new("/home/me/src")), Some("/home/me".into()));
/// assert_eq!(guess_home(Path::new("/Users/me")), Some("/Users/me".into()));
/// assert_eq!(guess_home(Path::new("/root/x")), Some("/root".into()));
/// assert_eq!(guess_home(Path::new("/srv/data")), None);
/// ```
#[must_use]
pub fn guess_home(path: &Path) -> Option<PathBuf> {
    let mut components = path.components().skip(1);
    match components.next()?.as_os_str().to_str()? {
        "root" => Some(PathBuf::from("/root")),
        top @ ("home" | "Users") => {
            let user = components.next()?;
            Some(Path::new("/").join(top).join(user))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sandbox_mapping_round_trips() {
        for path in ["/", "/home/me", "/tmp/a b/c.txt"] {
            assert_eq!(to_host(&to_sandbox(Path::new(path))), Path::new(path));
        }
    }

    #[test]
    fn host_mount_prefix_must_be_a_whole_component() {
        assert_eq!(to_host(Path::new("/hostile/x")), Path::new("/hostile/x"));
    }

    #[test]
    fn normalize_clamps_at_root() {
        assert_eq!(normalize(Path::new("/../../etc")), Path::new("/etc"));
        assert_eq!(normalize(Path::new("/a/./b/../c/")), Path::new("/a/c"));
    }

    #[test]
    fn resolve_handles_relative_and_absolute() {
        let home = Path::new("/home/me");
        assert_eq!(resolve(Path::new("/w"), "sub", home), Path::new("/w/sub"));
        assert_eq!(resolve(Path::new("/w"), "..", home), Path::new("/"));
        assert_eq!(resolve(Path::new("/w"), "~", home), home);
    }

    #[test]
    fn tilde_inside_a_name_is_literal() {
        let home = Path::new("/home/me");
        assert_eq!(expand_tilde("~user", home), Path::new("~user"));
        assert_eq!(expand_tilde("a/~", home), Path::new("a/~"));
    }
}

//! `:` command line dispatcher.

use super::reducer::Action;
use crate::domain::SortSpec;
use crate::fs::FileOperation;
use crate::infrastructure::resolve;
use crate::keymap::{ActionContext, Request};
use std::path::Path;

/// Runs a submitted command line.
///
/// The first whitespace-separated word names the command and the rest, joined
/// by single spaces, is its argument. Commands that need an argument do
/// nothing without one. An empty line is ignored.
pub fn execute(ctx: &mut ActionContext<'_>, line: &str, home: &Path) {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return;
    };
    let args = words.collect::<Vec<_>>().join(" ");
    let state = ctx.state();

    tracing::debug!(command, args = %args, "executing command");

    match command {
        "q" | "quit" => ctx.exit(),
        "cd" => {
            if !args.is_empty() {
                ctx.navigate(resolve(&state.current_path, &args, home));
            }
        }
        "mkdir" => {
            if !args.is_empty() {
                ctx.request(Request::FileOperation(FileOperation::CreateDirectory {
                    path: state.current_path.join(&args),
                }));
            }
        }
        "touch" => {
            if !args.is_empty() {
                ctx.request(Request::FileOperation(FileOperation::CreateFile {
                    path: state.current_path.join(&args),
                }));
            }
        }
        "sort" => match SortSpec::parse(&args) {
            Some(sort) => {
                ctx.dispatch(Action::SetSort(sort));
                ctx.refresh();
            }
            None => ctx.dispatch(Action::SetError(Some(format!("Invalid sort: {args}")))),
        },
        "hidden" => {
            ctx.dispatch(Action::ToggleHidden);
            ctx.refresh();
        }
        other => ctx.dispatch(Action::SetError(Some(format!("Unknown command: {other}")))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::domain::{SortField, SortOrder};
    use std::path::PathBuf;

    fn run(line: &str) -> (Vec<Action>, Vec<Request>) {
        let state = AppState::new("/home/me/src".into(), false, SortSpec::default());
        let mut ctx = ActionContext::new(&state, 0, 10);
        execute(&mut ctx, line, Path::new("/home/me"));
        ctx.into_parts()
    }

    #[test]
    fn quit_aliases() {
        assert_eq!(run("q").1, vec![Request::Exit]);
        assert_eq!(run("  quit  ").1, vec![Request::Exit]);
    }

    #[test]
    fn cd_resolves_lexically() {
        assert_eq!(run("cd ..").1, vec![Request::Navigate(PathBuf::from("/home/me"))]);
        assert_eq!(run("cd ~/notes").1, vec![Request::Navigate(PathBuf::from("/home/me/notes"))]);
        assert_eq!(run("cd /tmp").1, vec![Request::Navigate(PathBuf::from("/tmp"))]);
        assert_eq!(run("cd"), (vec![], vec![]));
    }

    #[test]
    fn mkdir_and_touch_join_the_current_directory() {
        assert_eq!(
            run("mkdir a b").1,
            vec![Request::FileOperation(FileOperation::CreateDirectory {
                path: PathBuf::from("/home/me/src/a b")
            })]
        );
        assert_eq!(
            run("touch notes.md").1,
            vec![Request::FileOperation(FileOperation::CreateFile {
                path: PathBuf::from("/home/me/src/notes.md")
            })]
        );
    }

    #[test]
    fn sort_updates_listing_order_and_refreshes() {
        let (actions, requests) = run("sort size desc");
        assert_eq!(
            actions,
            vec![Action::SetSort(SortSpec {
                field: SortField::Size,
                order: SortOrder::Desc
            })]
        );
        assert_eq!(requests, vec![Request::Refresh]);
        assert_eq!(run("sort colour").0, vec![Action::SetError(Some("Invalid sort: colour".into()))]);
    }

    #[test]
    fn unknown_and_empty_commands() {
        assert_eq!(run("frobnicate x").0, vec![Action::SetError(Some("Unknown command: frobnicate".into()))]);
        assert_eq!(run("   "), (vec![], vec![]));
    }
}

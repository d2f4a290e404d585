/*!
 * "Open with system" action: hand the node under the cursor to Finder,
 * Dolphin, Explorer and friends
 */

use std::sync::Arc;

use chadtree_host::SelectionProvider;

use crate::dispatch::UiHandle;
use crate::error::{OpenError, Result};
use crate::opener::{SystemOpener, Target};
use crate::pool::WorkerPool;

/// Everything the action borrows from the host
#[derive(Clone)]
pub struct OpenSysContext {
    pub selection: Arc<dyn SelectionProvider>,
    pub opener: SystemOpener,
    pub pool: Arc<WorkerPool>,
    pub ui: UiHandle,
}

/// Open the first selected node with the system opener.
///
/// Runs on the RPC dispatch thread: reads the selection and cwd, queues the
/// launch and returns. An empty selection does nothing. Only the first node of
/// a visual selection is opened.
pub fn open_sys(ctx: &OpenSysContext, is_visual: bool) -> Result<()> {
    let Some(node) = ctx.selection.indices(is_visual)?.into_iter().next() else {
        return Ok(());
    };
    let cwd = ctx.selection.cwd()?;
    let target = Target::new(node.path, cwd);

    let opener = ctx.opener.clone();
    let ui = ctx.ui.clone();
    ctx.pool.submit(move || {
        let result = opener.open(&target);
        report(&ui, &target, result);
    });

    Ok(())
}

/// Known failures go to the user, the rest only to the log
fn report(ui: &UiHandle, target: &Target, result: std::result::Result<(), OpenError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_user_visible() => {
            tracing::info!(
                path = %target.path.display(),
                category = %e.category(),
                error = %e,
                "system open failed"
            );
            ui.write(e.to_string(), true);
        }
        Err(e) => {
            tracing::error!(
                path = %target.path.display(),
                cwd = %target.cwd.display(),
                category = %e.category(),
                error = ?e,
                "unexpected failure opening with system opener"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ui_channel;
    use crate::localization::Localization;
    use crate::opener::ExecutableLocator;
    use chadtree_host::{HostError, Node};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticSelection {
        nodes: Vec<Node>,
        cwd: PathBuf,
    }

    impl SelectionProvider for StaticSelection {
        fn indices(&self, is_visual: bool) -> std::result::Result<Vec<Node>, HostError> {
            if is_visual {
                Ok(self.nodes.clone())
            } else {
                Ok(self.nodes.iter().take(1).cloned().collect())
            }
        }

        fn cwd(&self) -> std::result::Result<PathBuf, HostError> {
            Ok(self.cwd.clone())
        }
    }

    struct BrokenSelection;

    impl SelectionProvider for BrokenSelection {
        fn indices(&self, _is_visual: bool) -> std::result::Result<Vec<Node>, HostError> {
            Err(HostError::Unavailable("buffer gone".into()))
        }

        fn cwd(&self) -> std::result::Result<PathBuf, HostError> {
            Err(HostError::Unavailable("buffer gone".into()))
        }
    }

    /// Never finds anything, counts how often it was asked
    #[derive(Default)]
    struct CountingLocator(AtomicUsize);

    impl ExecutableLocator for CountingLocator {
        fn locate(&self, _name: &str) -> Option<PathBuf> {
            self.0.fetch_add(1, Ordering::SeqCst);
            None
        }
    }

    fn context(
        selection: Arc<dyn SelectionProvider>,
        locator: Arc<dyn ExecutableLocator>,
    ) -> (OpenSysContext, crate::dispatch::UiLoop) {
        let (ui, ui_loop) = ui_channel();
        let ctx = OpenSysContext {
            selection,
            opener: SystemOpener::new(
                locator,
                Arc::new(Localization::for_language("en").unwrap()),
            ),
            pool: Arc::new(WorkerPool::new(2).unwrap()),
            ui,
        };
        (ctx, ui_loop)
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let locator = Arc::new(CountingLocator::default());
        let (ctx, ui_loop) = context(
            Arc::new(StaticSelection {
                nodes: vec![],
                cwd: PathBuf::from("/"),
            }),
            locator.clone(),
        );

        open_sys(&ctx, true).unwrap();
        assert!(ctx.pool.wait_idle_timeout(Duration::from_secs(5)));

        assert_eq!(locator.0.load(Ordering::SeqCst), 0);
        assert!(ui_loop.is_empty());
    }

    #[test]
    fn test_missing_opener_is_reported_to_ui() {
        crate::logging::init_test_logging();
        let (ctx, ui_loop) = context(
            Arc::new(StaticSelection {
                nodes: vec![Node::new("/home/u/file.txt")],
                cwd: PathBuf::from("/home/u"),
            }),
            Arc::new(CountingLocator::default()),
        );

        open_sys(&ctx, false).unwrap();
        assert!(ctx.pool.wait_idle_timeout(Duration::from_secs(5)));

        let mut area: Vec<(String, bool)> = Vec::new();
        assert_eq!(ui_loop.pump(&mut area), 1);
        let expected = Localization::for_language("en")
            .unwrap()
            .lookup(crate::opener::SYS_OPEN_ERR);
        assert_eq!(area, vec![(expected, true)]);
    }

    #[test]
    fn test_host_failure_propagates_to_caller() {
        let (ctx, ui_loop) = context(
            Arc::new(BrokenSelection),
            Arc::new(CountingLocator::default()),
        );

        let err = open_sys(&ctx, false).unwrap_err();
        assert!(matches!(err, crate::error::ChadError::Host(_)));
        assert_eq!(ctx.pool.pending(), 0);
        assert!(ui_loop.is_empty());
    }

    #[test]
    fn test_report_hides_unexpected_errors() {
        crate::logging::init_test_logging();
        let (ui, ui_loop) = ui_channel();
        let target = Target::new("/x", "/");

        report(&ui, &target, Ok(()));
        report(
            &ui,
            &target,
            Err(OpenError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            ))),
        );
        assert!(ui_loop.is_empty());

        report(
            &ui,
            &target,
            Err(OpenError::LaunchFailed {
                program: PathBuf::from("xdg-open"),
                code: Some(2),
                stderr: "bad".into(),
            }),
        );
        let mut area: Vec<(String, bool)> = Vec::new();
        assert_eq!(ui_loop.pump(&mut area), 1);
        assert_eq!(area[0], ("xdg-open exited with 2: bad".to_string(), true));
    }

    #[test]
    fn test_unexpected_errors_reach_error_log() {
        let (ui, ui_loop) = ui_channel();
        let target = Target::new("/x", "/");

        let out = crate::logging::capture_logs(|| {
            report(
                &ui,
                &target,
                Err(OpenError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "denied",
                ))),
            );
        });

        let line = out
            .lines()
            .find(|l| l.contains("unexpected failure opening with system opener"))
            .unwrap_or_else(|| panic!("no error event in: {}", out));
        assert!(line.contains("ERROR"));
        assert!(line.contains("PermissionDenied"));
        assert!(line.contains("path=/x"));
        assert!(ui_loop.is_empty());
    }

    #[test]
    fn test_known_errors_are_not_logged_as_errors() {
        let (ui, ui_loop) = ui_channel();
        let target = Target::new("/x", "/");

        let out = crate::logging::capture_logs(|| {
            report(
                &ui,
                &target,
                Err(OpenError::LaunchFailed {
                    program: PathBuf::from("xdg-open"),
                    code: Some(2),
                    stderr: "bad".into(),
                }),
            );
        });

        assert!(out.contains("system open failed"));
        assert!(!out.contains("ERROR"));
        assert_eq!(ui_loop.len(), 1);
    }
}

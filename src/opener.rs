/*!
 * Open a path with the platform's file manager / default viewer
 *
 * The opener is picked by availability, not by target OS: the first of
 * `open`, `xdg-open`, `start` found on the search path wins.
 */

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::error::OpenError;
use crate::localization::Localization;

/// Candidate openers, highest priority first
pub const OPENERS: [&str; 3] = ["open", "xdg-open", "start"];

/// Localization key for the "no opener" message
pub const SYS_OPEN_ERR: &str = "sys_open_err";

/// Finds executables by name
pub trait ExecutableLocator: Send + Sync {
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// `which`-style lookup over extra directories, then optionally `PATH`
#[derive(Debug, Clone)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
    inherit_env: bool,
}

impl SearchPath {
    /// Plain `PATH` lookup
    pub fn system() -> Self {
        Self {
            dirs: Vec::new(),
            inherit_env: true,
        }
    }

    /// `dirs` first, then `PATH`
    pub fn with_extra(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            inherit_env: true,
        }
    }

    /// Only `dirs`, ignoring `PATH`
    pub fn only(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            inherit_env: false,
        }
    }
}

impl ExecutableLocator for SearchPath {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        if !self.dirs.is_empty() {
            if let Ok(paths) = std::env::join_paths(&self.dirs) {
                if let Ok(found) = which::which_in(name, Some(paths), ".") {
                    return Some(found);
                }
            }
        }
        if self.inherit_env {
            which::which(name).ok()
        } else {
            None
        }
    }
}

/// What to open and where to run the opener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub cwd: PathBuf,
}

impl Target {
    pub fn new(path: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cwd: cwd.into(),
        }
    }
}

/// Program plus arguments, ready to spawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    /// Which candidate matched
    pub opener: &'static str,
    /// Resolved executable
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl LaunchCommand {
    fn for_opener(opener: &'static str, program: PathBuf, path: &Path) -> Self {
        let mut args = Vec::with_capacity(2);
        // `open` takes flags; keep a leading `-` in the path from reading as one
        if opener == "open" {
            args.push(OsString::from("--"));
        }
        args.push(path.as_os_str().to_owned());
        Self {
            opener,
            program,
            args,
        }
    }

    /// Every token, program first
    pub fn argv(&self) -> Vec<&OsStr> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .collect()
    }

    /// The process to spawn: no stdin, output captured
    pub fn to_command(&self, cwd: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

/// Resolves and runs the system opener
#[derive(Clone)]
pub struct SystemOpener {
    locator: Arc<dyn ExecutableLocator>,
    lang: Arc<Localization>,
}

impl SystemOpener {
    pub fn new(locator: Arc<dyn ExecutableLocator>, lang: Arc<Localization>) -> Self {
        Self { locator, lang }
    }

    /// First available opener, paired with `path`
    pub fn resolve_command(&self, path: &Path) -> Result<LaunchCommand, OpenError> {
        OPENERS
            .iter()
            .find_map(|&opener| {
                self.locator
                    .locate(opener)
                    .map(|program| LaunchCommand::for_opener(opener, program, path))
            })
            .ok_or_else(|| OpenError::OpenerNotFound {
                key: SYS_OPEN_ERR,
                message: self.lang.lookup(SYS_OPEN_ERR),
            })
    }

    /// Resolve, then run to completion. Blocks; call from a worker.
    pub fn open(&self, target: &Target) -> Result<(), OpenError> {
        let command = self.resolve_command(&target.path)?;
        tracing::debug!(
            program = %command.program.display(),
            path = %target.path.display(),
            cwd = %target.cwd.display(),
            "launching system opener"
        );

        let output = command.to_command(&target.cwd).output()?;
        if output.status.success() {
            tracing::debug!(path = %target.path.display(), "system opener finished");
            Ok(())
        } else {
            Err(OpenError::LaunchFailed {
                program: command.program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

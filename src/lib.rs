/*!
 * CHADTree - system integration for the file tree
 *
 * Opens the node under the cursor with the platform's own file manager or
 * default viewer:
 * - Opener picked by availability (`open`, `xdg-open`, `start`)
 * - Launched on a host-owned background pool, never on the UI thread
 * - Known failures shown in the editor, everything else logged
 */

pub mod actions;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod localization;
pub mod logging;
pub mod opener;
pub mod pool;

// Re-export commonly used types
pub use actions::{open_sys, OpenSysContext};
pub use chadtree_host::{HostError, MessageArea, Node, SelectionProvider};
pub use config::{LogLevel, Settings};
pub use dispatch::{ui_channel, UiHandle, UiLoop, UiMessage};
pub use error::{ChadError, OpenError, Result};
pub use localization::Localization;
pub use opener::{ExecutableLocator, LaunchCommand, SearchPath, SystemOpener, Target};
pub use pool::WorkerPool;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

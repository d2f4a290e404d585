/*!
 * CHADTree CLI - drive the file tree actions from a terminal
 *
 * Acts as its own host: the command-line paths are the selection, the
 * terminal is the message area.
 */

use chadtree::{
    config::{LogLevel, Settings},
    error::{ChadError, Result, EXIT_FAILURE, EXIT_SUCCESS},
    logging, open_sys, ui_channel, HostError, Localization, MessageArea, Node, OpenSysContext,
    SearchPath, SelectionProvider, SystemOpener, WorkerPool,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "chadtree")]
#[command(version, about = "Open files with the system file manager", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging (debug level)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Write JSON logs to this file instead of stderr
    #[arg(long = "log-file", global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log level
    #[arg(long = "log-level", value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the first path with the system opener
    Open {
        /// Paths making up the selection
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Working directory for the opener (default: current directory)
        #[arg(long, value_name = "DIR")]
        cwd: Option<PathBuf>,

        /// Treat the paths as a visual selection
        #[arg(long)]
        visual: bool,
    },

    /// Print the command that would be used to open PATH
    Resolve {
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Also write it to the default config location
        #[arg(long)]
        write: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

/// The command line as a file-tree selection
struct ArgSelection {
    nodes: Vec<Node>,
    cwd: PathBuf,
}

impl SelectionProvider for ArgSelection {
    fn indices(&self, is_visual: bool) -> std::result::Result<Vec<Node>, HostError> {
        if is_visual {
            Ok(self.nodes.clone())
        } else {
            Ok(self.nodes.iter().take(1).cloned().collect())
        }
    }

    fn cwd(&self) -> std::result::Result<PathBuf, HostError> {
        if self.cwd.is_dir() {
            Ok(self.cwd.clone())
        } else {
            Err(HostError::InvalidCwd(self.cwd.clone()))
        }
    }
}

/// stderr for errors, stdout for everything else
#[derive(Default)]
struct Terminal {
    errors: usize,
}

impl MessageArea for Terminal {
    fn write(&mut self, message: &str, error: bool) {
        if error {
            self.errors += 1;
            eprintln!("Error: {}", message);
        } else {
            println!("{}", message);
        }
    }
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.verbose |= cli.verbose;
    if let Some(level) = cli.log_level {
        settings.log_level = level.into();
    }
    if cli.log_file.is_some() {
        settings.log_file = cli.log_file.clone();
    }
    logging::init_logging(&settings)?;

    match cli.command {
        Commands::Open { paths, cwd, visual } => open(&settings, paths, cwd, visual),
        Commands::Resolve { path, json } => resolve(&settings, &path, json),
        Commands::Config { write } => show_config(&settings, write),
    }
}

fn system_opener(settings: &Settings) -> Result<SystemOpener> {
    let lang = Localization::for_language(&settings.language)?;
    let search = if settings.opener_search_path.is_empty() {
        SearchPath::system()
    } else {
        SearchPath::with_extra(settings.opener_search_path.clone())
    };
    Ok(SystemOpener::new(Arc::new(search), Arc::new(lang)))
}

fn absolutize(path: PathBuf, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

fn open(
    settings: &Settings,
    paths: Vec<PathBuf>,
    cwd: Option<PathBuf>,
    visual: bool,
) -> Result<i32> {
    let cwd = match cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir()?,
    };
    let nodes = paths
        .into_iter()
        .map(|p| Node::new(absolutize(p, &cwd)))
        .collect();

    let (ui, ui_loop) = ui_channel();
    let ctx = OpenSysContext {
        selection: Arc::new(ArgSelection { nodes, cwd }),
        opener: system_opener(settings)?,
        pool: Arc::new(WorkerPool::new(settings.workers)?),
        ui,
    };

    open_sys(&ctx, visual)?;
    ctx.pool.wait_idle();

    let mut terminal = Terminal::default();
    ui_loop.pump(&mut terminal);

    Ok(if terminal.errors > 0 {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    })
}

fn resolve(settings: &Settings, path: &Path, json: bool) -> Result<i32> {
    let command = system_opener(settings)?.resolve_command(path)?;
    let argv: Vec<String> = command
        .argv()
        .iter()
        .map(|s| s.to_string_lossy().into_owned())
        .collect();
    if json {
        let out = serde_json::to_string_pretty(&serde_json::json!({
            "opener": command.opener,
            "argv": argv,
        }))
        .map_err(|e| ChadError::Config(format!("Failed to serialize command: {}", e)))?;
        println!("{}", out);
    } else {
        println!("{}", argv.join(" "));
    }
    Ok(EXIT_SUCCESS)
}

fn show_config(settings: &Settings, write: bool) -> Result<i32> {
    let contents = toml::to_string_pretty(settings)
        .map_err(|e| ChadError::Config(format!("Failed to serialize config: {}", e)))?;
    print!("{}", contents);

    if write {
        let path = Settings::default_path()
            .ok_or_else(|| ChadError::Config("No config directory on this platform".into()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        settings.to_file(&path)?;
        eprintln!("Wrote {}", path.display());
    }
    Ok(EXIT_SUCCESS)
}

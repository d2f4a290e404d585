//! `prepare`: CI entry point

use chadtree_ci::{Prepare, ProcessEnv};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let root = match std::env::current_dir() {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error: cannot read working directory: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = Prepare::new(root, &ProcessEnv).run() {
        tracing::error!(error = %e, "prepare failed");
        std::process::exit(e.exit_code());
    }
}

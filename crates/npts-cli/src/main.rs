// ─────────────────────────────────────────────────────────────────────
// SCPN NPTS — Command-Line Front End
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `npts` command-line interface.
//!
//! ```sh
//! npts run configs/four_unknowns.json
//! npts run configs/random_4096.json --json
//! npts validate configs/auto_workers.json
//! ```

mod runner;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use npts_types::config::RunConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "npts")]
#[command(about = "Distributed non-periodic tridiagonal solver")]
#[command(version)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the system described by a JSON configuration file.
    Run {
        /// Path to the run configuration.
        config: PathBuf,
        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Check a configuration file without solving.
    Validate {
        /// Path to the run configuration.
        config: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> anyhow::Result<RunConfig> {
    RunConfig::from_file(path)
        .with_context(|| format!("loading {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { config, json } => {
            let cfg = load(&config)?;
            let report = runner::run(&cfg)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                runner::print_report(&report, &config);
            }
            runner::check_verification(&report, cfg.tolerance)
        }
        Commands::Validate { config } => {
            let cfg = load(&config)?;
            println!(
                "Configuration is valid: {} (system_size={}, workers={})",
                config.display(),
                cfg.system_size,
                cfg.workers
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "auto".to_string())
            );
            Ok(())
        }
    }
}

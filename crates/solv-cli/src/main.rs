//! # solv CLI entry point
//!
//! Parses command-line arguments, merges them over the optional YAML
//! configuration, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use solv_audit::AuditConfig;
use solv_cli::audit::{run_audit_cmd, AuditArgs};
use solv_cli::input::{run_input, InputArgs};
use solv_cli::proof::{run_proof, ProofArgs};
use solv_cli::tree::{run_tree, TreeArgs};

/// Proof-of-solvency audit toolchain.
///
/// Commits a liability snapshot into a Poseidon sum-tree, checks it against
/// the on-chain total supply, and prepares the input and artifacts for the
/// external zero-knowledge prover.
#[derive(Parser, Debug)]
#[command(name = "solv", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for generated artifacts.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Tree builder threads per level.
    #[arg(long, global = true)]
    workers: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the liability sum-tree and export roots or inclusion proofs.
    Tree(TreeArgs),

    /// Assemble the circuit input for the external prover.
    Input(InputArgs),

    /// Format Groth16 proofs for the on-chain verifier.
    Proof(ProofArgs),

    /// Run a full audit cycle.
    Audit(AuditArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!("solv CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = load_config(&cli).and_then(|config| match &cli.command {
        Commands::Tree(args) => run_tree(args, &config),
        Commands::Input(args) => run_input(args, &config),
        Commands::Proof(args) => run_proof(args, &config),
        Commands::Audit(args) => run_audit_cmd(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// The config file (or defaults) with global flags applied on top.
fn load_config(cli: &Cli) -> Result<AuditConfig> {
    let mut config = match &cli.config {
        Some(path) => AuditConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AuditConfig::default(),
    };
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    config.validate()?;
    tracing::debug!(?config, "effective configuration");
    Ok(config)
}

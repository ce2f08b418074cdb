//! # Audit Subcommand
//!
//! Runs one complete cycle: snapshot → tree → anchor check → input →
//! proof → submission file. Uses the mock proving backend, so the result
//! exercises the pipeline and the solvency check but carries no
//! zero-knowledge proof.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use solv_audit::{AuditConfig, FileAttestationSource, FileSubmissionTarget};
use solv_zkp::mock::{MockProofSystem, MockProvingKey};

use crate::tree::verified_tree;
use crate::{emit_json, resolve_input, short_hash, INPUT_FILE, MERKLE_ROOT_FILE, SUBMISSION_FILE};

/// Arguments for the `solv audit` subcommand.
#[derive(Args, Debug)]
pub struct AuditArgs {
    #[command(subcommand)]
    pub command: AuditCommand,
}

/// Audit subcommands.
#[derive(Subcommand, Debug)]
pub enum AuditCommand {
    /// Run a full audit cycle and write all artifacts to the output directory.
    Run {
        /// Snapshot JSON file.
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Reserve attestation JSON file.
        #[arg(long)]
        attestation: Option<PathBuf>,
    },
}

/// Execute the audit subcommand.
pub fn run_audit_cmd(args: &AuditArgs, config: &AuditConfig) -> Result<u8> {
    match &args.command {
        AuditCommand::Run {
            snapshot,
            attestation,
        } => cmd_run(snapshot.as_deref(), attestation.as_deref(), config),
    }
}

fn cmd_run(snapshot: Option<&Path>, attestation: Option<&Path>, config: &AuditConfig) -> Result<u8> {
    let attestation = resolve_input(attestation, config.attestation_path.as_deref(), "attestation")?;
    let out_dir = &config.output_dir;

    let verified = verified_tree(snapshot, config)?;
    let root = verified.root_commitment();
    emit_json(Some(out_dir.join(MERKLE_ROOT_FILE).as_path()), "root commitment", &root)?;

    let assembled = verified
        .assemble_from(&FileAttestationSource::new(&attestation))
        .with_context(|| format!("failed to assemble input from {}", attestation.display()))?;
    emit_json(Some(out_dir.join(INPUT_FILE).as_path()), "prover input", assembled.input())?;

    tracing::warn!("using the mock proof system: the proof is transparent and not zero-knowledge");
    let requested = assembled
        .request_proof(&MockProofSystem, &MockProvingKey)
        .context("prover refused the audit input")?;

    let mut target = FileSubmissionTarget::new(out_dir.join(SUBMISSION_FILE));
    let submitted = requested.submit(&mut target)?;

    let hash = root.root_hash.to_decimal();
    println!(
        "OK: audit {} submitted root={}... liabilities={} block={} -> {}",
        submitted.cycle_id(),
        short_hash(&hash),
        root.root_sum,
        root.snapshot_block,
        submitted.receipt().reference
    );
    Ok(0)
}

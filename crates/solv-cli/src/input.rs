//! # Input Subcommand
//!
//! Assembles the prover's `input.json` from an anchor-checked snapshot and
//! the custodian's reserve attestation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use solv_audit::{AuditConfig, FileAttestationSource};

use crate::tree::verified_tree;
use crate::{emit_json, output_path, resolve_input, INPUT_FILE};

/// Arguments for the `solv input` subcommand.
#[derive(Args, Debug)]
pub struct InputArgs {
    #[command(subcommand)]
    pub command: InputCommand,
}

/// Input subcommands.
#[derive(Subcommand, Debug)]
pub enum InputCommand {
    /// Write the circuit input for the external prover.
    Assemble {
        /// Snapshot JSON file.
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Reserve attestation JSON file (structured or flat bank layout).
        #[arg(long)]
        attestation: Option<PathBuf>,
        /// Output file (default: <output-dir>/input.json).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Execute the input subcommand.
pub fn run_input(args: &InputArgs, config: &AuditConfig) -> Result<u8> {
    match &args.command {
        InputCommand::Assemble {
            snapshot,
            attestation,
            out,
        } => cmd_assemble(
            snapshot.as_deref(),
            attestation.as_deref(),
            out.as_deref(),
            config,
        ),
    }
}

fn cmd_assemble(
    snapshot: Option<&Path>,
    attestation: Option<&Path>,
    out: Option<&Path>,
    config: &AuditConfig,
) -> Result<u8> {
    let attestation = resolve_input(attestation, config.attestation_path.as_deref(), "attestation")?;
    let assembled = verified_tree(snapshot, config)?
        .assemble_from(&FileAttestationSource::new(&attestation))
        .with_context(|| format!("failed to assemble input from {}", attestation.display()))?;

    let path = output_path(out, config, INPUT_FILE);
    emit_json(Some(path.as_path()), "prover input", assembled.input())?;
    println!(
        "OK: input written to {} (totalIssuance={})",
        path.display(),
        assembled.input().total_issuance
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solv_audit::files::load_json_typed;
    use solv_zkp::INPUT_FIELD_NAMES;

    #[test]
    fn writes_input_with_circuit_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(
            &snapshot,
            r#"{"blockNumber":1,"totalSupply":"30","users":[
                {"address":"1","balance":"10"},{"address":"2","balance":"20"}]}"#,
        )
        .unwrap();
        let attestation = dir.path().join("bank_input.json");
        std::fs::write(
            &attestation,
            r#"{"bankPubKeyAx":"1","bankPubKeyAy":"2","bankBalance":"50",
                "bankSigR8x":"3","bankSigR8y":"4","bankSigS":"5"}"#,
        )
        .unwrap();
        let config = AuditConfig {
            output_dir: dir.path().to_path_buf(),
            ..AuditConfig::default()
        };

        cmd_assemble(Some(snapshot.as_path()), Some(attestation.as_path()), None, &config).unwrap();

        let written: serde_json::Map<String, serde_json::Value> =
            load_json_typed(&dir.path().join(INPUT_FILE)).unwrap();
        for name in INPUT_FIELD_NAMES {
            assert!(written.contains_key(name), "missing {name}");
        }
        assert_eq!(written["totalIssuance"], "30");
        assert_eq!(written["bankBalance"], "50");
    }

    #[test]
    fn missing_attestation_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(&snapshot, r#"{"blockNumber":1,"totalSupply":"1","users":[{"address":"1","balance":"1"}]}"#)
            .unwrap();
        assert!(cmd_assemble(Some(snapshot.as_path()), None, None, &AuditConfig::default()).is_err());
    }
}

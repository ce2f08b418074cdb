//! # Proof Subcommand
//!
//! Formats a snarkjs Groth16 proof and its public signals as arguments for
//! the on-chain verifier, optionally together with the root commitment of
//! the cycle, ready to hand to a relayer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use solv_audit::files::load_json_typed;
use solv_audit::{AuditConfig, RootCommitment};
use solv_core::{Amount, FieldElement};
use solv_zkp::{Groth16Proof, SolidityCalldata};

use crate::emit_json;

/// Arguments for the `solv proof` subcommand.
#[derive(Args, Debug)]
pub struct ProofArgs {
    #[command(subcommand)]
    pub command: ProofCommand,
}

/// Proof subcommands.
#[derive(Subcommand, Debug)]
pub enum ProofCommand {
    /// Convert proof.json + public.json into verifier calldata.
    Calldata {
        /// snarkjs proof file.
        #[arg(long)]
        proof: PathBuf,
        /// snarkjs public signals file (JSON array of decimal strings).
        #[arg(long)]
        public: PathBuf,
        /// Root commitment file; adds `rootHash` and `totalLiabilities`.
        #[arg(long)]
        root: Option<PathBuf>,
        /// Output file (default: stdout).
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print the raw comma-separated argument list instead of JSON.
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitAuditArgs {
    #[serde(flatten)]
    calldata: SolidityCalldata,
    #[serde(skip_serializing_if = "Option::is_none")]
    root_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_liabilities: Option<Amount>,
}

/// Execute the proof subcommand.
pub fn run_proof(args: &ProofArgs, _config: &AuditConfig) -> Result<u8> {
    match &args.command {
        ProofCommand::Calldata {
            proof,
            public,
            root,
            out,
            raw,
        } => {
            let proof: Groth16Proof = load_json_typed(proof)
                .with_context(|| format!("failed to read proof {}", proof.display()))?;
            let signals: Vec<FieldElement> = load_json_typed(public)
                .with_context(|| format!("failed to read public signals {}", public.display()))?;
            let calldata = proof.to_calldata(&signals)?;

            if *raw {
                println!("{}", calldata.to_arguments());
                return Ok(0);
            }

            let root = match root {
                Some(path) => Some(
                    load_json_typed::<RootCommitment>(path)
                        .with_context(|| format!("failed to read root commitment {}", path.display()))?,
                ),
                None => None,
            };
            let payload = SubmitAuditArgs {
                calldata,
                root_hash: root.as_ref().map(RootCommitment::root_hash_hex),
                total_liabilities: root.map(|r| r.root_sum),
            };
            emit_json(out.as_deref(), "calldata", &payload)?;
            Ok(0)
        }
    }
}

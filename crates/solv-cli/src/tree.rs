//! # Tree Subcommand
//!
//! Builds the liability sum-tree from a snapshot file, checks the root sum
//! against the snapshot's `totalSupply`, and exports the root commitment or
//! per-owner inclusion proofs.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Deserialize;

use solv_audit::files::load_json_typed;
use solv_audit::{AnchorVerified, AuditConfig, AuditCycle};
use solv_crypto::InclusionProof;

use crate::{emit_json, open_cycle, output_path, resolve_input, short_hash, MERKLE_ROOT_FILE};

/// Arguments for the `solv tree` subcommand.
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(subcommand)]
    pub command: TreeCommand,
}

/// Tree subcommands.
#[derive(Subcommand, Debug)]
pub enum TreeCommand {
    /// Build the tree, check it against the total supply, write the root commitment.
    Build {
        /// Snapshot JSON file.
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Output file (default: <output-dir>/merkle_root.json).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export inclusion proofs for one leaf or for all of them.
    Prove {
        /// Snapshot JSON file.
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Leaf index to prove.
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        index: Option<usize>,
        /// Prove every leaf.
        #[arg(long)]
        all: bool,
        /// Output file (default: stdout).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Verify an inclusion proof file (a single proof or an array).
    Verify {
        /// Proof JSON file.
        #[arg(value_name = "FILE")]
        proof: PathBuf,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProofFile {
    One(InclusionProof),
    Many(Vec<InclusionProof>),
}

/// Execute the tree subcommand.
pub fn run_tree(args: &TreeArgs, config: &AuditConfig) -> Result<u8> {
    match &args.command {
        TreeCommand::Build { snapshot, out } => cmd_build(snapshot.as_deref(), out.as_deref(), config),
        TreeCommand::Prove {
            snapshot,
            index,
            all,
            out,
        } => cmd_prove(snapshot.as_deref(), *index, *all, out.as_deref(), config),
        TreeCommand::Verify { proof } => cmd_verify(proof),
    }
}

/// Load, build and anchor-check.
pub(crate) fn verified_tree(
    snapshot: Option<&Path>,
    config: &AuditConfig,
) -> Result<AuditCycle<AnchorVerified>> {
    let snapshot = resolve_input(snapshot, config.snapshot_path.as_deref(), "snapshot")?;
    let verified = open_cycle(&snapshot)?
        .build_tree(&config.tree_builder())
        .context("failed to build liability tree")?
        .verify_anchor()
        .context("liability tree does not match the on-chain total supply")?;
    Ok(verified)
}

fn cmd_build(snapshot: Option<&Path>, out: Option<&Path>, config: &AuditConfig) -> Result<u8> {
    let verified = verified_tree(snapshot, config)?;
    let record = verified.root_commitment();
    let path = output_path(out, config, MERKLE_ROOT_FILE);
    emit_json(Some(path.as_path()), "root commitment", &record)?;

    let hash = record.root_hash.to_decimal();
    println!(
        "OK: tree built root={}... sum={} block={} leaves={}",
        short_hash(&hash),
        record.root_sum,
        record.snapshot_block,
        verified.tree().leaf_count()
    );
    Ok(0)
}

fn cmd_prove(
    snapshot: Option<&Path>,
    index: Option<usize>,
    all: bool,
    out: Option<&Path>,
    config: &AuditConfig,
) -> Result<u8> {
    let verified = verified_tree(snapshot, config)?;
    let tree = verified.tree();

    match (index, all) {
        (_, true) => {
            let proofs = tree.inclusion_proofs()?;
            emit_json(out, "inclusion proofs", &proofs)?;
            tracing::info!(proofs = proofs.len(), "exported inclusion proofs");
        }
        (Some(i), false) => {
            let proof = tree.inclusion_proof(i)?;
            emit_json(out, "inclusion proof", &proof)?;
        }
        (None, false) => bail!("pass --index N or --all"),
    }
    Ok(0)
}

fn cmd_verify(path: &Path) -> Result<u8> {
    let proofs = match load_json_typed::<ProofFile>(path)
        .with_context(|| format!("failed to read proof file {}", path.display()))?
    {
        ProofFile::One(p) => vec![p],
        ProofFile::Many(ps) => ps,
    };

    let mut failed = 0usize;
    for proof in &proofs {
        if proof.verify()? {
            println!("OK: leaf {} ({})", proof.leaf_index, proof.record.owner);
        } else {
            println!("FAIL: leaf {} ({})", proof.leaf_index, proof.record.owner);
            failed += 1;
        }
    }

    if failed > 0 {
        eprintln!("{failed} of {} proofs failed verification", proofs.len());
        return Ok(1);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solv_core::Amount;

    fn write_snapshot(dir: &Path, total_supply: &str) -> PathBuf {
        let path = dir.join("snapshot.json");
        std::fs::write(
            &path,
            format!(
                r#"{{"blockNumber":7,"totalSupply":"{total_supply}","users":[
                    {{"address":"0x01","balance":"10"}},
                    {{"address":"0x02","balance":"20"}},
                    {{"address":"0x03","balance":"30"}}]}}"#
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn build_writes_root_commitment() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = write_snapshot(dir.path(), "60");
        let out = dir.path().join("merkle_root.json");
        let code = cmd_build(Some(snapshot.as_path()), Some(out.as_path()), &AuditConfig::default()).unwrap();
        assert_eq!(code, 0);

        let record: solv_audit::RootCommitment = load_json_typed(&out).unwrap();
        assert_eq!(record.root_sum, Amount::from(60u64));
        assert_eq!(record.snapshot_block, 7);
    }

    #[test]
    fn build_fails_on_supply_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = write_snapshot(dir.path(), "61");
        let out = dir.path().join("merkle_root.json");
        assert!(cmd_build(Some(snapshot.as_path()), Some(out.as_path()), &AuditConfig::default()).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn exported_proofs_verify() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = write_snapshot(dir.path(), "60");
        let out = dir.path().join("proofs.json");
        cmd_prove(Some(snapshot.as_path()), None, true, Some(out.as_path()), &AuditConfig::default()).unwrap();
        assert_eq!(cmd_verify(&out).unwrap(), 0);
    }

    #[test]
    fn tampered_proof_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = write_snapshot(dir.path(), "60");
        let out = dir.path().join("proof.json");
        cmd_prove(Some(snapshot.as_path()), Some(1), false, Some(out.as_path()), &AuditConfig::default()).unwrap();

        let mut proof: InclusionProof = load_json_typed(&out).unwrap();
        proof.record.balance = Amount::from(21u64);
        std::fs::write(&out, serde_json::to_string(&proof).unwrap()).unwrap();
        assert_eq!(cmd_verify(&out).unwrap(), 1);
    }

    #[test]
    fn prove_rejects_out_of_range_index() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = write_snapshot(dir.path(), "60");
        assert!(cmd_prove(Some(snapshot.as_path()), Some(3), false, None, &AuditConfig::default()).is_err());
    }
}

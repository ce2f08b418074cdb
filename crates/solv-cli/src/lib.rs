//! # solv-cli — Command-Line Interface
//!
//! Provides the `solv` binary.
//!
//! ## Subcommands
//!
//! - `solv tree build` — build the sum-tree, check it against the snapshot's
//!   total supply, write `merkle_root.json`.
//! - `solv tree prove` / `solv tree verify` — export and check per-owner
//!   inclusion proofs.
//! - `solv input assemble` — write the prover's `input.json`.
//! - `solv proof calldata` — format a snarkjs Groth16 proof for the
//!   on-chain verifier.
//! - `solv audit run` — a full cycle with the mock prover and a file
//!   submission target.
//!
//! ```bash
//! solv -v tree build --snapshot data/snapshot.json
//! solv audit run --snapshot data/snapshot.json --attestation data/bank_input.json --output-dir out
//! ```
//!
//! Every handler returns `anyhow::Result<u8>`; the binary turns errors into
//! exit code 1.

pub mod audit;
pub mod input;
pub mod proof;
pub mod tree;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use solv_audit::{AuditConfig, AuditCycle, FileSnapshotSource, SnapshotReady};

/// Default file names inside the output directory.
pub const MERKLE_ROOT_FILE: &str = "merkle_root.json";
pub const INPUT_FILE: &str = "input.json";
pub const SUBMISSION_FILE: &str = "submission.json";

/// Pick the flag value, else the configured value, else fail naming the flag.
pub fn resolve_input(flag: Option<&Path>, configured: Option<&Path>, name: &str) -> Result<PathBuf> {
    match flag.or(configured) {
        Some(path) => Ok(path.to_path_buf()),
        None => bail!("no {name} given: pass --{name} or set {name}_path in the config file"),
    }
}

/// Start a cycle from the snapshot file.
pub fn open_cycle(snapshot: &Path) -> Result<AuditCycle<SnapshotReady>> {
    AuditCycle::from_source(&FileSnapshotSource::new(snapshot))
        .with_context(|| format!("failed to load snapshot {}", snapshot.display()))
}

/// `--out` if given, otherwise `<output_dir>/<default_name>`.
pub fn output_path(out: Option<&Path>, config: &AuditConfig, default_name: &str) -> PathBuf {
    out.map(Path::to_path_buf)
        .unwrap_or_else(|| config.output_dir.join(default_name))
}

/// Write pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn emit_json<T: Serialize>(path: Option<&Path>, what: &'static str, value: &T) -> Result<()> {
    match path {
        Some(path) => solv_audit::files::write_json_pretty(path, what, value)
            .with_context(|| format!("failed to write {what} to {}", path.display())),
        None => {
            let body = serde_json::to_string_pretty(value)
                .with_context(|| format!("failed to serialize {what}"))?;
            println!("{body}");
            Ok(())
        }
    }
}

/// First ten characters of a decimal root hash, for console output.
pub fn short_hash(decimal: &str) -> &str {
    match decimal.char_indices().nth(10) {
        Some((i, _)) => &decimal[..i],
        None => decimal,
    }
}

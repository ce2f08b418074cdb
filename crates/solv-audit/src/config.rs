//! # Audit Configuration
//!
//! Optional YAML file consulted by the CLI. Every field has a default and
//! every field can be overridden by a command-line flag.
//!
//! ```yaml
//! snapshot_path: data/snapshot.json
//! attestation_path: data/bank_input.json
//! output_dir: out
//! workers: 4
//! parallel_threshold: 1024
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use solv_crypto::SumTreeBuilder;

use crate::error::{AuditError, AuditResult};
use crate::files::load_yaml_typed;

/// Settings for one audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    pub snapshot_path: Option<PathBuf>,
    pub attestation_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    /// Builder threads per tree level.
    pub workers: usize,
    /// Minimum level width before the builder spawns workers.
    pub parallel_threshold: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            attestation_path: None,
            output_dir: PathBuf::from("."),
            workers: 1,
            parallel_threshold: 1024,
        }
    }
}

impl AuditConfig {
    /// Load and validate a YAML configuration file.
    pub fn load(path: &Path) -> AuditResult<Self> {
        let config: AuditConfig = load_yaml_typed(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AuditResult<()> {
        if self.workers == 0 {
            return Err(AuditError::Config("workers must be at least 1".into()));
        }
        if self.parallel_threshold == 0 {
            return Err(AuditError::Config(
                "parallel_threshold must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The tree builder these settings describe.
    pub fn tree_builder(&self) -> SumTreeBuilder {
        SumTreeBuilder::new()
            .with_workers(self.workers)
            .with_parallel_threshold(self.parallel_threshold)
    }
}

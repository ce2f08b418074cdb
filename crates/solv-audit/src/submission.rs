//! # Submission
//!
//! The final hand-off of a cycle: the proof, the root hash as `bytes32`, the
//! committed total and the snapshot height. Broadcasting to a ledger is the
//! relayer's job; a [`SubmissionTarget`] only accepts the payload and
//! reports where it went.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solv_core::{Amount, FieldElement};
use uuid::Uuid;

use crate::error::{AuditError, AuditResult};
use crate::files::write_json_pretty;

/// Everything the on-chain `submitAudit` call needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSubmission<P> {
    /// Cycle that produced the submission.
    pub cycle_id: Uuid,
    /// Proof artifact from the proving backend.
    pub proof: P,
    /// Public signals the proof was generated against.
    pub public_signals: Vec<FieldElement>,
    /// Root commitment as `0x` + 64 hex digits.
    pub root_hash_hex: String,
    /// Committed total liabilities (the root sum).
    pub total_liabilities: Amount,
    /// Snapshot block height.
    pub snapshot_block: u64,
}

/// Acknowledgement from a submission target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Target-specific reference (file path, queue id, ...).
    pub reference: String,
    pub submitted_at: DateTime<Utc>,
}

/// Accepts finished submissions.
///
/// A target that refuses a payload (a relayer rejecting it, a duplicate
/// cycle) reports [`AuditError::Submission`].
pub trait SubmissionTarget<P> {
    fn submit(&mut self, submission: &AuditSubmission<P>) -> AuditResult<SubmissionReceipt>;
}

/// Keeps submissions in memory. A second payload for the same cycle is refused.
#[derive(Debug, Clone)]
pub struct RecordingSubmissionTarget<P> {
    submissions: Vec<AuditSubmission<P>>,
}

impl<P> Default for RecordingSubmissionTarget<P> {
    fn default() -> Self {
        Self {
            submissions: Vec::new(),
        }
    }
}

impl<P> RecordingSubmissionTarget<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> &[AuditSubmission<P>] {
        &self.submissions
    }
}

impl<P: Clone> SubmissionTarget<P> for RecordingSubmissionTarget<P> {
    fn submit(&mut self, submission: &AuditSubmission<P>) -> AuditResult<SubmissionReceipt> {
        if self.submissions.iter().any(|s| s.cycle_id == submission.cycle_id) {
            return Err(AuditError::Submission(format!(
                "cycle {} was already submitted",
                submission.cycle_id
            )));
        }
        self.submissions.push(submission.clone());
        Ok(SubmissionReceipt {
            reference: format!("memory:{}", self.submissions.len() - 1),
            submitted_at: Utc::now(),
        })
    }
}

/// Writes the submission JSON for an external relayer to pick up.
#[derive(Debug, Clone)]
pub struct FileSubmissionTarget {
    path: PathBuf,
}

impl FileSubmissionTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<P: Serialize> SubmissionTarget<P> for FileSubmissionTarget {
    fn submit(&mut self, submission: &AuditSubmission<P>) -> AuditResult<SubmissionReceipt> {
        write_json_pretty(&self.path, "submission", submission)?;
        tracing::info!(path = %self.path.display(), cycle_id = %submission.cycle_id, "submission written");
        Ok(SubmissionReceipt {
            reference: self.path.display().to_string(),
            submitted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> AuditSubmission<String> {
        AuditSubmission {
            cycle_id: Uuid::nil(),
            proof: "proof".to_string(),
            public_signals: vec![FieldElement::from_u64(300)],
            root_hash_hex: FieldElement::from_u64(9).to_bytes32_hex(),
            total_liabilities: Amount::from(300u64),
            snapshot_block: 42,
        }
    }

    #[test]
    fn recording_target_keeps_submissions() {
        let mut target = RecordingSubmissionTarget::new();
        let receipt = target.submit(&submission()).unwrap();
        assert_eq!(receipt.reference, "memory:0");
        assert_eq!(target.submissions(), &[submission()]);
    }

    #[test]
    fn recording_target_refuses_a_resubmitted_cycle() {
        let mut target = RecordingSubmissionTarget::new();
        target.submit(&submission()).unwrap();
        let err = target.submit(&submission()).unwrap_err();
        assert!(matches!(err, AuditError::Submission(_)));
        assert_eq!(target.submissions().len(), 1);

        let other = AuditSubmission {
            cycle_id: Uuid::from_u128(7),
            ..submission()
        };
        assert_eq!(target.submit(&other).unwrap().reference, "memory:1");
    }

    #[test]
    fn file_target_writes_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("submission.json");
        let mut target = FileSubmissionTarget::new(&path);
        target.submit(&submission()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["totalLiabilities"], "300");
        assert_eq!(written["snapshotBlock"], 42);
        assert_eq!(written["publicSignals"][0], "300");
        assert!(written["rootHashHex"].as_str().unwrap().ends_with("09"));
    }
}

//! # solv-audit — Audit Cycle Orchestration
//!
//! Threads one frozen balance snapshot through the gates of an audit cycle
//! and wires the cycle to its external collaborators.
//!
//! ## Modules
//!
//! - [`cycle`]: the typestate [`AuditCycle`] from `SNAPSHOT_READY` to
//!   `SUBMITTED`, and [`run_audit`] for the whole sequence.
//! - [`snapshot`], [`attestation`]: where snapshots and reserve attestations
//!   come from ([`SnapshotSource`], [`AttestationSource`]) with file-backed
//!   implementations.
//! - [`submission`]: where finished proofs go ([`SubmissionTarget`]).
//! - [`artifact`]: the published root-commitment record.
//! - [`config`]: YAML run settings.
//!
//! Nothing here retries. A failed gate ends the cycle and the error is
//! returned to the caller unchanged.

pub mod artifact;
pub mod attestation;
pub mod config;
pub mod cycle;
pub mod error;
pub mod files;
pub mod snapshot;
pub mod submission;

pub use artifact::RootCommitment;
pub use attestation::{AttestationSource, FileAttestationSource};
pub use config::AuditConfig;
pub use cycle::{
    run_audit, AnchorVerified, AuditCycle, CycleState, DynCycleState, InputAssembled,
    ProofRequested, SnapshotReady, Submitted, TransitionRecord, TreeBuilt,
};
pub use error::{AuditError, AuditResult};
pub use snapshot::{FileSnapshotSource, LiabilitySnapshot, SnapshotSource};
pub use submission::{
    AuditSubmission, FileSubmissionTarget, RecordingSubmissionTarget, SubmissionReceipt,
    SubmissionTarget,
};

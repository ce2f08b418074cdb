//! # Audit Cycle Typestate Machine
//!
//! One audit cycle runs a frozen snapshot through a fixed sequence of gates:
//!
//! ```text
//! SNAPSHOT_READY ─build_tree()──▶ TREE_BUILT ─verify_anchor()──▶ ANCHOR_VERIFIED
//!                                     │
//!                              SupplyMismatch
//!                            (cycle is consumed)
//!
//! ANCHOR_VERIFIED ─assemble()──▶ INPUT_ASSEMBLED ─request_proof()──▶ PROOF_REQUESTED
//!
//! PROOF_REQUESTED ─submit()──▶ SUBMITTED
//! ```
//!
//! Each state is a distinct type carrying the data produced so far, and
//! only the next transition exists as a method. Calling `assemble()` on a
//! tree whose anchor was never checked does not compile. A failed gate
//! consumes the cycle; a cycle can be abandoned at any point by dropping it.
//!
//! The cycle value owns its tree. Nothing is shared between cycles, so
//! several can run side by side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solv_core::{AuditAnchor, ContentDigest, LiabilityRecord};
use solv_crypto::{verify_against_anchor, LiabilityTree, SumTreeBuilder, TreeNode};
use solv_zkp::{assemble, AuditSubmissionInput, ProofArtifact, ProofSystem, ReserveAttestation};
use uuid::Uuid;

use crate::artifact::RootCommitment;
use crate::attestation::AttestationSource;
use crate::error::AuditResult;
use crate::snapshot::{LiabilitySnapshot, SnapshotSource};
use crate::submission::{AuditSubmission, SubmissionReceipt, SubmissionTarget};

// ── State Types ──────────────────────────────────────────────────────

/// Snapshot loaded and checked for duplicate owners.
#[derive(Debug, Clone)]
pub struct SnapshotReady {
    records: Vec<LiabilityRecord>,
}

/// Sum-tree built over the snapshot records.
#[derive(Debug, Clone)]
pub struct TreeBuilt {
    tree: LiabilityTree,
}

/// Root sum matches the on-chain total supply.
#[derive(Debug, Clone)]
pub struct AnchorVerified {
    tree: LiabilityTree,
}

/// Prover input assembled from the verified root and the attestation.
#[derive(Debug, Clone)]
pub struct InputAssembled {
    tree: LiabilityTree,
    input: AuditSubmissionInput,
}

/// The proving backend returned a proof.
#[derive(Debug, Clone)]
pub struct ProofRequested<P> {
    tree: LiabilityTree,
    input: AuditSubmissionInput,
    artifact: ProofArtifact<P>,
}

/// The submission was accepted by its target. Terminal state.
#[derive(Debug, Clone)]
pub struct Submitted<P> {
    tree: LiabilityTree,
    submission: AuditSubmission<P>,
    receipt: SubmissionReceipt,
}

/// Marker trait for audit cycle states. Sealed.
pub trait CycleState: private::Sealed + std::fmt::Debug {
    /// Runtime tag of the state.
    fn state() -> DynCycleState;
    /// Canonical state name as it appears in the transition log.
    fn name() -> &'static str {
        Self::state().as_str()
    }
    /// Whether no further transitions exist.
    fn is_terminal() -> bool {
        false
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::SnapshotReady {}
    impl Sealed for super::TreeBuilt {}
    impl Sealed for super::AnchorVerified {}
    impl Sealed for super::InputAssembled {}
    impl<P> Sealed for super::ProofRequested<P> {}
    impl<P> Sealed for super::Submitted<P> {}
}

impl CycleState for SnapshotReady {
    fn state() -> DynCycleState {
        DynCycleState::SnapshotReady
    }
}
impl CycleState for TreeBuilt {
    fn state() -> DynCycleState {
        DynCycleState::TreeBuilt
    }
}
impl CycleState for AnchorVerified {
    fn state() -> DynCycleState {
        DynCycleState::AnchorVerified
    }
}
impl CycleState for InputAssembled {
    fn state() -> DynCycleState {
        DynCycleState::InputAssembled
    }
}
impl<P: std::fmt::Debug> CycleState for ProofRequested<P> {
    fn state() -> DynCycleState {
        DynCycleState::ProofRequested
    }
}
impl<P: std::fmt::Debug> CycleState for Submitted<P> {
    fn state() -> DynCycleState {
        DynCycleState::Submitted
    }
    fn is_terminal() -> bool {
        true
    }
}

/// Runtime cycle state, for logs and serialized transition records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DynCycleState {
    SnapshotReady,
    TreeBuilt,
    AnchorVerified,
    InputAssembled,
    ProofRequested,
    Submitted,
}

impl DynCycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DynCycleState::SnapshotReady => "SNAPSHOT_READY",
            DynCycleState::TreeBuilt => "TREE_BUILT",
            DynCycleState::AnchorVerified => "ANCHOR_VERIFIED",
            DynCycleState::InputAssembled => "INPUT_ASSEMBLED",
            DynCycleState::ProofRequested => "PROOF_REQUESTED",
            DynCycleState::Submitted => "SUBMITTED",
        }
    }
}

impl std::fmt::Display for DynCycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Transition Record ────────────────────────────────────────────────

/// One state transition of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from_state: DynCycleState,
    pub to_state: DynCycleState,
    pub timestamp: DateTime<Utc>,
}

// ── The Cycle ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CycleHeader {
    cycle_id: Uuid,
    snapshot_digest: ContentDigest,
    anchor: AuditAnchor,
    started_at: DateTime<Utc>,
    transition_log: Vec<TransitionRecord>,
}

/// One audit cycle, parameterized by its current state.
#[derive(Debug, Clone)]
pub struct AuditCycle<S: CycleState> {
    header: CycleHeader,
    state: S,
}

impl<S: CycleState> AuditCycle<S> {
    pub fn cycle_id(&self) -> Uuid {
        self.header.cycle_id
    }

    /// SHA-256 of the canonical snapshot this cycle was started from.
    pub fn snapshot_digest(&self) -> &ContentDigest {
        &self.header.snapshot_digest
    }

    pub fn anchor(&self) -> &AuditAnchor {
        &self.header.anchor
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.header.started_at
    }

    pub fn state_name(&self) -> &'static str {
        S::name()
    }

    pub fn is_terminal(&self) -> bool {
        S::is_terminal()
    }

    pub fn transition_log(&self) -> &[TransitionRecord] {
        &self.header.transition_log
    }

    fn advance<T: CycleState>(self, next: impl FnOnce(S) -> T) -> AuditCycle<T> {
        let AuditCycle { mut header, state } = self;
        tracing::info!(
            cycle_id = %header.cycle_id,
            from = S::name(),
            to = T::name(),
            snapshot_block = header.anchor.block_height,
            "audit cycle transition"
        );
        header.transition_log.push(TransitionRecord {
            from_state: S::state(),
            to_state: T::state(),
            timestamp: Utc::now(),
        });
        AuditCycle {
            header,
            state: next(state),
        }
    }
}

impl AuditCycle<SnapshotReady> {
    /// Start a cycle from a frozen snapshot.
    ///
    /// # Errors
    ///
    /// `DuplicateOwner` if an owner appears twice.
    pub fn from_snapshot(snapshot: LiabilitySnapshot) -> AuditResult<Self> {
        let snapshot_digest = snapshot.digest()?;
        let (records, anchor) = snapshot.into_parts()?;
        let cycle_id = Uuid::new_v4();
        tracing::info!(
            cycle_id = %cycle_id,
            snapshot = %snapshot_digest,
            records = records.len(),
            snapshot_block = anchor.block_height,
            "audit cycle started"
        );
        Ok(Self {
            header: CycleHeader {
                cycle_id,
                snapshot_digest,
                anchor,
                started_at: Utc::now(),
                transition_log: Vec::new(),
            },
            state: SnapshotReady { records },
        })
    }

    /// Load the snapshot from `source` and start a cycle.
    pub fn from_source(source: &impl SnapshotSource) -> AuditResult<Self> {
        Self::from_snapshot(source.load()?)
    }

    pub fn records(&self) -> &[LiabilityRecord] {
        &self.state.records
    }

    /// Build the sum-tree. Transitions: SnapshotReady → TreeBuilt.
    ///
    /// # Errors
    ///
    /// `EmptyLiabilitySet` or `EncodingOverflow` from the builder.
    pub fn build_tree(self, builder: &SumTreeBuilder) -> AuditResult<AuditCycle<TreeBuilt>> {
        let tree = builder.build(&self.state.records)?;
        tracing::info!(
            cycle_id = %self.header.cycle_id,
            leaves = tree.leaf_count(),
            levels = tree.depth(),
            root_sum = %tree.root().sum,
            "liability tree built"
        );
        Ok(self.advance(|_| TreeBuilt { tree }))
    }
}

impl AuditCycle<TreeBuilt> {
    pub fn tree(&self) -> &LiabilityTree {
        &self.state.tree
    }

    pub fn root(&self) -> &TreeNode {
        self.state.tree.root()
    }

    /// Check the root sum against the anchor. Transitions: TreeBuilt →
    /// AnchorVerified.
    ///
    /// # Errors
    ///
    /// `SupplyMismatch`. The cycle is consumed and cannot proceed.
    pub fn verify_anchor(self) -> AuditResult<AuditCycle<AnchorVerified>> {
        if let Err(err) = verify_against_anchor(self.state.tree.root(), &self.header.anchor) {
            tracing::error!(
                cycle_id = %self.header.cycle_id,
                snapshot_block = self.header.anchor.block_height,
                error = %err,
                "anchor check failed, aborting cycle"
            );
            return Err(err.into());
        }
        Ok(self.advance(|s| AnchorVerified { tree: s.tree }))
    }
}

impl AuditCycle<AnchorVerified> {
    pub fn tree(&self) -> &LiabilityTree {
        &self.state.tree
    }

    pub fn root(&self) -> &TreeNode {
        self.state.tree.root()
    }

    /// The publishable root-commitment record.
    pub fn root_commitment(&self) -> RootCommitment {
        RootCommitment::new(self.root(), self.header.anchor.block_height)
    }

    /// Assemble the prover input. Transitions: AnchorVerified → InputAssembled.
    ///
    /// # Errors
    ///
    /// `EncodingOverflow` if the reserve balance does not fit the field.
    pub fn assemble(self, attestation: &ReserveAttestation) -> AuditResult<AuditCycle<InputAssembled>> {
        let input = assemble(attestation, self.state.tree.root())?;
        Ok(self.advance(|s| InputAssembled {
            tree: s.tree,
            input,
        }))
    }

    /// [`assemble`](Self::assemble) with the attestation loaded from `source`.
    pub fn assemble_from(
        self,
        source: &impl AttestationSource,
    ) -> AuditResult<AuditCycle<InputAssembled>> {
        let attestation = source.load()?;
        self.assemble(&attestation)
    }
}

impl AuditCycle<InputAssembled> {
    pub fn tree(&self) -> &LiabilityTree {
        &self.state.tree
    }

    pub fn input(&self) -> &AuditSubmissionInput {
        &self.state.input
    }

    /// Hand the input to a proving backend. Transitions: InputAssembled →
    /// ProofRequested.
    ///
    /// # Errors
    ///
    /// Any [`ProofError`](solv_zkp::ProofError) from the backend, notably
    /// `Unsatisfied` when reserves do not cover liabilities.
    pub fn request_proof<PS: ProofSystem>(
        self,
        system: &PS,
        pk: &PS::ProvingKey,
    ) -> AuditResult<AuditCycle<ProofRequested<PS::Proof>>> {
        let artifact = match system.prove(pk, &self.state.input) {
            Ok(artifact) => artifact,
            Err(err) => {
                tracing::error!(cycle_id = %self.header.cycle_id, error = %err, "proof generation refused");
                return Err(err.into());
            }
        };
        Ok(self.advance(|s| ProofRequested {
            tree: s.tree,
            input: s.input,
            artifact,
        }))
    }
}

impl<P: Clone + std::fmt::Debug> AuditCycle<ProofRequested<P>> {
    pub fn tree(&self) -> &LiabilityTree {
        &self.state.tree
    }

    pub fn input(&self) -> &AuditSubmissionInput {
        &self.state.input
    }

    pub fn artifact(&self) -> &ProofArtifact<P> {
        &self.state.artifact
    }

    /// The payload [`submit`](Self::submit) hands to its target.
    pub fn submission(&self) -> AuditSubmission<P> {
        let root = self.state.tree.root();
        AuditSubmission {
            cycle_id: self.header.cycle_id,
            proof: self.state.artifact.proof.clone(),
            public_signals: self.state.artifact.public_signals.clone(),
            root_hash_hex: root.commitment.to_bytes32_hex(),
            total_liabilities: root.sum.clone(),
            snapshot_block: self.header.anchor.block_height,
        }
    }

    /// Submit the proof and root commitment. Transitions: ProofRequested →
    /// Submitted.
    pub fn submit<T: SubmissionTarget<P>>(
        self,
        target: &mut T,
    ) -> AuditResult<AuditCycle<Submitted<P>>> {
        let submission = self.submission();
        let receipt = target.submit(&submission)?;
        Ok(self.advance(|s| Submitted {
            tree: s.tree,
            submission,
            receipt,
        }))
    }
}

impl<P: std::fmt::Debug> AuditCycle<Submitted<P>> {
    pub fn tree(&self) -> &LiabilityTree {
        &self.state.tree
    }

    pub fn submission(&self) -> &AuditSubmission<P> {
        &self.state.submission
    }

    pub fn receipt(&self) -> &SubmissionReceipt {
        &self.state.receipt
    }
}

/// Run a whole cycle, from loading the snapshot to submission.
pub fn run_audit<PS, T>(
    snapshots: &impl SnapshotSource,
    attestations: &impl AttestationSource,
    builder: &SumTreeBuilder,
    system: &PS,
    pk: &PS::ProvingKey,
    target: &mut T,
) -> AuditResult<AuditCycle<Submitted<PS::Proof>>>
where
    PS: ProofSystem,
    T: SubmissionTarget<PS::Proof>,
{
    AuditCycle::from_source(snapshots)?
        .build_tree(builder)?
        .verify_anchor()?
        .assemble_from(attestations)?
        .request_proof(system, pk)?
        .submit(target)
}

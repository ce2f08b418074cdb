//! # solv-core — Foundational Types for the Liability Commitment Engine
//!
//! Every other crate in the workspace depends on `solv-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Validated field encoding.** `FieldElement` can only be built through
//!    constructors that reject values at or above the BN254 scalar modulus.
//!    Nothing in the workspace reduces an owner, balance, or sum modulo the
//!    field. Overflow is a fatal [`EncodingError::Overflow`].
//!
//! 2. **Arbitrary-precision amounts.** `Amount` wraps a `BigUint`. Balances
//!    are parsed from decimal strings and serialized back as decimal strings.
//!    Floats are rejected at the serde boundary.
//!
//! 3. **`CanonicalBytes` newtype.** Digests over JSON documents (snapshots,
//!    mock proofs) flow through `CanonicalBytes::new()` so the byte sequence
//!    is RFC 8785 canonical.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `solv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod field;
pub mod identity;
pub mod record;

// Re-export primary types for ergonomic imports.
pub use amount::Amount;
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, EncodingError};
pub use field::FieldElement;
pub use identity::OwnerId;
pub use record::{AuditAnchor, LiabilityRecord};

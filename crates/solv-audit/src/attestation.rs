//! Reserve attestation sources.

use std::path::{Path, PathBuf};

use solv_zkp::{AttestationDocument, ReserveAttestation};

use crate::error::AuditResult;
use crate::files::load_json_typed;

/// Where a cycle gets the custodian's signed reserve statement from.
pub trait AttestationSource {
    fn load(&self) -> AuditResult<ReserveAttestation>;
}

impl AttestationSource for ReserveAttestation {
    fn load(&self) -> AuditResult<ReserveAttestation> {
        Ok(self.clone())
    }
}

/// Reads an attestation file in either the structured or the flat
/// `bank*` layout.
#[derive(Debug, Clone)]
pub struct FileAttestationSource {
    path: PathBuf,
}

impl FileAttestationSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AttestationSource for FileAttestationSource {
    fn load(&self) -> AuditResult<ReserveAttestation> {
        let doc: AttestationDocument = load_json_typed(&self.path)?;
        let attestation = doc.into_attestation();
        tracing::debug!(
            path = %self.path.display(),
            reserve = %attestation.reserve_balance,
            "loaded reserve attestation"
        );
        Ok(attestation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;
    use solv_core::Amount;

    #[test]
    fn reads_flat_bank_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank_input.json");
        std::fs::write(
            &path,
            r#"{"bankPubKeyAx":"1","bankPubKeyAy":"2","bankBalance":"1500",
                "bankSigR8x":"3","bankSigR8y":"4","bankSigS":"5"}"#,
        )
        .unwrap();
        let a = FileAttestationSource::new(&path).load().unwrap();
        assert_eq!(a.reserve_balance, Amount::from(1500u64));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attestation.json");
        std::fs::write(&path, r#"{"reserveBalance":"1"}"#).unwrap();
        assert!(matches!(
            FileAttestationSource::new(&path).load(),
            Err(AuditError::JsonParse { .. })
        ));
    }
}

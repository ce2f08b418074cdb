//! # Groth16 Proof Artifacts
//!
//! The proof shape returned by a circom/snarkjs Groth16 prover, and its
//! conversion into the argument layout of the generated Solidity verifier.
//!
//! snarkjs writes curve points as projective decimal strings:
//!
//! ```text
//! { "pi_a": [ax, ay, "1"],
//!   "pi_b": [[bx0, bx1], [by0, by1], ["1", "0"]],
//!   "pi_c": [cx, cy, "1"],
//!   "protocol": "groth16", "curve": "bn128" }
//! ```
//!
//! The verifier contract takes `G2` coordinates with the two `Fq2`
//! components swapped, so `b = [[bx1, bx0], [by1, by0]]`.
//!
//! Point coordinates live in the BN254 *base* field, which is larger than the
//! scalar field, so they are kept as decimal text and range-checked to 256
//! bits rather than parsed into [`FieldElement`].

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use solv_core::FieldElement;

use crate::traits::VerifyError;

/// A Groth16 proof as emitted by `snarkjs groth16 prove`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groth16Proof {
    /// `A` in G1, projective.
    pub pi_a: Vec<String>,
    /// `B` in G2, projective.
    pub pi_b: Vec<Vec<String>>,
    /// `C` in G1, projective.
    pub pi_c: Vec<String>,
    /// Always `"groth16"`.
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Always `"bn128"`.
    #[serde(default = "default_curve")]
    pub curve: String,
}

fn default_protocol() -> String {
    "groth16".to_string()
}

fn default_curve() -> String {
    "bn128".to_string()
}

/// Arguments for `verifyProof(a, b, c, input)`, as `0x`-prefixed 32-byte hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidityCalldata {
    pub a: [String; 2],
    pub b: [[String; 2]; 2],
    pub c: [String; 2],
    pub input: Vec<String>,
}

impl Groth16Proof {
    /// Convert to verifier calldata, swapping the `Fq2` components of `B`.
    ///
    /// # Errors
    ///
    /// [`VerifyError::MalformedProof`] when a point has too few coordinates,
    /// or a coordinate is not a decimal integer below `2^256`.
    pub fn to_calldata(&self, public_signals: &[FieldElement]) -> Result<SolidityCalldata, VerifyError> {
        if self.protocol != "groth16" {
            return Err(VerifyError::MalformedProof(format!(
                "unsupported protocol {:?}",
                self.protocol
            )));
        }
        let a = g1(&self.pi_a, "pi_a")?;
        let c = g1(&self.pi_c, "pi_c")?;
        if self.pi_b.len() < 2 {
            return Err(VerifyError::MalformedProof(format!(
                "pi_b has {} rows, expected at least 2",
                self.pi_b.len()
            )));
        }
        let bx = g1(&self.pi_b[0], "pi_b[0]")?;
        let by = g1(&self.pi_b[1], "pi_b[1]")?;

        Ok(SolidityCalldata {
            a,
            b: [[bx[1].clone(), bx[0].clone()], [by[1].clone(), by[0].clone()]],
            c,
            input: public_signals.iter().map(FieldElement::to_bytes32_hex).collect(),
        })
    }
}

impl SolidityCalldata {
    /// Render as the comma-separated argument list accepted by the verifier,
    /// matching `snarkjs zkey export soliditycalldata`.
    pub fn to_arguments(&self) -> String {
        let quote = |s: &String| format!("\"{s}\"");
        let pair = |p: &[String; 2]| format!("[{},{}]", quote(&p[0]), quote(&p[1]));
        let inputs: Vec<String> = self.input.iter().map(quote).collect();
        format!(
            "{},[{},{}],{},[{}]",
            pair(&self.a),
            pair(&self.b[0]),
            pair(&self.b[1]),
            pair(&self.c),
            inputs.join(",")
        )
    }
}

fn g1(coords: &[String], what: &str) -> Result<[String; 2], VerifyError> {
    if coords.len() < 2 {
        return Err(VerifyError::MalformedProof(format!(
            "{what} has {} coordinates, expected at least 2",
            coords.len()
        )));
    }
    Ok([coordinate(&coords[0], what)?, coordinate(&coords[1], what)?])
}

fn coordinate(decimal: &str, what: &str) -> Result<String, VerifyError> {
    if decimal.is_empty() || !decimal.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VerifyError::MalformedProof(format!(
            "{what} coordinate {decimal:?} is not a decimal integer"
        )));
    }
    let value = BigUint::parse_bytes(decimal.as_bytes(), 10).ok_or_else(|| {
        VerifyError::MalformedProof(format!("{what} coordinate {decimal:?} is not a decimal integer"))
    })?;
    if value.bits() > 256 {
        return Err(VerifyError::MalformedProof(format!(
            "{what} coordinate exceeds 256 bits"
        )));
    }
    Ok(format!("0x{:064x}", value))
}

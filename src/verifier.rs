// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Attestation verification
//!
//! An attestation is accepted when it holds exactly `threshold` secp256k1
//! signatures over `keccak256(message)`, each recovering to a distinct enabled
//! attester, with signer addresses strictly increasing. Ordering is what rules
//! out one attester signing twice.
//!
//! Signatures with `s` in the upper half of the curve order are rejected, so a
//! valid attestation cannot be rewritten into a second valid byte string.

use std::collections::BTreeSet;

use alloy_primitives::{hex, keccak256, uint, Address, Signature, B256, U256};
use tracing::{debug, warn};

use crate::error::{CctpError, Result};
use crate::protocol::Attestation;
use crate::spans;
use crate::state::CctpState;
use crate::store::KvRead;

/// n/2 for the secp256k1 group order n
const SECP256K1_HALF_ORDER: U256 =
    uint!(0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256);

/// Snapshot of the attester set and threshold used to check attestations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationVerifier {
    threshold: u32,
    attesters: BTreeSet<Address>,
}

impl AttestationVerifier {
    pub fn new(threshold: u32, attesters: impl IntoIterator<Item = Address>) -> Self {
        Self {
            threshold,
            attesters: attesters.into_iter().collect(),
        }
    }

    /// Loads enabled attesters and the threshold from state
    ///
    /// `default_threshold` applies when no threshold has been stored.
    pub fn from_state<S: KvRead>(state: &CctpState<S>, default_threshold: u32) -> Result<Self> {
        let threshold = state
            .signature_threshold()?
            .unwrap_or(default_threshold);
        Ok(Self::new(threshold, state.enabled_attesters()?))
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Verifies `attestation` over the raw encoded `message`
    ///
    /// Returns the recovered signers in attestation order.
    pub fn verify(&self, message: &[u8], attestation: &Attestation) -> Result<Vec<Address>> {
        let digest = keccak256(message);
        let span = spans::verify_attestation(&digest, attestation.len(), self.threshold);
        let _guard = span.enter();

        let result = self.verify_digest(&digest, attestation);
        match &result {
            Ok(signers) => debug!(signers = signers.len(), event = "attestation_verified"),
            Err(e) => {
                spans::record_error(e);
                warn!(error = %e, event = "attestation_rejected");
            }
        }
        result
    }

    fn verify_digest(&self, digest: &B256, attestation: &Attestation) -> Result<Vec<Address>> {
        if self.threshold == 0 {
            return Err(CctpError::InvalidSignatureThreshold(
                "threshold must be non-zero".to_string(),
            ));
        }
        attestation.validate_length(self.threshold)?;

        let mut signers = Vec::with_capacity(self.threshold as usize);
        let mut last: Option<Address> = None;

        for raw in attestation.signatures() {
            let signer = recover_signer(digest, raw)?;

            if let Some(previous) = last {
                if signer == previous {
                    return Err(CctpError::DuplicateSignatures(signer.to_string()));
                }
                if signer < previous {
                    return Err(CctpError::SignaturesOutOfOrder);
                }
            }
            if !self.attesters.contains(&signer) {
                return Err(CctpError::AttesterNotEnabled(signer.to_string()));
            }

            last = Some(signer);
            signers.push(signer);
        }

        // Unreachable while `validate_length` pins the chunk count to the
        // threshold and every chunk either fails or adds a distinct signer.
        if signers.len() < self.threshold as usize {
            return Err(CctpError::InsufficientSignatures {
                required: self.threshold,
                actual: signers.len(),
            });
        }
        Ok(signers)
    }
}

/// Recovers the address behind one 65-byte `r || s || v` signature
pub fn recover_signer(digest: &B256, raw: &[u8]) -> Result<Address> {
    let signature = Signature::from_raw(raw)
        .map_err(|e| CctpError::InvalidSignature(format!("{e}: 0x{}", hex::encode(raw))))?;

    if signature.s() > SECP256K1_HALF_ORDER {
        return Err(CctpError::InvalidSignature(
            "s value in upper half of curve order".to_string(),
        ));
    }

    signature
        .recover_address_from_prehash(digest)
        .map_err(|e| CctpError::InvalidSignatureRecovery(e.to_string()))
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::Bytes;

use crate::error::{CctpError, Result};

/// Length of one ECDSA signature inside an attestation: `r || s || v`
pub const SIGNATURE_LENGTH: usize = 65;

/// Concatenated attester signatures over a message hash
///
/// Signatures are ordered by strictly increasing signer address. The
/// attestation carries no count or framing; its length alone determines how
/// many signatures it contains.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attestation(Bytes);

impl Attestation {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Concatenates individual 65-byte signatures
    pub fn from_signatures<I, S>(signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut bytes = Vec::new();
        for signature in signatures {
            bytes.extend_from_slice(signature.as_ref());
        }
        Self(Bytes::from(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Requires exactly `threshold` signatures worth of bytes
    pub fn validate_length(&self, threshold: u32) -> Result<()> {
        let expected = SIGNATURE_LENGTH * threshold as usize;
        if self.0.len() != expected {
            return Err(CctpError::InvalidSignatureLength {
                expected,
                actual: self.0.len(),
            });
        }
        Ok(())
    }

    /// Iterates the 65-byte signature chunks
    pub fn signatures(&self) -> impl Iterator<Item = &[u8]> {
        self.0.chunks_exact(SIGNATURE_LENGTH)
    }
}

impl From<Vec<u8>> for Attestation {
    fn from(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }
}

impl From<Bytes> for Attestation {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Attestation {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_length() {
        let attestation = Attestation::from(vec![0u8; 130]);
        assert!(attestation.validate_length(2).is_ok());
        assert!(matches!(
            attestation.validate_length(1),
            Err(CctpError::InvalidSignatureLength {
                expected: 65,
                actual: 130
            })
        ));
        assert!(matches!(
            attestation.validate_length(3),
            Err(CctpError::InvalidSignatureLength {
                expected: 195,
                actual: 130
            })
        ));
    }

    #[test]
    fn test_signatures_split_in_order() {
        let attestation = Attestation::from_signatures([[1u8; 65], [2u8; 65], [3u8; 65]]);
        assert_eq!(attestation.len(), 195);

        let chunks: Vec<&[u8]> = attestation.signatures().collect();
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].iter().all(|b| *b == 1));
        assert!(chunks[2].iter().all(|b| *b == 3));
    }

    #[test]
    fn test_empty_attestation() {
        let attestation = Attestation::default();
        assert!(attestation.is_empty());
        assert_eq!(attestation.signatures().count(), 0);
        assert!(attestation.validate_length(0).is_ok());
    }
}

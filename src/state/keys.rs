// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Store key layout
//!
//! Singleton values live under one-byte keys. Collections live under a
//! one-byte prefix followed by a fixed-width composite key, with integers
//! encoded big-endian so that prefix scans return entries in numeric order.

use alloy_primitives::{Address, FixedBytes};

use crate::protocol::DomainId;

pub const OWNER: &[u8] = &[0x01];
pub const PENDING_OWNER: &[u8] = &[0x02];
pub const ATTESTER_MANAGER: &[u8] = &[0x03];
pub const TOKEN_CONTROLLER: &[u8] = &[0x04];
pub const PAUSER: &[u8] = &[0x05];
pub const SIGNATURE_THRESHOLD: &[u8] = &[0x06];
pub const NEXT_NONCE: &[u8] = &[0x07];
pub const BURNING_AND_MINTING_PAUSED: &[u8] = &[0x08];
pub const SENDING_AND_RECEIVING_PAUSED: &[u8] = &[0x09];
pub const MAX_MESSAGE_BODY_SIZE: &[u8] = &[0x10];

pub const ATTESTER_PREFIX: &[u8] = &[0x20];
pub const REMOTE_TOKEN_MESSENGER_PREFIX: &[u8] = &[0x21];
pub const TOKEN_PAIR_PREFIX: &[u8] = &[0x22];
pub const USED_NONCE_PREFIX: &[u8] = &[0x23];
pub const BURN_LIMIT_PREFIX: &[u8] = &[0x24];
pub const SENT_MESSAGE_PREFIX: &[u8] = &[0x25];
pub const RECEIVED_MESSAGE_PREFIX: &[u8] = &[0x26];

fn prefixed(prefix: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let len = prefix.len() + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.extend_from_slice(prefix);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

pub fn attester(address: &Address) -> Vec<u8> {
    prefixed(ATTESTER_PREFIX, &[address.as_slice()])
}

pub fn remote_token_messenger(domain: DomainId) -> Vec<u8> {
    prefixed(
        REMOTE_TOKEN_MESSENGER_PREFIX,
        &[&domain.as_u32().to_be_bytes()],
    )
}

pub fn token_pair(remote_domain: DomainId, remote_token: &FixedBytes<32>) -> Vec<u8> {
    prefixed(
        TOKEN_PAIR_PREFIX,
        &[&remote_domain.as_u32().to_be_bytes(), remote_token.as_slice()],
    )
}

/// `(sourceDomain, nonce)` as 4 + 8 big-endian bytes
pub fn used_nonce(source_domain: DomainId, nonce: u64) -> Vec<u8> {
    prefixed(
        USED_NONCE_PREFIX,
        &[&source_domain.as_u32().to_be_bytes(), &nonce.to_be_bytes()],
    )
}

pub fn burn_limit(denom: &str) -> Vec<u8> {
    prefixed(BURN_LIMIT_PREFIX, &[denom.as_bytes()])
}

pub fn sent_message(destination_domain: DomainId, nonce: u64) -> Vec<u8> {
    prefixed(
        SENT_MESSAGE_PREFIX,
        &[&destination_domain.as_u32().to_be_bytes(), &nonce.to_be_bytes()],
    )
}

pub fn received_message(source_domain: DomainId, nonce: u64) -> Vec<u8> {
    prefixed(
        RECEIVED_MESSAGE_PREFIX,
        &[&source_domain.as_u32().to_be_bytes(), &nonce.to_be_bytes()],
    )
}

/// Splits a `domain || nonce` key suffix back into its parts
pub fn split_domain_nonce(prefix: &[u8], key: &[u8]) -> Option<(DomainId, u64)> {
    let suffix = key.strip_prefix(prefix)?;
    if suffix.len() != 12 {
        return None;
    }
    let domain = u32::from_be_bytes(suffix[..4].try_into().ok()?);
    let nonce = u64::from_be_bytes(suffix[4..].try_into().ok()?);
    Some((DomainId::new(domain), nonce))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_nonce_key_layout() {
        let key = used_nonce(DomainId::new(3), 0x0102);
        assert_eq!(key.len(), 13);
        assert_eq!(key[0], 0x23);
        assert_eq!(&key[1..5], &[0, 0, 0, 3]);
        assert_eq!(&key[5..], &[0, 0, 0, 0, 0, 0, 0x01, 0x02]);
    }

    #[test]
    fn test_keys_are_distinct_per_domain() {
        assert_ne!(used_nonce(DomainId::new(0), 1), used_nonce(DomainId::new(1), 1));
        assert_ne!(
            sent_message(DomainId::new(0), 1),
            received_message(DomainId::new(0), 1)
        );
    }

    #[test]
    fn test_token_pair_key() {
        let token = FixedBytes::from([0xab; 32]);
        let key = token_pair(DomainId::ETHEREUM, &token);
        assert_eq!(key.len(), 1 + 4 + 32);
        assert!(key.starts_with(TOKEN_PAIR_PREFIX));
    }

    #[test]
    fn test_split_domain_nonce() {
        let key = received_message(DomainId::new(7), 99);
        assert_eq!(
            split_domain_nonce(RECEIVED_MESSAGE_PREFIX, &key),
            Some((DomainId::new(7), 99))
        );
        assert_eq!(split_domain_nonce(SENT_MESSAGE_PREFIX, &key), None);
        assert_eq!(split_domain_nonce(RECEIVED_MESSAGE_PREFIX, &key[..10]), None);
    }
}

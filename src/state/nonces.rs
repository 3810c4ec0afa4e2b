// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Replay guard and message ledgers
//!
//! Outbound messages draw from one global counter. Inbound messages are
//! tracked by the `(sourceDomain, nonce)` they claim; a used entry is never
//! removed.

use tracing::debug;

use super::{keys, CctpState};
use crate::error::{CctpError, Result};
use crate::protocol::DomainId;
use crate::store::{KvRead, KvStore};

impl<S: KvRead> CctpState<S> {
    /// Nonce the next originated message will carry
    pub fn next_nonce(&self) -> Result<u64> {
        Ok(self.get_u64(keys::NEXT_NONCE)?.unwrap_or(0))
    }

    pub fn is_nonce_used(&self, source_domain: DomainId, nonce: u64) -> Result<bool> {
        self.store.exists(&keys::used_nonce(source_domain, nonce))
    }

    /// Fails with [`CctpError::NonceAlreadyUsed`] if the pair was consumed
    pub fn ensure_nonce_unused(&self, source_domain: DomainId, nonce: u64) -> Result<()> {
        if self.is_nonce_used(source_domain, nonce)? {
            return Err(CctpError::NonceAlreadyUsed {
                source_domain: source_domain.as_u32(),
                nonce,
            });
        }
        Ok(())
    }

    /// Every consumed `(sourceDomain, nonce)` in key order
    pub fn used_nonces(&self) -> Result<Vec<(DomainId, u64)>> {
        Ok(self
            .store
            .prefix_scan(keys::USED_NONCE_PREFIX)?
            .into_iter()
            .filter_map(|(key, _)| keys::split_domain_nonce(keys::USED_NONCE_PREFIX, &key))
            .collect())
    }

    pub fn sent_message(&self, destination_domain: DomainId, nonce: u64) -> Result<Option<Vec<u8>>> {
        self.store.get(&keys::sent_message(destination_domain, nonce))
    }

    pub fn received_message(&self, source_domain: DomainId, nonce: u64) -> Result<Option<Vec<u8>>> {
        self.store.get(&keys::received_message(source_domain, nonce))
    }

    pub fn sent_messages(&self) -> Result<Vec<(DomainId, u64, Vec<u8>)>> {
        self.scan_ledger(keys::SENT_MESSAGE_PREFIX)
    }

    pub fn received_messages(&self) -> Result<Vec<(DomainId, u64, Vec<u8>)>> {
        self.scan_ledger(keys::RECEIVED_MESSAGE_PREFIX)
    }

    fn scan_ledger(&self, prefix: &[u8]) -> Result<Vec<(DomainId, u64, Vec<u8>)>> {
        Ok(self
            .store
            .prefix_scan(prefix)?
            .into_iter()
            .filter_map(|(key, value)| {
                keys::split_domain_nonce(prefix, &key).map(|(domain, nonce)| (domain, nonce, value))
            })
            .collect())
    }
}

impl<S: KvStore> CctpState<S> {
    /// Returns the current counter value and advances it by one
    pub fn reserve_nonce(&mut self) -> Result<u64> {
        let nonce = self.next_nonce()?;
        let next = nonce
            .checked_add(1)
            .ok_or_else(|| CctpError::Store("nonce counter exhausted".to_string()))?;
        self.set_u64(keys::NEXT_NONCE, next)?;
        debug!(nonce, event = "nonce_reserved");
        Ok(nonce)
    }

    pub fn set_next_nonce(&mut self, nonce: u64) -> Result<()> {
        self.set_u64(keys::NEXT_NONCE, nonce)
    }

    /// Consumes `(sourceDomain, nonce)`; rejects a pair already consumed
    pub fn mark_nonce_used(&mut self, source_domain: DomainId, nonce: u64) -> Result<()> {
        self.ensure_nonce_unused(source_domain, nonce)?;
        self.store.put(&keys::used_nonce(source_domain, nonce), &[1])
    }

    pub fn set_sent_message(
        &mut self,
        destination_domain: DomainId,
        nonce: u64,
        message: &[u8],
    ) -> Result<()> {
        self.store
            .put(&keys::sent_message(destination_domain, nonce), message)
    }

    pub fn set_received_message(
        &mut self,
        source_domain: DomainId,
        nonce: u64,
        message: &[u8],
    ) -> Result<()> {
        self.store
            .put(&keys::received_message(source_domain, nonce), message)
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Genesis import and export
//!
//! A [`GenesisState`] snapshots roles, attesters, token routing, limits,
//! pause flags and replay protection. Sent and received message records are
//! not part of it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CctpError, Result};
use crate::protocol::DomainId;
use crate::state::{Attester, BurnLimit, CctpState, RemoteTokenMessenger, TokenPair};
use crate::store::{KvRead, KvStore};

/// A consumed `(source_domain, nonce)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedNonce {
    pub source_domain: DomainId,
    pub nonce: u64,
}

/// Full protocol state at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisState {
    pub owner: Option<String>,
    pub pending_owner: Option<String>,
    pub attester_manager: Option<String>,
    pub token_controller: Option<String>,
    pub pauser: Option<String>,
    pub attesters: Vec<Attester>,
    pub signature_threshold: Option<u32>,
    pub token_pairs: Vec<TokenPair>,
    pub remote_token_messengers: Vec<RemoteTokenMessenger>,
    pub burn_limits: Vec<BurnLimit>,
    pub burning_and_minting_paused: bool,
    pub sending_and_receiving_messages_paused: bool,
    pub max_message_body_size: Option<u64>,
    pub next_available_nonce: u64,
    pub used_nonces: Vec<UsedNonce>,
}

impl GenesisState {
    /// Rejects a zero threshold and any entry listed twice
    pub fn validate(&self) -> Result<()> {
        if self.signature_threshold == Some(0) {
            return Err(CctpError::InvalidGenesis(
                "signature threshold must be non-zero".to_string(),
            ));
        }

        ensure_unique("attester", self.attesters.iter().map(|a| a.address))?;
        ensure_unique(
            "token pair",
            self.token_pairs
                .iter()
                .map(|p| (p.remote_domain, p.remote_token)),
        )?;
        ensure_unique(
            "remote token messenger",
            self.remote_token_messengers.iter().map(|m| m.domain),
        )?;
        ensure_unique("burn limit", self.burn_limits.iter().map(|l| l.denom.as_str()))?;
        ensure_unique(
            "used nonce",
            self.used_nonces.iter().map(|n| (n.source_domain, n.nonce)),
        )?;

        if self.token_pairs.iter().any(|p| p.local_token.is_empty()) {
            return Err(CctpError::InvalidGenesis(
                "token pair with empty local token".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates and writes every field into `state`
    pub fn init<T: KvStore>(&self, state: &mut CctpState<T>) -> Result<()> {
        self.validate()?;

        if let Some(owner) = &self.owner {
            state.set_owner(owner)?;
        }
        if let Some(pending_owner) = &self.pending_owner {
            state.set_pending_owner(pending_owner)?;
        }
        if let Some(attester_manager) = &self.attester_manager {
            state.set_attester_manager(attester_manager)?;
        }
        if let Some(token_controller) = &self.token_controller {
            state.set_token_controller(token_controller)?;
        }
        if let Some(pauser) = &self.pauser {
            state.set_pauser(pauser)?;
        }

        for attester in &self.attesters {
            state.set_attester(attester)?;
        }
        if let Some(threshold) = self.signature_threshold {
            state.set_signature_threshold(threshold)?;
        }
        for pair in &self.token_pairs {
            state.link_token_pair(pair)?;
        }
        for messenger in &self.remote_token_messengers {
            state.add_remote_token_messenger(messenger)?;
        }
        for limit in &self.burn_limits {
            state.set_burn_limit(&limit.denom, limit.amount)?;
        }

        state.set_burning_and_minting_paused(self.burning_and_minting_paused)?;
        state.set_sending_and_receiving_paused(self.sending_and_receiving_messages_paused)?;
        if let Some(size) = self.max_message_body_size {
            state.set_max_message_body_size(size)?;
        }

        state.set_next_nonce(self.next_available_nonce)?;
        for used in &self.used_nonces {
            state.mark_nonce_used(used.source_domain, used.nonce)?;
        }

        info!(
            attesters = self.attesters.len(),
            token_pairs = self.token_pairs.len(),
            used_nonces = self.used_nonces.len(),
            event = "genesis_initialized"
        );
        Ok(())
    }

    /// Reads the current state back into a genesis document
    pub fn export<T: KvRead>(state: &CctpState<T>) -> Result<Self> {
        Ok(Self {
            owner: state.owner()?,
            pending_owner: state.pending_owner()?,
            attester_manager: state.attester_manager()?,
            token_controller: state.token_controller()?,
            pauser: state.pauser()?,
            attesters: state.attesters()?,
            signature_threshold: state.signature_threshold()?,
            token_pairs: state.token_pairs()?,
            remote_token_messengers: state.remote_token_messengers()?,
            burn_limits: state.burn_limits()?,
            burning_and_minting_paused: state.burning_and_minting_paused()?,
            sending_and_receiving_messages_paused: state.sending_and_receiving_paused()?,
            max_message_body_size: state.max_message_body_size()?,
            next_available_nonce: state.next_nonce()?,
            used_nonces: state
                .used_nonces()?
                .into_iter()
                .map(|(source_domain, nonce)| UsedNonce {
                    source_domain,
                    nonce,
                })
                .collect(),
        })
    }
}

fn ensure_unique<K: Ord + std::fmt::Debug>(
    what: &str,
    keys: impl IntoIterator<Item = K>,
) -> Result<()> {
    let mut seen = BTreeSet::new();
    for key in keys {
        if let Some(duplicate) = seen.replace(key) {
            return Err(CctpError::InvalidGenesis(format!(
                "duplicate {what}: {duplicate:?}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use alloy_primitives::{address, FixedBytes, U256};

    fn sample() -> GenesisState {
        GenesisState {
            owner: Some("owner".to_string()),
            attester_manager: Some("manager".to_string()),
            token_controller: Some("controller".to_string()),
            pauser: Some("pauser".to_string()),
            attesters: vec![
                Attester::enabled(address!("0x1000000000000000000000000000000000000001")),
                Attester::enabled(address!("0x2000000000000000000000000000000000000002")),
            ],
            signature_threshold: Some(2),
            token_pairs: vec![TokenPair {
                remote_domain: DomainId::ETHEREUM,
                remote_token: FixedBytes::from([0xaa; 32]),
                local_token: "uusdc".to_string(),
            }],
            remote_token_messengers: vec![RemoteTokenMessenger {
                domain: DomainId::ETHEREUM,
                address: FixedBytes::from([0xbb; 32]),
            }],
            burn_limits: vec![BurnLimit {
                denom: "uusdc".to_string(),
                amount: U256::from(1_000_000u64),
            }],
            sending_and_receiving_messages_paused: true,
            max_message_body_size: Some(8_000),
            next_available_nonce: 42,
            used_nonces: vec![UsedNonce {
                source_domain: DomainId::ETHEREUM,
                nonce: 7,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_init_then_export_preserves_state() {
        let genesis = sample();
        let mut state = CctpState::new(MemoryStore::new());
        genesis.init(&mut state).unwrap();

        let exported = GenesisState::export(&state).unwrap();
        assert_eq!(exported, genesis);
        assert!(state.is_nonce_used(DomainId::ETHEREUM, 7).unwrap());
        assert_eq!(state.next_nonce().unwrap(), 42);
    }

    #[test]
    fn test_empty_genesis_exports_defaults() {
        let state = CctpState::new(MemoryStore::new());
        let exported = GenesisState::export(&state).unwrap();
        assert_eq!(exported, GenesisState::default());
    }

    #[test]
    fn test_json_fields_default_when_missing() {
        let genesis: GenesisState = serde_json::from_str(r#"{"owner":"o"}"#).unwrap();
        assert_eq!(genesis.owner.as_deref(), Some("o"));
        assert!(genesis.attesters.is_empty());
        assert_eq!(genesis.next_available_nonce, 0);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let genesis = GenesisState {
            signature_threshold: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            genesis.validate(),
            Err(CctpError::InvalidGenesis(_))
        ));
    }

    #[test]
    fn test_duplicate_attester_rejected() {
        let mut genesis = sample();
        genesis.attesters.push(genesis.attesters[0].clone());

        let mut state = CctpState::new(MemoryStore::new());
        let err = genesis.init(&mut state).unwrap_err();
        assert!(err.to_string().contains("duplicate attester"));
        assert!(state.store().is_empty());
    }

    #[test]
    fn test_duplicate_used_nonce_rejected() {
        let mut genesis = sample();
        genesis.used_nonces.push(genesis.used_nonces[0]);
        assert!(matches!(
            genesis.validate(),
            Err(CctpError::InvalidGenesis(_))
        ));
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Attester set, token routing and per-message limits

use alloy_primitives::{Address, FixedBytes, U256};
use serde::{Deserialize, Serialize};

use super::{keys, CctpState};
use crate::error::{CctpError, Result};
use crate::protocol::DomainId;
use crate::store::{decode_be, KvRead, KvStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttesterStatus {
    Enabled,
    Disabled,
}

/// An off-chain signer whose signatures count toward the threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attester {
    pub address: Address,
    pub status: AttesterStatus,
}

impl Attester {
    pub fn enabled(address: Address) -> Self {
        Self {
            address,
            status: AttesterStatus::Enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.status == AttesterStatus::Enabled
    }
}

/// Maps a token on a remote domain to its local denom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub remote_domain: DomainId,
    pub remote_token: FixedBytes<32>,
    pub local_token: String,
}

/// The token messenger contract that receives burns on a remote domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTokenMessenger {
    pub domain: DomainId,
    pub address: FixedBytes<32>,
}

/// Largest amount of `denom` a single deposit may burn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnLimit {
    pub denom: String,
    pub amount: U256,
}

impl<S: KvRead> CctpState<S> {
    pub fn attester(&self, address: &Address) -> Result<Option<Attester>> {
        self.get_json(&keys::attester(address))
    }

    /// All attesters, enabled or not, in ascending address order
    pub fn attesters(&self) -> Result<Vec<Attester>> {
        self.scan_json(keys::ATTESTER_PREFIX)
    }

    /// Enabled attester addresses in ascending order
    pub fn enabled_attesters(&self) -> Result<Vec<Address>> {
        Ok(self
            .attesters()?
            .into_iter()
            .filter(Attester::is_enabled)
            .map(|attester| attester.address)
            .collect())
    }

    pub fn is_attester_enabled(&self, address: &Address) -> Result<bool> {
        Ok(self
            .attester(address)?
            .is_some_and(|attester| attester.is_enabled()))
    }

    /// Stored threshold, if one has been set
    pub fn signature_threshold(&self) -> Result<Option<u32>> {
        self.get_u32(keys::SIGNATURE_THRESHOLD)
    }

    pub fn token_pair(
        &self,
        remote_domain: DomainId,
        remote_token: &FixedBytes<32>,
    ) -> Result<Option<TokenPair>> {
        self.get_json(&keys::token_pair(remote_domain, remote_token))
    }

    pub fn token_pairs(&self) -> Result<Vec<TokenPair>> {
        self.scan_json(keys::TOKEN_PAIR_PREFIX)
    }

    /// Finds the pair routing `local_token` to `remote_domain`
    ///
    /// Pairs are keyed by their remote side, so this is a scan over the
    /// registry.
    pub fn token_pair_for_local(
        &self,
        local_token: &str,
        remote_domain: DomainId,
    ) -> Result<Option<TokenPair>> {
        Ok(self
            .token_pairs()?
            .into_iter()
            .find(|pair| pair.local_token == local_token && pair.remote_domain == remote_domain))
    }

    pub fn remote_token_messenger(&self, domain: DomainId) -> Result<Option<RemoteTokenMessenger>> {
        self.get_json(&keys::remote_token_messenger(domain))
    }

    pub fn remote_token_messengers(&self) -> Result<Vec<RemoteTokenMessenger>> {
        self.scan_json(keys::REMOTE_TOKEN_MESSENGER_PREFIX)
    }

    pub fn burn_limit(&self, denom: &str) -> Result<Option<U256>> {
        let key = keys::burn_limit(denom);
        match self.store.get(&key)? {
            Some(bytes) => Ok(Some(U256::from_be_bytes(decode_be::<32>(&key, &bytes)?))),
            None => Ok(None),
        }
    }

    pub fn burn_limits(&self) -> Result<Vec<BurnLimit>> {
        self.store
            .prefix_scan(keys::BURN_LIMIT_PREFIX)?
            .into_iter()
            .map(|(key, value)| {
                let denom = String::from_utf8(key[keys::BURN_LIMIT_PREFIX.len()..].to_vec())
                    .map_err(|e| CctpError::Store(format!("invalid denom key: {e}")))?;
                let amount = U256::from_be_bytes(decode_be::<32>(&key, &value)?);
                Ok(BurnLimit { denom, amount })
            })
            .collect()
    }

    /// A denom with no configured limit may burn any amount
    pub fn ensure_within_burn_limit(&self, denom: &str, amount: U256) -> Result<()> {
        if let Some(limit) = self.burn_limit(denom)? {
            if amount > limit {
                return Err(CctpError::ExceedsBurnLimit {
                    limit: limit.to_string(),
                    amount: amount.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn max_message_body_size(&self) -> Result<Option<u64>> {
        self.get_u64(keys::MAX_MESSAGE_BODY_SIZE)
    }

    /// Bodies are unbounded until a maximum is configured
    pub fn ensure_message_body_size(&self, body_len: usize) -> Result<()> {
        if let Some(max) = self.max_message_body_size()? {
            let actual = body_len as u64;
            if actual > max {
                return Err(CctpError::ExceedsMaxMessageBodySize { max, actual });
            }
        }
        Ok(())
    }
}

impl<S: KvStore> CctpState<S> {
    pub fn set_attester(&mut self, attester: &Attester) -> Result<()> {
        self.set_json(&keys::attester(&attester.address), attester)
    }

    /// Adds a new attester or re-enables a disabled one
    pub fn enable_attester(&mut self, address: Address) -> Result<()> {
        if self.is_attester_enabled(&address)? {
            return Err(CctpError::AttesterAlreadyFound(address.to_string()));
        }
        self.set_attester(&Attester::enabled(address))
    }

    /// Disables an enabled attester
    ///
    /// Refused when the enabled set would shrink to `threshold` or fewer.
    pub fn disable_attester(&mut self, address: Address, threshold: u32) -> Result<()> {
        let attester = self
            .attester(&address)?
            .ok_or_else(|| CctpError::AttesterNotFound(address.to_string()))?;
        if !attester.is_enabled() {
            return Err(CctpError::AttesterNotEnabled(address.to_string()));
        }

        let enabled = self.enabled_attesters()?.len();
        if enabled.saturating_sub(1) <= threshold as usize {
            return Err(CctpError::CannotRemoveLastAttester { enabled, threshold });
        }

        self.set_attester(&Attester {
            address,
            status: AttesterStatus::Disabled,
        })
    }

    pub fn set_signature_threshold(&mut self, threshold: u32) -> Result<()> {
        self.set_u32(keys::SIGNATURE_THRESHOLD, threshold)
    }

    /// Changes the threshold to a new non-zero value the enabled set can meet
    pub fn update_signature_threshold(&mut self, new_threshold: u32, current: u32) -> Result<()> {
        if new_threshold == 0 {
            return Err(CctpError::InvalidSignatureThreshold(
                "threshold must be non-zero".to_string(),
            ));
        }
        if new_threshold == current {
            return Err(CctpError::InvalidSignatureThreshold(format!(
                "threshold is already {current}"
            )));
        }
        let enabled = self.enabled_attesters()?.len();
        if new_threshold as usize > enabled {
            return Err(CctpError::InvalidSignatureThreshold(format!(
                "threshold {new_threshold} exceeds {enabled} enabled attesters"
            )));
        }
        self.set_signature_threshold(new_threshold)
    }

    pub fn link_token_pair(&mut self, pair: &TokenPair) -> Result<()> {
        let key = keys::token_pair(pair.remote_domain, &pair.remote_token);
        if self.store.exists(&key)? {
            return Err(CctpError::TokenPairAlreadyFound);
        }
        self.set_json(&key, pair)
    }

    /// Removes a pair and returns it
    pub fn unlink_token_pair(
        &mut self,
        remote_domain: DomainId,
        remote_token: &FixedBytes<32>,
    ) -> Result<TokenPair> {
        let pair = self
            .token_pair(remote_domain, remote_token)?
            .ok_or(CctpError::TokenPairNotFound)?;
        self.remove(&keys::token_pair(remote_domain, remote_token))?;
        Ok(pair)
    }

    pub fn add_remote_token_messenger(&mut self, messenger: &RemoteTokenMessenger) -> Result<()> {
        let key = keys::remote_token_messenger(messenger.domain);
        if self.store.exists(&key)? {
            return Err(CctpError::RemoteTokenMessengerAlreadyFound(
                messenger.domain.as_u32(),
            ));
        }
        self.set_json(&key, messenger)
    }

    pub fn remove_remote_token_messenger(
        &mut self,
        domain: DomainId,
    ) -> Result<RemoteTokenMessenger> {
        let messenger = self
            .remote_token_messenger(domain)?
            .ok_or(CctpError::RemoteTokenMessengerNotFound(domain.as_u32()))?;
        self.remove(&keys::remote_token_messenger(domain))?;
        Ok(messenger)
    }

    pub fn set_burn_limit(&mut self, denom: &str, amount: U256) -> Result<()> {
        self.store
            .put(&keys::burn_limit(denom), &amount.to_be_bytes::<32>())
    }

    pub fn set_max_message_body_size(&mut self, size: u64) -> Result<()> {
        self.set_u64(keys::MAX_MESSAGE_BODY_SIZE, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use alloy_primitives::address;
    use rstest::rstest;

    const A: Address = address!("0x1000000000000000000000000000000000000001");
    const B: Address = address!("0x2000000000000000000000000000000000000002");
    const C: Address = address!("0x3000000000000000000000000000000000000003");

    fn state_with_attesters(addrs: &[Address]) -> CctpState<MemoryStore> {
        let mut state = CctpState::new(MemoryStore::new());
        for addr in addrs {
            state.enable_attester(*addr).unwrap();
        }
        state
    }

    #[test]
    fn test_enabled_attesters_are_sorted() {
        let state = state_with_attesters(&[C, A, B]);
        assert_eq!(state.enabled_attesters().unwrap(), vec![A, B, C]);
    }

    #[test]
    fn test_enable_twice_fails() {
        let mut state = state_with_attesters(&[A]);
        assert!(matches!(
            state.enable_attester(A),
            Err(CctpError::AttesterAlreadyFound(_))
        ));
    }

    #[test]
    fn test_disable_unknown_attester() {
        let mut state = state_with_attesters(&[A, B, C]);
        let unknown = address!("0x4000000000000000000000000000000000000004");
        assert!(matches!(
            state.disable_attester(unknown, 1),
            Err(CctpError::AttesterNotFound(_))
        ));
    }

    #[rstest]
    #[case::three_enabled_threshold_one(3, 1, true)]
    #[case::two_enabled_threshold_one(2, 1, false)]
    #[case::three_enabled_threshold_two(3, 2, false)]
    #[case::one_enabled_threshold_one(1, 1, false)]
    fn test_disable_respects_threshold(
        #[case] enabled: usize,
        #[case] threshold: u32,
        #[case] allowed: bool,
    ) {
        let all = [A, B, C];
        let mut state = state_with_attesters(&all[..enabled]);
        let result = state.disable_attester(A, threshold);
        if allowed {
            result.unwrap();
            assert!(!state.is_attester_enabled(&A).unwrap());
            assert_eq!(state.enabled_attesters().unwrap().len(), enabled - 1);
        } else {
            assert!(matches!(
                result,
                Err(CctpError::CannotRemoveLastAttester { .. })
            ));
            assert!(state.is_attester_enabled(&A).unwrap());
        }
    }

    #[test]
    fn test_disabled_attester_is_kept_and_can_be_reenabled() {
        let mut state = state_with_attesters(&[A, B, C]);
        state.disable_attester(A, 1).unwrap();

        let stored = state.attester(&A).unwrap().unwrap();
        assert_eq!(stored.status, AttesterStatus::Disabled);
        assert_eq!(state.attesters().unwrap().len(), 3);
        assert!(matches!(
            state.disable_attester(A, 1),
            Err(CctpError::AttesterNotEnabled(_))
        ));

        state.enable_attester(A).unwrap();
        assert!(state.is_attester_enabled(&A).unwrap());
    }

    #[rstest]
    #[case::zero(0)]
    #[case::unchanged(1)]
    #[case::above_enabled_count(3)]
    fn test_update_signature_threshold_rejects(#[case] new_threshold: u32) {
        let mut state = state_with_attesters(&[A, B]);
        assert!(matches!(
            state.update_signature_threshold(new_threshold, 1),
            Err(CctpError::InvalidSignatureThreshold(_))
        ));
    }

    #[test]
    fn test_update_signature_threshold() {
        let mut state = state_with_attesters(&[A, B]);
        state.update_signature_threshold(2, 1).unwrap();
        assert_eq!(state.signature_threshold().unwrap(), Some(2));
    }

    #[test]
    fn test_token_pair_lookups() {
        let mut state = CctpState::new(MemoryStore::new());
        let remote = FixedBytes::from([0xaa; 32]);
        let pair = TokenPair {
            remote_domain: DomainId::ETHEREUM,
            remote_token: remote,
            local_token: "uusdc".to_string(),
        };
        state.link_token_pair(&pair).unwrap();

        assert_eq!(
            state.token_pair(DomainId::ETHEREUM, &remote).unwrap(),
            Some(pair.clone())
        );
        assert_eq!(state.token_pair(DomainId::AVALANCHE, &remote).unwrap(), None);
        assert_eq!(
            state
                .token_pair_for_local("uusdc", DomainId::ETHEREUM)
                .unwrap(),
            Some(pair.clone())
        );
        assert_eq!(
            state.token_pair_for_local("uusdc", DomainId::BASE).unwrap(),
            None
        );

        assert!(matches!(
            state.link_token_pair(&pair),
            Err(CctpError::TokenPairAlreadyFound)
        ));

        assert_eq!(
            state.unlink_token_pair(DomainId::ETHEREUM, &remote).unwrap(),
            pair
        );
        assert!(matches!(
            state.unlink_token_pair(DomainId::ETHEREUM, &remote),
            Err(CctpError::TokenPairNotFound)
        ));
    }

    #[test]
    fn test_remote_token_messengers() {
        let mut state = CctpState::new(MemoryStore::new());
        let messenger = RemoteTokenMessenger {
            domain: DomainId::ARBITRUM,
            address: FixedBytes::from([0x11; 32]),
        };
        state.add_remote_token_messenger(&messenger).unwrap();
        assert!(matches!(
            state.add_remote_token_messenger(&messenger),
            Err(CctpError::RemoteTokenMessengerAlreadyFound(3))
        ));
        assert_eq!(state.remote_token_messengers().unwrap(), vec![messenger.clone()]);

        state.remove_remote_token_messenger(DomainId::ARBITRUM).unwrap();
        assert!(matches!(
            state.remove_remote_token_messenger(DomainId::ARBITRUM),
            Err(CctpError::RemoteTokenMessengerNotFound(3))
        ));
    }

    #[test]
    fn test_burn_limit() {
        let mut state = CctpState::new(MemoryStore::new());
        assert!(state
            .ensure_within_burn_limit("uusdc", U256::MAX)
            .is_ok());

        state.set_burn_limit("uusdc", U256::from(100)).unwrap();
        assert!(state.ensure_within_burn_limit("uusdc", U256::from(100)).is_ok());
        assert!(matches!(
            state.ensure_within_burn_limit("uusdc", U256::from(101)),
            Err(CctpError::ExceedsBurnLimit { .. })
        ));
        assert_eq!(
            state.burn_limits().unwrap(),
            vec![BurnLimit {
                denom: "uusdc".to_string(),
                amount: U256::from(100)
            }]
        );
    }

    #[test]
    fn test_max_message_body_size() {
        let mut state = CctpState::new(MemoryStore::new());
        assert!(state.ensure_message_body_size(1 << 20).is_ok());

        state.set_max_message_body_size(8).unwrap();
        assert!(state.ensure_message_body_size(8).is_ok());
        assert!(matches!(
            state.ensure_message_body_size(9),
            Err(CctpError::ExceedsMaxMessageBodySize { max: 8, actual: 9 })
        ));
    }
}

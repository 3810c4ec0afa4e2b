// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Roles and pause flags
//!
//! Every role is a single account string that is absent until first set.
//! Ownership moves in two steps (`update_owner` then `accept_owner`); the
//! other roles are assigned directly by the owner.

use super::{keys, CctpState};
use crate::error::{CctpError, Result};
use crate::store::{KvRead, KvStore};

impl<S: KvRead> CctpState<S> {
    pub fn owner(&self) -> Result<Option<String>> {
        self.get_string(keys::OWNER)
    }

    pub fn pending_owner(&self) -> Result<Option<String>> {
        self.get_string(keys::PENDING_OWNER)
    }

    pub fn attester_manager(&self) -> Result<Option<String>> {
        self.get_string(keys::ATTESTER_MANAGER)
    }

    pub fn token_controller(&self) -> Result<Option<String>> {
        self.get_string(keys::TOKEN_CONTROLLER)
    }

    pub fn pauser(&self) -> Result<Option<String>> {
        self.get_string(keys::PAUSER)
    }

    fn ensure_role(
        &self,
        key: &[u8],
        caller: &str,
        not_set: CctpError,
        mismatch: CctpError,
    ) -> Result<()> {
        match self.get_string(key)? {
            None => Err(not_set),
            Some(holder) if holder != caller => Err(mismatch),
            Some(_) => Ok(()),
        }
    }

    pub fn ensure_owner(&self, caller: &str) -> Result<()> {
        self.ensure_role(keys::OWNER, caller, CctpError::OwnerNotSet, CctpError::NotOwner)
    }

    pub fn ensure_pending_owner(&self, caller: &str) -> Result<()> {
        self.ensure_role(
            keys::PENDING_OWNER,
            caller,
            CctpError::PendingOwnerNotSet,
            CctpError::NotPendingOwner,
        )
    }

    pub fn ensure_attester_manager(&self, caller: &str) -> Result<()> {
        self.ensure_role(
            keys::ATTESTER_MANAGER,
            caller,
            CctpError::AttesterManagerNotSet,
            CctpError::NotAttesterManager,
        )
    }

    pub fn ensure_token_controller(&self, caller: &str) -> Result<()> {
        self.ensure_role(
            keys::TOKEN_CONTROLLER,
            caller,
            CctpError::TokenControllerNotSet,
            CctpError::NotTokenController,
        )
    }

    pub fn ensure_pauser(&self, caller: &str) -> Result<()> {
        self.ensure_role(keys::PAUSER, caller, CctpError::PauserNotSet, CctpError::NotPauser)
    }

    pub fn burning_and_minting_paused(&self) -> Result<bool> {
        self.get_flag(keys::BURNING_AND_MINTING_PAUSED)
    }

    pub fn sending_and_receiving_paused(&self) -> Result<bool> {
        self.get_flag(keys::SENDING_AND_RECEIVING_PAUSED)
    }

    pub fn ensure_burning_and_minting_active(&self) -> Result<()> {
        if self.burning_and_minting_paused()? {
            return Err(CctpError::BurningAndMintingPaused);
        }
        Ok(())
    }

    pub fn ensure_sending_and_receiving_active(&self) -> Result<()> {
        if self.sending_and_receiving_paused()? {
            return Err(CctpError::SendingAndReceivingPaused);
        }
        Ok(())
    }
}

impl<S: KvStore> CctpState<S> {
    pub fn set_owner(&mut self, owner: &str) -> Result<()> {
        self.set_string(keys::OWNER, owner)
    }

    pub fn set_pending_owner(&mut self, pending_owner: &str) -> Result<()> {
        self.set_string(keys::PENDING_OWNER, pending_owner)
    }

    pub fn clear_pending_owner(&mut self) -> Result<()> {
        self.remove(keys::PENDING_OWNER)
    }

    pub fn set_attester_manager(&mut self, attester_manager: &str) -> Result<()> {
        self.set_string(keys::ATTESTER_MANAGER, attester_manager)
    }

    pub fn set_token_controller(&mut self, token_controller: &str) -> Result<()> {
        self.set_string(keys::TOKEN_CONTROLLER, token_controller)
    }

    pub fn set_pauser(&mut self, pauser: &str) -> Result<()> {
        self.set_string(keys::PAUSER, pauser)
    }

    /// First step of an ownership transfer: only the owner may nominate
    pub fn update_owner(&mut self, caller: &str, new_owner: &str) -> Result<()> {
        self.ensure_owner(caller)?;
        self.set_pending_owner(new_owner)
    }

    /// Second step: the nominee takes ownership. Returns the previous owner.
    pub fn accept_owner(&mut self, caller: &str) -> Result<Option<String>> {
        self.ensure_pending_owner(caller)?;
        let previous = self.owner()?;
        self.set_owner(caller)?;
        self.clear_pending_owner()?;
        Ok(previous)
    }

    pub fn set_burning_and_minting_paused(&mut self, paused: bool) -> Result<()> {
        self.set_flag(keys::BURNING_AND_MINTING_PAUSED, paused)
    }

    pub fn set_sending_and_receiving_paused(&mut self, paused: bool) -> Result<()> {
        self.set_flag(keys::SENDING_AND_RECEIVING_PAUSED, paused)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn state_with_owner(owner: &str) -> CctpState<MemoryStore> {
        let mut state = CctpState::new(MemoryStore::new());
        state.set_owner(owner).unwrap();
        state
    }

    #[test]
    fn test_roles_absent_until_set() {
        let state = CctpState::new(MemoryStore::new());
        assert_eq!(state.owner().unwrap(), None);
        assert!(matches!(state.ensure_owner("a"), Err(CctpError::OwnerNotSet)));
        assert!(matches!(
            state.ensure_pauser("a"),
            Err(CctpError::PauserNotSet)
        ));
        assert!(matches!(
            state.ensure_attester_manager("a"),
            Err(CctpError::AttesterManagerNotSet)
        ));
        assert!(matches!(
            state.ensure_token_controller("a"),
            Err(CctpError::TokenControllerNotSet)
        ));
    }

    #[test]
    fn test_ensure_owner() {
        let state = state_with_owner("alice");
        assert!(state.ensure_owner("alice").is_ok());
        assert!(matches!(state.ensure_owner("bob"), Err(CctpError::NotOwner)));
    }

    #[test]
    fn test_two_step_ownership_transfer() {
        let mut state = state_with_owner("alice");

        assert!(matches!(
            state.update_owner("bob", "bob"),
            Err(CctpError::NotOwner)
        ));
        assert!(matches!(
            state.accept_owner("bob"),
            Err(CctpError::PendingOwnerNotSet)
        ));

        state.update_owner("alice", "bob").unwrap();
        assert_eq!(state.owner().unwrap().as_deref(), Some("alice"));
        assert_eq!(state.pending_owner().unwrap().as_deref(), Some("bob"));

        assert!(matches!(
            state.accept_owner("carol"),
            Err(CctpError::NotPendingOwner)
        ));

        let previous = state.accept_owner("bob").unwrap();
        assert_eq!(previous.as_deref(), Some("alice"));
        assert_eq!(state.owner().unwrap().as_deref(), Some("bob"));
        assert_eq!(state.pending_owner().unwrap(), None);
    }

    #[test]
    fn test_pause_flags() {
        let mut state = CctpState::new(MemoryStore::new());
        assert!(state.ensure_burning_and_minting_active().is_ok());
        assert!(state.ensure_sending_and_receiving_active().is_ok());

        state.set_burning_and_minting_paused(true).unwrap();
        assert!(matches!(
            state.ensure_burning_and_minting_active(),
            Err(CctpError::BurningAndMintingPaused)
        ));
        assert!(state.ensure_sending_and_receiving_active().is_ok());

        state.set_sending_and_receiving_paused(true).unwrap();
        assert!(matches!(
            state.ensure_sending_and_receiving_active(),
            Err(CctpError::SendingAndReceivingPaused)
        ));

        state.set_burning_and_minting_paused(false).unwrap();
        assert!(!state.burning_and_minting_paused().unwrap());
    }
}

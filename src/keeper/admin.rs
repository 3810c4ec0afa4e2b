// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Administrative operations
//!
//! Each operation authorizes the caller against one role, mutates state and
//! queues a single event.

use alloy_primitives::{Address, U256};
use tracing::info;

use super::{Keeper, Session};
use crate::error::{CctpError, Result};
use crate::events::Event;
use crate::protocol::{parse_bytes32, DomainId};
use crate::spans;
use crate::state::{RemoteTokenMessenger, TokenPair};
use crate::store::KvStore;
use crate::traits::{AddressCodec, BankLedger, EventSink};

impl<S: KvStore, L, A> Session<'_, S, L, A> {
    fn update_owner(&mut self, from: &str, new_owner: &str) -> Result<()> {
        self.state.update_owner(from, new_owner)?;
        self.emit(Event::OwnershipTransferStarted {
            previous_owner: from.to_string(),
            new_owner: new_owner.to_string(),
        });
        Ok(())
    }

    fn accept_owner(&mut self, from: &str) -> Result<()> {
        let previous_owner = self.state.accept_owner(from)?;
        self.emit(Event::OwnerUpdated {
            previous_owner,
            new_owner: from.to_string(),
        });
        Ok(())
    }

    fn update_attester_manager(&mut self, from: &str, new_attester_manager: &str) -> Result<()> {
        self.state.ensure_owner(from)?;
        let previous_attester_manager = self.state.attester_manager()?;
        self.state.set_attester_manager(new_attester_manager)?;
        self.emit(Event::AttesterManagerUpdated {
            previous_attester_manager,
            new_attester_manager: new_attester_manager.to_string(),
        });
        Ok(())
    }

    fn update_token_controller(&mut self, from: &str, new_token_controller: &str) -> Result<()> {
        self.state.ensure_owner(from)?;
        let previous_token_controller = self.state.token_controller()?;
        self.state.set_token_controller(new_token_controller)?;
        self.emit(Event::TokenControllerUpdated {
            previous_token_controller,
            new_token_controller: new_token_controller.to_string(),
        });
        Ok(())
    }

    fn update_pauser(&mut self, from: &str, new_pauser: &str) -> Result<()> {
        self.state.ensure_owner(from)?;
        let previous_pauser = self.state.pauser()?;
        self.state.set_pauser(new_pauser)?;
        self.emit(Event::PauserUpdated {
            previous_pauser,
            new_pauser: new_pauser.to_string(),
        });
        Ok(())
    }

    fn enable_attester(&mut self, from: &str, attester: Address) -> Result<()> {
        self.state.ensure_attester_manager(from)?;
        self.state.enable_attester(attester)?;
        self.emit(Event::AttesterEnabled { attester });
        Ok(())
    }

    fn disable_attester(&mut self, from: &str, attester: Address) -> Result<()> {
        self.state.ensure_attester_manager(from)?;
        let threshold = self.signature_threshold()?;
        self.state.disable_attester(attester, threshold)?;
        self.emit(Event::AttesterDisabled { attester });
        Ok(())
    }

    fn update_signature_threshold(&mut self, from: &str, new_threshold: u32) -> Result<()> {
        self.state.ensure_attester_manager(from)?;
        let current = self.signature_threshold()?;
        self.state
            .update_signature_threshold(new_threshold, current)?;
        self.emit(Event::SignatureThresholdUpdated {
            old_signature_threshold: current,
            new_signature_threshold: new_threshold,
        });
        Ok(())
    }

    fn link_token_pair(
        &mut self,
        from: &str,
        remote_domain: DomainId,
        remote_token: &[u8],
        local_token: &str,
    ) -> Result<()> {
        self.state.ensure_token_controller(from)?;
        let remote_token = parse_bytes32("remote_token", remote_token)?;
        if local_token.is_empty() {
            return Err(CctpError::InvalidBurnToken(
                "local token must be non-empty".to_string(),
            ));
        }

        let pair = TokenPair {
            remote_domain,
            remote_token,
            local_token: local_token.to_string(),
        };
        self.state.link_token_pair(&pair)?;
        self.emit(Event::TokenPairLinked {
            local_token: pair.local_token,
            remote_domain,
            remote_token,
        });
        Ok(())
    }

    fn unlink_token_pair(
        &mut self,
        from: &str,
        remote_domain: DomainId,
        remote_token: &[u8],
    ) -> Result<()> {
        self.state.ensure_token_controller(from)?;
        let remote_token = parse_bytes32("remote_token", remote_token)?;
        let pair = self.state.unlink_token_pair(remote_domain, &remote_token)?;
        self.emit(Event::TokenPairUnlinked {
            local_token: pair.local_token,
            remote_domain,
            remote_token,
        });
        Ok(())
    }

    fn set_max_burn_amount_per_message(
        &mut self,
        from: &str,
        local_token: &str,
        amount: U256,
    ) -> Result<()> {
        self.state.ensure_token_controller(from)?;
        self.state.set_burn_limit(local_token, amount)?;
        self.emit(Event::SetBurnLimitPerMessage {
            token: local_token.to_string(),
            burn_limit_per_message: amount,
        });
        Ok(())
    }

    fn add_remote_token_messenger(
        &mut self,
        from: &str,
        domain: DomainId,
        address: &[u8],
    ) -> Result<()> {
        self.state.ensure_owner(from)?;
        let address = parse_bytes32("remote_token_messenger", address)?;
        if address.is_zero() {
            return Err(CctpError::InvalidAddress(
                "remote token messenger must be non-zero".to_string(),
            ));
        }
        self.state
            .add_remote_token_messenger(&RemoteTokenMessenger { domain, address })?;
        self.emit(Event::RemoteTokenMessengerAdded {
            domain,
            remote_token_messenger: address,
        });
        Ok(())
    }

    fn remove_remote_token_messenger(&mut self, from: &str, domain: DomainId) -> Result<()> {
        self.state.ensure_owner(from)?;
        let removed = self.state.remove_remote_token_messenger(domain)?;
        self.emit(Event::RemoteTokenMessengerRemoved {
            domain,
            remote_token_messenger: removed.address,
        });
        Ok(())
    }

    fn update_max_message_body_size(&mut self, from: &str, size: u64) -> Result<()> {
        self.state.ensure_owner(from)?;
        self.state.set_max_message_body_size(size)?;
        self.emit(Event::MaxMessageBodySizeUpdated {
            new_max_message_body_size: size,
        });
        Ok(())
    }

    fn set_burning_and_minting_paused(&mut self, from: &str, paused: bool) -> Result<()> {
        self.state.ensure_pauser(from)?;
        self.state.set_burning_and_minting_paused(paused)?;
        self.emit(if paused {
            Event::BurningAndMintingPaused
        } else {
            Event::BurningAndMintingUnpaused
        });
        Ok(())
    }

    fn set_sending_and_receiving_paused(&mut self, from: &str, paused: bool) -> Result<()> {
        self.state.ensure_pauser(from)?;
        self.state.set_sending_and_receiving_paused(paused)?;
        self.emit(if paused {
            Event::SendingAndReceivingMessagesPaused
        } else {
            Event::SendingAndReceivingMessagesUnpaused
        });
        Ok(())
    }
}

impl<S, L, E, A> Keeper<S, L, E, A>
where
    S: KvStore,
    L: BankLedger,
    E: EventSink,
    A: AddressCodec,
{
    fn admin<R>(
        &mut self,
        operation: &'static str,
        from: &str,
        op: impl FnOnce(&mut Session<'_, S, L, A>) -> Result<R>,
    ) -> Result<R> {
        let span = spans::admin(operation, from);
        let _guard = span.enter();
        let value = self.run(op)?;
        info!(operation, from, event = "admin_operation_completed");
        Ok(value)
    }

    /// Nominates a new owner; takes effect once they call
    /// [`Keeper::accept_owner`]
    pub fn update_owner(&mut self, from: &str, new_owner: &str) -> Result<()> {
        self.admin("update_owner", from, |s| s.update_owner(from, new_owner))
    }

    pub fn accept_owner(&mut self, from: &str) -> Result<()> {
        self.admin("accept_owner", from, |s| s.accept_owner(from))
    }

    pub fn update_attester_manager(&mut self, from: &str, new_attester_manager: &str) -> Result<()> {
        self.admin("update_attester_manager", from, |s| {
            s.update_attester_manager(from, new_attester_manager)
        })
    }

    pub fn update_token_controller(&mut self, from: &str, new_token_controller: &str) -> Result<()> {
        self.admin("update_token_controller", from, |s| {
            s.update_token_controller(from, new_token_controller)
        })
    }

    pub fn update_pauser(&mut self, from: &str, new_pauser: &str) -> Result<()> {
        self.admin("update_pauser", from, |s| s.update_pauser(from, new_pauser))
    }

    pub fn enable_attester(&mut self, from: &str, attester: Address) -> Result<()> {
        self.admin("enable_attester", from, |s| s.enable_attester(from, attester))
    }

    /// Disables an attester, keeping more than `threshold` enabled
    pub fn disable_attester(&mut self, from: &str, attester: Address) -> Result<()> {
        self.admin("disable_attester", from, |s| s.disable_attester(from, attester))
    }

    pub fn update_signature_threshold(&mut self, from: &str, new_threshold: u32) -> Result<()> {
        self.admin("update_signature_threshold", from, |s| {
            s.update_signature_threshold(from, new_threshold)
        })
    }

    /// Routes `remote_token` on `remote_domain` to the local denom `local_token`
    pub fn link_token_pair(
        &mut self,
        from: &str,
        remote_domain: DomainId,
        remote_token: &[u8],
        local_token: &str,
    ) -> Result<()> {
        self.admin("link_token_pair", from, |s| {
            s.link_token_pair(from, remote_domain, remote_token, local_token)
        })
    }

    pub fn unlink_token_pair(
        &mut self,
        from: &str,
        remote_domain: DomainId,
        remote_token: &[u8],
    ) -> Result<()> {
        self.admin("unlink_token_pair", from, |s| {
            s.unlink_token_pair(from, remote_domain, remote_token)
        })
    }

    pub fn set_max_burn_amount_per_message(
        &mut self,
        from: &str,
        local_token: &str,
        amount: U256,
    ) -> Result<()> {
        self.admin("set_max_burn_amount_per_message", from, |s| {
            s.set_max_burn_amount_per_message(from, local_token, amount)
        })
    }

    pub fn add_remote_token_messenger(
        &mut self,
        from: &str,
        domain: DomainId,
        address: &[u8],
    ) -> Result<()> {
        self.admin("add_remote_token_messenger", from, |s| {
            s.add_remote_token_messenger(from, domain, address)
        })
    }

    pub fn remove_remote_token_messenger(&mut self, from: &str, domain: DomainId) -> Result<()> {
        self.admin("remove_remote_token_messenger", from, |s| {
            s.remove_remote_token_messenger(from, domain)
        })
    }

    pub fn update_max_message_body_size(&mut self, from: &str, size: u64) -> Result<()> {
        self.admin("update_max_message_body_size", from, |s| {
            s.update_max_message_body_size(from, size)
        })
    }

    pub fn pause_burning_and_minting(&mut self, from: &str) -> Result<()> {
        self.admin("pause_burning_and_minting", from, |s| {
            s.set_burning_and_minting_paused(from, true)
        })
    }

    pub fn unpause_burning_and_minting(&mut self, from: &str) -> Result<()> {
        self.admin("unpause_burning_and_minting", from, |s| {
            s.set_burning_and_minting_paused(from, false)
        })
    }

    pub fn pause_sending_and_receiving_messages(&mut self, from: &str) -> Result<()> {
        self.admin("pause_sending_and_receiving_messages", from, |s| {
            s.set_sending_and_receiving_paused(from, true)
        })
    }

    pub fn unpause_sending_and_receiving_messages(&mut self, from: &str) -> Result<()> {
        self.admin("unpause_sending_and_receiving_messages", from, |s| {
            s.set_sending_and_receiving_paused(from, false)
        })
    }
}

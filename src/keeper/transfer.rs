// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Token burns and mints

use alloy_primitives::hex;
use tracing::{info, warn};

use super::messaging::require_destination_caller;
use super::params::{DepositForBurnParams, ReplaceDepositForBurnParams};
use super::{Keeper, Session};
use crate::error::{CctpError, Result};
use crate::events::Event;
use crate::protocol::{parse_bytes32, parse_destination_caller, BurnMessage, Message};
use crate::spans;
use crate::store::KvStore;
use crate::traits::{AddressCodec, BankLedger, EventSink};

impl<S: KvStore, L: BankLedger, A: AddressCodec> Session<'_, S, L, A> {
    pub(super) fn deposit_for_burn(&mut self, params: &DepositForBurnParams) -> Result<u64> {
        self.state.ensure_burning_and_minting_active()?;
        self.state.ensure_sending_and_receiving_active()?;

        let denom = params.burn_token();
        let amount = params.amount();
        let destination_domain = params.destination_domain();

        self.state.ensure_within_burn_limit(denom, amount)?;

        let mint_recipient = parse_bytes32("mint_recipient", params.mint_recipient())?;
        let destination_caller = parse_destination_caller(params.destination_caller())?;

        let pair = self
            .state
            .token_pair_for_local(denom, destination_domain)?
            .ok_or(CctpError::TokenPairNotFound)?;

        let depositor = self.addresses.to_bytes32(params.from())?;
        let burn = BurnMessage::new(pair.remote_token, mint_recipient, amount, depositor);
        burn.validate()?;

        // Burns go to the remote token messenger when one is registered.
        let recipient = self
            .state
            .remote_token_messenger(destination_domain)?
            .map(|messenger| messenger.address)
            .unwrap_or(mint_recipient);

        let nonce = self.originate(
            depositor,
            destination_domain,
            recipient,
            destination_caller,
            burn.into(),
        )?;

        self.emit(Event::DepositForBurn {
            nonce,
            burn_token: denom.to_string(),
            amount,
            depositor: params.from().to_string(),
            mint_recipient,
            destination_domain,
            destination_token_messenger: recipient,
            destination_caller,
        });

        self.ledger
            .burn(params.from(), denom, amount)
            .map_err(|e| CctpError::BurningFailed {
                reason: e.to_string(),
            })?;

        info!(
            nonce,
            denom,
            amount = %amount,
            destination_domain = destination_domain.as_u32(),
            event = "deposit_for_burn_completed"
        );
        Ok(nonce)
    }

    /// Mints `burn.amount` of `local_token` and forwards it to the recipient
    ///
    /// Returns false, without failing, when any step cannot complete.
    pub(super) fn mint_and_withdraw(&mut self, burn: &BurnMessage, local_token: &str) -> bool {
        let recipient = match self.addresses.from_bytes32(&burn.mint_recipient) {
            Ok(recipient) => recipient,
            Err(e) => {
                spans::record_error_with_context(
                    "InvalidMintRecipient",
                    &e.to_string(),
                    Some("mint recipient is not a local account"),
                );
                warn!(error = %e, event = "mint_recipient_unresolved");
                return false;
            }
        };

        let module = self.config.module_account.as_str();
        if let Err(e) = self.ledger.mint(module, local_token, burn.amount) {
            spans::record_error_with_context("MintFailed", &e.to_string(), None);
            warn!(error = %e, denom = local_token, event = "mint_failed");
            return false;
        }
        if let Err(e) = self
            .ledger
            .transfer(module, &recipient, local_token, burn.amount)
        {
            spans::record_error_with_context(
                "TransferFailed",
                &e.to_string(),
                Some("minted tokens remain in the module account"),
            );
            warn!(error = %e, denom = local_token, event = "mint_transfer_failed");
            return false;
        }

        self.emit(Event::MintAndWithdraw {
            mint_recipient: recipient,
            amount: burn.amount,
            mint_token: local_token.to_string(),
        });
        true
    }

    pub(super) fn replace_deposit_for_burn(
        &mut self,
        params: &ReplaceDepositForBurnParams,
    ) -> Result<u64> {
        self.state.ensure_burning_and_minting_active()?;

        let original = Message::decode(params.original_message())?;
        let burn = original.body.as_burn().ok_or_else(|| {
            CctpError::InvalidMessageBody("original message is not a burn".to_string())
        })?;

        let new_mint_recipient = parse_bytes32("new_mint_recipient", params.new_mint_recipient())?;
        if new_mint_recipient.is_zero() {
            return Err(CctpError::InvalidMintRecipient);
        }
        let replaced = burn.clone().with_mint_recipient(new_mint_recipient);

        let nonce = self.replace(
            params.from(),
            params.original_message(),
            params.original_attestation(),
            replaced.clone().into(),
            params.new_destination_caller(),
        )?;

        let burn_token = self
            .state
            .token_pair(original.destination_domain, &replaced.burn_token)?
            .map(|pair| pair.local_token)
            .unwrap_or_else(|| hex::encode_prefixed(replaced.burn_token));

        self.emit(Event::DepositForBurn {
            nonce,
            burn_token,
            amount: replaced.amount,
            depositor: params.from().to_string(),
            mint_recipient: new_mint_recipient,
            destination_domain: original.destination_domain,
            destination_token_messenger: original.recipient,
            destination_caller: parse_destination_caller(params.new_destination_caller())?,
        });
        Ok(nonce)
    }
}

impl<S, L, E, A> Keeper<S, L, E, A>
where
    S: KvStore,
    L: BankLedger,
    E: EventSink,
    A: AddressCodec,
{
    /// Burns `amount` of a local token and sends a burn message to
    /// `destination_domain`
    ///
    /// Returns the nonce of the outbound message.
    pub fn deposit_for_burn(&mut self, params: DepositForBurnParams) -> Result<u64> {
        let span = spans::deposit_for_burn(
            params.from(),
            params.burn_token(),
            &params.amount(),
            params.destination_domain(),
        );
        let _guard = span.enter();
        self.run(|session| session.deposit_for_burn(&params))
    }

    /// Like [`Keeper::deposit_for_burn`], restricting who may relay the
    /// message on the destination domain
    pub fn deposit_for_burn_with_caller(&mut self, params: DepositForBurnParams) -> Result<u64> {
        let span = spans::deposit_for_burn(
            params.from(),
            params.burn_token(),
            &params.amount(),
            params.destination_domain(),
        );
        let _guard = span.enter();
        self.run(|session| {
            require_destination_caller(params.destination_caller())?;
            session.deposit_for_burn(&params)
        })
    }

    /// Re-issues a sent burn with a new mint recipient and destination caller
    pub fn replace_deposit_for_burn(&mut self, params: ReplaceDepositForBurnParams) -> Result<u64> {
        let span = spans::replace_message(
            params.from(),
            params.original_message().len(),
            BurnMessage::SIZE,
        );
        let _guard = span.enter();
        self.run(|session| session.replace_deposit_for_burn(&params))
    }
}

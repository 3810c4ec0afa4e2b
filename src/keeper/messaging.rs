// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Sending, receiving and replacing messages

use alloy_primitives::{Bytes, FixedBytes};
use tracing::{debug, info, warn, Span};

use super::params::{
    ReceiveMessageParams, ReceiveMessageResponse, ReplaceMessageParams, SendMessageParams,
};
use super::{Keeper, Session};
use crate::error::{CctpError, Result};
use crate::events::Event;
use crate::protocol::{
    parse_bytes32, parse_destination_caller, Attestation, BurnMessage, DomainId, Message,
    MessageBody,
};
use crate::spans;
use crate::store::KvStore;
use crate::traits::{AddressCodec, BankLedger, EventSink};

impl<S: KvStore, L: BankLedger, A: AddressCodec> Session<'_, S, L, A> {
    /// Stamps, records and announces a message originated by this domain
    pub(super) fn originate(
        &mut self,
        sender: FixedBytes<32>,
        destination_domain: DomainId,
        recipient: FixedBytes<32>,
        destination_caller: FixedBytes<32>,
        body: MessageBody,
    ) -> Result<u64> {
        let nonce = self.state.reserve_nonce()?;
        let message = Message::new(
            self.config.local_domain,
            destination_domain,
            nonce,
            sender,
            recipient,
            destination_caller,
            body,
        );
        let encoded = message.encode();

        self.state
            .set_sent_message(destination_domain, nonce, &encoded)?;
        self.emit(Event::MessageSent { message: encoded });

        Span::current().record("nonce", nonce);
        debug!(
            nonce,
            destination_domain = destination_domain.as_u32(),
            event = "message_sent"
        );
        Ok(nonce)
    }

    pub(super) fn send_message(&mut self, params: &SendMessageParams) -> Result<u64> {
        self.state.ensure_sending_and_receiving_active()?;

        let recipient = parse_bytes32("recipient", params.recipient())?;
        if recipient.is_zero() {
            return Err(CctpError::InvalidRecipient);
        }
        let destination_caller = parse_destination_caller(params.destination_caller())?;
        self.state
            .ensure_message_body_size(params.message_body().len())?;
        let body = opaque_body(params.message_body())?;

        let sender = self.addresses.to_bytes32(params.from())?;
        self.originate(
            sender,
            params.destination_domain(),
            recipient,
            destination_caller,
            body,
        )
    }

    pub(super) fn receive_message(
        &mut self,
        params: &ReceiveMessageParams,
    ) -> Result<ReceiveMessageResponse> {
        self.state.ensure_sending_and_receiving_active()?;

        let raw = params.message();
        let message = Message::decode(raw)?;
        message.validate()?;

        let span = Span::current();
        span.record("source_domain", message.source_domain.as_u32());
        span.record("nonce", message.nonce);

        if message.destination_domain != self.config.local_domain {
            return Err(CctpError::InvalidDestinationDomain {
                expected: self.config.local_domain.as_u32(),
                actual: message.destination_domain.as_u32(),
            });
        }

        self.state
            .ensure_nonce_unused(message.source_domain, message.nonce)?;

        if message.has_destination_caller() {
            let caller = self
                .addresses
                .to_bytes32(params.from())
                .map_err(|_| CctpError::NotDestinationCaller)?;
            if !message.is_destination_caller(&caller) {
                return Err(CctpError::NotDestinationCaller);
            }
        }

        let attestation = Attestation::new(params.attestation().clone());
        self.verifier()?.verify(raw, &attestation)?;

        self.state
            .mark_nonce_used(message.source_domain, message.nonce)?;

        let success = match message.body.as_burn() {
            Some(burn) => {
                self.state.ensure_burning_and_minting_active()?;
                burn.validate()?;
                let pair = self
                    .state
                    .token_pair(message.source_domain, &burn.burn_token)?
                    .ok_or(CctpError::TokenPairNotFound)?;
                self.mint_and_withdraw(burn, &pair.local_token)
            }
            None => true,
        };

        self.state
            .set_received_message(message.source_domain, message.nonce, raw)?;
        self.emit(Event::MessageReceived {
            caller: params.from().to_string(),
            source_domain: message.source_domain,
            nonce: message.nonce,
            sender: message.sender,
            message_body: message.body.encode(),
        });

        span.record("success", success);
        if success {
            info!(
                source_domain = message.source_domain.as_u32(),
                nonce = message.nonce,
                event = "message_received"
            );
        } else {
            warn!(
                source_domain = message.source_domain.as_u32(),
                nonce = message.nonce,
                event = "message_received_without_mint"
            );
        }

        Ok(ReceiveMessageResponse {
            source_domain: message.source_domain,
            nonce: message.nonce,
            success,
        })
    }

    /// Re-sends a previously attested message of this domain with a new body
    ///
    /// Only the original sender may replace, and the original attestation
    /// must still verify against the current attester set.
    pub(super) fn replace(
        &mut self,
        from: &str,
        original_raw: &[u8],
        original_attestation: &Bytes,
        new_body: MessageBody,
        new_destination_caller: &[u8],
    ) -> Result<u64> {
        self.state.ensure_sending_and_receiving_active()?;

        let original = Message::decode(original_raw)?;
        original.validate()?;

        let sender = self.addresses.to_bytes32(from)?;
        if original.sender != sender {
            return Err(CctpError::NotOriginalSender);
        }
        if original.source_domain != self.config.local_domain {
            return Err(CctpError::InvalidSourceDomain {
                expected: self.config.local_domain.as_u32(),
                actual: original.source_domain.as_u32(),
            });
        }

        let destination_caller = parse_destination_caller(new_destination_caller)?;
        let attestation = Attestation::new(original_attestation.clone());
        self.verifier()?.verify(original_raw, &attestation)?;

        let nonce = self.originate(
            sender,
            original.destination_domain,
            original.recipient,
            destination_caller,
            new_body,
        )?;
        info!(
            original_nonce = original.nonce,
            nonce,
            event = "message_replaced"
        );
        Ok(nonce)
    }

    pub(super) fn replace_message(&mut self, params: &ReplaceMessageParams) -> Result<u64> {
        self.state
            .ensure_message_body_size(params.new_message_body().len())?;
        let body = opaque_body(params.new_message_body())?;
        self.replace(
            params.from(),
            params.original_message(),
            params.original_attestation(),
            body,
            params.new_destination_caller(),
        )
    }
}

impl<S, L, E, A> Keeper<S, L, E, A>
where
    S: KvStore,
    L: BankLedger,
    E: EventSink,
    A: AddressCodec,
{
    /// Sends an arbitrary message body to `destination_domain`
    ///
    /// Returns the nonce assigned to the message.
    pub fn send_message(&mut self, params: SendMessageParams) -> Result<u64> {
        let span = spans::send_message(
            params.from(),
            params.destination_domain(),
            params.message_body().len(),
        );
        let _guard = span.enter();
        self.run(|session| session.send_message(&params))
    }

    /// Like [`Keeper::send_message`], restricting relay to one caller
    pub fn send_message_with_caller(&mut self, params: SendMessageParams) -> Result<u64> {
        let span = spans::send_message(
            params.from(),
            params.destination_domain(),
            params.message_body().len(),
        );
        let _guard = span.enter();
        self.run(|session| {
            require_destination_caller(params.destination_caller())?;
            session.send_message(&params)
        })
    }

    /// Verifies and processes an inbound message
    ///
    /// A mint that cannot complete does not fail the call: the nonce is
    /// consumed, the message recorded and `success` is false.
    pub fn receive_message(
        &mut self,
        params: ReceiveMessageParams,
    ) -> Result<ReceiveMessageResponse> {
        let span = spans::receive_message(
            params.from(),
            params.message().len(),
            params.attestation().len(),
        );
        let _guard = span.enter();
        self.run(|session| session.receive_message(&params))
    }

    /// Replaces a sent message with a new body and destination caller
    ///
    /// Returns the nonce of the replacement message.
    pub fn replace_message(&mut self, params: ReplaceMessageParams) -> Result<u64> {
        let span = spans::replace_message(
            params.from(),
            params.original_message().len(),
            params.new_message_body().len(),
        );
        let _guard = span.enter();
        self.run(|session| session.replace_message(&params))
    }
}

/// Wraps a caller-supplied body for a generic send
///
/// A body of exactly [`BurnMessage::SIZE`] bytes would be read as a burn on
/// the destination, so only the deposit paths may produce one.
fn opaque_body(raw: &[u8]) -> Result<MessageBody> {
    match MessageBody::from_bytes(raw) {
        MessageBody::Burn(_) => Err(CctpError::InvalidMessageBody(format!(
            "{} byte bodies are reserved for burn messages",
            BurnMessage::SIZE
        ))),
        body => Ok(body),
    }
}

/// The "with caller" variants demand a concrete, non-zero caller
pub(super) fn require_destination_caller(raw: &[u8]) -> Result<()> {
    if parse_destination_caller(raw)?.is_zero() {
        return Err(CctpError::InvalidDestinationCaller);
    }
    Ok(())
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::{Bytes, U256};
use bon::Builder;

use crate::protocol::DomainId;

/// Parameters for burning tokens toward another domain
///
/// Address fields are raw bytes and are length-checked when the operation
/// runs.
#[derive(Builder, Debug, Clone)]
pub struct DepositForBurnParams {
    #[builder(into)]
    from: String,
    amount: U256,
    destination_domain: DomainId,
    #[builder(into)]
    mint_recipient: Bytes,
    /// Local denom being burned
    #[builder(into)]
    burn_token: String,
    #[builder(into)]
    destination_caller: Option<Bytes>,
}

impl DepositForBurnParams {
    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }

    pub fn destination_domain(&self) -> DomainId {
        self.destination_domain
    }

    pub fn mint_recipient(&self) -> &[u8] {
        &self.mint_recipient
    }

    pub fn burn_token(&self) -> &str {
        &self.burn_token
    }

    /// Empty when unrestricted
    pub fn destination_caller(&self) -> &[u8] {
        self.destination_caller.as_ref().map(|b| &b[..]).unwrap_or_default()
    }
}

/// Parameters for sending an arbitrary message body
#[derive(Builder, Debug, Clone)]
pub struct SendMessageParams {
    #[builder(into)]
    from: String,
    destination_domain: DomainId,
    #[builder(into)]
    recipient: Bytes,
    #[builder(into)]
    message_body: Bytes,
    #[builder(into)]
    destination_caller: Option<Bytes>,
}

impl SendMessageParams {
    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn destination_domain(&self) -> DomainId {
        self.destination_domain
    }

    pub fn recipient(&self) -> &[u8] {
        &self.recipient
    }

    pub fn message_body(&self) -> &[u8] {
        &self.message_body
    }

    pub fn destination_caller(&self) -> &[u8] {
        self.destination_caller.as_ref().map(|b| &b[..]).unwrap_or_default()
    }
}

/// Parameters for relaying an attested inbound message
#[derive(Builder, Debug, Clone)]
pub struct ReceiveMessageParams {
    #[builder(into)]
    from: String,
    #[builder(into)]
    message: Bytes,
    #[builder(into)]
    attestation: Bytes,
}

impl ReceiveMessageParams {
    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn message(&self) -> &[u8] {
        &self.message
    }

    pub fn attestation(&self) -> &Bytes {
        &self.attestation
    }
}

/// Parameters for superseding a sent message with a new body
#[derive(Builder, Debug, Clone)]
pub struct ReplaceMessageParams {
    #[builder(into)]
    from: String,
    #[builder(into)]
    original_message: Bytes,
    #[builder(into)]
    original_attestation: Bytes,
    #[builder(into)]
    new_message_body: Bytes,
    #[builder(into)]
    new_destination_caller: Option<Bytes>,
}

impl ReplaceMessageParams {
    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn original_message(&self) -> &[u8] {
        &self.original_message
    }

    pub fn original_attestation(&self) -> &Bytes {
        &self.original_attestation
    }

    pub fn new_message_body(&self) -> &[u8] {
        &self.new_message_body
    }

    pub fn new_destination_caller(&self) -> &[u8] {
        self.new_destination_caller.as_ref().map(|b| &b[..]).unwrap_or_default()
    }
}

/// Parameters for redirecting a sent burn to a new mint recipient
#[derive(Builder, Debug, Clone)]
pub struct ReplaceDepositForBurnParams {
    #[builder(into)]
    from: String,
    #[builder(into)]
    original_message: Bytes,
    #[builder(into)]
    original_attestation: Bytes,
    #[builder(into)]
    new_mint_recipient: Bytes,
    #[builder(into)]
    new_destination_caller: Option<Bytes>,
}

impl ReplaceDepositForBurnParams {
    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn original_message(&self) -> &[u8] {
        &self.original_message
    }

    pub fn original_attestation(&self) -> &Bytes {
        &self.original_attestation
    }

    pub fn new_mint_recipient(&self) -> &[u8] {
        &self.new_mint_recipient
    }

    pub fn new_destination_caller(&self) -> &[u8] {
        self.new_destination_caller.as_ref().map(|b| &b[..]).unwrap_or_default()
    }
}

/// Outcome of a processed inbound message
///
/// `success` is false when the message was accepted and its nonce consumed
/// but the mint side effect could not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveMessageResponse {
    pub source_domain: DomainId,
    pub nonce: u64,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_for_burn_params_builder() {
        let params = DepositForBurnParams::builder()
            .from("0x0000000000000000000000000000000000000001")
            .amount(U256::from(1000))
            .destination_domain(DomainId::ETHEREUM)
            .mint_recipient(vec![7u8; 32])
            .burn_token("uusdc")
            .build();

        assert_eq!(params.from(), "0x0000000000000000000000000000000000000001");
        assert_eq!(params.amount(), U256::from(1000));
        assert_eq!(params.destination_domain(), DomainId::ETHEREUM);
        assert_eq!(params.mint_recipient(), &[7u8; 32]);
        assert_eq!(params.burn_token(), "uusdc");
        assert!(params.destination_caller().is_empty());
    }

    #[test]
    fn test_send_message_params_with_caller() {
        let params = SendMessageParams::builder()
            .from("sender")
            .destination_domain(DomainId::AVALANCHE)
            .recipient(vec![1u8; 32])
            .message_body(b"hello".to_vec())
            .destination_caller(vec![2u8; 32])
            .build();

        assert_eq!(params.message_body(), b"hello");
        assert_eq!(params.destination_caller(), &[2u8; 32]);
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Protocol events
//!
//! Events are queued while an operation runs and handed to the
//! [`EventSink`](crate::EventSink) only once the operation's writes have been
//! committed, so observers never see an event for a rolled-back call.

use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use serde::Serialize;

use crate::protocol::DomainId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A message was originated; carries the full encoded message
    MessageSent { message: Bytes },
    MessageReceived {
        caller: String,
        source_domain: DomainId,
        nonce: u64,
        sender: FixedBytes<32>,
        message_body: Bytes,
    },
    DepositForBurn {
        nonce: u64,
        burn_token: String,
        amount: U256,
        depositor: String,
        mint_recipient: FixedBytes<32>,
        destination_domain: DomainId,
        destination_token_messenger: FixedBytes<32>,
        destination_caller: FixedBytes<32>,
    },
    MintAndWithdraw {
        mint_recipient: String,
        amount: U256,
        mint_token: String,
    },
    OwnershipTransferStarted {
        previous_owner: String,
        new_owner: String,
    },
    OwnerUpdated {
        previous_owner: Option<String>,
        new_owner: String,
    },
    AttesterEnabled { attester: Address },
    AttesterDisabled { attester: Address },
    AttesterManagerUpdated {
        previous_attester_manager: Option<String>,
        new_attester_manager: String,
    },
    SignatureThresholdUpdated {
        old_signature_threshold: u32,
        new_signature_threshold: u32,
    },
    TokenPairLinked {
        local_token: String,
        remote_domain: DomainId,
        remote_token: FixedBytes<32>,
    },
    TokenPairUnlinked {
        local_token: String,
        remote_domain: DomainId,
        remote_token: FixedBytes<32>,
    },
    TokenControllerUpdated {
        previous_token_controller: Option<String>,
        new_token_controller: String,
    },
    SetBurnLimitPerMessage {
        token: String,
        burn_limit_per_message: U256,
    },
    RemoteTokenMessengerAdded {
        domain: DomainId,
        remote_token_messenger: FixedBytes<32>,
    },
    RemoteTokenMessengerRemoved {
        domain: DomainId,
        remote_token_messenger: FixedBytes<32>,
    },
    BurningAndMintingPaused,
    BurningAndMintingUnpaused,
    SendingAndReceivingMessagesPaused,
    SendingAndReceivingMessagesUnpaused,
    PauserUpdated {
        previous_pauser: Option<String>,
        new_pauser: String,
    },
    MaxMessageBodySizeUpdated { new_max_message_body_size: u64 },
}

impl Event {
    /// Stable event name, as it appears in the serialized `type` tag
    pub fn name(&self) -> &'static str {
        match self {
            Self::MessageSent { .. } => "message_sent",
            Self::MessageReceived { .. } => "message_received",
            Self::DepositForBurn { .. } => "deposit_for_burn",
            Self::MintAndWithdraw { .. } => "mint_and_withdraw",
            Self::OwnershipTransferStarted { .. } => "ownership_transfer_started",
            Self::OwnerUpdated { .. } => "owner_updated",
            Self::AttesterEnabled { .. } => "attester_enabled",
            Self::AttesterDisabled { .. } => "attester_disabled",
            Self::AttesterManagerUpdated { .. } => "attester_manager_updated",
            Self::SignatureThresholdUpdated { .. } => "signature_threshold_updated",
            Self::TokenPairLinked { .. } => "token_pair_linked",
            Self::TokenPairUnlinked { .. } => "token_pair_unlinked",
            Self::TokenControllerUpdated { .. } => "token_controller_updated",
            Self::SetBurnLimitPerMessage { .. } => "set_burn_limit_per_message",
            Self::RemoteTokenMessengerAdded { .. } => "remote_token_messenger_added",
            Self::RemoteTokenMessengerRemoved { .. } => "remote_token_messenger_removed",
            Self::BurningAndMintingPaused => "burning_and_minting_paused",
            Self::BurningAndMintingUnpaused => "burning_and_minting_unpaused",
            Self::SendingAndReceivingMessagesPaused => "sending_and_receiving_messages_paused",
            Self::SendingAndReceivingMessagesUnpaused => "sending_and_receiving_messages_unpaused",
            Self::PauserUpdated { .. } => "pauser_updated",
            Self::MaxMessageBodySizeUpdated { .. } => "max_message_body_size_updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matches_serialized_tag() {
        let events = [
            Event::BurningAndMintingPaused,
            Event::SendingAndReceivingMessagesUnpaused,
            Event::MessageSent {
                message: Bytes::from(vec![1, 2]),
            },
            Event::SignatureThresholdUpdated {
                old_signature_threshold: 1,
                new_signature_threshold: 2,
            },
            Event::MintAndWithdraw {
                mint_recipient: "0xabc".to_string(),
                amount: U256::from(5),
                mint_token: "uusdc".to_string(),
            },
        ];

        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.name());
        }
    }

    #[test]
    fn test_serialized_fields() {
        let event = Event::AttesterEnabled {
            attester: Address::repeat_byte(0x11),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json["attester"],
            "0x1111111111111111111111111111111111111111"
        );
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP message format types
//!
//! Every cross-domain message is a fixed 116-byte header followed by an
//! application body. The only body this core interprets is the token
//! [`BurnMessage`], which is recognised purely by its exact encoded length;
//! there is no type tag on the wire.
//!
//! Reference: <https://developers.circle.com/stablecoins/message-format>

use alloy_primitives::{keccak256, Bytes, FixedBytes, B256, U256};

use super::DomainId;
use crate::error::{CctpError, Result};

/// Current message header version
pub const MESSAGE_VERSION: u32 = 0;

/// Current burn message body version
pub const MESSAGE_BODY_VERSION: u32 = 0;

/// Size of every address-like field on the wire
pub const ADDRESS_SIZE: usize = 32;

/// CCTP Message
///
/// # Format
///
/// - version: uint32 (4 bytes)
/// - sourceDomain: uint32 (4 bytes)
/// - destinationDomain: uint32 (4 bytes)
/// - nonce: uint64 (8 bytes)
/// - sender: bytes32 (32 bytes)
/// - recipient: bytes32 (32 bytes)
/// - destinationCaller: bytes32 (32 bytes), all-zero means any caller
/// - messageBody: dynamic bytes
///
/// Total fixed size: 4 + 4 + 4 + 8 + 32 + 32 + 32 = 116 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message format version
    pub version: u32,
    /// Domain the message originated on
    pub source_domain: DomainId,
    /// Domain the message is addressed to
    pub destination_domain: DomainId,
    /// Nonce issued by the source domain
    pub nonce: u64,
    /// Sender on the source domain, left-padded to 32 bytes
    pub sender: FixedBytes<32>,
    /// Recipient on the destination domain, left-padded to 32 bytes
    pub recipient: FixedBytes<32>,
    /// Only account allowed to relay the message (0 = anyone)
    pub destination_caller: FixedBytes<32>,
    /// Application body
    pub body: MessageBody,
}

impl Message {
    /// Size of the message header in bytes
    pub const HEADER_SIZE: usize = 116;

    /// Creates a message with the current protocol version
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source_domain: DomainId,
        destination_domain: DomainId,
        nonce: u64,
        sender: FixedBytes<32>,
        recipient: FixedBytes<32>,
        destination_caller: FixedBytes<32>,
        body: MessageBody,
    ) -> Self {
        Self {
            version: MESSAGE_VERSION,
            source_domain,
            destination_domain,
            nonce,
            sender,
            recipient,
            destination_caller,
            body,
        }
    }

    /// Encodes the message to its wire form
    pub fn encode(&self) -> Bytes {
        let body = self.body.encode();
        let mut bytes = Vec::with_capacity(Self::HEADER_SIZE + body.len());

        bytes.extend_from_slice(&self.version.to_be_bytes());
        bytes.extend_from_slice(&self.source_domain.as_u32().to_be_bytes());
        bytes.extend_from_slice(&self.destination_domain.as_u32().to_be_bytes());
        bytes.extend_from_slice(&self.nonce.to_be_bytes());
        bytes.extend_from_slice(self.sender.as_slice());
        bytes.extend_from_slice(self.recipient.as_slice());
        bytes.extend_from_slice(self.destination_caller.as_slice());
        bytes.extend_from_slice(&body);

        Bytes::from(bytes)
    }

    /// Decodes a message from its wire form
    ///
    /// Fails with [`CctpError::InvalidMessageLength`] when the input is shorter
    /// than [`Message::HEADER_SIZE`]. The body is classified by
    /// [`MessageBody::from_bytes`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::HEADER_SIZE {
            return Err(CctpError::InvalidMessageLength {
                minimum: Self::HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let version = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let source_domain = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let destination_domain = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);

        let mut nonce = [0u8; 8];
        nonce.copy_from_slice(&bytes[12..20]);

        Ok(Self {
            version,
            source_domain: DomainId::new(source_domain),
            destination_domain: DomainId::new(destination_domain),
            nonce: u64::from_be_bytes(nonce),
            sender: FixedBytes::from_slice(&bytes[20..52]),
            recipient: FixedBytes::from_slice(&bytes[52..84]),
            destination_caller: FixedBytes::from_slice(&bytes[84..116]),
            body: MessageBody::from_bytes(&bytes[Self::HEADER_SIZE..]),
        })
    }

    /// Keccak256 of the encoded message; the digest attesters sign
    pub fn hash(&self) -> B256 {
        keccak256(self.encode())
    }

    /// Checks the header version
    ///
    /// Address widths are enforced by the field types; raw inputs are checked
    /// where they enter the crate via [`parse_bytes32`] and
    /// [`parse_destination_caller`].
    pub fn validate(&self) -> Result<()> {
        if self.version != MESSAGE_VERSION {
            return Err(CctpError::InvalidMessageVersion {
                expected: MESSAGE_VERSION,
                actual: self.version,
            });
        }
        Ok(())
    }

    /// Returns true if relaying is restricted to a single caller
    pub fn has_destination_caller(&self) -> bool {
        !self.destination_caller.is_zero()
    }

    /// Returns true if `caller` may relay this message
    pub fn is_destination_caller(&self, caller: &FixedBytes<32>) -> bool {
        !self.has_destination_caller() || self.destination_caller == *caller
    }
}

/// Message body, discriminated by length
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Any body that is not exactly [`BurnMessage::SIZE`] bytes
    Opaque(Bytes),
    /// A token burn
    Burn(BurnMessage),
}

impl MessageBody {
    /// Classifies raw body bytes
    ///
    /// A body is a burn message exactly when its length equals
    /// [`BurnMessage::SIZE`]; everything else stays opaque.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.len() == BurnMessage::SIZE {
            Self::Burn(BurnMessage::decode_exact(bytes))
        } else {
            Self::Opaque(Bytes::copy_from_slice(bytes))
        }
    }

    pub fn encode(&self) -> Bytes {
        match self {
            Self::Opaque(bytes) => bytes.clone(),
            Self::Burn(burn) => burn.encode(),
        }
    }

    /// Encoded length in bytes
    pub fn len(&self) -> usize {
        match self {
            Self::Opaque(bytes) => bytes.len(),
            Self::Burn(_) => BurnMessage::SIZE,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_burn(&self) -> Option<&BurnMessage> {
        match self {
            Self::Burn(burn) => Some(burn),
            Self::Opaque(_) => None,
        }
    }
}

impl From<BurnMessage> for MessageBody {
    fn from(burn: BurnMessage) -> Self {
        Self::Burn(burn)
    }
}

/// CCTP Burn Message Body
///
/// # Format
///
/// - version: uint32 (4 bytes)
/// - burnToken: bytes32 (32 bytes) - token representation on the source domain
/// - mintRecipient: bytes32 (32 bytes) - account receiving the mint
/// - amount: uint256 (32 bytes) - amount burned
/// - messageSender: bytes32 (32 bytes) - depositor on the source domain
///
/// Total fixed size: 4 + 32 + 32 + 32 + 32 = 132 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnMessage {
    /// Message body version
    pub version: u32,
    /// Token burned on the source domain
    pub burn_token: FixedBytes<32>,
    /// Account that receives the minted tokens
    pub mint_recipient: FixedBytes<32>,
    /// Amount burned, in the token's smallest unit
    pub amount: U256,
    /// Account that called depositForBurn
    pub message_sender: FixedBytes<32>,
}

impl BurnMessage {
    /// Size of the burn message body in bytes
    pub const SIZE: usize = 132;

    /// Creates a burn message with the current body version
    pub fn new(
        burn_token: FixedBytes<32>,
        mint_recipient: FixedBytes<32>,
        amount: U256,
        message_sender: FixedBytes<32>,
    ) -> Self {
        Self {
            version: MESSAGE_BODY_VERSION,
            burn_token,
            mint_recipient,
            amount,
            message_sender,
        }
    }

    /// Returns a copy with a different mint recipient
    pub fn with_mint_recipient(mut self, mint_recipient: FixedBytes<32>) -> Self {
        self.mint_recipient = mint_recipient;
        self
    }

    pub fn encode(&self) -> Bytes {
        let mut bytes = Vec::with_capacity(Self::SIZE);

        bytes.extend_from_slice(&self.version.to_be_bytes());
        bytes.extend_from_slice(self.burn_token.as_slice());
        bytes.extend_from_slice(self.mint_recipient.as_slice());
        bytes.extend_from_slice(&self.amount.to_be_bytes::<32>());
        bytes.extend_from_slice(self.message_sender.as_slice());

        Bytes::from(bytes)
    }

    /// Decodes a burn message body
    ///
    /// The input must be exactly [`BurnMessage::SIZE`] bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SIZE {
            return Err(CctpError::InvalidMessageBody(format!(
                "burn message must be {} bytes, got {}",
                Self::SIZE,
                bytes.len()
            )));
        }
        Ok(Self::decode_exact(bytes))
    }

    // Caller guarantees `bytes.len() == Self::SIZE`.
    fn decode_exact(bytes: &[u8]) -> Self {
        Self {
            version: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            burn_token: FixedBytes::from_slice(&bytes[4..36]),
            mint_recipient: FixedBytes::from_slice(&bytes[36..68]),
            amount: U256::from_be_slice(&bytes[68..100]),
            message_sender: FixedBytes::from_slice(&bytes[100..132]),
        }
    }

    /// Checks body version, amount and mint recipient
    pub fn validate(&self) -> Result<()> {
        if self.version != MESSAGE_BODY_VERSION {
            return Err(CctpError::InvalidMessageBodyVersion {
                expected: MESSAGE_BODY_VERSION,
                actual: self.version,
            });
        }
        if self.amount.is_zero() {
            return Err(CctpError::InvalidAmount("amount must be positive".to_string()));
        }
        if self.mint_recipient.is_zero() {
            return Err(CctpError::InvalidMintRecipient);
        }
        Ok(())
    }
}

/// Parses a raw address field that must be exactly 32 bytes
pub fn parse_bytes32(field: &'static str, bytes: &[u8]) -> Result<FixedBytes<32>> {
    if bytes.len() != ADDRESS_SIZE {
        return Err(CctpError::InvalidAddressLength {
            field,
            expected: ADDRESS_SIZE,
            actual: bytes.len(),
        });
    }
    Ok(FixedBytes::from_slice(bytes))
}

/// Parses a destination caller: empty means any caller, otherwise 32 bytes
pub fn parse_destination_caller(bytes: &[u8]) -> Result<FixedBytes<32>> {
    if bytes.is_empty() {
        return Ok(FixedBytes::ZERO);
    }
    parse_bytes32("destination_caller", bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burn_message() -> BurnMessage {
        BurnMessage::new(
            FixedBytes::from([0xaa; 32]),
            FixedBytes::from([0xbb; 32]),
            U256::from(1_000_000u64),
            FixedBytes::from([0xcc; 32]),
        )
    }

    fn message(body: MessageBody) -> Message {
        Message::new(
            DomainId::ETHEREUM,
            DomainId::NOBLE,
            42,
            FixedBytes::from([1u8; 32]),
            FixedBytes::from([2u8; 32]),
            FixedBytes::ZERO,
            body,
        )
    }

    #[test]
    fn test_sizes() {
        assert_eq!(Message::HEADER_SIZE, 116);
        assert_eq!(BurnMessage::SIZE, 132);
        assert_eq!(burn_message().encode().len(), BurnMessage::SIZE);
    }

    #[test]
    fn test_message_encode_layout() {
        let msg = message(MessageBody::Opaque(Bytes::from(vec![9, 9, 9])));
        let encoded = msg.encode();

        assert_eq!(encoded.len(), Message::HEADER_SIZE + 3);
        assert_eq!(&encoded[0..4], &0u32.to_be_bytes());
        assert_eq!(&encoded[4..8], &0u32.to_be_bytes());
        assert_eq!(&encoded[8..12], &4u32.to_be_bytes());
        assert_eq!(&encoded[12..20], &42u64.to_be_bytes());
        assert_eq!(&encoded[20..52], &[1u8; 32]);
        assert_eq!(&encoded[52..84], &[2u8; 32]);
        assert_eq!(&encoded[84..116], &[0u8; 32]);
        assert_eq!(&encoded[116..], &[9, 9, 9]);
    }

    #[test]
    fn test_message_encode_decode_opaque() {
        let msg = message(MessageBody::Opaque(Bytes::from(vec![1, 2, 3, 4])));
        let decoded = Message::decode(&msg.encode()).expect("should decode");
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_message_encode_decode_burn() {
        let msg = message(burn_message().into());
        let decoded = Message::decode(&msg.encode()).expect("should decode");
        assert_eq!(msg, decoded);
        assert_eq!(decoded.body.as_burn(), Some(&burn_message()));
    }

    #[test]
    fn test_message_decode_header_only() {
        let msg = message(MessageBody::Opaque(Bytes::new()));
        let decoded = Message::decode(&msg.encode()).unwrap();
        assert!(decoded.body.is_empty());
    }

    #[test]
    fn test_message_decode_too_short() {
        let err = Message::decode(&[0u8; 115]).unwrap_err();
        assert!(matches!(
            err,
            CctpError::InvalidMessageLength {
                minimum: 116,
                actual: 115
            }
        ));
    }

    #[test]
    fn test_body_classified_by_length_only() {
        assert!(MessageBody::from_bytes(&[0u8; 132]).as_burn().is_some());
        assert!(MessageBody::from_bytes(&[0u8; 131]).as_burn().is_none());
        assert!(MessageBody::from_bytes(&[0u8; 133]).as_burn().is_none());
        assert!(MessageBody::from_bytes(&[0u8; 116]).as_burn().is_none());
    }

    #[test]
    fn test_burn_amount_is_left_padded() {
        let encoded = burn_message().encode();
        assert!(encoded[68..97].iter().all(|b| *b == 0));
        assert_eq!(&encoded[97..100], &[0x0f, 0x42, 0x40]);
    }

    #[test]
    fn test_burn_decode_wrong_size() {
        assert!(matches!(
            BurnMessage::decode(&[0u8; 116]),
            Err(CctpError::InvalidMessageBody(_))
        ));
    }

    #[test]
    fn test_burn_amount_max_round_trips() {
        let mut burn = burn_message();
        burn.amount = U256::MAX;
        assert_eq!(BurnMessage::decode(&burn.encode()).unwrap(), burn);
    }

    #[test]
    fn test_hash_is_keccak_of_encoding() {
        let msg = message(burn_message().into());
        assert_eq!(msg.hash(), keccak256(msg.encode()));
    }

    #[test]
    fn test_hash_changes_with_nonce() {
        let a = message(burn_message().into());
        let mut b = a.clone();
        b.nonce += 1;
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn test_validate_version() {
        let mut msg = message(MessageBody::Opaque(Bytes::new()));
        assert!(msg.validate().is_ok());

        msg.version = 1;
        assert!(matches!(
            msg.validate(),
            Err(CctpError::InvalidMessageVersion {
                expected: 0,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_burn_validate() {
        assert!(burn_message().validate().is_ok());

        let mut zero = burn_message();
        zero.amount = U256::ZERO;
        assert!(matches!(zero.validate(), Err(CctpError::InvalidAmount(_))));

        let mut bad_version = burn_message();
        bad_version.version = 7;
        assert!(matches!(
            bad_version.validate(),
            Err(CctpError::InvalidMessageBodyVersion { .. })
        ));

        let no_recipient = burn_message().with_mint_recipient(FixedBytes::ZERO);
        assert!(matches!(
            no_recipient.validate(),
            Err(CctpError::InvalidMintRecipient)
        ));
    }

    #[test]
    fn test_destination_caller() {
        let mut msg = message(MessageBody::Opaque(Bytes::new()));
        let anyone = FixedBytes::from([7u8; 32]);
        assert!(!msg.has_destination_caller());
        assert!(msg.is_destination_caller(&anyone));

        msg.destination_caller = FixedBytes::from([3u8; 32]);
        assert!(msg.has_destination_caller());
        assert!(!msg.is_destination_caller(&anyone));
        assert!(msg.is_destination_caller(&FixedBytes::from([3u8; 32])));
    }

    #[test]
    fn test_parse_address_fields() {
        assert!(parse_bytes32("recipient", &[1u8; 32]).is_ok());
        assert!(matches!(
            parse_bytes32("recipient", &[1u8; 20]),
            Err(CctpError::InvalidAddressLength {
                field: "recipient",
                expected: 32,
                actual: 20
            })
        ));
        assert_eq!(parse_destination_caller(&[]).unwrap(), FixedBytes::ZERO);
        assert!(parse_destination_caller(&[1u8; 31]).is_err());
    }
}

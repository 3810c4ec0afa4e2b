// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP protocol types and definitions
//!
//! This module contains the wire-level types of the Cross-Chain Transfer
//! Protocol: domain identifiers, the message header and burn body codecs, and
//! the attestation signature container.

mod attestation;
mod domain_id;
mod message;

pub use attestation::{Attestation, SIGNATURE_LENGTH};
pub use domain_id::DomainId;
pub use message::{
    parse_bytes32, parse_destination_caller, BurnMessage, Message, MessageBody, ADDRESS_SIZE,
    MESSAGE_BODY_VERSION, MESSAGE_VERSION,
};

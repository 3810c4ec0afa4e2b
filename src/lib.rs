// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! # cctp-core
//!
//! The state-transition core of Circle's Cross-Chain Transfer Protocol (CCTP)
//! for a chain that hosts the protocol natively.
//!
//! The crate decodes and encodes the binary message format, verifies
//! attester signatures, guards against replays, enforces roles and pause
//! switches, and drives burns and mints through a host-provided ledger.
//!
//! ## Quick Start
//!
//! ```rust
//! use alloy_primitives::{address, U256};
//! use cctp_core::testing::{FakeLedger, RecordingEventSink};
//! use cctp_core::{
//!     DepositForBurnParams, DomainId, GenesisState, Keeper, MemoryStore, TokenPair,
//! };
//!
//! # fn main() -> Result<(), cctp_core::CctpError> {
//! let depositor = "0x00000000000000000000000000000000000000aa";
//! let ledger = FakeLedger::new();
//! ledger.set_balance(depositor, "uusdc", U256::from(1_000));
//!
//! let mut keeper = Keeper::new(MemoryStore::new(), ledger.clone(), RecordingEventSink::new());
//! keeper.init_genesis(&GenesisState {
//!     token_pairs: vec![TokenPair {
//!         remote_domain: DomainId::ETHEREUM,
//!         remote_token: address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").into_word(),
//!         local_token: "uusdc".to_string(),
//!     }],
//!     ..Default::default()
//! })?;
//!
//! let nonce = keeper.deposit_for_burn(
//!     DepositForBurnParams::builder()
//!         .from(depositor)
//!         .amount(U256::from(100))
//!         .destination_domain(DomainId::ETHEREUM)
//!         .mint_recipient(vec![0x11; 32])
//!         .burn_token("uusdc")
//!         .build(),
//! )?;
//!
//! assert_eq!(nonce, 0);
//! assert_eq!(ledger.balance(depositor, "uusdc"), U256::from(900));
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`Keeper`] - Entry point for every state transition
//! - [`Message`], [`BurnMessage`] and [`Attestation`] - Wire formats
//! - [`AttestationVerifier`] - Threshold signature checks
//! - [`CctpState`] - Typed view over the persisted state
//! - [`BankLedger`], [`EventSink`] and [`AddressCodec`] - Host collaborators
//! - [`CctpError`] and [`Result`] - Error types for error handling

mod config;
mod error;
mod events;
mod genesis;
mod keeper;
mod protocol;
mod traits;

pub mod state;
pub mod store;
pub mod testing;
pub mod verifier;

pub use config::{KeeperConfig, DEFAULT_MODULE_ACCOUNT, DEFAULT_SIGNATURE_THRESHOLD};
pub use error::{CctpError, Result};
pub use events::Event;
pub use genesis::{GenesisState, UsedNonce};
pub use keeper::params::{
    DepositForBurnParams, ReceiveMessageParams, ReceiveMessageResponse,
    ReplaceDepositForBurnParams, ReplaceMessageParams, SendMessageParams,
};
pub use keeper::Keeper;
pub use protocol::{
    parse_bytes32, parse_destination_caller, Attestation, BurnMessage, DomainId, Message,
    MessageBody, ADDRESS_SIZE, MESSAGE_BODY_VERSION, MESSAGE_VERSION, SIGNATURE_LENGTH,
};
pub use state::{Attester, AttesterStatus, BurnLimit, CctpState, RemoteTokenMessenger, TokenPair};
pub use store::{BatchOperation, KvRead, KvStore, MemoryStore, StoreTransaction};
pub use traits::{AddressCodec, BankLedger, EventSink, HexAddressCodec};
pub use verifier::AttestationVerifier;

// Public module for advanced users who need custom instrumentation
pub mod spans;

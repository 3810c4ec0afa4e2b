// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Collaborator trait abstractions for the CCTP core.
//!
//! The core owns protocol state but not balances, event delivery or the host
//! chain's account format. Those are reached through the traits below, so a
//! host runtime plugs in its bank module and address scheme, and tests plug
//! in the fakes from [`crate::testing`].
//!
//! # Example: Implementing a Ledger
//!
//! ```rust
//! use alloy_primitives::U256;
//! use cctp_core::{BankLedger, CctpError, Result};
//! use std::collections::HashMap;
//!
//! #[derive(Default)]
//! struct Balances(HashMap<(String, String), U256>);
//!
//! impl BankLedger for Balances {
//!     fn burn(&mut self, account: &str, denom: &str, amount: U256) -> Result<()> {
//!         let balance = self.0.entry((account.into(), denom.into())).or_default();
//!         *balance = balance
//!             .checked_sub(amount)
//!             .ok_or_else(|| CctpError::Ledger("insufficient funds".into()))?;
//!         Ok(())
//!     }
//!
//!     fn mint(&mut self, account: &str, denom: &str, amount: U256) -> Result<()> {
//!         *self.0.entry((account.into(), denom.into())).or_default() += amount;
//!         Ok(())
//!     }
//!
//!     fn transfer(&mut self, from: &str, to: &str, denom: &str, amount: U256) -> Result<()> {
//!         self.burn(from, denom, amount)?;
//!         self.mint(to, denom, amount)
//!     }
//! }
//! ```

use alloy_primitives::{hex, Address, FixedBytes, U256};

use crate::error::{CctpError, Result};
use crate::events::Event;

/// Trait for the token balance ledger.
///
/// Burns debit an account, mints credit one. Deposits are burned straight
/// from the depositor; inbound transfers are minted into the module account
/// and then transferred to the recipient.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Insufficient balance on deposit
/// - Mint failure on receive (recorded as `success = false`)
/// - Transfer failure after a successful mint
pub trait BankLedger {
    /// Removes `amount` of `denom` from `account`.
    fn burn(&mut self, account: &str, denom: &str, amount: U256) -> Result<()>;

    /// Creates `amount` of `denom` in `account`.
    fn mint(&mut self, account: &str, denom: &str, amount: U256) -> Result<()>;

    /// Moves `amount` of `denom` between accounts.
    fn transfer(&mut self, from: &str, to: &str, denom: &str, amount: U256) -> Result<()>;
}

impl<T: BankLedger + ?Sized> BankLedger for &mut T {
    fn burn(&mut self, account: &str, denom: &str, amount: U256) -> Result<()> {
        (**self).burn(account, denom, amount)
    }

    fn mint(&mut self, account: &str, denom: &str, amount: U256) -> Result<()> {
        (**self).mint(account, denom, amount)
    }

    fn transfer(&mut self, from: &str, to: &str, denom: &str, amount: U256) -> Result<()> {
        (**self).transfer(from, to, denom, amount)
    }
}

/// Trait for delivering committed events.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: Event) {
        (**self).emit(event)
    }
}

/// Trait for converting between local account strings and 32-byte
/// protocol addresses.
///
/// Every address that crosses domains is carried as `bytes32`. The codec
/// decides how the host's account format maps onto that width.
pub trait AddressCodec {
    /// Encodes a local account as a left-padded 32-byte protocol address.
    fn to_bytes32(&self, account: &str) -> Result<FixedBytes<32>>;

    /// Decodes a 32-byte protocol address into a local account.
    fn from_bytes32(&self, address: &FixedBytes<32>) -> Result<String>;
}

/// EVM-style accounts: `0x`-prefixed 20-byte hex, left-padded to 32 bytes
///
/// Decoding rejects addresses whose upper 12 bytes are not zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexAddressCodec;

impl AddressCodec for HexAddressCodec {
    fn to_bytes32(&self, account: &str) -> Result<FixedBytes<32>> {
        let address: Address = account
            .parse()
            .map_err(|e| CctpError::InvalidAddress(format!("{account}: {e}")))?;
        Ok(address.into_word())
    }

    fn from_bytes32(&self, address: &FixedBytes<32>) -> Result<String> {
        if address[..12].iter().any(|b| *b != 0) {
            return Err(CctpError::InvalidAddress(format!(
                "{address} does not hold a 20-byte account"
            )));
        }
        Ok(hex::encode_prefixed(&address[12..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: &str = "0x00000000000000000000000000000000deadbeef";

    #[test]
    fn test_hex_codec_pads_left() {
        let word = HexAddressCodec.to_bytes32(ACCOUNT).unwrap();
        assert!(word[..28].iter().all(|b| *b == 0));
        assert_eq!(&word[28..], &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(HexAddressCodec.from_bytes32(&word).unwrap(), ACCOUNT);
    }

    #[test]
    fn test_hex_codec_outputs_lowercase() {
        let mixed = "0x52908400098527886E0F7030069857D2E4169EE7";
        let word = HexAddressCodec.to_bytes32(mixed).unwrap();
        assert_eq!(
            HexAddressCodec.from_bytes32(&word).unwrap(),
            mixed.to_lowercase()
        );
    }

    #[test]
    fn test_hex_codec_rejects_malformed() {
        assert!(matches!(
            HexAddressCodec.to_bytes32("noble1xyz"),
            Err(CctpError::InvalidAddress(_))
        ));
        assert!(matches!(
            HexAddressCodec.to_bytes32("0x1234"),
            Err(CctpError::InvalidAddress(_))
        ));
        assert!(matches!(
            HexAddressCodec.from_bytes32(&FixedBytes::from([0xff; 32])),
            Err(CctpError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_vec_event_sink() {
        let mut sink: Vec<Event> = Vec::new();
        sink.emit(Event::BurningAndMintingPaused);
        assert_eq!(sink, vec![Event::BurningAndMintingPaused]);
    }
}

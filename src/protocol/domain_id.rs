// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CCTP domain identifiers
//!
//! Every network participating in the protocol is identified by a numeric
//! domain. Unlike a closed enum, inbound messages may carry any `u32`, so the
//! domain is a transparent newtype with named constants for the well-known
//! networks.
//!
//! Reference: <https://developers.circle.com/stablecoins/supported-domains>

use std::fmt;

use serde::{Deserialize, Serialize};

/// CCTP domain identifier
///
/// # Example
///
/// ```rust
/// use cctp_core::DomainId;
///
/// let noble = DomainId::NOBLE;
/// assert_eq!(noble.as_u32(), 4);
/// assert_eq!(noble.name(), Some("Noble"));
/// assert_eq!(DomainId::new(999).name(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainId(u32);

impl DomainId {
    /// Ethereum (Domain ID: 0)
    pub const ETHEREUM: Self = Self(0);
    /// Avalanche C-Chain (Domain ID: 1)
    pub const AVALANCHE: Self = Self(1);
    /// Optimism (Domain ID: 2)
    pub const OPTIMISM: Self = Self(2);
    /// Arbitrum (Domain ID: 3)
    pub const ARBITRUM: Self = Self(3);
    /// Noble (Domain ID: 4)
    pub const NOBLE: Self = Self(4);
    /// Solana (Domain ID: 5)
    pub const SOLANA: Self = Self(5);
    /// Base (Domain ID: 6)
    pub const BASE: Self = Self(6);
    /// Polygon PoS (Domain ID: 7)
    pub const POLYGON: Self = Self(7);

    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the network name for well-known domains
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("Ethereum"),
            1 => Some("Avalanche"),
            2 => Some("Optimism"),
            3 => Some("Arbitrum"),
            4 => Some("Noble"),
            5 => Some("Solana"),
            6 => Some("Base"),
            7 => Some("Polygon"),
            _ => None,
        }
    }
}

impl From<u32> for DomainId {
    #[inline]
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<DomainId> for u32 {
    #[inline]
    fn from(domain: DomainId) -> Self {
        domain.0
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_id_values() {
        assert_eq!(DomainId::ETHEREUM.as_u32(), 0);
        assert_eq!(DomainId::AVALANCHE.as_u32(), 1);
        assert_eq!(DomainId::NOBLE.as_u32(), 4);
        assert_eq!(DomainId::POLYGON.as_u32(), 7);
    }

    #[test]
    fn test_unknown_domain_is_representable() {
        let domain = DomainId::from(12345);
        assert_eq!(domain.as_u32(), 12345);
        assert_eq!(domain.name(), None);
        assert_eq!(domain.to_string(), "12345");
    }

    #[test]
    fn test_display() {
        assert_eq!(DomainId::NOBLE.to_string(), "Noble (4)");
        assert_eq!(DomainId::ETHEREUM.to_string(), "Ethereum (0)");
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&DomainId::ARBITRUM).unwrap();
        assert_eq!(json, "3");
        let back: DomainId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DomainId::ARBITRUM);
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use crate::protocol::DomainId;

/// Default account that receives freshly minted tokens before they are
/// transferred to the recipient
pub const DEFAULT_MODULE_ACCOUNT: &str = "cctp";

/// Threshold applied while none has been stored
pub const DEFAULT_SIGNATURE_THRESHOLD: u32 = 1;

/// Static configuration for a [`Keeper`](crate::Keeper).
///
/// # Examples
///
/// ```rust
/// use cctp_core::{DomainId, KeeperConfig};
///
/// // Noble defaults
/// let config = KeeperConfig::default();
/// assert_eq!(config.local_domain, DomainId::NOBLE);
///
/// // Another chain
/// let config = KeeperConfig::default()
///     .with_local_domain(DomainId::BASE)
///     .with_module_account("0x000000000000000000000000000000000000cc7b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeeperConfig {
    /// Domain of the chain this keeper runs on.
    pub local_domain: DomainId,
    /// Account credited by inbound mints.
    pub module_account: String,
    /// Threshold used until one is written to state.
    pub default_signature_threshold: u32,
}

impl Default for KeeperConfig {
    /// Creates the configuration for the Noble domain.
    ///
    /// - `local_domain`: 4
    /// - `module_account`: `"cctp"`
    /// - `default_signature_threshold`: 1
    fn default() -> Self {
        Self {
            local_domain: DomainId::NOBLE,
            module_account: DEFAULT_MODULE_ACCOUNT.to_string(),
            default_signature_threshold: DEFAULT_SIGNATURE_THRESHOLD,
        }
    }
}

impl KeeperConfig {
    /// Sets the domain this keeper accepts messages for and stamps on the
    /// messages it originates.
    pub fn with_local_domain(mut self, domain: DomainId) -> Self {
        self.local_domain = domain;
        self
    }

    pub fn with_module_account(mut self, account: impl Into<String>) -> Self {
        self.module_account = account.into();
        self
    }

    /// Sets the fallback signature threshold.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cctp_core::KeeperConfig;
    ///
    /// let config = KeeperConfig::default().with_default_signature_threshold(2);
    /// assert_eq!(config.default_signature_threshold, 2);
    /// ```
    pub fn with_default_signature_threshold(mut self, threshold: u32) -> Self {
        self.default_signature_threshold = threshold;
        self
    }
}

// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test utilities and fake implementations of the keeper's collaborators
//!
//! The fakes share their state behind `Arc<Mutex<..>>`, so a clone handed to
//! a [`Keeper`](crate::Keeper) can still be inspected and reconfigured from
//! the test that created it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alloy_primitives::U256;

use crate::events::Event;
use crate::traits::{BankLedger, EventSink};
use crate::{CctpError, Result};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Fake Ledger
// ============================================================================

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<(String, String), U256>,
    fail_mint: bool,
    fail_transfer: bool,
    fail_burn: bool,
}

/// An in-memory bank ledger keyed by `(account, denom)`
///
/// Supports simulating:
/// - Mint failures
/// - Transfer failures
/// - Burn failures, including burns that exceed the balance
#[derive(Clone, Debug, Default)]
pub struct FakeLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the balance of `account` in `denom`
    pub fn set_balance(&self, account: &str, denom: &str, amount: U256) {
        lock(&self.state)
            .balances
            .insert((account.to_string(), denom.to_string()), amount);
    }

    pub fn balance(&self, account: &str, denom: &str) -> U256 {
        lock(&self.state)
            .balances
            .get(&(account.to_string(), denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Make every subsequent mint fail
    pub fn fail_mints(&self, fail: bool) {
        lock(&self.state).fail_mint = fail;
    }

    pub fn fail_transfers(&self, fail: bool) {
        lock(&self.state).fail_transfer = fail;
    }

    pub fn fail_burns(&self, fail: bool) {
        lock(&self.state).fail_burn = fail;
    }
}

impl LedgerState {
    fn debit(&mut self, account: &str, denom: &str, amount: U256) -> Result<()> {
        let key = (account.to_string(), denom.to_string());
        let balance = self.balances.get(&key).copied().unwrap_or_default();
        let remaining = balance.checked_sub(amount).ok_or_else(|| {
            CctpError::Ledger(format!(
                "insufficient funds: {account} has {balance} {denom}, needs {amount}"
            ))
        })?;
        self.balances.insert(key, remaining);
        Ok(())
    }

    fn credit(&mut self, account: &str, denom: &str, amount: U256) -> Result<()> {
        let balance = self
            .balances
            .entry((account.to_string(), denom.to_string()))
            .or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| CctpError::Ledger("balance overflow".to_string()))?;
        Ok(())
    }
}

impl BankLedger for FakeLedger {
    fn burn(&mut self, account: &str, denom: &str, amount: U256) -> Result<()> {
        let mut state = lock(&self.state);
        if state.fail_burn {
            return Err(CctpError::Ledger("Simulated burn failure".to_string()));
        }
        state.debit(account, denom, amount)
    }

    fn mint(&mut self, account: &str, denom: &str, amount: U256) -> Result<()> {
        let mut state = lock(&self.state);
        if state.fail_mint {
            return Err(CctpError::Ledger("Simulated mint failure".to_string()));
        }
        state.credit(account, denom, amount)
    }

    fn transfer(&mut self, from: &str, to: &str, denom: &str, amount: U256) -> Result<()> {
        let mut state = lock(&self.state);
        if state.fail_transfer {
            return Err(CctpError::Ledger("Simulated transfer failure".to_string()));
        }
        state.debit(from, denom, amount)?;
        state.credit(to, denom, amount)
    }
}

// ============================================================================
// Recording Event Sink
// ============================================================================

/// An event sink that keeps every event it receives, in order
#[derive(Clone, Debug, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        lock(&self.events).clone()
    }

    /// Names of the recorded events, see [`Event::name`]
    pub fn names(&self) -> Vec<&'static str> {
        lock(&self.events).iter().map(Event::name).collect()
    }

    pub fn clear(&self) {
        lock(&self.events).clear();
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&mut self, event: Event) {
        lock(&self.events).push(event);
    }
}

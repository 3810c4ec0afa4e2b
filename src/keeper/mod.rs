// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Message processor
//!
//! [`Keeper`] is the entry point for every state transition: outbound burns
//! and messages, inbound relays, replacements and the administrative
//! operations. Each call runs inside its own [`StoreTransaction`]; the writes
//! and the events it queued are released only when it returns `Ok`.

mod admin;
mod messaging;
pub mod params;
mod transfer;

use bon::Builder;

use crate::config::KeeperConfig;
use crate::error::Result;
use crate::events::Event;
use crate::genesis::GenesisState;
use crate::protocol::DomainId;
use crate::spans;
use crate::state::CctpState;
use crate::store::{KvRead, KvStore, StoreTransaction};
use crate::traits::{AddressCodec, BankLedger, EventSink, HexAddressCodec};
use crate::verifier::AttestationVerifier;

/// CCTP state machine over a store, a ledger and an event sink
///
/// # Example
///
/// ```rust
/// use cctp_core::testing::{FakeLedger, RecordingEventSink};
/// use cctp_core::{HexAddressCodec, Keeper, KeeperConfig, MemoryStore};
///
/// let mut keeper = Keeper::builder()
///     .store(MemoryStore::new())
///     .ledger(FakeLedger::new())
///     .events(RecordingEventSink::new())
///     .addresses(HexAddressCodec)
///     .config(KeeperConfig::default())
///     .build();
///
/// assert_eq!(keeper.next_nonce().unwrap(), 0);
/// ```
#[derive(Builder, Debug)]
pub struct Keeper<S, L, E, A> {
    store: S,
    ledger: L,
    events: E,
    addresses: A,
    #[builder(default)]
    config: KeeperConfig,
}

impl<S, L, E> Keeper<S, L, E, HexAddressCodec> {
    /// Keeper for EVM-style accounts with the default configuration
    pub fn new(store: S, ledger: L, events: E) -> Self {
        Self {
            store,
            ledger,
            events,
            addresses: HexAddressCodec,
            config: KeeperConfig::default(),
        }
    }
}

impl<S, L, E, A> Keeper<S, L, E, A> {
    pub fn config(&self) -> &KeeperConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn event_sink(&self) -> &E {
        &self.events
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: KvRead, L, E, A> Keeper<S, L, E, A> {
    /// Read-only view of the persisted state
    pub fn state(&self) -> CctpState<&S> {
        CctpState::new(&self.store)
    }

    pub fn next_nonce(&self) -> Result<u64> {
        self.state().next_nonce()
    }

    pub fn is_nonce_used(&self, source_domain: DomainId, nonce: u64) -> Result<bool> {
        self.state().is_nonce_used(source_domain, nonce)
    }

    /// Stored threshold, or the configured default while none is stored
    pub fn signature_threshold(&self) -> Result<u32> {
        Ok(self
            .state()
            .signature_threshold()?
            .unwrap_or(self.config.default_signature_threshold))
    }

    pub fn export_genesis(&self) -> Result<GenesisState> {
        GenesisState::export(&self.state())
    }
}

impl<S, L, E, A> Keeper<S, L, E, A>
where
    S: KvStore,
    L: BankLedger,
    E: EventSink,
    A: AddressCodec,
{
    /// Validates and writes a genesis state in one batch
    pub fn init_genesis(&mut self, genesis: &GenesisState) -> Result<()> {
        self.run(|session| genesis.init(&mut session.state))
    }

    /// Runs `op` against a fresh transaction, committing on success
    fn run<R>(&mut self, op: impl FnOnce(&mut Session<'_, S, L, A>) -> Result<R>) -> Result<R> {
        let mut session = Session {
            state: CctpState::new(StoreTransaction::new(&mut self.store)),
            ledger: &mut self.ledger,
            addresses: &self.addresses,
            config: &self.config,
            events: Vec::new(),
        };

        let result = op(&mut session);
        let Session { state, events, .. } = session;

        let value = match result {
            Ok(value) => value,
            Err(e) => {
                spans::record_error(&e);
                return Err(e);
            }
        };

        state.into_inner().commit()?;
        for event in events {
            self.events.emit(event);
        }
        Ok(value)
    }
}

/// One operation's view of the keeper: transactional state plus collaborators
pub(crate) struct Session<'a, S: KvStore, L, A> {
    pub(crate) state: CctpState<StoreTransaction<'a, S>>,
    ledger: &'a mut L,
    addresses: &'a A,
    config: &'a KeeperConfig,
    events: Vec<Event>,
}

impl<S: KvStore, L, A> Session<'_, S, L, A> {
    fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    fn signature_threshold(&self) -> Result<u32> {
        Ok(self
            .state
            .signature_threshold()?
            .unwrap_or(self.config.default_signature_threshold))
    }

    fn verifier(&self) -> Result<AttestationVerifier> {
        AttestationVerifier::from_state(&self.state, self.config.default_signature_threshold)
    }
}

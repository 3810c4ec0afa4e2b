// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Typed view over the persisted protocol state
//!
//! [`CctpState`] wraps any [`KvRead`] store. Accessors are split by concern
//! across the submodules: replay protection in `nonces`, roles and pause flags
//! in `roles`, attesters and token routing in `registry`. Read accessors need
//! only [`KvRead`]; mutators require [`KvStore`].

pub mod keys;
mod nonces;
mod registry;
mod roles;

pub use registry::{Attester, AttesterStatus, BurnLimit, RemoteTokenMessenger, TokenPair};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CctpError, Result};
use crate::store::{decode_be, KvRead, KvStore};

/// Protocol state stored in a key-value store
#[derive(Debug, Clone)]
pub struct CctpState<S> {
    store: S,
}

impl<S> CctpState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: KvRead> CctpState<S> {
    fn get_string(&self, key: &[u8]) -> Result<Option<String>> {
        self.store
            .get(key)?
            .map(|bytes| {
                String::from_utf8(bytes).map_err(|e| CctpError::Store(format!("invalid utf-8: {e}")))
            })
            .transpose()
    }

    fn get_u32(&self, key: &[u8]) -> Result<Option<u32>> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(u32::from_be_bytes(decode_be(key, &bytes)?))),
            None => Ok(None),
        }
    }

    fn get_u64(&self, key: &[u8]) -> Result<Option<u64>> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(u64::from_be_bytes(decode_be(key, &bytes)?))),
            None => Ok(None),
        }
    }

    fn get_flag(&self, key: &[u8]) -> Result<bool> {
        Ok(matches!(self.store.get(key)?.as_deref(), Some([1])))
    }

    fn get_json<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan_json<T: DeserializeOwned>(&self, prefix: &[u8]) -> Result<Vec<T>> {
        self.store
            .prefix_scan(prefix)?
            .into_iter()
            .map(|(_, bytes)| serde_json::from_slice(&bytes).map_err(CctpError::from))
            .collect()
    }
}

impl<S: KvStore> CctpState<S> {
    fn set_string(&mut self, key: &[u8], value: &str) -> Result<()> {
        self.store.put(key, value.as_bytes())
    }

    fn set_u32(&mut self, key: &[u8], value: u32) -> Result<()> {
        self.store.put(key, &value.to_be_bytes())
    }

    fn set_u64(&mut self, key: &[u8], value: u64) -> Result<()> {
        self.store.put(key, &value.to_be_bytes())
    }

    fn set_flag(&mut self, key: &[u8], value: bool) -> Result<()> {
        self.store.put(key, &[u8::from(value)])
    }

    fn set_json<T: Serialize>(&mut self, key: &[u8], value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.store.put(key, &bytes)
    }

    fn remove(&mut self, key: &[u8]) -> Result<()> {
        self.store.delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_scalar_helpers() {
        let mut state = CctpState::new(MemoryStore::new());
        assert_eq!(state.get_u32(b"a").unwrap(), None);
        assert!(!state.get_flag(b"f").unwrap());

        state.set_u32(b"a", 7).unwrap();
        state.set_u64(b"b", u64::MAX).unwrap();
        state.set_flag(b"f", true).unwrap();
        state.set_string(b"s", "noble1xyz").unwrap();

        assert_eq!(state.get_u32(b"a").unwrap(), Some(7));
        assert_eq!(state.get_u64(b"b").unwrap(), Some(u64::MAX));
        assert!(state.get_flag(b"f").unwrap());
        assert_eq!(state.get_string(b"s").unwrap().as_deref(), Some("noble1xyz"));

        state.set_flag(b"f", false).unwrap();
        assert!(!state.get_flag(b"f").unwrap());
    }

    #[test]
    fn test_corrupt_counter_is_a_store_error() {
        let mut store = MemoryStore::new();
        store.put(b"a", &[1, 2, 3]).unwrap();
        let state = CctpState::new(store);
        assert!(matches!(state.get_u32(b"a"), Err(CctpError::Store(_))));
    }
}

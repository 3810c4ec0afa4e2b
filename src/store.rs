// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Key-value storage port
//!
//! The protocol state is persisted through a minimal byte-oriented store that
//! the host runtime provides. [`MemoryStore`] is a complete in-process
//! implementation; [`StoreTransaction`] layers uncommitted writes over any
//! store so that an operation's mutations are applied in one batch, or not at
//! all.

use std::collections::BTreeMap;

use crate::error::{CctpError, Result};

/// Read access to a key-value store
pub trait KvRead {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;
}

/// Write access to a key-value store
pub trait KvStore: KvRead {
    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Apply every operation, or none of them.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<()>;
}

impl<T: KvRead + ?Sized> KvRead for &T {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn exists(&self, key: &[u8]) -> Result<bool> {
        (**self).exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        (**self).prefix_scan(prefix)
    }
}

impl<T: KvRead + ?Sized> KvRead for &mut T {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn exists(&self, key: &[u8]) -> Result<bool> {
        (**self).exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        (**self).prefix_scan(prefix)
    }
}

impl<T: KvStore + ?Sized> KvStore for &mut T {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        (**self).delete(key)
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<()> {
        (**self).atomic_batch_write(operations)
    }
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

/// Ordered in-memory store
///
/// Backed by a `BTreeMap` so prefix scans come back in key order, matching
/// the iteration order of the persistent stores the host runtimes use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KvRead for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn exists(&self, key: &[u8]) -> Result<bool> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        Ok(self
            .data
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

impl KvStore for MemoryStore {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<()> {
        // Single-threaded map: applying in order cannot partially fail.
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    self.data.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    self.data.remove(&key);
                }
            }
        }
        Ok(())
    }
}

/// Uncommitted writes layered over a store
///
/// Reads see the transaction's own writes first, then the underlying store.
/// Nothing reaches the underlying store until [`StoreTransaction::commit`];
/// dropping the transaction discards its writes.
#[derive(Debug)]
pub struct StoreTransaction<'a, S: KvStore> {
    inner: &'a mut S,
    // `None` marks a pending delete.
    overlay: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvStore> StoreTransaction<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            overlay: BTreeMap::new(),
        }
    }

    /// Number of keys written or deleted so far
    pub fn pending_writes(&self) -> usize {
        self.overlay.len()
    }

    /// Flushes every pending write to the underlying store as one batch
    pub fn commit(self) -> Result<()> {
        if self.overlay.is_empty() {
            return Ok(());
        }
        let operations = self
            .overlay
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOperation::Put { key, value },
                None => BatchOperation::Delete { key },
            })
            .collect();
        self.inner.atomic_batch_write(operations)
    }
}

impl<S: KvStore> KvRead for StoreTransaction<'_, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.overlay.get(key) {
            Some(value) => Ok(value.clone()),
            None => self.inner.get(key),
        }
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.inner.prefix_scan(prefix)?.into_iter().collect();

        for (key, value) in self
            .overlay
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
        {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}

impl<S: KvStore> KvStore for StoreTransaction<'_, S> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.overlay.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.overlay.insert(key.to_vec(), None);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<()> {
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    self.overlay.insert(key, Some(value));
                }
                BatchOperation::Delete { key } => {
                    self.overlay.insert(key, None);
                }
            }
        }
        Ok(())
    }
}

/// Decodes a fixed-width big-endian integer stored under `key`
pub(crate) fn decode_be<const N: usize>(key: &[u8], bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        CctpError::Store(format!(
            "value under key {} has {} bytes, expected {}",
            alloy_primitives::hex::encode(key),
            bytes.len(),
            N
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.put(&[1, 1], b"a").unwrap();
        store.put(&[1, 2], b"b").unwrap();
        store.put(&[2, 1], b"c").unwrap();
        store
    }

    #[test]
    fn test_memory_store_basic_operations() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(b"k").unwrap(), None);
        assert!(!store.exists(b"k").unwrap());

        store.put(b"k", b"v").unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
        assert!(store.exists(b"k").unwrap());

        store.delete(b"k").unwrap();
        assert!(!store.exists(b"k").unwrap());
        store.delete(b"k").unwrap();
    }

    #[test]
    fn test_memory_store_prefix_scan_is_ordered_and_bounded() {
        let store = seeded();
        let entries = store.prefix_scan(&[1]).unwrap();
        assert_eq!(
            entries,
            vec![(vec![1, 1], b"a".to_vec()), (vec![1, 2], b"b".to_vec())]
        );
        assert!(store.prefix_scan(&[3]).unwrap().is_empty());
    }

    #[test]
    fn test_batch_write() {
        let mut store = seeded();
        store
            .atomic_batch_write(vec![
                BatchOperation::put(vec![9], b"z".to_vec()),
                BatchOperation::delete(vec![1, 1]),
            ])
            .unwrap();
        assert_eq!(store.get(&[9]).unwrap(), Some(b"z".to_vec()));
        assert!(!store.exists(&[1, 1]).unwrap());
    }

    #[test]
    fn test_transaction_reads_its_own_writes() {
        let mut store = seeded();
        let mut tx = StoreTransaction::new(&mut store);

        tx.put(&[1, 3], b"d").unwrap();
        tx.delete(&[1, 1]).unwrap();

        assert_eq!(tx.get(&[1, 3]).unwrap(), Some(b"d".to_vec()));
        assert_eq!(tx.get(&[1, 1]).unwrap(), None);
        assert_eq!(tx.get(&[2, 1]).unwrap(), Some(b"c".to_vec()));

        let keys: Vec<Vec<u8>> = tx
            .prefix_scan(&[1])
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![vec![1, 2], vec![1, 3]]);
    }

    #[test]
    fn test_transaction_dropped_without_commit_leaves_store_untouched() {
        let mut store = seeded();
        {
            let mut tx = StoreTransaction::new(&mut store);
            tx.put(&[7], b"x").unwrap();
            tx.delete(&[1, 1]).unwrap();
            assert_eq!(tx.pending_writes(), 2);
        }
        assert!(!store.exists(&[7]).unwrap());
        assert!(store.exists(&[1, 1]).unwrap());
    }

    #[test]
    fn test_transaction_commit_applies_writes() {
        let mut store = seeded();
        let mut tx = StoreTransaction::new(&mut store);
        tx.put(&[7], b"x").unwrap();
        tx.delete(&[1, 1]).unwrap();
        tx.commit().unwrap();

        assert_eq!(store.get(&[7]).unwrap(), Some(b"x".to_vec()));
        assert!(!store.exists(&[1, 1]).unwrap());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_decode_be_rejects_wrong_width() {
        assert_eq!(decode_be::<2>(b"k", &[0, 5]).unwrap(), [0, 5]);
        assert!(matches!(
            decode_be::<8>(b"k", &[1, 2, 3]),
            Err(CctpError::Store(_))
        ));
    }
}

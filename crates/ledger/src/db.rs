use crypto_common::Output;
use integer_encoding::VarInt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::mem;
use std::ops::RangeBounds;
use tracing::{debug, info};
use walcraft::Wal;

use crate::{mem::MemStore, types::ChangeItem, KVStore};

/// One committed block as recorded in the write-ahead log.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Entry {
    pub version: u64,
    pub changes: Vec<ChangeItem>,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("write-ahead log: {0}")]
    Wal(String),
}

/// Versioned ledger backed by a write-ahead log.
///
/// Writes go straight into the in-memory state and are queued until
/// [`LedgerDB::commit`], which appends them to the log as one block and
/// advances the application hash. Writes that were never committed are lost
/// on reopen.
pub struct LedgerDB {
    state: MemStore,
    wal: Wal<Entry>,
    pending_changes: Vec<ChangeItem>,
    version: u64,
    app_hash: Output<Sha256>,
}

/// Application hash of an empty ledger.
pub fn genesis_hash() -> Output<Sha256> {
    Sha256::digest(b"")
}

impl LedgerDB {
    pub fn open(path: &str) -> Result<Self, LedgerError> {
        let wal: Wal<Entry> = Wal::new(path, None);
        let mut state = MemStore::new();
        let mut version = 0;
        let mut app_hash = genesis_hash();

        for entry in wal.read().map_err(|err| LedgerError::Wal(err.to_string()))? {
            app_hash = block_hash(&app_hash, entry.version, &entry.changes);
            version = entry.version;
            state.write_batch(entry.changes);
        }
        info!(path, version, keys = state.len(), "ledger opened");

        Ok(Self {
            state,
            wal,
            pending_changes: Vec::new(),
            version,
            app_hash,
        })
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn app_hash(&self) -> &Output<Sha256> {
        &self.app_hash
    }

    /// Seals the pending changes into the next block and persists it.
    pub fn commit(&mut self) -> Output<Sha256> {
        let changes = mem::take(&mut self.pending_changes);
        self.version += 1;
        self.app_hash = block_hash(&self.app_hash, self.version, &changes);
        debug!(
            version = self.version,
            changes = changes.len(),
            app_hash = %format!("{:x}", self.app_hash),
            "block committed"
        );

        self.wal.write(Entry {
            version: self.version,
            changes,
        });
        self.wal.flush();
        self.app_hash
    }
}

impl KVStore for LedgerDB {
    fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.state.get(key)
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.pending_changes
            .push(ChangeItem::set(key.clone(), value.clone()));
        self.state.set(key, value);
    }

    fn remove(&mut self, key: &[u8]) {
        self.pending_changes.push(ChangeItem::remove(key.to_vec()));
        self.state.remove(key);
    }

    fn range<R>(&self, bounds: R) -> impl DoubleEndedIterator<Item = (&[u8], &[u8])>
    where
        R: RangeBounds<Vec<u8>> + Clone,
    {
        self.state.range(bounds)
    }
}

fn block_hash(prev: &Output<Sha256>, version: u64, changes: &[ChangeItem]) -> Output<Sha256> {
    let mut buf = [0u8; 10];
    let mut hasher = Sha256::new();

    let n = version.encode_var(&mut buf);
    hasher.update(&buf[..n]);
    hash_bytes(&mut hasher, prev);

    for change in changes {
        hash_bytes(&mut hasher, &change.key);
        match &change.value {
            Some(value) => {
                hasher.update([1u8]);
                hash_bytes(&mut hasher, &Sha256::digest(value));
            }
            None => hasher.update([0u8]),
        }
    }

    hasher.finalize()
}

fn hash_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    let mut buf = [0u8; 10];
    let n = bytes.len().encode_var(&mut buf);
    hasher.update(&buf[..n]);
    hasher.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::Overlay;
    use hexhex::hex_literal;

    fn open(dir: &tempfile::TempDir) -> LedgerDB {
        LedgerDB::open(dir.path().to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_genesis() {
        let dir = tempfile::tempdir().unwrap();
        let db = open(&dir);
        assert_eq!(db.version(), 0);
        assert_eq!(
            db.app_hash().as_slice(),
            hex_literal!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
    }

    #[test]
    fn test_block_hash() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open(&dir);
        db.set(b"key1".to_vec(), b"value1".to_vec());
        let hash = db.commit();

        assert_eq!(db.version(), 1);
        assert_eq!(
            hash.as_slice(),
            hex_literal!("b58d45893fa335806a708657772a559284b5eb253e5f823e35fed37806e68d98")
        );
    }

    #[test]
    fn test_persisted_db() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open(&dir);

        {
            let mut overlay = Overlay::new(&mut db);

            overlay.set(b"key1".to_vec(), b"value1".to_vec());
            overlay.set(b"key2".to_vec(), b"value2".to_vec());
            assert_eq!(overlay.get(b"key1"), Some(b"value1".as_ref()));
            assert_eq!(overlay.get(b"key2"), Some(b"value2".as_ref()));

            overlay.remove(b"key1");
            assert_eq!(overlay.get(b"key1"), None);

            overlay.flush();
        }

        let hash = db.commit();
        db.set(b"uncommitted".to_vec(), b"lost".to_vec());
        drop(db);

        // reload db
        let db = open(&dir);
        assert_eq!(db.version(), 1);
        assert_eq!(db.app_hash(), &hash);
        assert_eq!(db.get(b"key1"), None);
        assert_eq!(db.get(b"key2"), Some(b"value2".as_ref()));
        assert_eq!(db.get(b"uncommitted"), None);
    }

    #[test]
    fn test_hash_chains_over_empty_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = open(&dir);
        let first = db.commit();
        let second = db.commit();

        assert_ne!(first, second);
        assert_ne!(&first, &genesis_hash());
        assert_eq!(db.version(), 2);
    }
}

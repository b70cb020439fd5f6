//! The key-value surface a contract sees.
//!
//! [`ChaincodeStub`] is all the store operations are allowed to touch.
//! [`LedgerStub`] adapts any [`KVStore`] to it, keeping string keys as their
//! UTF-8 bytes.

use std::ops::Bound;

use ledger::KVStore;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("key must not be an empty string")]
    EmptyKey,
    #[error("invalid range: start key {start:?} is after end key {end:?}")]
    InvalidRange { start: String, end: String },
    #[error("state backend: {0}")]
    Backend(String),
}

pub type StateEntry = (String, Vec<u8>);

/// A range scan in ascending key order. Dropping it releases the scan.
pub type StateIterator<'a> = Box<dyn Iterator<Item = Result<StateEntry, StoreError>> + 'a>;

pub trait ChaincodeStub {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Scans `[start_key, end_key)`. An empty bound leaves that side open.
    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<StateIterator<'_>, StoreError>;
}

pub struct LedgerStub<'a, S> {
    kv: &'a mut S,
}

impl<'a, S: KVStore> LedgerStub<'a, S> {
    pub fn new(kv: &'a mut S) -> Self {
        Self { kv }
    }
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::EmptyKey);
    }
    Ok(())
}

impl<S: KVStore> ChaincodeStub for LedgerStub<'_, S> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        Ok(self.kv.get(key.as_bytes()).map(<[u8]>::to_vec))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        validate_key(key)?;
        self.kv.set(key.as_bytes().to_vec(), value);
        Ok(())
    }

    fn get_state_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> Result<StateIterator<'_>, StoreError> {
        if !end_key.is_empty() && start_key > end_key {
            return Err(StoreError::InvalidRange {
                start: start_key.to_string(),
                end: end_key.to_string(),
            });
        }

        let lower = match start_key {
            "" => Bound::Unbounded,
            key => Bound::Included(key.as_bytes().to_vec()),
        };
        let upper = match end_key {
            "" => Bound::Unbounded,
            key => Bound::Excluded(key.as_bytes().to_vec()),
        };

        let iter = self
            .kv
            .range((lower, upper))
            .map(|(k, v)| Ok((String::from_utf8_lossy(k).into_owned(), v.to_vec())));
        Ok(Box::new(iter))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use ledger::MemStore;

    fn collect(iter: StateIterator<'_>) -> Vec<StateEntry> {
        iter.collect::<Result<Vec<_>, _>>().unwrap()
    }

    #[test]
    fn test_get_put() {
        let mut kv = MemStore::new();
        let mut stub = LedgerStub::new(&mut kv);

        assert_eq!(stub.get_state("missing"), Ok(None));
        stub.put_state("k", b"v".to_vec()).unwrap();
        assert_eq!(stub.get_state("k"), Ok(Some(b"v".to_vec())));

        assert_eq!(stub.put_state("", b"v".to_vec()), Err(StoreError::EmptyKey));
        assert_eq!(stub.get_state(""), Err(StoreError::EmptyKey));
        assert_eq!(kv.get(b"k"), Some(b"v".as_ref()));
    }

    #[test]
    fn test_range_excludes_end() {
        let mut kv = MemStore::new();
        let mut stub = LedgerStub::new(&mut kv);
        for key in ["a", "b", "c", "d"] {
            stub.put_state(key, key.as_bytes().to_vec()).unwrap();
        }

        let keys = |start: &str, end: &str| {
            collect(stub.get_state_by_range(start, end).unwrap())
                .into_iter()
                .map(|(k, _)| k)
                .collect::<Vec<_>>()
        };
        assert_eq!(keys("b", "d"), vec!["b", "c"]);
        assert_eq!(keys("", "b"), vec!["a"]);
        assert_eq!(keys("c", ""), vec!["c", "d"]);
        assert_eq!(keys("b", "b"), Vec::<String>::new());
    }

    #[test]
    fn test_invalid_range() {
        let mut kv = MemStore::new();
        let stub = LedgerStub::new(&mut kv);
        assert!(matches!(
            stub.get_state_by_range("z", "a"),
            Err(StoreError::InvalidRange { .. })
        ));
    }
}

use std::collections::BTreeMap;
use std::ops::RangeBounds;

use super::types::KVStore;

/// Ordered in-memory store, the base state of every ledger.
#[derive(Default, Debug, Clone)]
pub struct MemStore {
    pub tree: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            tree: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

impl KVStore for MemStore {
    fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.tree.get(key).map(|v| v.as_slice())
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.tree.insert(key, value);
    }

    fn remove(&mut self, key: &[u8]) {
        self.tree.remove(key);
    }

    fn range<R>(&self, bounds: R) -> impl DoubleEndedIterator<Item = (&[u8], &[u8])>
    where
        R: RangeBounds<Vec<u8>> + Clone,
    {
        self.tree
            .range(bounds)
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

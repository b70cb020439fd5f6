use std::ops::RangeBounds;

use serde::{Deserialize, Serialize};

/// A single pending write; `None` marks a deletion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChangeItem {
    pub key: Vec<u8>,
    pub value: Option<Vec<u8>>,
}

impl ChangeItem {
    pub fn set(key: Vec<u8>, value: Vec<u8>) -> Self {
        Self {
            key,
            value: Some(value),
        }
    }

    pub fn remove(key: Vec<u8>) -> Self {
        Self { key, value: None }
    }
}

pub trait KVStore {
    fn get(&self, key: &[u8]) -> Option<&[u8]>;
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);
    fn remove(&mut self, key: &[u8]);
    fn range<R>(&self, bounds: R) -> impl DoubleEndedIterator<Item = (&[u8], &[u8])>
    where
        R: RangeBounds<Vec<u8>> + Clone;

    fn write_batch(&mut self, batch: impl IntoIterator<Item = ChangeItem>) {
        for item in batch {
            match item.value {
                Some(value) => self.set(item.key, value),
                None => self.remove(&item.key),
            }
        }
    }
}

use std::collections::BTreeMap;
use std::ops::RangeBounds;

use crate::mergeiter::MergeIter;
use crate::types::{ChangeItem, KVStore};

/// Buffers writes on top of a parent store until [`Overlay::flush`].
///
/// Dropping an overlay without flushing discards its changes.
pub struct Overlay<'a, S> {
    parent: &'a mut S,

    // use `Option` as value to represent deletion(tomestone).
    changes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KVStore> Overlay<'a, S> {
    pub fn new(parent: &'a mut S) -> Self {
        Self {
            parent,
            changes: BTreeMap::new(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    // flush flushes all the changes to the parent store.
    pub fn flush(&mut self) {
        let changes = std::mem::take(&mut self.changes)
            .into_iter()
            .map(|(key, value)| ChangeItem { key, value });
        self.parent.write_batch(changes);
    }
}

impl<S: KVStore> KVStore for Overlay<'_, S> {
    fn get(&self, key: &[u8]) -> Option<&[u8]> {
        match self.changes.get(key) {
            Some(value) => value.as_deref(),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.changes.insert(key, Some(value));
    }

    fn remove(&mut self, key: &[u8]) {
        self.changes.insert(key.to_vec(), None);
    }

    fn range<R>(&self, bounds: R) -> impl DoubleEndedIterator<Item = (&[u8], &[u8])>
    where
        R: RangeBounds<Vec<u8>> + Clone,
    {
        let changes = self
            .changes
            .range(bounds.clone())
            .map(|(k, v)| (k.as_slice(), v.as_deref()));
        MergeIter::new(changes, self.parent.range(bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemStore;

    #[test]
    fn test_overlay() {
        let mut parent = MemStore::new();
        parent.set(b"removed".to_vec(), b"removed".to_vec());

        {
            let mut overlay = Overlay::new(&mut parent);
            assert_eq!(overlay.get(b"removed"), Some(b"removed" as &[u8]));

            overlay.set(b"key1".to_vec(), b"value1".to_vec());
            overlay.remove(b"removed");

            assert_eq!(overlay.get(b"key1"), Some(b"value1" as &[u8]));
            assert_eq!(overlay.get(b"removed"), None);

            overlay.flush();
            assert!(!overlay.is_dirty());
        }
        assert_eq!(parent.get(b"key1"), Some(b"value1" as &[u8]));
        assert_eq!(parent.get(b"removed"), None);
    }

    #[test]
    fn test_overlay_range() {
        let mut parent = MemStore::new();
        parent.set(b"a".to_vec(), b"1".to_vec());
        parent.set(b"b".to_vec(), b"2".to_vec());
        parent.set(b"d".to_vec(), b"4".to_vec());

        let mut overlay = Overlay::new(&mut parent);
        overlay.set(b"b".to_vec(), b"two".to_vec());
        overlay.set(b"c".to_vec(), b"3".to_vec());
        overlay.remove(b"d");

        let result = overlay.range(..).collect::<Vec<_>>();
        assert_eq!(
            result,
            vec![
                (b"a".as_ref(), b"1".as_ref()),
                (b"b".as_ref(), b"two".as_ref()),
                (b"c".as_ref(), b"3".as_ref()),
            ]
        );

        let result = overlay.range(b"b".to_vec()..b"d".to_vec()).rev().collect::<Vec<_>>();
        assert_eq!(
            result,
            vec![
                (b"c".as_ref(), b"3".as_ref()),
                (b"b".as_ref(), b"two".as_ref()),
            ]
        );
    }

    #[test]
    fn test_overlay_discard() {
        let mut parent = MemStore::new();
        {
            let mut overlay = Overlay::new(&mut parent);
            overlay.set(b"key".to_vec(), b"value".to_vec());
            assert!(overlay.is_dirty());
        }
        assert!(parent.is_empty());
    }
}

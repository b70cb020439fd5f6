use std::cmp::Ordering;

use double_ended_peekable::{DoubleEndedPeekable, DoubleEndedPeekableExt};

/// Merges a sparse change set over an ordered base iterator.
///
/// `changes` yields `None` values as tombstones. When both sides hold the
/// same key the change wins and the base entry is skipped.
pub struct MergeIter<I1, I2, K, V>
where
    K: Ord,
    I1: Iterator<Item = (K, Option<V>)>,
    I2: Iterator<Item = (K, V)>,
{
    changes: DoubleEndedPeekable<I1>,
    base: DoubleEndedPeekable<I2>,
}

enum Side {
    Changes,
    Both,
    Base,
}

impl<I1, I2, K, V> MergeIter<I1, I2, K, V>
where
    K: Ord,
    I1: Iterator<Item = (K, Option<V>)>,
    I2: Iterator<Item = (K, V)>,
{
    pub fn new(changes: I1, base: I2) -> Self {
        MergeIter {
            changes: changes.double_ended_peekable(),
            base: base.double_ended_peekable(),
        }
    }
}

fn pick<K: Ord>(change: Option<&K>, base: Option<&K>, forward: bool) -> Option<Side> {
    match (change, base) {
        (Some(c), Some(b)) => {
            let ord = if forward { c.cmp(b) } else { b.cmp(c) };
            Some(match ord {
                Ordering::Less => Side::Changes,
                Ordering::Equal => Side::Both,
                Ordering::Greater => Side::Base,
            })
        }
        (Some(_), None) => Some(Side::Changes),
        (None, Some(_)) => Some(Side::Base),
        (None, None) => None,
    }
}

impl<I1, I2, K, V> Iterator for MergeIter<I1, I2, K, V>
where
    K: Ord,
    I1: Iterator<Item = (K, Option<V>)>,
    I2: Iterator<Item = (K, V)>,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let side = pick(
                self.changes.peek().map(|(k, _)| k),
                self.base.peek().map(|(k, _)| k),
                true,
            )?;
            match side {
                Side::Base => return self.base.next(),
                Side::Both => {
                    self.base.next();
                }
                Side::Changes => {}
            }
            if let Some((k, Some(v))) = self.changes.next() {
                return Some((k, v));
            }
        }
    }
}

impl<I1, I2, K, V> DoubleEndedIterator for MergeIter<I1, I2, K, V>
where
    K: Ord,
    I1: DoubleEndedIterator<Item = (K, Option<V>)>,
    I2: DoubleEndedIterator<Item = (K, V)>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            let side = pick(
                self.changes.peek_back().map(|(k, _)| k),
                self.base.peek_back().map(|(k, _)| k),
                false,
            )?;
            match side {
                Side::Base => return self.base.next_back(),
                Side::Both => {
                    self.base.next_back();
                }
                Side::Changes => {}
            }
            if let Some((k, Some(v))) = self.changes.next_back() {
                return Some((k, v));
            }
        }
    }
}

// Copyright 2021-2023 ICON Foundation
// SPDX-License-Identifier: Apache-2.0, MIT
use std::borrow::Borrow;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// An ordered map that records every change so it can be undone.
///
/// Take a mark with [`Journal::mark`], make changes, then either [`Journal::rollback`] to the
/// mark or keep going. [`Journal::forget`] drops the undo log once nothing can roll back.
#[derive(Debug, Clone)]
pub struct Journal<K, V> {
    map: BTreeMap<K, V>,
    undo: Vec<(K, Option<V>)>,
}

impl<K, V> Default for Journal<K, V> {
    fn default() -> Self {
        Self {
            map: BTreeMap::new(),
            undo: Vec::new(),
        }
    }
}

impl<K, V> Journal<K, V>
where
    K: Ord + Clone,
    V: PartialEq,
{
    /// Sets `k` to `v`, returning whether `k` was already present. Writing an identical value
    /// is not logged.
    pub fn insert(&mut self, k: K, v: V) -> bool {
        match self.map.entry(k) {
            Entry::Vacant(e) => {
                self.undo.push((e.key().clone(), None));
                e.insert(v);
                false
            }
            Entry::Occupied(mut e) => {
                if e.get() != &v {
                    let key = e.key().clone();
                    let old = e.insert(v);
                    self.undo.push((key, Some(old)));
                }
                true
            }
        }
    }

    /// Removes `k`, returning whether it was present.
    pub fn remove<Q>(&mut self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.map.remove_entry(k) {
            Some((key, old)) => {
                self.undo.push((key, Some(old)));
                true
            }
            None => false,
        }
    }

    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.get(k)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(k)
    }

    /// The current position in the undo log.
    pub fn mark(&self) -> usize {
        self.undo.len()
    }

    /// Undoes every change made since `mark`, newest first.
    pub fn rollback(&mut self, mark: usize) {
        if self.undo.len() <= mark {
            return;
        }
        for (k, old) in self.undo.drain(mark..).rev() {
            match old {
                Some(v) => self.map.insert(k, v),
                None => self.map.remove(&k),
            };
        }
    }

    pub fn forget(&mut self) {
        self.undo.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter()
    }

    /// Entries whose keys fall in `range`.
    pub fn range<R>(&self, range: R) -> impl Iterator<Item = (&K, &V)>
    where
        R: std::ops::RangeBounds<K>,
    {
        self.map.range(range)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

//! Chained hash table, map flavor.

use log::trace;

use crate::bucket::{self, Bucket, Node};
use crate::hash;

/// Slot count of a freshly created (or cleared) table.
pub const INITIAL_CAPACITY: usize = 16;

/// Maximum tolerated ratio of entries to slots before the table grows.
pub const LOAD_FACTOR: f64 = 0.75;

/// A string-keyed hash map using one [`Bucket`] chain per occupied slot.
///
/// Slots are allocated lazily on first insertion and released once a removal
/// empties them, so an absent slot and a never-used slot are the same state.
#[derive(Debug)]
pub struct HashMap<V> {
    buckets: Vec<Option<Bucket<V>>>,
    capacity: usize,
    count: usize,
}

impl<V> HashMap<V> {
    pub fn new() -> Self {
        Self {
            buckets: Self::empty_slots(INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
            count: 0,
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Shorthand for `self.len() == 0`
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots, occupied or not.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// already present.
    ///
    /// Storing a new key may grow the table first: when `count + 1` would
    /// exceed `capacity * LOAD_FACTOR`, the table doubles its capacity and
    /// rehashes every entry before the new one is placed.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let index = self.bucket_index(&key);

        if let Some(bucket) = &mut self.buckets[index] {
            if let Some(node) = bucket.find_mut(&key) {
                return Some(std::mem::replace(node.value_mut(), value));
            }
        }

        // New key. Growth happens before the entry is counted, so the table
        // grows on the insertion that would cross the threshold, and at most
        // once per call.
        let index = if (self.count + 1) as f64 > self.capacity as f64 * LOAD_FACTOR {
            self.grow();
            self.bucket_index(&key)
        } else {
            index
        };

        self.buckets[index]
            .get_or_insert_with(Bucket::new)
            .append(key, value);
        self.count += 1;

        None
    }

    /// Returns the value stored under `key`. A missing key is `None`,
    /// whether its slot is absent or merely holds other keys.
    pub fn get(&self, key: &str) -> Option<&V> {
        let index = self.bucket_index(key);
        self.buckets[index].as_ref()?.find(key).map(|n| n.value())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_index(key);
        self.buckets[index]
            .as_mut()?
            .find_mut(key)
            .map(|n| n.value_mut())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key`, returning its value. Removing an absent key is a
    /// no-op yielding `None`. A slot whose chain becomes empty is released.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_index(key);
        let slot = &mut self.buckets[index];
        let removed = slot.as_mut()?.remove(key);

        if slot.as_ref().is_some_and(Bucket::is_empty) {
            *slot = None;
        }
        if removed.is_some() {
            self.count -= 1;
        }

        removed.map(|node| node.into_entry().1)
    }

    /// Resets the map to its initial capacity with every slot absent.
    pub fn clear(&mut self) {
        trace!("clearing table ({} entries)", self.count);
        self.capacity = INITIAL_CAPACITY;
        self.buckets = Self::empty_slots(INITIAL_CAPACITY);
        self.count = 0;
    }

    /// All keys, in slot order and chain order within a slot. This is not
    /// table-wide insertion order.
    pub fn keys(&self) -> Vec<&str> {
        self.iter().map(|n| n.key()).collect()
    }

    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|n| n.value()).collect()
    }

    pub fn entries(&self) -> Vec<(&str, &V)> {
        self.iter().map(|n| (n.key(), n.value())).collect()
    }

    // [adapters]

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.buckets.iter(),
            chain: None,
        }
    }

    /// Renders every slot with the keys it holds, one line per slot.
    pub fn dump(&self) -> String {
        use std::fmt::Write;

        let width = self.capacity.saturating_sub(1).to_string().len();
        let mut out = String::new();
        for (index, slot) in self.buckets.iter().enumerate() {
            let keys: Vec<&str> = match slot {
                Some(bucket) => bucket.iter().map(|n| n.key()).collect(),
                None => Vec::new(),
            };
            let _ = writeln!(out, "{index:>width$}: {keys:?}");
        }

        out
    }

    /// Prints [`dump`](Self::dump) to stdout. Debugging aid only.
    pub fn print_table(&self) {
        print!("{}", self.dump());
    }

    // [private]

    fn bucket_index(&self, key: &str) -> usize {
        // the hash already lies in [0, capacity), reduce once more so this
        // does not depend on it
        hash::bucket_index(key, self.capacity) % self.capacity
    }

    fn empty_slots(capacity: usize) -> Vec<Option<Bucket<V>>> {
        (0..capacity).map(|_| None).collect()
    }

    /// Doubles the capacity and rehashes every entry.
    ///
    /// Slot indexes are a function of capacity, so every entry has to be
    /// placed again under the new modulus. The rebuild runs to completion
    /// before the insertion that triggered it proceeds.
    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        trace!(
            "load factor exceeded, growing {} -> {} slots ({} entries to rehash)",
            self.capacity,
            new_capacity,
            self.count
        );

        let old = std::mem::replace(&mut self.buckets, Self::empty_slots(new_capacity));
        self.capacity = new_capacity;

        for bucket in old.into_iter().flatten() {
            for node in bucket {
                let (key, value) = node.into_entry();
                let index = self.bucket_index(&key);
                self.buckets[index]
                    .get_or_insert_with(Bucket::new)
                    .append(key, value);
            }
        }
    }
}

impl<V> Default for HashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

// [iterators]

/// Borrowed iterator over every live node, slot order then chain order.
pub struct Iter<'a, V> {
    slots: std::slice::Iter<'a, Option<Bucket<V>>>,
    chain: Option<bucket::Iter<'a, V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(chain) = &mut self.chain {
                if let Some(node) = chain.next() {
                    return Some(node);
                }
            }

            match self.slots.next() {
                Some(slot) => self.chain = slot.as_ref().map(Bucket::iter),
                None => return None,
            }
        }
    }
}

//! Chained hash table, set flavor.

use crate::hash_map::HashMap;

/// A string set sharing the map's table: every element is a key with a unit
/// value, so hashing, growth and slot handling behave identically.
#[derive(Debug, Default)]
pub struct HashSet {
    map: HashMap<()>,
}

impl HashSet {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Adds `key` to the set. Returns `false` without touching the table
    /// when the key is already present.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.map.insert(key, ()).is_none()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Removes `key`, reporting whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    pub fn clear(&mut self) {
        self.map.clear()
    }

    /// All elements, in slot order and chain order within a slot.
    pub fn keys(&self) -> Vec<&str> {
        self.map.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.map.iter().map(|n| n.key())
    }

    /// Renders every slot with the elements it holds, one line per slot.
    pub fn dump(&self) -> String {
        self.map.dump()
    }

    /// Prints [`dump`](Self::dump) to stdout. Debugging aid only.
    pub fn print_table(&self) {
        self.map.print_table()
    }
}

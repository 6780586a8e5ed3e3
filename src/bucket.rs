//! Singly linked chain of key/value entries, one per occupied table slot.

use thiserror::Error;

/// Positional insert/remove outside the valid interval.
///
/// A failed call leaves the chain untouched.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IndexError {
    #[error("insertion index must be within [0, {len}], got {index}")]
    Insert { index: usize, len: usize },

    #[error("removal index must be within [0, {len}), got {index}")]
    Remove { index: usize, len: usize },
}

type Link<V> = Option<Box<Node<V>>>;

/// One storage cell of a chain. Owned by its predecessor,
/// or by the bucket head for the first node.
pub struct Node<V> {
    key: String,
    value: V,
    next: Link<V>,
}

impl<V> Node<V> {
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
            next: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Consumes the node, leaving its key and value.
    pub fn into_entry(self) -> (String, V) {
        (self.key, self.value)
    }
}

impl<V: PartialEq> PartialEq for Node<V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}
impl<V: Eq> Eq for Node<V> {}

impl<V: std::fmt::Debug> std::fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}, {:?}>", self.key, self.value)
    }
}

/// An ordered chain of entries sharing one hash slot.
///
/// The chain is acyclic and exclusively owned: every node is held by the
/// `next` link of its predecessor. There is no tail pointer, operations on
/// the tail walk the chain.
pub struct Bucket<V> {
    head: Link<V>,
    len: usize,
}

impl<V> Bucket<V> {
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Shorthand for `self.len() == 0`
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn head(&self) -> Option<&Node<V>> {
        self.head.as_deref()
    }

    pub fn tail(&self) -> Option<&Node<V>> {
        self.len.checked_sub(1).and_then(|i| self.at(i))
    }

    /// Adds an entry at the end of the chain.
    pub fn append(&mut self, key: impl Into<String>, value: V) {
        let link = self.link_at_mut(self.len);
        *link = Some(Box::new(Node::new(key, value)));
        self.len += 1;
    }

    /// Adds an entry at the front of the chain.
    pub fn prepend(&mut self, key: impl Into<String>, value: V) {
        let mut node = Box::new(Node::new(key, value));
        node.next = self.head.take();
        self.head = Some(node);
        self.len += 1;
    }

    /// Returns the node at `index`, or `None` outside `[0, len)`.
    pub fn at(&self, index: usize) -> Option<&Node<V>> {
        if index >= self.len {
            return None;
        }

        let mut node = self.head.as_deref();
        for _ in 0..index {
            node = node.and_then(|n| n.next.as_deref());
        }

        node
    }

    /// First node holding `key`, scanning from the head.
    pub fn find(&self, key: &str) -> Option<&Node<V>> {
        self.iter().find(|n| n.key == key)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut Node<V>> {
        let mut node = self.head.as_deref_mut();
        while let Some(n) = node {
            if n.key == key {
                return Some(n);
            }
            node = n.next.as_deref_mut();
        }
        None
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Zero-based position of the first node holding `key`.
    pub fn find_index(&self, key: &str) -> Option<usize> {
        self.iter().position(|n| n.key == key)
    }

    /// Removes and returns the head node.
    pub fn shift(&mut self) -> Option<Node<V>> {
        let mut node = self.head.take()?;
        self.head = node.next.take();
        self.len -= 1;
        Some(*node)
    }

    /// Removes and returns the tail node, walking to its predecessor first.
    pub fn pop(&mut self) -> Option<Node<V>> {
        if self.len == 0 {
            return None;
        }

        let link = self.link_at_mut(self.len - 1);
        let node = link.take()?;
        self.len -= 1;
        Some(*node)
    }

    /// Splices `entries` into the chain so that the first entry ends up at
    /// `index`, preserving their given order.
    ///
    /// Index `0` is a prepend, index `len` an append. Any index above `len`
    /// is rejected before anything is mutated.
    pub fn insert_at<S, E>(&mut self, index: usize, entries: E) -> Result<(), IndexError>
    where
        S: Into<String>,
        E: IntoIterator<Item = (S, V)>,
        E::IntoIter: DoubleEndedIterator,
    {
        if index > self.len {
            return Err(IndexError::Insert {
                index,
                len: self.len,
            });
        }

        // Splicing in reverse at one link keeps the argument order without
        // having to advance through the freshly inserted nodes.
        let link = self.link_at_mut(index);
        let mut inserted = 0;
        for (key, value) in entries.into_iter().rev() {
            let mut node = Box::new(Node::new(key, value));
            node.next = link.take();
            *link = Some(node);
            inserted += 1;
        }
        self.len += inserted;

        Ok(())
    }

    /// Removes and returns the node at `index`.
    ///
    /// Index `0` delegates to [`shift`](Self::shift), index `len - 1` to
    /// [`pop`](Self::pop), interior indexes splice the predecessor's link
    /// past the target.
    pub fn remove_at(&mut self, index: usize) -> Result<Node<V>, IndexError> {
        let len = self.len;
        if index >= len {
            return Err(IndexError::Remove { index, len });
        }

        if index == 0 {
            return self.shift().ok_or(IndexError::Remove { index, len });
        }
        if index == len - 1 {
            return self.pop().ok_or(IndexError::Remove { index, len });
        }

        let link = self.link_at_mut(index);
        let mut node = match link.take() {
            Some(node) => node,
            None => return Err(IndexError::Remove { index, len }),
        };
        *link = node.next.take();
        self.len -= 1;

        Ok(*node)
    }

    /// Removes the first node holding `key`, or returns `None` if the chain
    /// does not contain it.
    pub fn remove(&mut self, key: &str) -> Option<Node<V>> {
        let index = self.find_index(key)?;
        self.remove_at(index).ok()
    }

    // [adapters]

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            current: self.head.as_deref(),
            len: self.len,
        }
    }

    // [private]

    /// Mutable handle on the link that owns the node at `index`,
    /// or on the empty tail link when `index == len`.
    fn link_at_mut(&mut self, index: usize) -> &mut Link<V> {
        let mut link = &mut self.head;
        for _ in 0..index {
            if let Some(node) = link {
                link = &mut node.next;
            }
        }
        link
    }
}

impl<V> Default for Bucket<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Drop for Bucket<V> {
    fn drop(&mut self) {
        let mut curr = self.head.take();
        while let Some(mut node) = curr {
            curr = node.next.take();
            // node goes out of scope here, calling drop
        }
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Bucket<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<V> IntoIterator for Bucket<V> {
    type Item = <IterOwn<V> as Iterator>::Item;
    type IntoIter = IterOwn<V>;

    fn into_iter(self) -> Self::IntoIter {
        IterOwn(self)
    }
}

// [iterators]

pub struct Iter<'a, V> {
    current: Option<&'a Node<V>>,
    len: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current.take()?;
        self.current = node.next.as_deref();
        self.len -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

pub struct IterOwn<V>(Bucket<V>);

impl<V> Iterator for IterOwn<V> {
    type Item = Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.shift()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len, Some(self.0.len))
    }
}

#[cfg(test)]
mod tests {
    use super::{Bucket, IndexError};
    use crate::node;

    fn filled(n: usize) -> Bucket<String> {
        let mut bucket = Bucket::new();
        for i in 0..n {
            bucket.append(format!("key{i}"), format!("value{i}"));
        }
        bucket
    }

    #[test]
    fn append() {
        let bucket = filled(10);

        assert_eq!(bucket.len(), 10);
        assert_eq!(bucket.head(), Some(&node!("key0", "value0".to_string())));
        assert_eq!(bucket.tail(), Some(&node!("key9", "value9".to_string())));
    }

    #[test]
    fn prepend() {
        let mut bucket = Bucket::new();
        bucket.prepend("k1", "v1");
        bucket.prepend("k2", "v2");
        bucket.prepend("k3", "v3");

        assert_eq!(bucket.head(), Some(&node!("k3", "v3")));
        assert_eq!(bucket.tail(), Some(&node!("k1", "v1")));
        assert_eq!(bucket.len(), 3);
    }

    #[test]
    fn at() {
        let bucket = filled(3);

        assert_eq!(bucket.at(0).map(|n| n.key()), Some("key0"));
        assert_eq!(bucket.at(1).map(|n| n.key()), Some("key1"));
        assert_eq!(bucket.at(2).map(|n| n.key()), Some("key2"));
        assert_eq!(bucket.at(3), None);
    }

    #[test]
    fn shift() {
        let mut bucket = Bucket::new();
        assert!(bucket.shift().is_none());

        bucket.append("k1", "v1");
        bucket.append("k2", "v2");

        let removed = bucket.shift().unwrap();
        assert_eq!(removed, node!("k1", "v1"));
        assert_eq!(bucket.head(), Some(&node!("k2", "v2")));

        let removed = bucket.shift().unwrap();
        assert_eq!(removed, node!("k2", "v2"));
        assert!(bucket.is_empty());
        assert_eq!(bucket.head(), None);
        assert_eq!(bucket.tail(), None);
    }

    #[test]
    fn pop() {
        let mut bucket = Bucket::new();
        assert!(bucket.pop().is_none());

        bucket.append("k1", "v1");
        bucket.append("k2", "v2");
        bucket.append("k3", "v3");

        let removed = bucket.pop().unwrap();
        assert_eq!(removed, node!("k3", "v3"));
        assert_eq!(bucket.tail(), Some(&node!("k2", "v2")));
        assert_eq!(bucket.len(), 2);

        bucket.pop();
        bucket.pop();
        assert!(bucket.is_empty());
        assert_eq!(bucket.head(), None);
        assert_eq!(bucket.tail(), None);
    }

    #[test]
    fn find() {
        let bucket = filled(5);

        assert!(bucket.contains("key3"));
        assert!(!bucket.contains("nope"));
        assert_eq!(
            bucket.find("key3"),
            Some(&node!("key3", "value3".to_string()))
        );
        assert_eq!(bucket.find("nope"), None);
        assert_eq!(bucket.find_index("key0"), Some(0));
        assert_eq!(bucket.find_index("key4"), Some(4));
        assert_eq!(bucket.find_index("nope"), None);
    }

    #[test]
    fn find_first_match_wins() {
        let mut bucket = Bucket::new();
        bucket.append("dup", "first");
        bucket.append("dup", "second");

        assert_eq!(bucket.find("dup").map(|n| n.value()), Some(&"first"));
        assert_eq!(bucket.find_index("dup"), Some(0));
    }

    #[test]
    fn insert_at_head_keeps_argument_order() {
        let mut bucket = Bucket::new();
        bucket.append("z", 0);

        bucket
            .insert_at(0, [("a", 1), ("b", 2), ("c", 3)])
            .unwrap();

        assert_eq!(bucket.len(), 4);
        assert_eq!(bucket.at(0).map(|n| n.key()), Some("a"));
        assert_eq!(bucket.at(1).map(|n| n.key()), Some("b"));
        assert_eq!(bucket.at(2).map(|n| n.key()), Some("c"));
        assert_eq!(bucket.at(3).map(|n| n.key()), Some("z"));
    }

    #[test]
    fn insert_at_tail_and_interior() {
        let mut bucket = Bucket::new();
        bucket.append("a", 1);
        bucket.append("d", 4);

        bucket.insert_at(2, [("e", 5)]).unwrap();
        assert_eq!(bucket.tail(), Some(&node!("e", 5)));

        bucket.insert_at(1, [("b", 2), ("c", 3)]).unwrap();
        let keys: Vec<_> = bucket.iter().map(|n| n.key()).collect();
        assert_eq!(keys, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn insert_at_out_of_range() {
        let mut bucket = Bucket::new();
        bucket.append("a", 1);

        let err = bucket.insert_at(2, [("b", 2)]).unwrap_err();
        assert_eq!(err, IndexError::Insert { index: 2, len: 1 });
        assert_eq!(bucket.len(), 1);
        let keys: Vec<_> = bucket.iter().map(|n| n.key()).collect();
        assert_eq!(keys, ["a"]);
    }

    #[test]
    fn remove_at_matches_shift_and_pop() {
        let mut left = filled(3);
        let mut right = filled(3);

        assert_eq!(left.remove_at(0).unwrap(), right.shift().unwrap());
        assert_eq!(left.remove_at(left.len() - 1).unwrap(), right.pop().unwrap());
        assert_eq!(left.len(), right.len());
    }

    #[test]
    fn remove_at_interior() {
        let mut bucket = filled(3);

        let removed = bucket.remove_at(1).unwrap();
        assert_eq!(removed.key(), "key1");
        let keys: Vec<_> = bucket.iter().map(|n| n.key()).collect();
        assert_eq!(keys, ["key0", "key2"]);
    }

    #[test]
    fn remove_at_out_of_range() {
        let mut bucket = filled(2);

        let err = bucket.remove_at(2).unwrap_err();
        assert_eq!(err, IndexError::Remove { index: 2, len: 2 });
        assert_eq!(bucket.len(), 2);
    }

    #[test]
    fn remove_by_key() {
        let mut bucket = filled(4);

        // head
        assert_eq!(bucket.remove("key0").map(|n| n.into_entry().0), Some("key0".to_string()));
        // tail
        assert_eq!(bucket.remove("key3").map(|n| n.into_entry().0), Some("key3".to_string()));
        // interior
        assert_eq!(bucket.remove("key2").map(|n| n.into_entry().0), Some("key2".to_string()));
        // gone
        assert_eq!(bucket.remove("key2"), None);

        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket.head(), bucket.tail());
    }

    #[test]
    fn iter() {
        let bucket = filled(10);

        for (i, node) in bucket.iter().enumerate() {
            assert_eq!(node.key(), format!("key{i}"));
        }
        assert_eq!(bucket.len(), 10);

        for (i, node) in bucket.into_iter().enumerate() {
            assert_eq!(node.into_entry().1, format!("value{i}"));
        }
    }
}
